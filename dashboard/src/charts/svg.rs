use std::f64::consts::PI;
use std::fmt::Write;

use maud::{Markup, html};

use crate::format::format_date;
use crate::metrics::{CostCategory, CostSlice, MileageBucket, MileagePoint, MileageTrend, SpendBucket};

const WIDTH: f64 = 600.0;
const HEIGHT: f64 = 240.0;
const MARGIN_LEFT: f64 = 60.0;
const MARGIN_RIGHT: f64 = 20.0;
const MARGIN_TOP: f64 = 24.0;
const MARGIN_BOTTOM: f64 = 30.0;

const TEXT_STYLE: &str = "fill: var(--foreground); font-family: inherit";
const SVG_CONTAINER_STYLE: &str = "width:100%;height:auto";

pub fn category_color(category: CostCategory) -> &'static str {
    match category {
        CostCategory::Fuel => "var(--fuel)",
        CostCategory::Service => "var(--service)",
    }
}

pub fn trend_color(trend: MileageTrend) -> &'static str {
    match trend {
        MileageTrend::Good => "var(--good)",
        MileageTrend::Warning => "var(--warning)",
        MileageTrend::Critical => "var(--critical)",
    }
}

pub fn format_value(v: f64) -> String {
    if v == v.floor() && v.abs() < 1_000_000.0 {
        format!("{v:.0}")
    } else {
        format!("{v:.1}")
    }
}

fn chart_w() -> f64 {
    WIDTH - MARGIN_LEFT - MARGIN_RIGHT
}

fn chart_h() -> f64 {
    HEIGHT - MARGIN_TOP - MARGIN_BOTTOM
}

fn y_axis(max_label: &str, min_label: &str) -> Markup {
    html! {
        text x=(MARGIN_LEFT - 5.0) y=(MARGIN_TOP + 10.0) font-size="10" text-anchor="end" style=(TEXT_STYLE) {
            (max_label)
        }
        text x=(MARGIN_LEFT - 5.0) y=(MARGIN_TOP + chart_h()) font-size="10" text-anchor="end" style=(TEXT_STYLE) {
            (min_label)
        }
    }
}

fn x_label(x: f64, label: &str) -> Markup {
    html! {
        text x=(x) y=(HEIGHT - 8.0) font-size="11" text-anchor="middle" style=(TEXT_STYLE) { (label) }
    }
}

/// Monthly spend with fuel stacked under service.
pub fn render_spend_chart(buckets: &[SpendBucket], currency: &str) -> Markup {
    if buckets.is_empty() {
        return empty_chart("6-month spend");
    }

    let max_val = buckets.iter().map(SpendBucket::total).fold(0.0_f64, f64::max);
    let max_val = if max_val == 0.0 { 1.0 } else { max_val };
    let slot_w = chart_w() / buckets.len() as f64;
    let bar_w = (slot_w * 0.6).max(1.0);

    html! {
        svg viewBox=(format!("0 0 {WIDTH} {HEIGHT}")) xmlns="http://www.w3.org/2000/svg" style=(SVG_CONTAINER_STYLE) {
            rect width=(WIDTH) height=(HEIGHT) style="fill: var(--background)" {}
            (y_axis(&format!("{currency}{}", format_value(max_val)), &format!("{currency}0")))
            @for (i, bucket) in buckets.iter().enumerate() {
                @let x = MARGIN_LEFT + i as f64 * slot_w + (slot_w - bar_w) / 2.0;
                @let fuel_h = bucket.fuel / max_val * chart_h();
                @let service_h = bucket.service / max_val * chart_h();
                @let base = MARGIN_TOP + chart_h();
                rect x=(x) y=(base - fuel_h) width=(bar_w) height=(fuel_h) style=(format!("fill: {}", category_color(CostCategory::Fuel))) {
                    title { (bucket.label()) " fuel: " (currency) (format_value(bucket.fuel)) }
                }
                rect x=(x) y=(base - fuel_h - service_h) width=(bar_w) height=(service_h) style=(format!("fill: {}", category_color(CostCategory::Service))) {
                    title { (bucket.label()) " service: " (currency) (format_value(bucket.service)) }
                }
                (x_label(x + bar_w / 2.0, bucket.label()))
            }
        }
    }
}

/// km/L per full-tank fill over time.
pub fn render_efficiency_chart(points: &[MileagePoint]) -> Markup {
    if points.is_empty() {
        return empty_chart("Fuel efficiency");
    }

    let max_val = points.iter().map(|p| p.mileage).fold(0.0_f64, f64::max);
    let min_val = points
        .iter()
        .map(|p| p.mileage)
        .fold(f64::INFINITY, f64::min);
    let range = if (max_val - min_val).abs() < f64::EPSILON {
        1.0
    } else {
        max_val - min_val
    };

    let position = |i: usize, val: f64| {
        let x = MARGIN_LEFT + (i as f64 / (points.len() - 1).max(1) as f64) * chart_w();
        let y = MARGIN_TOP + chart_h() - ((val - min_val) / range) * chart_h();
        (x, y)
    };

    let mut polyline = String::new();
    for (i, point) in points.iter().enumerate() {
        let (x, y) = position(i, point.mileage);
        if !polyline.is_empty() {
            polyline.push(' ');
        }
        let _ = write!(polyline, "{x:.1},{y:.1}");
    }

    let last = points.len() - 1;

    html! {
        svg viewBox=(format!("0 0 {WIDTH} {HEIGHT}")) xmlns="http://www.w3.org/2000/svg" style=(SVG_CONTAINER_STYLE) {
            rect width=(WIDTH) height=(HEIGHT) style="fill: var(--background)" {}
            (y_axis(&format_value(max_val), &format_value(min_val)))
            polyline points=(polyline) fill="none" stroke-width="3" style="stroke: var(--efficiency)" {}
            @for (i, point) in points.iter().enumerate() {
                @let (x, y) = position(i, point.mileage);
                circle cx=(x) cy=(y) r="4" style="fill: var(--efficiency)" {
                    title { (format_date(point.date)) ": " (format!("{:.1}", point.mileage)) " km/L" }
                }
            }
            (x_label(MARGIN_LEFT, &format_date(points[0].date)))
            @if last > 0 {
                (x_label(MARGIN_LEFT + chart_w(), &format_date(points[last].date)))
            }
        }
    }
}

/// Average km/L per month; months without fills are not drawn.
pub fn render_monthly_mileage_chart(buckets: &[MileageBucket]) -> Markup {
    let shown: Vec<&MileageBucket> = buckets.iter().filter(|b| b.has_data()).collect();
    if shown.is_empty() {
        return empty_chart("Monthly avg. mileage");
    }

    let max_val = shown.iter().map(|b| b.average).fold(0.0_f64, f64::max);
    let max_val = if max_val == 0.0 { 1.0 } else { max_val };
    let slot_w = chart_w() / shown.len() as f64;
    let bar_w = (slot_w * 0.6).max(1.0);

    html! {
        svg viewBox=(format!("0 0 {WIDTH} {HEIGHT}")) xmlns="http://www.w3.org/2000/svg" style=(SVG_CONTAINER_STYLE) {
            rect width=(WIDTH) height=(HEIGHT) style="fill: var(--background)" {}
            (y_axis(&format!("{} km/L", format_value(max_val)), "0"))
            @for (i, bucket) in shown.iter().enumerate() {
                @let bar_h = bucket.average / max_val * chart_h();
                @let x = MARGIN_LEFT + i as f64 * slot_w + (slot_w - bar_w) / 2.0;
                @let y = MARGIN_TOP + chart_h() - bar_h;
                rect x=(x) y=(y) width=(bar_w) height=(bar_h) rx="4" style=(format!("fill: {}", trend_color(bucket.trend))) {
                    title { (bucket.label()) ": " (format!("{:.1}", bucket.average)) " km/L (" (bucket.trend.label()) ")" }
                }
                (x_label(x + bar_w / 2.0, bucket.label()))
            }
        }
    }
}

fn arc_path(cx: f64, cy: f64, outer: f64, inner: f64, start: f64, end: f64) -> String {
    let point = |r: f64, angle: f64| (cx + r * angle.cos(), cy + r * angle.sin());
    let large = if end - start > PI { 1 } else { 0 };
    let (ox1, oy1) = point(outer, start);
    let (ox2, oy2) = point(outer, end);
    let (ix2, iy2) = point(inner, end);
    let (ix1, iy1) = point(inner, start);
    format!(
        "M {ox1:.2} {oy1:.2} A {outer} {outer} 0 {large} 1 {ox2:.2} {oy2:.2} \
         L {ix2:.2} {iy2:.2} A {inner} {inner} 0 {large} 0 {ix1:.2} {iy1:.2} Z"
    )
}

/// Donut of lifetime spend per category.
pub fn render_cost_distribution(slices: &[CostSlice], currency: &str) -> Markup {
    let total: f64 = slices.iter().map(|s| s.value).sum();
    if slices.is_empty() || total <= 0.0 {
        return empty_chart("Cost distribution");
    }

    let (cx, cy) = (WIDTH / 2.0, (HEIGHT - MARGIN_BOTTOM) / 2.0 + 5.0);
    let (outer, inner) = (95.0, 60.0);

    let mut start = -PI / 2.0;
    let mut arcs = Vec::with_capacity(slices.len());
    for slice in slices {
        let sweep = slice.value / total * 2.0 * PI;
        // a full circle cannot be drawn as a single arc
        let end = start + sweep.min(2.0 * PI - 1e-4);
        arcs.push((slice, arc_path(cx, cy, outer, inner, start, end)));
        start += sweep;
    }

    html! {
        svg viewBox=(format!("0 0 {WIDTH} {HEIGHT}")) xmlns="http://www.w3.org/2000/svg" style=(SVG_CONTAINER_STYLE) {
            rect width=(WIDTH) height=(HEIGHT) style="fill: var(--background)" {}
            @for (slice, path) in &arcs {
                path d=(path) style=(format!("fill: {}", category_color(slice.category))) {
                    title { (slice.category.label()) ": " (currency) (format_value(slice.value)) }
                }
            }
            @for (i, slice) in slices.iter().enumerate() {
                @let x = WIDTH / 2.0 - 80.0 + i as f64 * 100.0;
                rect x=(x) y=(HEIGHT - 20.0) width="10" height="10" style=(format!("fill: {}", category_color(slice.category))) {}
                text x=(x + 14.0) y=(HEIGHT - 11.0) font-size="11" style=(TEXT_STYLE) { (slice.category.label()) }
            }
        }
    }
}

pub fn empty_chart(label: &str) -> Markup {
    html! {
        svg viewBox=(format!("0 0 {WIDTH} {HEIGHT}")) xmlns="http://www.w3.org/2000/svg" style=(SVG_CONTAINER_STYLE) {
            rect width=(WIDTH) height=(HEIGHT) style="fill: var(--background)" {}
            text x=(WIDTH / 2.0) y=(HEIGHT / 2.0) font-size="14" text-anchor="middle" style=(TEXT_STYLE) {
                (label) " — no data"
            }
        }
    }
}
