use maud::{Markup, html};
use shared::models::VehicleStats;

use crate::charts::svg;
use crate::config::MIN_EFFICIENCY_POINTS;
use crate::context::PageContext;
use crate::format::group_digits;
use crate::metrics::{MileageTrend, VehicleMetrics, average_service_cost, cost_distribution};
use crate::styles::{Charts as ChartClass, Stats as StatClass};

fn chart_card(title: &str, subtitle: Option<&str>, legend: Option<Markup>, chart: Markup) -> Markup {
    html! {
        div.(ChartClass::CHART_CONTAINER) {
            div.(ChartClass::CHART_HEADER) {
                span { (title) }
                @if let Some(legend) = legend {
                    (legend)
                }
            }
            @if let Some(subtitle) = subtitle {
                div.(ChartClass::CHART_SUBTITLE) { (subtitle) }
            }
            (chart)
        }
    }
}

fn mileage_legend() -> Markup {
    html! {
        div.(ChartClass::CHART_LEGEND) {
            @for trend in [MileageTrend::Good, MileageTrend::Warning, MileageTrend::Critical] {
                span {
                    span.(ChartClass::LEGEND_SWATCH) style=(format!("background: {}", svg::trend_color(trend))) {}
                    (trend.label())
                }
            }
        }
    }
}

fn stat_tile(label: &str, value: String, unit: Option<&str>) -> Markup {
    html! {
        div.(StatClass::STAT_TILE) {
            div.(StatClass::STAT_LABEL) { (label) }
            div.(StatClass::STAT_VALUE) {
                (value)
                @if let Some(unit) = unit {
                    " " span.(StatClass::STAT_UNIT) { (unit) }
                }
            }
        }
    }
}

fn stat_tiles(stats: Option<&VehicleStats>, ctx: &PageContext) -> Markup {
    let Some(stats) = stats else {
        return html! {
            div.(StatClass::STAT_HINT) { "Server statistics are unavailable right now." }
        };
    };
    html! {
        div.(StatClass::STATS_GRID) {
            (stat_tile("Fuel logs", group_digits(stats.total_fuel_logs), None))
            (stat_tile("Services", group_digits(stats.total_services), None))
            (stat_tile("Fuel consumed", format!("{:.1}", stats.total_liters), Some("L")))
            (stat_tile("Avg. service cost", ctx.money(average_service_cost(stats)), None))
        }
    }
}

pub fn analytics_tab(
    metrics: &VehicleMetrics,
    stats: Option<&VehicleStats>,
    ctx: &PageContext,
) -> Markup {
    let efficiency = if metrics.efficiency.len() >= MIN_EFFICIENCY_POINTS {
        svg::render_efficiency_chart(&metrics.efficiency)
    } else {
        svg::empty_chart("Log at least two full-tank fills")
    };

    let has_mileage = metrics.monthly_mileage.iter().any(|b| b.has_data());
    let mileage_legend = has_mileage.then(mileage_legend);

    let slices = cost_distribution(&metrics.costs);

    html! {
        div.(ChartClass::CHART_GRID) {
            (chart_card("Fuel Efficiency Trend", Some("km/L between full-tank fills"), None, efficiency))
            (chart_card(
                "Monthly Avg. Mileage",
                Some("compared with the previous month"),
                mileage_legend,
                svg::render_monthly_mileage_chart(&metrics.monthly_mileage),
            ))
            (chart_card(
                "Cost Distribution",
                None,
                None,
                svg::render_cost_distribution(&slices, &ctx.currency),
            ))
            (chart_card(
                "6-Month Spending Trend",
                None,
                None,
                svg::render_spend_chart(&metrics.spend_trend, &ctx.currency),
            ))
        }
        (stat_tiles(stats, ctx))
    }
}
