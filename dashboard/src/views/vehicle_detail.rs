use std::sync::Arc;

use axum::extract::{Path, Query, State};
use chrono::{DateTime, Utc};
use maud::{Markup, html};
use serde::Deserialize;
use shared::models::{Vehicle, VehicleId};

use crate::api::VehicleSnapshot;
use crate::context::PageContext;
use crate::error::AppError;
use crate::format::format_km;
use crate::metrics::VehicleMetrics;
use crate::state::AppState;
use crate::styles::{Records as RecordClass, Stats as StatClass, VehicleList as VehicleClass};

use super::breadcrumbs::{Breadcrumb, breadcrumbs};
use super::{ThemeQuery, analytics, page_shell, records, reminders};

#[derive(Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Tab {
    #[default]
    Service,
    Fuel,
    Reminders,
    Documents,
    Analytics,
}

impl Tab {
    const ALL: [Tab; 5] = [
        Tab::Service,
        Tab::Fuel,
        Tab::Reminders,
        Tab::Documents,
        Tab::Analytics,
    ];

    pub fn slug(self) -> &'static str {
        match self {
            Tab::Service => "service",
            Tab::Fuel => "fuel",
            Tab::Reminders => "reminders",
            Tab::Documents => "documents",
            Tab::Analytics => "analytics",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Tab::Service => "Service History",
            Tab::Fuel => "Fuel Logs",
            Tab::Reminders => "Reminders",
            Tab::Documents => "Documents",
            Tab::Analytics => "Analytics",
        }
    }
}

fn vehicle_header(vehicle: &Vehicle) -> Markup {
    html! {
        div.(RecordClass::VEHICLE_HEADER) {
            @if !vehicle.image_url.is_empty() {
                img.(VehicleClass::VEHICLE_IMAGE) src=(vehicle.image_url) alt=(vehicle.name);
            }
            div {
                h2 {
                    (vehicle.name) " "
                    span.(VehicleClass::KIND_BADGE) { (vehicle.kind.as_str()) }
                }
                div.(RecordClass::MUTED) {
                    (vehicle.make) " " (vehicle.model) " · " (vehicle.year)
                }
                @if !vehicle.license_plate.is_empty() {
                    div { "Plate: " (vehicle.license_plate) }
                }
                @if !vehicle.vin.is_empty() {
                    div.(RecordClass::MUTED) { "VIN: " (vehicle.vin) }
                }
            }
            div.(RecordClass::ACTIONS) {
                button
                    hx-get=(format!("/fragments/vehicles/{}/edit", vehicle.id))
                    hx-target="#vehicle-form"
                    hx-swap="innerHTML"
                {
                    "[edit]"
                }
                button.(RecordClass::DANGER)
                    hx-delete=(format!("/vehicles/{}", vehicle.id))
                    hx-confirm="Delete this vehicle and all of its records?"
                {
                    "[delete]"
                }
            }
        }
        div #vehicle-form {}
    }
}

/// Header tiles. Rendered with `hx-swap-oob` after a mutation so the totals
/// follow the tab that changed.
pub fn stats_grid(metrics: &VehicleMetrics, ctx: &PageContext, out_of_band: bool) -> Markup {
    html! {
        div #stats-grid .(StatClass::STATS_GRID) hx-swap-oob=[out_of_band.then_some("true")] {
            div.(StatClass::STAT_TILE) {
                div.(StatClass::STAT_LABEL) { "Lifetime cost" }
                div.(StatClass::STAT_VALUE) { (ctx.money(metrics.costs.lifetime())) }
                div.(StatClass::STAT_HINT) {
                    "S: " (ctx.money(metrics.costs.service)) " · F: " (ctx.money(metrics.costs.fuel))
                }
            }
            div.(StatClass::STAT_TILE) {
                div.(StatClass::STAT_LABEL) { "Monthly average" }
                div.(StatClass::STAT_VALUE) { (ctx.money(metrics.monthly_cost.round())) }
            }
            div.(StatClass::STAT_TILE) {
                div.(StatClass::STAT_LABEL) { "Distance travelled" }
                div.(StatClass::STAT_VALUE) { (format_km(metrics.current_odometer)) }
            }
            div.(StatClass::STAT_TILE) {
                div.(StatClass::STAT_LABEL) { "Active reminders" }
                div.(StatClass::STAT_VALUE) { (metrics.active_reminders) }
            }
        }
    }
}

fn tab_bar(vehicle_id: VehicleId, active: Tab) -> Markup {
    html! {
        nav.(RecordClass::TAB_BAR) {
            @for tab in Tab::ALL {
                button
                    .(RecordClass::TAB)
                    .(if tab == active { RecordClass::TAB_ACTIVE } else { "" })
                    hx-get=(format!("/fragments/vehicles/{vehicle_id}/{}", tab.slug()))
                    hx-target="#tab-content"
                    hx-swap="innerHTML"
                {
                    (tab.label())
                }
            }
        }
    }
}

/// Tab bar plus the body of `tab`; the content of `#tab-content`.
pub fn tab_panel(
    tab: Tab,
    snapshot: &VehicleSnapshot,
    metrics: &VehicleMetrics,
    ctx: &PageContext,
    now: DateTime<Utc>,
    slot: Option<Markup>,
) -> Markup {
    let id = snapshot.vehicle.id;
    let body = match tab {
        Tab::Service => records::service_tab(id, &snapshot.services, ctx, slot),
        Tab::Fuel => records::fuel_tab(id, &snapshot.fuel_logs, ctx, slot),
        Tab::Reminders => {
            reminders::reminders_tab(id, &snapshot.reminders, metrics.current_odometer, now, slot)
        }
        Tab::Documents => {
            records::documents_tab(id, &snapshot.documents, now.date_naive(), slot)
        }
        Tab::Analytics => analytics::analytics_tab(metrics, snapshot.stats.as_ref(), ctx),
    };
    html! {
        (tab_bar(id, tab))
        (body)
    }
}

fn compute_metrics(snapshot: &VehicleSnapshot, now: DateTime<Utc>) -> VehicleMetrics {
    VehicleMetrics::compute(
        &snapshot.services,
        &snapshot.fuel_logs,
        &snapshot.reminders,
        now,
    )
}

pub async fn vehicle_detail(
    Path(id): Path<VehicleId>,
    Query(query): Query<ThemeQuery>,
    State(state): State<Arc<AppState>>,
) -> Result<Markup, AppError> {
    let (ctx, snapshot) = tokio::join!(
        state.page_context(query.theme),
        state.api.vehicle_snapshot(id)
    );
    let snapshot = snapshot?;
    let now = Utc::now();
    let metrics = compute_metrics(&snapshot, now);
    let path = format!("/vehicles/{id}");
    let home = ctx.link("/");

    let content = html! {
        (breadcrumbs(&[
            Breadcrumb { label: "garage", href: Some(&home) },
            Breadcrumb { label: &snapshot.vehicle.name, href: None },
        ]))
        (vehicle_header(&snapshot.vehicle))
        (stats_grid(&metrics, &ctx, false))
        div #tab-content {
            (tab_panel(Tab::default(), &snapshot, &metrics, &ctx, now, None))
        }
    };
    Ok(page_shell(
        &format!("{} | Garage", snapshot.vehicle.name),
        &path,
        &ctx,
        content,
    ))
}

/// Re-fetches the vehicle and renders one tab. With `refresh_stats` the
/// header tiles ride along out of band.
pub async fn render_tab(
    state: &AppState,
    id: VehicleId,
    tab: Tab,
    slot: Option<Markup>,
    refresh_stats: bool,
) -> Result<Markup, AppError> {
    let (ctx, snapshot) = tokio::join!(state.page_context(None), state.api.vehicle_snapshot(id));
    let snapshot = snapshot?;
    let now = Utc::now();
    let metrics = compute_metrics(&snapshot, now);
    Ok(html! {
        (tab_panel(tab, &snapshot, &metrics, &ctx, now, slot))
        @if refresh_stats {
            (stats_grid(&metrics, &ctx, true))
        }
    })
}

pub async fn fragment_tab(
    Path((id, tab)): Path<(VehicleId, Tab)>,
    State(state): State<Arc<AppState>>,
) -> Result<Markup, AppError> {
    render_tab(&state, id, tab, None, false).await
}
