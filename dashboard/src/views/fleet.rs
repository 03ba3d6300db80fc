use std::sync::Arc;

use axum::extract::{Query, State};
use maud::{Markup, html};
use shared::models::Vehicle;

use crate::context::PageContext;
use crate::error::AppError;
use crate::format::group_digits;
use crate::metrics::{FleetTotals, fleet_totals};
use crate::state::AppState;
use crate::styles::{Records as RecordClass, Stats as StatClass, VehicleList as VehicleClass};

use super::breadcrumbs::{Breadcrumb, breadcrumbs};
use super::forms::{Submit, VehicleForm, vehicle_form};
use super::{ThemeQuery, page_shell};

fn fleet_stats(totals: &FleetTotals, vehicles: usize, ctx: &PageContext) -> Markup {
    html! {
        div.(StatClass::STATS_GRID) {
            div.(StatClass::STAT_TILE) {
                div.(StatClass::STAT_LABEL) { "Fleet spend" }
                div.(StatClass::STAT_VALUE) { (ctx.money(totals.total_cost)) }
                div.(StatClass::STAT_HINT) { (vehicles) " vehicles" }
            }
            div.(StatClass::STAT_TILE) {
                div.(StatClass::STAT_LABEL) { "Fuel consumed" }
                div.(StatClass::STAT_VALUE) {
                    (format!("{:.1}", totals.total_liters))
                    " " span.(StatClass::STAT_UNIT) { "L" }
                }
            }
            div.(StatClass::STAT_TILE) {
                div.(StatClass::STAT_LABEL) { "Services" }
                div.(StatClass::STAT_VALUE) { (group_digits(totals.total_services)) }
            }
        }
    }
}

fn vehicle_card(vehicle: &Vehicle, ctx: &PageContext) -> Markup {
    html! {
        a.(VehicleClass::VEHICLE_CARD) href=(ctx.link(&format!("/vehicles/{}", vehicle.id))) {
            @if !vehicle.image_url.is_empty() {
                img.(VehicleClass::VEHICLE_IMAGE) src=(vehicle.image_url) alt=(vehicle.name);
            }
            h3 { (vehicle.name) }
            div.(VehicleClass::VEHICLE_META) {
                span.(VehicleClass::KIND_BADGE) { (vehicle.kind.as_str()) }
                " " (vehicle.make) " " (vehicle.model) " · " (vehicle.year)
            }
            @if !vehicle.license_plate.is_empty() {
                div.(VehicleClass::VEHICLE_META) { (vehicle.license_plate) }
            }
        }
    }
}

pub fn vehicle_grid(vehicles: &[Vehicle], ctx: &PageContext) -> Markup {
    html! {
        @if vehicles.is_empty() {
            div.(RecordClass::EMPTY_STATE) { "No vehicles yet. Add your first ride to get started." }
        } @else {
            div.(VehicleClass::VEHICLE_GRID) {
                @for vehicle in vehicles {
                    (vehicle_card(vehicle, ctx))
                }
            }
        }
    }
}

pub async fn index(
    Query(query): Query<ThemeQuery>,
    State(state): State<Arc<AppState>>,
) -> Result<Markup, AppError> {
    let (ctx, vehicles) = tokio::join!(state.page_context(query.theme), state.api.list_vehicles());
    let vehicles = vehicles?;
    let stats = state.api.fleet_stats(&vehicles).await;
    let totals = fleet_totals(&stats);

    let content = html! {
        (breadcrumbs(&[Breadcrumb { label: "garage", href: None }]))
        (fleet_stats(&totals, vehicles.len(), &ctx))
        div.(RecordClass::TOOLBAR) {
            button
                hx-get="/fragments/vehicles/new"
                hx-target="#vehicle-form"
                hx-swap="innerHTML"
            {
                "[+ add vehicle]"
            }
        }
        div #vehicle-form {}
        (vehicle_grid(&vehicles, &ctx))
    };
    Ok(page_shell("Garage", "/", &ctx, content))
}

pub async fn new_vehicle_form() -> Markup {
    let form = VehicleForm {
        kind: "car".to_owned(),
        ..Default::default()
    };
    vehicle_form(&form, &Submit::Create("/vehicles".to_owned()), None)
}

#[cfg(test)]
mod tests {
    use shared::models::VehicleKind;

    use crate::context::Theme;

    use super::*;

    #[test]
    fn cards_link_with_theme() {
        let ctx = PageContext::new(Theme::Light, "₹");
        let vehicle = Vehicle {
            id: 8,
            name: "Family car".into(),
            make: "Maruti".into(),
            model: "Swift".into(),
            year: 2019,
            kind: VehicleKind::Car,
            vin: String::new(),
            license_plate: String::new(),
            image_url: String::new(),
            created_at: String::new(),
        };
        let html = vehicle_grid(&[vehicle], &ctx).into_string();
        assert!(html.contains("href=\"/vehicles/8?theme=light\""));
        assert!(html.contains("Family car"));
    }

    #[test]
    fn empty_fleet_prompts_for_a_vehicle() {
        let ctx = PageContext::new(Theme::Dark, "₹");
        assert!(vehicle_grid(&[], &ctx).into_string().contains("No vehicles yet"));
    }
}
