use std::sync::Arc;

use axum::Form;
use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Response};
use chrono::Utc;
use maud::Markup;
use serde::Deserialize;
use shared::models::{RecordId, VehicleId};
use tracing::info;

use crate::error::AppError;
use crate::metrics::{FuelField, derive_fuel_draft};
use crate::state::AppState;

use super::forms::{
    DocumentForm, FuelForm, ReminderForm, ServiceForm, Submit, VehicleForm, document_form,
    fuel_amounts, fuel_form, reminder_form, service_form, vehicle_form,
};
use super::vehicle_detail::{Tab, render_tab};

const HX_REDIRECT: &str = "HX-Redirect";

/// Record collections below a vehicle, as they appear in URLs.
#[derive(Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Collection {
    Services,
    Fuel,
    Reminders,
    Documents,
}

fn create_url(vehicle_id: VehicleId, collection: &str) -> Submit {
    Submit::Create(format!("/vehicles/{vehicle_id}/{collection}"))
}

fn update_url(vehicle_id: VehicleId, collection: &str, id: RecordId) -> Submit {
    Submit::Update(format!("/vehicles/{vehicle_id}/{collection}/{id}"))
}

fn redirect(to: String) -> Response {
    ([(HX_REDIRECT, to)], ()).into_response()
}

// Vehicles

pub async fn edit_vehicle_form(
    Path(id): Path<VehicleId>,
    State(state): State<Arc<AppState>>,
) -> Result<Markup, AppError> {
    let vehicle = state.api.get_vehicle(id).await?;
    Ok(vehicle_form(
        &VehicleForm::from(&vehicle),
        &Submit::Update(format!("/vehicles/{id}")),
        None,
    ))
}

pub async fn create_vehicle(
    State(state): State<Arc<AppState>>,
    Form(form): Form<VehicleForm>,
) -> Result<Response, AppError> {
    let submit = Submit::Create("/vehicles".to_owned());
    match form.parse() {
        Ok(vehicle) => {
            let created = state.api.create_vehicle(&vehicle).await?;
            info!("Added vehicle {} ({})", created.id, created.name);
            Ok(redirect(format!("/vehicles/{}", created.id)))
        }
        Err(e) => Ok(vehicle_form(&form, &submit, Some(&e)).into_response()),
    }
}

pub async fn update_vehicle(
    Path(id): Path<VehicleId>,
    State(state): State<Arc<AppState>>,
    Form(form): Form<VehicleForm>,
) -> Result<Response, AppError> {
    let submit = Submit::Update(format!("/vehicles/{id}"));
    match form.parse() {
        Ok(vehicle) => {
            state.api.update_vehicle(id, &vehicle).await?;
            info!("Updated vehicle {id}");
            Ok(redirect(format!("/vehicles/{id}")))
        }
        Err(e) => Ok(vehicle_form(&form, &submit, Some(&e)).into_response()),
    }
}

pub async fn delete_vehicle(
    Path(id): Path<VehicleId>,
    State(state): State<Arc<AppState>>,
) -> Result<Response, AppError> {
    state.api.delete_vehicle(id).await?;
    info!("Deleted vehicle {id}");
    Ok(redirect("/".to_owned()))
}

// Record forms

pub async fn new_record_form(
    Path((vehicle_id, collection)): Path<(VehicleId, Collection)>,
    State(state): State<Arc<AppState>>,
) -> Markup {
    let today = Utc::now().date_naive();
    match collection {
        Collection::Services => service_form(
            &ServiceForm::dated(today),
            &create_url(vehicle_id, "services"),
            None,
        ),
        Collection::Fuel => {
            let ctx = state.page_context(None).await;
            fuel_form(
                &FuelForm::dated(today),
                &create_url(vehicle_id, "fuel"),
                None,
                &ctx.currency,
            )
        }
        Collection::Reminders => reminder_form(
            &ReminderForm::default(),
            &create_url(vehicle_id, "reminders"),
            None,
        ),
        Collection::Documents => document_form(
            &DocumentForm::default(),
            &create_url(vehicle_id, "documents"),
            None,
        ),
    }
}

/// Edit form for an existing service record or fuel log. Other collections
/// are not editable and answer 404.
pub async fn edit_record_form(
    Path((vehicle_id, collection, id)): Path<(VehicleId, Collection, RecordId)>,
    State(state): State<Arc<AppState>>,
) -> Result<Markup, AppError> {
    let not_found = || AppError::NotFound(format!("{collection:?} record {id}"));
    match collection {
        Collection::Services => {
            let services = state.api.list_services(vehicle_id).await?;
            let record = services.iter().find(|s| s.id == id).ok_or_else(not_found)?;
            Ok(service_form(
                &ServiceForm::from(record),
                &update_url(vehicle_id, "services", id),
                None,
            ))
        }
        Collection::Fuel => {
            let (ctx, logs) = tokio::join!(
                state.page_context(None),
                state.api.list_fuel_logs(vehicle_id)
            );
            let logs = logs?;
            let log = logs.iter().find(|l| l.id == id).ok_or_else(not_found)?;
            Ok(fuel_form(
                &FuelForm::from(log),
                &update_url(vehicle_id, "fuel", id),
                None,
                &ctx.currency,
            ))
        }
        Collection::Reminders | Collection::Documents => Err(not_found()),
    }
}

// Mutations. Each answers with the refreshed tab; a rejected form comes back
// inside it with the error.

pub async fn create_service(
    Path(vehicle_id): Path<VehicleId>,
    State(state): State<Arc<AppState>>,
    Form(form): Form<ServiceForm>,
) -> Result<Markup, AppError> {
    let slot = match form.parse(vehicle_id) {
        Ok(record) => {
            state.api.create_service(&record).await?;
            info!("Logged service for vehicle {vehicle_id}");
            None
        }
        Err(e) => Some(service_form(&form, &create_url(vehicle_id, "services"), Some(&e))),
    };
    render_tab(&state, vehicle_id, Tab::Service, slot, true).await
}

pub async fn update_service(
    Path((vehicle_id, id)): Path<(VehicleId, RecordId)>,
    State(state): State<Arc<AppState>>,
    Form(form): Form<ServiceForm>,
) -> Result<Markup, AppError> {
    let slot = match form.parse(vehicle_id) {
        Ok(record) => {
            state.api.update_service(id, &record).await?;
            info!("Updated service {id}");
            None
        }
        Err(e) => Some(service_form(
            &form,
            &update_url(vehicle_id, "services", id),
            Some(&e),
        )),
    };
    render_tab(&state, vehicle_id, Tab::Service, slot, true).await
}

pub async fn create_fuel_log(
    Path(vehicle_id): Path<VehicleId>,
    State(state): State<Arc<AppState>>,
    Form(form): Form<FuelForm>,
) -> Result<Markup, AppError> {
    let slot = match form.parse(vehicle_id) {
        Ok(log) => {
            state.api.create_fuel_log(&log).await?;
            info!("Logged fuel for vehicle {vehicle_id}");
            None
        }
        Err(e) => {
            let ctx = state.page_context(None).await;
            Some(fuel_form(
                &form,
                &create_url(vehicle_id, "fuel"),
                Some(&e),
                &ctx.currency,
            ))
        }
    };
    render_tab(&state, vehicle_id, Tab::Fuel, slot, true).await
}

pub async fn update_fuel_log(
    Path((vehicle_id, id)): Path<(VehicleId, RecordId)>,
    State(state): State<Arc<AppState>>,
    Form(form): Form<FuelForm>,
) -> Result<Markup, AppError> {
    let slot = match form.parse(vehicle_id) {
        Ok(log) => {
            state.api.update_fuel_log(id, &log).await?;
            info!("Updated fuel log {id}");
            None
        }
        Err(e) => {
            let ctx = state.page_context(None).await;
            Some(fuel_form(
                &form,
                &update_url(vehicle_id, "fuel", id),
                Some(&e),
                &ctx.currency,
            ))
        }
    };
    render_tab(&state, vehicle_id, Tab::Fuel, slot, true).await
}

pub async fn create_reminder(
    Path(vehicle_id): Path<VehicleId>,
    State(state): State<Arc<AppState>>,
    Form(form): Form<ReminderForm>,
) -> Result<Markup, AppError> {
    let slot = match form.parse(vehicle_id) {
        Ok(reminder) => {
            state.api.create_reminder(&reminder).await?;
            info!("Set reminder \"{}\" for vehicle {vehicle_id}", reminder.title);
            None
        }
        Err(e) => Some(reminder_form(&form, &create_url(vehicle_id, "reminders"), Some(&e))),
    };
    render_tab(&state, vehicle_id, Tab::Reminders, slot, true).await
}

pub async fn complete_reminder(
    Path((vehicle_id, id)): Path<(VehicleId, RecordId)>,
    State(state): State<Arc<AppState>>,
) -> Result<Markup, AppError> {
    state.api.complete_reminder(id).await?;
    info!("Completed reminder {id}");
    render_tab(&state, vehicle_id, Tab::Reminders, None, true).await
}

pub async fn create_document(
    Path(vehicle_id): Path<VehicleId>,
    State(state): State<Arc<AppState>>,
    Form(form): Form<DocumentForm>,
) -> Result<Markup, AppError> {
    let slot = match form.parse(vehicle_id) {
        Ok(document) => {
            state.api.create_document(&document).await?;
            info!("Added document \"{}\" to vehicle {vehicle_id}", document.name);
            None
        }
        Err(e) => Some(document_form(&form, &create_url(vehicle_id, "documents"), Some(&e))),
    };
    render_tab(&state, vehicle_id, Tab::Documents, slot, true).await
}

async fn after_delete(
    state: &AppState,
    vehicle_id: VehicleId,
    tab: Tab,
    id: RecordId,
) -> Result<Markup, AppError> {
    info!("Deleted {} record {id}", tab.slug());
    render_tab(state, vehicle_id, tab, None, true).await
}

pub async fn delete_service(
    Path((vehicle_id, id)): Path<(VehicleId, RecordId)>,
    State(state): State<Arc<AppState>>,
) -> Result<Markup, AppError> {
    state.api.delete_service(id).await?;
    after_delete(&state, vehicle_id, Tab::Service, id).await
}

pub async fn delete_fuel_log(
    Path((vehicle_id, id)): Path<(VehicleId, RecordId)>,
    State(state): State<Arc<AppState>>,
) -> Result<Markup, AppError> {
    state.api.delete_fuel_log(id).await?;
    after_delete(&state, vehicle_id, Tab::Fuel, id).await
}

pub async fn delete_document(
    Path((vehicle_id, id)): Path<(VehicleId, RecordId)>,
    State(state): State<Arc<AppState>>,
) -> Result<Markup, AppError> {
    state.api.delete_document(id).await?;
    after_delete(&state, vehicle_id, Tab::Documents, id).await
}

#[derive(Deserialize)]
pub struct DeriveQuery {
    edited: Option<FuelField>,
}

/// Live recomputation of the fuel amounts while the form is being filled.
/// The currency is the one the form was rendered with, so no API call is made.
pub async fn derive_fuel_amounts(
    Query(query): Query<DeriveQuery>,
    State(state): State<Arc<AppState>>,
    Form(mut form): Form<FuelForm>,
) -> Markup {
    let before = form.draft();
    let after = derive_fuel_draft(before, query.edited, form.full_tank.is_some());
    form.apply_draft(before, after);
    let currency = match form.currency.trim() {
        "" => state.config.currency.as_str(),
        currency => currency,
    };
    fuel_amounts(&form, currency)
}
