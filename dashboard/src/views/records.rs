use chrono::NaiveDate;
use maud::{Markup, html};
use shared::models::{Document, FuelLog, ServiceRecord, ServiceType, VehicleId};

use crate::context::PageContext;
use crate::format::{format_date, format_km, format_optional_date};
use crate::styles::Records as RecordClass;

/// Toolbar with the add button plus the slot the record form is loaded into.
/// `slot` is pre-filled when a rejected submission is rendered back.
pub fn toolbar(vehicle_id: VehicleId, collection: &str, label: &str, slot: Option<Markup>) -> Markup {
    html! {
        div.(RecordClass::TOOLBAR) {
            button
                hx-get=(format!("/fragments/vehicles/{vehicle_id}/{collection}/new"))
                hx-target="#record-form"
                hx-swap="innerHTML"
            {
                "[+ " (label) "]"
            }
        }
        div #record-form {
            @if let Some(slot) = slot {
                (slot)
            }
        }
    }
}

fn row_actions(vehicle_id: VehicleId, collection: &str, id: i64, editable: bool) -> Markup {
    html! {
        span.(RecordClass::ACTIONS) {
            @if editable {
                button
                    hx-get=(format!("/fragments/vehicles/{vehicle_id}/{collection}/{id}/edit"))
                    hx-target="#record-form"
                    hx-swap="innerHTML"
                {
                    "[edit]"
                }
            }
            button.(RecordClass::DANGER)
                hx-delete=(format!("/vehicles/{vehicle_id}/{collection}/{id}"))
                hx-confirm="Delete this record?"
                hx-target="#tab-content"
                hx-swap="innerHTML"
            {
                "[delete]"
            }
        }
    }
}

fn empty_state(message: &str) -> Markup {
    html! {
        div.(RecordClass::EMPTY_STATE) { (message) }
    }
}

fn service_badge(service_type: &ServiceType) -> &'static str {
    match service_type {
        ServiceType::Maintenance => RecordClass::BADGE_MAINTENANCE,
        ServiceType::Repair => RecordClass::BADGE_REPAIR,
        ServiceType::Modification => RecordClass::BADGE_MODIFICATION,
        ServiceType::Other(_) => "",
    }
}

fn newest_first<T>(items: &[T], key: impl Fn(&T) -> (NaiveDate, u32)) -> Vec<&T> {
    let mut sorted: Vec<&T> = items.iter().collect();
    sorted.sort_by_key(|item| std::cmp::Reverse(key(item)));
    sorted
}

pub fn service_tab(
    vehicle_id: VehicleId,
    services: &[ServiceRecord],
    ctx: &PageContext,
    slot: Option<Markup>,
) -> Markup {
    let services = newest_first(services, |s| (s.date, s.odometer));
    html! {
        (toolbar(vehicle_id, "services", "log service", slot))
        @if services.is_empty() {
            (empty_state("No service records yet. Time to get your hands dirty!"))
        }
        @for record in &services {
            div.(RecordClass::TIMELINE_ENTRY) {
                div {
                    span.(RecordClass::BADGE).(service_badge(&record.service_type)) {
                        (record.service_type)
                    }
                    @if !record.notes.is_empty() {
                        p.(RecordClass::NOTES) { (record.notes) }
                    }
                    @if let Some(url) = record.document_url.as_deref() {
                        a href=(url) target="_blank" rel="noopener" { "[attachment]" }
                    }
                }
                div {
                    div.(RecordClass::TIMELINE_COST) { (ctx.money(record.cost)) }
                    div.(RecordClass::MUTED) {
                        (format_date(record.date)) " · " (format_km(record.odometer))
                    }
                    (row_actions(vehicle_id, "services", record.id, true))
                }
            }
        }
    }
}

pub fn fuel_tab(
    vehicle_id: VehicleId,
    fuel_logs: &[FuelLog],
    ctx: &PageContext,
    slot: Option<Markup>,
) -> Markup {
    let logs = newest_first(fuel_logs, |l| (l.date, l.odometer));
    html! {
        (toolbar(vehicle_id, "fuel", "log fuel", slot))
        @if logs.is_empty() {
            (empty_state("No fuel logs. Start tracking your mileage!"))
        } @else {
            table.(RecordClass::RECORD_TABLE) {
                thead {
                    tr {
                        th { "Date" }
                        th.(RecordClass::NUMERIC) { "Odometer" }
                        th.(RecordClass::NUMERIC) { "Litres" }
                        th.(RecordClass::NUMERIC) { "Price / L" }
                        th.(RecordClass::NUMERIC) { "Total" }
                        th.(RecordClass::NUMERIC) { "km/L" }
                        th {}
                    }
                }
                tbody {
                    @for log in &logs {
                        tr {
                            td { (format_date(log.date)) }
                            td.(RecordClass::NUMERIC) { (format_km(log.odometer)) }
                            td.(RecordClass::NUMERIC) {
                                (format!("{:.2}", log.liters))
                                @if log.full_tank {
                                    " " span.(RecordClass::BADGE).(RecordClass::BADGE_FULL) { "FULL" }
                                }
                            }
                            td.(RecordClass::NUMERIC) { (ctx.money(log.price_per_liter)) }
                            td.(RecordClass::NUMERIC) { (ctx.money(log.total_cost)) }
                            td.(RecordClass::NUMERIC) {
                                @if log.mileage > 0.0 {
                                    (format!("{:.1}", log.mileage))
                                } @else {
                                    span.(RecordClass::MUTED) { "-" }
                                }
                            }
                            td { (row_actions(vehicle_id, "fuel", log.id, true)) }
                        }
                    }
                }
            }
        }
    }
}

pub fn documents_tab(
    vehicle_id: VehicleId,
    documents: &[Document],
    today: NaiveDate,
    slot: Option<Markup>,
) -> Markup {
    html! {
        (toolbar(vehicle_id, "documents", "add document", slot))
        @if documents.is_empty() {
            (empty_state("No documents uploaded."))
        } @else {
            div.(RecordClass::CARD_GRID) {
                @for doc in documents {
                    @let expired = doc.expiry_date.is_some_and(|d| d < today);
                    div.(RecordClass::CARD) {
                        h4 { (doc.name) }
                        @if !doc.kind.is_empty() {
                            span.(RecordClass::BADGE) { (doc.kind) }
                        }
                        p.(RecordClass::MUTED) {
                            "Expires: "
                            span.(if expired { RecordClass::OVERDUE } else { "" }) {
                                (format_optional_date(doc.expiry_date))
                            }
                        }
                        @if !doc.notes.is_empty() {
                            p.(RecordClass::NOTES) { (doc.notes) }
                        }
                        a href=(doc.file_url) target="_blank" rel="noopener" { "[open]" }
                        (row_actions(vehicle_id, "documents", doc.id, false))
                    }
                }
            }
        }
    }
}
