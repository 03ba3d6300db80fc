//! HTML forms and the parsing of their submitted values.
//!
//! Every form keeps the raw strings the user typed so a rejected submission
//! can be rendered back unchanged next to its [`FormError`].

use chrono::NaiveDate;
use maud::{Markup, html};
use serde::Deserialize;
use shared::models::{
    FuelLog, NewDocument, NewFuelLog, NewReminder, NewServiceRecord, NewVehicle, ServiceRecord,
    ServiceType, Vehicle, VehicleId, VehicleKind,
};
use thiserror::Error;

use crate::metrics::{FuelDraft, FuelField};
use crate::styles::Forms as FormClass;

const REMINDER_KINDS: &[&str] = &["Service", "Paperwork", "Insurance", "Other"];
const DOCUMENT_KINDS: &[&str] = &["General", "Registration", "Insurance", "License", "Other"];

#[derive(Debug, Error, PartialEq)]
pub enum FormError {
    #[error("{0} is required")]
    Missing(&'static str),
    #[error("{0} must be a number")]
    NotANumber(&'static str),
    #[error("{0} must be a whole number")]
    NotAnInteger(&'static str),
    #[error("{0} cannot be negative")]
    Negative(&'static str),
    #[error("{0} must be a date (YYYY-MM-DD)")]
    BadDate(&'static str),
}

fn required<'a>(field: &'static str, raw: &'a str) -> Result<&'a str, FormError> {
    match raw.trim() {
        "" => Err(FormError::Missing(field)),
        value => Ok(value),
    }
}

fn parse_amount(field: &'static str, raw: &str) -> Result<f64, FormError> {
    let value: f64 = required(field, raw)?
        .parse()
        .map_err(|_| FormError::NotANumber(field))?;
    if !value.is_finite() {
        return Err(FormError::NotANumber(field));
    }
    if value < 0.0 {
        return Err(FormError::Negative(field));
    }
    Ok(value)
}

fn parse_count(field: &'static str, raw: &str) -> Result<u32, FormError> {
    let value = required(field, raw)?;
    match value.parse::<i64>() {
        Ok(n) if n < 0 => Err(FormError::Negative(field)),
        Ok(n) => u32::try_from(n).map_err(|_| FormError::NotAnInteger(field)),
        Err(_) if value.parse::<f64>().is_ok() => Err(FormError::NotAnInteger(field)),
        Err(_) => Err(FormError::NotANumber(field)),
    }
}

fn parse_optional_count(field: &'static str, raw: &str) -> Result<Option<u32>, FormError> {
    if raw.trim().is_empty() {
        return Ok(None);
    }
    parse_count(field, raw).map(|n| (n > 0).then_some(n))
}

fn parse_date(field: &'static str, raw: &str) -> Result<NaiveDate, FormError> {
    NaiveDate::parse_from_str(required(field, raw)?, "%Y-%m-%d")
        .map_err(|_| FormError::BadDate(field))
}

fn parse_optional_date(field: &'static str, raw: &str) -> Result<Option<NaiveDate>, FormError> {
    if raw.trim().is_empty() {
        return Ok(None);
    }
    parse_date(field, raw).map(Some)
}

fn lenient_amount(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

fn checked(flag: &Option<String>) -> bool {
    flag.is_some()
}

/// Where a form submits to and how htmx swaps the answer in.
pub enum Submit {
    Create(String),
    Update(String),
}

impl Submit {
    fn post(&self) -> Option<&str> {
        match self {
            Submit::Create(url) => Some(url),
            Submit::Update(_) => None,
        }
    }

    fn put(&self) -> Option<&str> {
        match self {
            Submit::Create(_) => None,
            Submit::Update(url) => Some(url),
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Submit::Create(_) => "[save]",
            Submit::Update(_) => "[update]",
        }
    }
}

fn form_shell(
    title: &str,
    submit: &Submit,
    target: &str,
    swap: &str,
    error: Option<&FormError>,
    fields: Markup,
) -> Markup {
    html! {
        form.(FormClass::FORM)
            hx-post=[submit.post()]
            hx-put=[submit.put()]
            hx-target=(target)
            hx-swap=(swap)
        {
            h3 { "> " (title) }
            @if let Some(error) = error {
                p.(FormClass::FORM_ERROR) { (error) }
            }
            (fields)
            div.(FormClass::FORM_ACTIONS) {
                button.(FormClass::SUBMIT_BTN) type="submit" { (submit.label()) }
                button type="button" onclick="this.closest('form').remove()" { "[cancel]" }
            }
        }
    }
}

fn input(label: &str, name: &str, kind: &str, value: &str) -> Markup {
    html! {
        label.(FormClass::FIELD) {
            span.(FormClass::FIELD_LABEL) { (label) }
            input type=(kind) name=(name) value=(value) step=[(kind == "number").then_some("any")];
        }
    }
}

fn select(label: &str, name: &str, options: &[(&str, &str)], selected: &str) -> Markup {
    html! {
        label.(FormClass::FIELD) {
            span.(FormClass::FIELD_LABEL) { (label) }
            select name=(name) {
                @for &(value, text) in options {
                    option value=(value) selected[value.eq_ignore_ascii_case(selected)] { (text) }
                }
            }
        }
    }
}

fn checkbox(label: &str, name: &str, checked: bool) -> Markup {
    html! {
        label.(FormClass::CHECKBOX) {
            input type="checkbox" name=(name) value="on" checked[checked];
            (label)
        }
    }
}

fn textarea(label: &str, name: &str, value: &str) -> Markup {
    html! {
        label.(FormClass::FIELD) {
            span.(FormClass::FIELD_LABEL) { (label) }
            textarea name=(name) rows="2" { (value) }
        }
    }
}

#[derive(Deserialize, Default, Debug, Clone)]
#[serde(default)]
pub struct VehicleForm {
    pub name: String,
    pub make: String,
    pub model: String,
    pub year: String,
    pub kind: String,
    pub vin: String,
    pub license_plate: String,
    pub image_url: String,
}

impl VehicleForm {
    pub fn parse(&self) -> Result<NewVehicle, FormError> {
        let name = required("Name", &self.name)?;
        let make = required("Make", &self.make)?;
        let model = required("Model", &self.model)?;
        let year = required("Year", &self.year)?
            .parse::<i32>()
            .map_err(|_| FormError::NotAnInteger("Year"))?;
        if year < 0 {
            return Err(FormError::Negative("Year"));
        }
        Ok(NewVehicle {
            name: name.to_owned(),
            make: make.to_owned(),
            model: model.to_owned(),
            year,
            kind: VehicleKind::from(self.kind.trim().to_owned()),
            vin: self.vin.trim().to_owned(),
            license_plate: self.license_plate.trim().to_owned(),
            image_url: self.image_url.trim().to_owned(),
        })
    }
}

impl From<&Vehicle> for VehicleForm {
    fn from(vehicle: &Vehicle) -> Self {
        VehicleForm {
            name: vehicle.name.clone(),
            make: vehicle.make.clone(),
            model: vehicle.model.clone(),
            year: vehicle.year.to_string(),
            kind: vehicle.kind.as_str().to_owned(),
            vin: vehicle.vin.clone(),
            license_plate: vehicle.license_plate.clone(),
            image_url: vehicle.image_url.clone(),
        }
    }
}

pub fn vehicle_form(form: &VehicleForm, submit: &Submit, error: Option<&FormError>) -> Markup {
    let title = match submit {
        Submit::Create(_) => "add vehicle",
        Submit::Update(_) => "edit vehicle",
    };
    let fields = html! {
        (input("Name", "name", "text", &form.name))
        (input("Make", "make", "text", &form.make))
        (input("Model", "model", "text", &form.model))
        (input("Year", "year", "number", &form.year))
        (select("Type", "kind", &[("bike", "Motorcycle"), ("car", "Car")], &form.kind))
        (input("License plate", "license_plate", "text", &form.license_plate))
        (input("VIN", "vin", "text", &form.vin))
        (input("Image URL", "image_url", "url", &form.image_url))
    };
    form_shell(title, submit, "this", "outerHTML", error, fields)
}

#[derive(Deserialize, Default, Debug, Clone)]
#[serde(default)]
pub struct ServiceForm {
    pub date: String,
    pub odometer: String,
    pub cost: String,
    pub service_type: String,
    pub notes: String,
    pub document_url: String,
}

impl ServiceForm {
    pub fn dated(today: NaiveDate) -> Self {
        ServiceForm {
            date: today.to_string(),
            service_type: ServiceType::Maintenance.as_str().to_owned(),
            ..Default::default()
        }
    }

    pub fn parse(&self, vehicle_id: VehicleId) -> Result<NewServiceRecord, FormError> {
        Ok(NewServiceRecord {
            vehicle_id,
            date: parse_date("Date", &self.date)?,
            odometer: parse_count("Odometer", &self.odometer)?,
            cost: parse_amount("Cost", &self.cost)?,
            notes: self.notes.trim().to_owned(),
            service_type: ServiceType::from(self.service_type.trim().to_owned()),
            document_url: self.document_url.trim().to_owned(),
        })
    }
}

impl From<&ServiceRecord> for ServiceForm {
    fn from(record: &ServiceRecord) -> Self {
        ServiceForm {
            date: record.date.to_string(),
            odometer: record.odometer.to_string(),
            cost: record.cost.to_string(),
            service_type: record.service_type.as_str().to_owned(),
            notes: record.notes.clone(),
            document_url: record.document_url.clone().unwrap_or_default(),
        }
    }
}

pub fn service_form(form: &ServiceForm, submit: &Submit, error: Option<&FormError>) -> Markup {
    let types: Vec<(&str, &str)> = ServiceType::ALL
        .iter()
        .map(|t| (t.as_str(), t.as_str()))
        .collect();
    let fields = html! {
        (input("Date", "date", "date", &form.date))
        (input("Odometer (km)", "odometer", "number", &form.odometer))
        (input("Cost", "cost", "number", &form.cost))
        (select("Type", "service_type", &types, &form.service_type))
        (textarea("Notes", "notes", &form.notes))
        (input("Attachment URL", "document_url", "url", &form.document_url))
    };
    form_shell("service record", submit, "#tab-content", "innerHTML", error, fields)
}

#[derive(Deserialize, Default, Debug, Clone)]
#[serde(default)]
pub struct FuelForm {
    pub date: String,
    pub odometer: String,
    pub liters: String,
    pub price_per_liter: String,
    pub total_cost: String,
    pub full_tank: Option<String>,
    pub notes: String,
    /// Echoed back by the amount inputs so live derivation can label them.
    pub currency: String,
}

impl FuelForm {
    pub fn dated(today: NaiveDate) -> Self {
        FuelForm {
            date: today.to_string(),
            ..Default::default()
        }
    }

    pub fn parse(&self, vehicle_id: VehicleId) -> Result<NewFuelLog, FormError> {
        Ok(NewFuelLog {
            vehicle_id,
            date: parse_date("Date", &self.date)?,
            odometer: parse_count("Odometer", &self.odometer)?,
            liters: parse_amount("Litres", &self.liters)?,
            price_per_liter: parse_amount("Price per litre", &self.price_per_liter)?,
            total_cost: parse_amount("Total cost", &self.total_cost)?,
            full_tank: checked(&self.full_tank),
            notes: self.notes.trim().to_owned(),
        })
    }

    /// The three amount inputs, blank or non-numeric ones as `None`.
    pub fn draft(&self) -> FuelDraft {
        FuelDraft {
            liters: lenient_amount(&self.liters),
            price_per_liter: lenient_amount(&self.price_per_liter),
            total_cost: lenient_amount(&self.total_cost),
        }
    }

    /// Writes back the inputs a derivation changed, leaving the rest as typed.
    pub fn apply_draft(&mut self, before: FuelDraft, after: FuelDraft) {
        fn fill(slot: &mut String, before: Option<f64>, after: Option<f64>) {
            if let Some(value) = after.filter(|_| after != before) {
                *slot = format!("{value:.2}");
            }
        }
        fill(&mut self.liters, before.liters, after.liters);
        fill(&mut self.price_per_liter, before.price_per_liter, after.price_per_liter);
        fill(&mut self.total_cost, before.total_cost, after.total_cost);
    }
}

impl From<&FuelLog> for FuelForm {
    fn from(log: &FuelLog) -> Self {
        FuelForm {
            date: log.date.to_string(),
            odometer: log.odometer.to_string(),
            liters: log.liters.to_string(),
            price_per_liter: log.price_per_liter.to_string(),
            total_cost: log.total_cost.to_string(),
            full_tank: log.full_tank.then(|| "on".to_owned()),
            notes: log.notes.clone(),
            currency: String::new(),
        }
    }
}

fn derive_input(
    label: &str,
    name: &str,
    value: &str,
    edited: FuelField,
    readonly: bool,
) -> Markup {
    let field = match edited {
        FuelField::Liters => "liters",
        FuelField::Price => "price",
        FuelField::Total => "total",
    };
    html! {
        label.(FormClass::FIELD) {
            span.(FormClass::FIELD_LABEL) { (label) }
            input type="number" step="any" name=(name) value=(value) readonly[readonly]
                hx-post=(format!("/fragments/fuel-form/derive?edited={field}"))
                hx-trigger="change"
                hx-include="closest form"
                hx-target="#fuel-amounts"
                hx-swap="outerHTML";
        }
    }
}

/// The linked litres/price/total inputs, re-rendered on every edit. Litres
/// are derived, and locked, while the tank is marked full.
pub fn fuel_amounts(form: &FuelForm, currency: &str) -> Markup {
    let full_tank = checked(&form.full_tank);
    html! {
        div #fuel-amounts {
            input type="hidden" name="currency" value=(currency);
            (derive_input(&format!("Price / L ({currency})"), "price_per_liter", &form.price_per_liter, FuelField::Price, false))
            (derive_input("Litres", "liters", &form.liters, FuelField::Liters, full_tank))
            (derive_input(&format!("Total ({currency})"), "total_cost", &form.total_cost, FuelField::Total, false))
            label.(FormClass::CHECKBOX) {
                input type="checkbox" name="full_tank" value="on" checked[full_tank]
                    hx-post="/fragments/fuel-form/derive"
                    hx-trigger="change"
                    hx-include="closest form"
                    hx-target="#fuel-amounts"
                    hx-swap="outerHTML";
                "Full tank"
            }
        }
    }
}

pub fn fuel_form(
    form: &FuelForm,
    submit: &Submit,
    error: Option<&FormError>,
    currency: &str,
) -> Markup {
    let fields = html! {
        (input("Date", "date", "date", &form.date))
        (input("Odometer (km)", "odometer", "number", &form.odometer))
        (fuel_amounts(form, currency))
        (textarea("Notes", "notes", &form.notes))
    };
    form_shell("fuel log", submit, "#tab-content", "innerHTML", error, fields)
}

#[derive(Deserialize, Default, Debug, Clone)]
#[serde(default)]
pub struct ReminderForm {
    pub title: String,
    pub kind: String,
    pub due_date: String,
    pub due_odometer: String,
    pub is_recurring: Option<String>,
    pub interval_km: String,
    pub interval_months: String,
    pub notes: String,
}

impl ReminderForm {
    pub fn parse(&self, vehicle_id: VehicleId) -> Result<NewReminder, FormError> {
        Ok(NewReminder {
            vehicle_id,
            title: required("Title", &self.title)?.to_owned(),
            kind: self.kind.trim().to_owned(),
            due_date: parse_optional_date("Due date", &self.due_date)?,
            due_odometer: parse_optional_count("Due odometer", &self.due_odometer)?,
            is_recurring: checked(&self.is_recurring),
            interval_km: parse_optional_count("Interval (km)", &self.interval_km)?,
            interval_months: parse_optional_count("Interval (months)", &self.interval_months)?,
            notes: self.notes.trim().to_owned(),
        })
    }
}

pub fn reminder_form(form: &ReminderForm, submit: &Submit, error: Option<&FormError>) -> Markup {
    let kinds: Vec<(&str, &str)> = REMINDER_KINDS.iter().map(|k| (*k, *k)).collect();
    let fields = html! {
        (input("Title", "title", "text", &form.title))
        (select("Type", "kind", &kinds, &form.kind))
        (input("Due date", "due_date", "date", &form.due_date))
        (input("Due odometer (km)", "due_odometer", "number", &form.due_odometer))
        (checkbox("Recurring", "is_recurring", checked(&form.is_recurring)))
        (input("Every (km)", "interval_km", "number", &form.interval_km))
        (input("Every (months)", "interval_months", "number", &form.interval_months))
        (textarea("Notes", "notes", &form.notes))
    };
    form_shell("reminder", submit, "#tab-content", "innerHTML", error, fields)
}

#[derive(Deserialize, Default, Debug, Clone)]
#[serde(default)]
pub struct DocumentForm {
    pub name: String,
    pub kind: String,
    pub file_url: String,
    pub expiry_date: String,
    pub notes: String,
}

impl DocumentForm {
    pub fn parse(&self, vehicle_id: VehicleId) -> Result<NewDocument, FormError> {
        Ok(NewDocument {
            vehicle_id,
            name: required("Name", &self.name)?.to_owned(),
            kind: self.kind.trim().to_owned(),
            file_url: required("File URL", &self.file_url)?.to_owned(),
            expiry_date: parse_optional_date("Expiry date", &self.expiry_date)?,
            notes: self.notes.trim().to_owned(),
        })
    }
}

pub fn document_form(form: &DocumentForm, submit: &Submit, error: Option<&FormError>) -> Markup {
    let kinds: Vec<(&str, &str)> = DOCUMENT_KINDS.iter().map(|k| (*k, *k)).collect();
    let fields = html! {
        (input("Name", "name", "text", &form.name))
        (select("Type", "kind", &kinds, &form.kind))
        (input("Expiry date", "expiry_date", "date", &form.expiry_date))
        (input("File URL", "file_url", "url", &form.file_url))
        (textarea("Notes", "notes", &form.notes))
    };
    form_shell("document", submit, "#tab-content", "innerHTML", error, fields)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fuel(liters: &str, price: &str, total: &str) -> FuelForm {
        FuelForm {
            date: "2024-03-01".into(),
            odometer: "12000".into(),
            liters: liters.into(),
            price_per_liter: price.into(),
            total_cost: total.into(),
            ..Default::default()
        }
    }

    #[test]
    fn fuel_form_parses_into_payload() {
        let mut form = fuel("10", "102.5", "1025");
        form.full_tank = Some("on".into());
        let log = form.parse(4).unwrap();
        assert_eq!(log.vehicle_id, 4);
        assert_eq!(log.odometer, 12000);
        assert_eq!(log.total_cost, 1025.0);
        assert!(log.full_tank);
    }

    #[test]
    fn malformed_numbers_are_rejected() {
        assert_eq!(
            fuel("ten", "100", "1000").parse(1).unwrap_err(),
            FormError::NotANumber("Litres")
        );
        assert_eq!(
            fuel("10", "-1", "1000").parse(1).unwrap_err(),
            FormError::Negative("Price per litre")
        );
        assert_eq!(
            fuel("10", "100", "").parse(1).unwrap_err(),
            FormError::Missing("Total cost")
        );
        assert_eq!(
            fuel("10", "100", "NaN").parse(1).unwrap_err(),
            FormError::NotANumber("Total cost")
        );
    }

    #[test]
    fn odometer_must_be_a_whole_non_negative_number() {
        let mut form = fuel("10", "100", "1000");
        form.odometer = "12.5".into();
        assert_eq!(form.parse(1).unwrap_err(), FormError::NotAnInteger("Odometer"));
        form.odometer = "-3".into();
        assert_eq!(form.parse(1).unwrap_err(), FormError::Negative("Odometer"));
    }

    #[test]
    fn service_dates_must_be_iso() {
        let form = ServiceForm {
            date: "01/03/2024".into(),
            odometer: "100".into(),
            cost: "50".into(),
            ..Default::default()
        };
        assert_eq!(form.parse(1).unwrap_err(), FormError::BadDate("Date"));
    }

    #[test]
    fn vehicle_needs_a_name() {
        let form = VehicleForm {
            name: "   ".into(),
            make: "Honda".into(),
            model: "CB350".into(),
            year: "2022".into(),
            kind: "bike".into(),
            ..Default::default()
        };
        assert_eq!(form.parse().unwrap_err(), FormError::Missing("Name"));
    }

    #[test]
    fn blank_vehicle_form_reports_the_name_first() {
        let form = VehicleForm::default();
        assert_eq!(form.parse().unwrap_err(), FormError::Missing("Name"));
    }

    #[test]
    fn reminder_blanks_become_absent() {
        let form = ReminderForm {
            title: "Oil change".into(),
            kind: "Service".into(),
            due_odometer: "0".into(),
            ..Default::default()
        };
        let reminder = form.parse(2).unwrap();
        assert_eq!(reminder.due_date, None);
        assert_eq!(reminder.due_odometer, None);
        assert!(!reminder.is_recurring);
    }

    #[test]
    fn derivation_only_rewrites_changed_inputs() {
        let mut form = fuel("10", "100", "");
        let before = form.draft();
        let after = crate::metrics::derive_fuel_draft(before, Some(FuelField::Price), false);
        form.apply_draft(before, after);
        assert_eq!(form.total_cost, "1000.00");
        assert_eq!(form.liters, "10");
    }

    #[test]
    fn full_tank_locks_the_litres_input() {
        let mut form = fuel("10", "100", "1000");
        let open = fuel_amounts(&form, "₹").into_string();
        assert!(!open.contains("readonly"));

        form.full_tank = Some("on".into());
        let html = fuel_amounts(&form, "₹").into_string();
        assert_eq!(html.matches("readonly").count(), 1);
        let litres = html.find("name=\"liters\"").unwrap();
        let locked = html.find("readonly").unwrap();
        assert!(litres < locked);
        assert!(locked < html.find("name=\"total_cost\"").unwrap());
        assert!(html.contains("name=\"currency\" value=\"₹\""));
    }

    #[test]
    fn rejected_form_renders_error_and_values() {
        let form = VehicleForm {
            name: "Daily".into(),
            ..Default::default()
        };
        let error = form.parse().unwrap_err();
        let html = vehicle_form(&form, &Submit::Create("/vehicles".into()), Some(&error)).into_string();
        assert!(html.contains("Make is required"));
        assert!(html.contains("value=\"Daily\""));
        assert!(html.contains("hx-post=\"/vehicles\""));
    }
}
