//! Entities served by the garage REST API, plus the payloads it accepts.
//!
//! The API is loose about absent values: optional dates come back as `""`,
//! optional counters as `0` and missing text as `null`. The `wire` helpers
//! below normalise those into `Option`s and empty strings at the edge.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub type VehicleId = i64;
pub type RecordId = i64;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum VehicleKind {
    Bike,
    #[default]
    Car,
    Other(String),
}

impl From<String> for VehicleKind {
    fn from(value: String) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "bike" => VehicleKind::Bike,
            "car" => VehicleKind::Car,
            _ => VehicleKind::Other(value),
        }
    }
}

impl From<VehicleKind> for String {
    fn from(kind: VehicleKind) -> Self {
        kind.as_str().to_owned()
    }
}

impl VehicleKind {
    pub fn as_str(&self) -> &str {
        match self {
            VehicleKind::Bike => "bike",
            VehicleKind::Car => "car",
            VehicleKind::Other(other) => other,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ServiceType {
    Maintenance,
    Repair,
    Modification,
    Other(String),
}

impl From<String> for ServiceType {
    fn from(value: String) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "maintenance" => ServiceType::Maintenance,
            "repair" => ServiceType::Repair,
            "modification" => ServiceType::Modification,
            _ => ServiceType::Other(value),
        }
    }
}

impl From<ServiceType> for String {
    fn from(service_type: ServiceType) -> Self {
        service_type.as_str().to_owned()
    }
}

impl ServiceType {
    pub const ALL: [ServiceType; 3] = [
        ServiceType::Maintenance,
        ServiceType::Repair,
        ServiceType::Modification,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            ServiceType::Maintenance => "maintenance",
            ServiceType::Repair => "repair",
            ServiceType::Modification => "modification",
            ServiceType::Other(other) => other,
        }
    }
}

impl fmt::Display for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    pub id: VehicleId,
    pub name: String,
    #[serde(default, deserialize_with = "wire::string")]
    pub make: String,
    #[serde(default, deserialize_with = "wire::string")]
    pub model: String,
    #[serde(default)]
    pub year: i32,
    #[serde(rename = "type", default)]
    pub kind: VehicleKind,
    #[serde(default, deserialize_with = "wire::string")]
    pub vin: String,
    #[serde(default, deserialize_with = "wire::string")]
    pub license_plate: String,
    #[serde(default, deserialize_with = "wire::string")]
    pub image_url: String,
    #[serde(default, deserialize_with = "wire::string")]
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceRecord {
    pub id: RecordId,
    pub vehicle_id: VehicleId,
    #[serde(with = "wire::date")]
    pub date: NaiveDate,
    pub odometer: u32,
    pub cost: f64,
    #[serde(default, deserialize_with = "wire::string")]
    pub notes: String,
    pub service_type: ServiceType,
    #[serde(default, deserialize_with = "wire::opt_string")]
    pub document_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuelLog {
    pub id: RecordId,
    pub vehicle_id: VehicleId,
    #[serde(with = "wire::date")]
    pub date: NaiveDate,
    pub odometer: u32,
    pub liters: f64,
    pub price_per_liter: f64,
    pub total_cost: f64,
    #[serde(default)]
    pub full_tank: bool,
    #[serde(default, deserialize_with = "wire::string")]
    pub notes: String,
    /// km/L since the previous full-tank fill, `0` when the API could not derive it.
    #[serde(default)]
    pub mileage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reminder {
    pub id: RecordId,
    pub vehicle_id: VehicleId,
    pub title: String,
    #[serde(default, deserialize_with = "wire::opt_date")]
    pub due_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "wire::opt_nonzero")]
    pub due_odometer: Option<u32>,
    #[serde(default)]
    pub is_recurring: bool,
    #[serde(default, deserialize_with = "wire::opt_nonzero")]
    pub interval_km: Option<u32>,
    #[serde(default, deserialize_with = "wire::opt_nonzero")]
    pub interval_months: Option<u32>,
    #[serde(default, deserialize_with = "wire::string")]
    pub notes: String,
    #[serde(default)]
    pub is_completed: bool,
    #[serde(rename = "type", default, deserialize_with = "wire::opt_string")]
    pub kind: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: RecordId,
    pub vehicle_id: VehicleId,
    pub name: String,
    #[serde(rename = "type", default, deserialize_with = "wire::string")]
    pub kind: String,
    #[serde(default, deserialize_with = "wire::string")]
    pub file_url: String,
    #[serde(default, deserialize_with = "wire::opt_date")]
    pub expiry_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "wire::string")]
    pub notes: String,
}

/// Server-side aggregate for one vehicle.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VehicleStats {
    pub total_fuel_cost: f64,
    pub total_service_cost: f64,
    pub total_liters: f64,
    pub total_services: u64,
    pub total_fuel_logs: u64,
    pub total_cost: f64,
}

/// Display settings served by `GET /config`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ApiSettings {
    pub currency: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewVehicle {
    pub name: String,
    pub make: String,
    pub model: String,
    pub year: i32,
    #[serde(rename = "type")]
    pub kind: VehicleKind,
    pub vin: String,
    pub license_plate: String,
    pub image_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewServiceRecord {
    pub vehicle_id: VehicleId,
    #[serde(serialize_with = "wire::date::serialize")]
    pub date: NaiveDate,
    pub odometer: u32,
    pub cost: f64,
    pub notes: String,
    pub service_type: ServiceType,
    pub document_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewFuelLog {
    pub vehicle_id: VehicleId,
    #[serde(serialize_with = "wire::date::serialize")]
    pub date: NaiveDate,
    pub odometer: u32,
    pub liters: f64,
    pub price_per_liter: f64,
    pub total_cost: f64,
    pub full_tank: bool,
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewReminder {
    pub vehicle_id: VehicleId,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(serialize_with = "wire::opt_date_as_str")]
    pub due_date: Option<NaiveDate>,
    #[serde(serialize_with = "wire::opt_as_zero")]
    pub due_odometer: Option<u32>,
    pub is_recurring: bool,
    #[serde(serialize_with = "wire::opt_as_zero")]
    pub interval_km: Option<u32>,
    #[serde(serialize_with = "wire::opt_as_zero")]
    pub interval_months: Option<u32>,
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewDocument {
    pub vehicle_id: VehicleId,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub file_url: String,
    #[serde(serialize_with = "wire::opt_date_as_str")]
    pub expiry_date: Option<NaiveDate>,
    pub notes: String,
}

/// Parses the calendar date off an API date string, ignoring any time suffix.
pub fn parse_api_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    let day = raw.get(..10).unwrap_or(raw);
    NaiveDate::parse_from_str(day, wire::DATE_FORMAT).ok()
}

mod wire {
    use chrono::NaiveDate;
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};

    pub const DATE_FORMAT: &str = "%Y-%m-%d";

    pub mod date {
        use super::*;

        pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
            serializer.collect_str(&date.format(DATE_FORMAT))
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
            let raw = String::deserialize(deserializer)?;
            crate::models::parse_api_date(&raw)
                .ok_or_else(|| D::Error::custom(format!("invalid date `{raw}`")))
        }
    }

    pub fn opt_date<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<NaiveDate>, D::Error> {
        match Option::<String>::deserialize(deserializer)? {
            None => Ok(None),
            Some(raw) if raw.trim().is_empty() => Ok(None),
            Some(raw) => crate::models::parse_api_date(&raw)
                .map(Some)
                .ok_or_else(|| D::Error::custom(format!("invalid date `{raw}`"))),
        }
    }

    pub fn opt_nonzero<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u32>, D::Error> {
        Ok(Option::<u32>::deserialize(deserializer)?.filter(|v| *v != 0))
    }

    pub fn string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
        Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
    }

    pub fn opt_string<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<String>, D::Error> {
        Ok(Option::<String>::deserialize(deserializer)?.filter(|s| !s.trim().is_empty()))
    }

    pub fn opt_date_as_str<S: Serializer>(
        date: &Option<NaiveDate>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match date {
            Some(date) => serializer.collect_str(&date.format(DATE_FORMAT)),
            None => serializer.serialize_str(""),
        }
    }

    pub fn opt_as_zero<S: Serializer>(value: &Option<u32>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u32(value.unwrap_or(0))
    }
}
