//! Typed client for the garage REST API.
//!
//! Successful responses are wrapped as `{"data": ...}` (list endpoints may
//! send `null` for an empty list); failures carry `{"error": "..."}`.

use std::time::Duration;

use futures::future::join_all;
use reqwest::{Client, Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use shared::models::{
    ApiSettings, Document, FuelLog, NewDocument, NewFuelLog, NewReminder, NewServiceRecord,
    NewVehicle, RecordId, Reminder, ServiceRecord, Vehicle, VehicleId, VehicleStats,
};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request to {path} failed")]
    Transport {
        path: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("could not decode response from {path}")]
    Decode {
        path: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{path} not found")]
    NotFound { path: String },
    #[error("{path} returned {status}: {message}")]
    Status {
        path: String,
        status: StatusCode,
        message: String,
    },
    #[error("{path} returned no data")]
    MissingData { path: String },
}

#[derive(Deserialize)]
struct Envelope<T> {
    data: Option<T>,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
    #[serde(default)]
    details: Option<String>,
}

/// Everything the vehicle page shows, fetched in one go.
#[derive(Debug, Clone)]
pub struct VehicleSnapshot {
    pub vehicle: Vehicle,
    pub services: Vec<ServiceRecord>,
    pub fuel_logs: Vec<FuelLog>,
    pub reminders: Vec<Reminder>,
    pub documents: Vec<Document>,
    /// `None` when the stats endpoint failed; the page renders without it.
    pub stats: Option<VehicleStats>,
}

#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    root_url: String,
}

impl ApiClient {
    pub fn new(root_url: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            root_url: root_url.trim_end_matches('/').to_owned(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/v1{path}", self.root_url)
    }

    async fn send<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<Response, ApiError> {
        debug!("{method} {path}");

        let mut request = self.client.request(method, self.url(path));
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|source| ApiError::Transport {
            path: path.to_owned(),
            source,
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        if status == StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound {
                path: path.to_owned(),
            });
        }

        let message = match response.json::<ErrorBody>().await {
            Ok(ErrorBody {
                error,
                details: Some(details),
            }) => format!("{error} ({details})"),
            Ok(ErrorBody { error, .. }) => error,
            Err(_) => status
                .canonical_reason()
                .unwrap_or("unexpected status")
                .to_owned(),
        };
        Err(ApiError::Status {
            path: path.to_owned(),
            status,
            message,
        })
    }

    async fn decode<T: DeserializeOwned>(path: &str, response: Response) -> Result<T, ApiError> {
        response.json::<T>().await.map_err(|source| ApiError::Decode {
            path: path.to_owned(),
            source,
        })
    }

    async fn fetch_one<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.send::<()>(Method::GET, path, None).await?;
        Self::decode::<Envelope<T>>(path, response)
            .await?
            .data
            .ok_or_else(|| ApiError::MissingData {
                path: path.to_owned(),
            })
    }

    async fn fetch_list<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>, ApiError> {
        let response = self.send::<()>(Method::GET, path, None).await?;
        Ok(Self::decode::<Envelope<Vec<T>>>(path, response)
            .await?
            .data
            .unwrap_or_default())
    }

    async fn write<B: Serialize, T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let response = self.send(method, path, Some(body)).await?;
        Self::decode::<Envelope<T>>(path, response)
            .await?
            .data
            .ok_or_else(|| ApiError::MissingData {
                path: path.to_owned(),
            })
    }

    /// For endpoints that answer with a bare `{"message": ...}`.
    async fn execute(&self, method: Method, path: &str) -> Result<(), ApiError> {
        self.send::<()>(method, path, None).await.map(|_| ())
    }

    pub async fn list_vehicles(&self) -> Result<Vec<Vehicle>, ApiError> {
        self.fetch_list("/vehicles").await
    }

    pub async fn get_vehicle(&self, id: VehicleId) -> Result<Vehicle, ApiError> {
        self.fetch_one(&format!("/vehicles/{id}")).await
    }

    pub async fn create_vehicle(&self, vehicle: &NewVehicle) -> Result<Vehicle, ApiError> {
        self.write(Method::POST, "/vehicles", vehicle).await
    }

    pub async fn update_vehicle(
        &self,
        id: VehicleId,
        vehicle: &NewVehicle,
    ) -> Result<Vehicle, ApiError> {
        self.write(Method::PUT, &format!("/vehicles/{id}"), vehicle)
            .await
    }

    pub async fn delete_vehicle(&self, id: VehicleId) -> Result<(), ApiError> {
        self.execute(Method::DELETE, &format!("/vehicles/{id}"))
            .await
    }

    pub async fn vehicle_stats(&self, id: VehicleId) -> Result<VehicleStats, ApiError> {
        self.fetch_one(&format!("/vehicles/{id}/stats")).await
    }

    pub async fn list_services(&self, id: VehicleId) -> Result<Vec<ServiceRecord>, ApiError> {
        self.fetch_list(&format!("/vehicles/{id}/services")).await
    }

    pub async fn create_service(
        &self,
        record: &NewServiceRecord,
    ) -> Result<ServiceRecord, ApiError> {
        self.write(Method::POST, "/services", record).await
    }

    pub async fn update_service(
        &self,
        id: RecordId,
        record: &NewServiceRecord,
    ) -> Result<ServiceRecord, ApiError> {
        self.write(Method::PUT, &format!("/services/{id}"), record)
            .await
    }

    pub async fn delete_service(&self, id: RecordId) -> Result<(), ApiError> {
        self.execute(Method::DELETE, &format!("/services/{id}"))
            .await
    }

    pub async fn list_fuel_logs(&self, id: VehicleId) -> Result<Vec<FuelLog>, ApiError> {
        self.fetch_list(&format!("/vehicles/{id}/fuel")).await
    }

    pub async fn create_fuel_log(&self, log: &NewFuelLog) -> Result<FuelLog, ApiError> {
        self.write(Method::POST, "/fuel", log).await
    }

    pub async fn update_fuel_log(
        &self,
        id: RecordId,
        log: &NewFuelLog,
    ) -> Result<FuelLog, ApiError> {
        self.write(Method::PUT, &format!("/fuel/{id}"), log).await
    }

    pub async fn delete_fuel_log(&self, id: RecordId) -> Result<(), ApiError> {
        self.execute(Method::DELETE, &format!("/fuel/{id}")).await
    }

    pub async fn list_reminders(&self, id: VehicleId) -> Result<Vec<Reminder>, ApiError> {
        self.fetch_list(&format!("/vehicles/{id}/reminders")).await
    }

    pub async fn create_reminder(&self, reminder: &NewReminder) -> Result<Reminder, ApiError> {
        self.write(Method::POST, "/reminders", reminder).await
    }

    pub async fn complete_reminder(&self, id: RecordId) -> Result<(), ApiError> {
        self.execute(Method::PUT, &format!("/reminders/{id}/complete"))
            .await
    }

    pub async fn list_documents(&self, id: VehicleId) -> Result<Vec<Document>, ApiError> {
        self.fetch_list(&format!("/vehicles/{id}/documents")).await
    }

    pub async fn create_document(&self, document: &NewDocument) -> Result<Document, ApiError> {
        self.write(Method::POST, "/documents", document).await
    }

    pub async fn delete_document(&self, id: RecordId) -> Result<(), ApiError> {
        self.execute(Method::DELETE, &format!("/documents/{id}"))
            .await
    }

    /// Display settings; this endpoint is not enveloped.
    pub async fn settings(&self) -> Result<ApiSettings, ApiError> {
        let path = "/config";
        let response = self.send::<()>(Method::GET, path, None).await?;
        Self::decode(path, response).await
    }

    /// Liveness of the API server itself (outside `/api/v1`).
    pub async fn health(&self) -> Result<(), ApiError> {
        let path = "/health";
        let response = self
            .client
            .get(format!("{}{path}", self.root_url))
            .send()
            .await
            .map_err(|source| ApiError::Transport {
                path: path.to_owned(),
                source,
            })?;
        match response.status() {
            status if status.is_success() => Ok(()),
            status => Err(ApiError::Status {
                path: path.to_owned(),
                status,
                message: "health check failed".to_owned(),
            }),
        }
    }

    /// Fetches the vehicle and all of its collections concurrently.
    pub async fn vehicle_snapshot(&self, id: VehicleId) -> Result<VehicleSnapshot, ApiError> {
        let (vehicle, services, fuel_logs, reminders, documents, stats) = tokio::join!(
            self.get_vehicle(id),
            self.list_services(id),
            self.list_fuel_logs(id),
            self.list_reminders(id),
            self.list_documents(id),
            self.vehicle_stats(id),
        );

        let stats = match stats {
            Ok(stats) => Some(stats),
            Err(e) => {
                warn!("Stats unavailable for vehicle {id}: {e}");
                None
            }
        };

        Ok(VehicleSnapshot {
            vehicle: vehicle?,
            services: services?,
            fuel_logs: fuel_logs?,
            reminders: reminders?,
            documents: documents?,
            stats,
        })
    }

    /// Stats for every vehicle; vehicles whose stats fail to load are skipped.
    pub async fn fleet_stats(&self, vehicles: &[Vehicle]) -> Vec<VehicleStats> {
        let results = join_all(vehicles.iter().map(|v| self.vehicle_stats(v.id))).await;

        vehicles
            .iter()
            .zip(results)
            .filter_map(|(vehicle, result)| match result {
                Ok(stats) => Some(stats),
                Err(e) => {
                    warn!("Skipping stats for vehicle {}: {e}", vehicle.id);
                    None
                }
            })
            .collect()
    }
}
