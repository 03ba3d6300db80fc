use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use axum::Router;
use axum::routing::{delete, get, post, put};
use tracing::info;

use crate::api::ApiClient;
use crate::paths::DASHBOARD_CONFIG_PATH;
use crate::state::AppState;
use crate::views::{fleet, record_actions as actions, vehicle_detail};

mod api;
mod charts;
mod config;
mod context;
mod dashboard_config;
mod error;
mod format;
mod metrics;
mod paths;
mod routes;
mod state;
mod styles;
mod views;

fn router(state: Arc<AppState>) -> Router {
    // Vehicle and record mutations: /vehicles/*
    let vehicle_routes = Router::new()
        .route("/", post(actions::create_vehicle))
        .route(
            "/{id}",
            get(vehicle_detail::vehicle_detail)
                .put(actions::update_vehicle)
                .delete(actions::delete_vehicle),
        )
        .route("/{id}/services", post(actions::create_service))
        .route(
            "/{id}/services/{record}",
            put(actions::update_service).delete(actions::delete_service),
        )
        .route("/{id}/fuel", post(actions::create_fuel_log))
        .route(
            "/{id}/fuel/{record}",
            put(actions::update_fuel_log).delete(actions::delete_fuel_log),
        )
        .route("/{id}/reminders", post(actions::create_reminder))
        .route(
            "/{id}/reminders/{record}/complete",
            put(actions::complete_reminder),
        )
        .route("/{id}/documents", post(actions::create_document))
        .route(
            "/{id}/documents/{record}",
            delete(actions::delete_document),
        );

    // Fragment routes: /fragments/*
    let fragment_routes = Router::new()
        .route("/vehicles/new", get(fleet::new_vehicle_form))
        .route("/vehicles/{id}/edit", get(actions::edit_vehicle_form))
        .route("/vehicles/{id}/{section}", get(vehicle_detail::fragment_tab))
        .route(
            "/vehicles/{id}/{section}/new",
            get(actions::new_record_form),
        )
        .route(
            "/vehicles/{id}/{section}/{record}/edit",
            get(actions::edit_record_form),
        )
        .route("/fuel-form/derive", post(actions::derive_fuel_amounts));

    Router::new()
        .route("/", get(fleet::index))
        .route("/styles.css", get(views::styles))
        .route("/healthz", get(routes::healthz))
        .route("/api/vehicles/{id}/metrics", get(routes::vehicle_metrics))
        .nest("/vehicles", vehicle_routes)
        .nest("/fragments", fragment_routes)
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    shared::init_tracing!()?;
    let client_config = shared::load_client_config!()?;
    let config = dashboard_config::load(Path::new(DASHBOARD_CONFIG_PATH))
        .with_context(|| format!("Failed to load {DASHBOARD_CONFIG_PATH}"))?;

    let api = ApiClient::new(&client_config.api_url, config.request_timeout())
        .context("Failed to build HTTP client")?;
    let state = Arc::new(AppState::new(api, config));

    let listener = tokio::net::TcpListener::bind(client_config.listen_addr.as_str())
        .await
        .with_context(|| format!("Failed to bind to {}", client_config.listen_addr))?;
    info!(
        "Dashboard listening on {} (API at {})",
        client_config.listen_addr, client_config.api_url
    );
    axum::serve(listener, router(state))
        .await
        .context("Server error")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use tower::ServiceExt;

    use crate::api::tests::fake_api;
    use crate::dashboard_config::DashboardConfig;

    use super::*;

    /// State whose API lives on a port nothing listens on.
    async fn offline_state() -> Arc<AppState> {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let api = ApiClient::new(&format!("http://{addr}"), Duration::from_secs(2)).unwrap();
        Arc::new(AppState::new(api, DashboardConfig::default()))
    }

    async fn live_state() -> Arc<AppState> {
        Arc::new(AppState::new(fake_api().await, DashboardConfig::default()))
    }

    async fn body_text(response: axum::response::Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn form_post(uri: &str, body: &str) -> Request<Body> {
        Request::post(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_owned()))
            .unwrap()
    }

    #[tokio::test]
    async fn serves_stylesheet() {
        let app = router(offline_state().await);
        let response = app
            .oneshot(Request::get("/styles.css").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "text/css");
    }

    #[tokio::test]
    async fn healthz_reports_unreachable_api() {
        let app = router(offline_state().await);
        let response = app
            .oneshot(Request::get("/healthz").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(body["status"], "ok");
        assert_eq!(body["api_reachable"], false);
    }

    #[tokio::test]
    async fn api_outage_renders_bad_gateway() {
        let app = router(offline_state().await);
        let response = app
            .oneshot(Request::get("/vehicles/1").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn invalid_vehicle_form_is_rendered_back() {
        let app = router(offline_state().await);
        let response = app
            .oneshot(form_post(
                "/vehicles",
                "name=&make=Honda&model=CB350&year=2022&kind=bike",
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().get("HX-Redirect").is_none());
        let html = body_text(response).await;
        assert!(html.contains("Name is required"));
        assert!(html.contains("value=\"Honda\""));
    }

    #[tokio::test]
    async fn created_vehicle_redirects_to_its_page() {
        let app = router(live_state().await);
        let response = app
            .oneshot(form_post(
                "/vehicles",
                "name=Tourer&make=Honda&model=CB350&year=2022&kind=bike",
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["HX-Redirect"], "/vehicles/9");
    }

    #[tokio::test]
    async fn updated_vehicle_redirects_back() {
        let app = router(live_state().await);
        let response = app
            .oneshot(
                Request::put("/vehicles/4")
                    .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                    .body(Body::from(
                        "name=Renamed&make=Honda&model=CB350&year=2022&kind=bike",
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.headers()["HX-Redirect"], "/vehicles/4");
    }

    #[tokio::test]
    async fn logged_service_refreshes_tab_and_stats() {
        let app = router(live_state().await);
        let response = app
            .oneshot(form_post(
                "/vehicles/1/services",
                "date=2024-03-09&odometer=12500&cost=1800&service_type=repair&notes=&document_url=",
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().get("HX-Redirect").is_none());
        let html = body_text(response).await;
        assert!(html.contains("id=\"stats-grid\""));
        assert!(html.contains("hx-swap-oob=\"true\""));
    }

    #[tokio::test]
    async fn fuel_amounts_are_derived_live() {
        let app = router(offline_state().await);
        let response = app
            .oneshot(form_post(
                "/fragments/fuel-form/derive?edited=price",
                "liters=10&price_per_liter=100&total_cost=",
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        assert!(html.contains("value=\"1000.00\""));
        assert!(html.contains("Total (₹)"));
    }

    #[tokio::test]
    async fn derived_amounts_keep_the_rendered_currency() {
        let app = router(offline_state().await);
        let response = app
            .oneshot(form_post(
                "/fragments/fuel-form/derive?edited=liters",
                "liters=4&price_per_liter=2.5&total_cost=&currency=%24",
            ))
            .await
            .unwrap();
        let html = body_text(response).await;
        assert!(html.contains("Total ($)"));
        assert!(html.contains("value=\"10.00\""));
    }

    #[tokio::test]
    async fn unknown_tab_is_rejected() {
        let app = router(offline_state().await);
        let response = app
            .oneshot(
                Request::get("/fragments/vehicles/1/garage")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert!(response.status().is_client_error());
    }
}
