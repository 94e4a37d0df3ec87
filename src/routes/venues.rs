use actix_web::{web, HttpResponse, Responder};
use chrono::{Local, NaiveTime};
use std::collections::HashMap;
use std::sync::Arc;

use crate::core::SearchEngine;
use crate::models::{HealthResponse, NearbyRequest, QueryPoint};
use crate::services::CatalogStore;

/// Source of the current time of day
pub type Clock = Arc<dyn Fn() -> NaiveTime + Send + Sync>;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<CatalogStore>,
    pub engine: SearchEngine,
    pub clock: Clock,
}

impl AppState {
    /// State reading the local wall clock
    pub fn new(catalog: Arc<CatalogStore>, engine: SearchEngine) -> Self {
        Self {
            catalog,
            engine,
            clock: Arc::new(|| Local::now().time()),
        }
    }

    /// Replace the clock used to judge opening hours
    pub fn with_clock<F>(mut self, clock: F) -> Self
    where
        F: Fn() -> NaiveTime + Send + Sync + 'static,
    {
        self.clock = Arc::new(clock);
        self
    }
}

/// Configure all venue routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/", web::get().to(nearby_venues))
        .route("/health", web::get().to(health_check));
}

/// Nearby open venues endpoint
///
/// GET /?latitude={lat}&longitude={lon}
///
/// Returns a JSON array of venues that can reach the given point and are open
/// right now. Missing or malformed coordinates get an empty 400.
async fn nearby_venues(
    state: web::Data<AppState>,
    query: web::Query<HashMap<String, String>>,
) -> impl Responder {
    let request = match NearbyRequest::from_params(&query) {
        Ok(request) => request,
        Err(e) => {
            tracing::debug!("Rejected nearby query: {}", e);
            return HttpResponse::BadRequest().finish();
        }
    };

    let point = QueryPoint::new(request.latitude, request.longitude, (state.clock)());
    let catalog = state.catalog.snapshot();

    let matches = state.engine.search(&point, &catalog).await;

    tracing::info!(
        "Found {} open venues near ({}, {}) out of {}",
        matches.len(),
        point.latitude,
        point.longitude,
        catalog.len()
    );

    HttpResponse::Ok().json(matches)
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let venues = state.catalog.len();
    let status = if venues > 0 { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
        venues,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::Catalog;
    use actix_web::{test, App};

    #[actix_web::test]
    async fn test_health_reports_catalog_size() {
        let (store, _writer) = CatalogStore::open(Catalog::empty());
        let state = AppState::new(store, SearchEngine::default());

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::get().uri("/health").to_request();
        let body: HealthResponse = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body.status, "degraded");
        assert_eq!(body.venues, 0);
    }

    #[actix_web::test]
    async fn test_malformed_latitude_is_bad_request() {
        let (store, _writer) = CatalogStore::open(Catalog::empty());
        let state = AppState::new(store, SearchEngine::default());

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/?latitude=abc&longitude=0")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), actix_web::http::StatusCode::BAD_REQUEST);
    }
}
