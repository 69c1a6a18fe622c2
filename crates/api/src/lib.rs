//! HTTP API layer with Axum routes and middleware.
//!
//! This crate provides:
//! - REST API routes for the fee catalog, ledgers, payments and reports
//! - Authentication middleware
//! - Error to JSON response mapping

pub mod error;
pub mod middleware;
pub mod routes;

use axum::Router;
use bursar_core::reports::{HourWindow, ReportError};
use bursar_shared::{FeesConfig, JwtService};
use chrono::{NaiveDate, Utc};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub db: Arc<DatabaseConnection>,
    /// JWT service for token validation.
    pub jwt_service: Arc<JwtService>,
    /// Fee ledger settings.
    pub fees: Arc<FeesConfig>,
    /// Hours given their own bucket in by-hour reports.
    pub report_window: HourWindow,
}

impl AppState {
    /// Builds the state, checking the configured report hours.
    pub fn new(
        db: DatabaseConnection,
        jwt_service: JwtService,
        fees: FeesConfig,
    ) -> Result<Self, ReportError> {
        let report_window = HourWindow::new(fees.report_hour_start, fees.report_hour_end)?;
        Ok(Self {
            db: Arc::new(db),
            jwt_service: Arc::new(jwt_service),
            fees: Arc::new(fees),
            report_window,
        })
    }

    /// Current date in the school's time zone.
    #[must_use]
    pub fn today(&self) -> NaiveDate {
        Utc::now().with_timezone(&self.fees.timezone).date_naive()
    }
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", routes::api_routes_with_state(state.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
