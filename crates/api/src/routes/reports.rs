//! Collection report routes.
//!
//! Date parameters are calendar days in the school's time zone; both ends
//! are inclusive.

use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};
use bursar_core::reports::{
    CollectionAggregator, CollectionReport, DailyReport, DateRange, GroupBy,
};
use bursar_db::CollectionRepository;
use chrono::NaiveDate;
use serde::Deserialize;

use crate::{AppState, error::ApiError, middleware::AuthUser};

/// Creates the report routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/reports/collections", get(collection_report))
        .route("/reports/daily", get(daily_report))
}

/// Query parameters for the grouped collection report.
#[derive(Debug, Deserialize)]
pub struct CollectionQuery {
    /// First day (defaults to today).
    pub from: Option<NaiveDate>,
    /// Last day, inclusive (defaults to `from`).
    pub to: Option<NaiveDate>,
    /// `mode`, `hour`, `class` or `day` (defaults to `mode`).
    pub group_by: Option<String>,
}

/// Query parameters for the daily report.
#[derive(Debug, Deserialize)]
pub struct DailyQuery {
    /// Day to list (defaults to today).
    pub date: Option<NaiveDate>,
}

async fn collection_report(
    State(state): State<AppState>,
    Query(query): Query<CollectionQuery>,
    _auth: AuthUser,
) -> Result<Json<CollectionReport>, ApiError> {
    let group_by: GroupBy = query.group_by.as_deref().unwrap_or("mode").parse()?;
    let from = query.from.unwrap_or_else(|| state.today());
    let range = DateRange::new(from, query.to.unwrap_or(from))?;
    let (start, end) = range.utc_bounds(state.fees.timezone)?;

    let records = CollectionRepository::new((*state.db).clone())
        .records_between(start, end)
        .await?;

    Ok(Json(CollectionAggregator::collection_report(
        range,
        group_by,
        &records,
        state.fees.timezone,
        state.report_window,
    )))
}

async fn daily_report(
    State(state): State<AppState>,
    Query(query): Query<DailyQuery>,
    _auth: AuthUser,
) -> Result<Json<DailyReport>, ApiError> {
    let range = DateRange::day(query.date.unwrap_or_else(|| state.today()));
    let (start, end) = range.utc_bounds(state.fees.timezone)?;

    let records = CollectionRepository::new((*state.db).clone())
        .records_between(start, end)
        .await?;

    Ok(Json(CollectionAggregator::daily_report(
        range,
        &records,
        state.fees.timezone,
    )))
}
