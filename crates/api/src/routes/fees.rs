//! Fee catalog routes: heads and per-class structures.

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use bursar_core::catalog::{FeeFrequency, FeeHead, FeeStructure, FeeStructureConfig, NewFeeHead};
use bursar_db::CatalogRepository;
use bursar_shared::AppError;
use bursar_shared::types::parse_amount;
use chrono::NaiveDate;
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::{AppState, error::ApiError, middleware::AuthUser};

/// Creates the fee catalog routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/fees/heads", get(list_heads).post(create_head))
        .route("/fees/structures", get(list_structures).post(configure_structure))
}

/// Request body for creating a fee head.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFeeHeadRequest {
    /// Display name.
    pub name: String,
    /// Charged only to new admissions.
    #[serde(default)]
    pub new_student_only: bool,
}

/// Request body for configuring a structure.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigureStructureRequest {
    pub class_id: Uuid,
    pub academic_year_id: Uuid,
    pub fee_head_id: Uuid,
    /// Amount per row, as a decimal string.
    pub amount: String,
    pub frequency: FeeFrequency,
    /// Due date for one-time fees; monthly rows use the calendar.
    pub due_date: Option<NaiveDate>,
    pub stream: Option<String>,
    pub subject_count: Option<i32>,
}

/// Filters for listing structures.
#[derive(Debug, Deserialize)]
pub struct StructureFilter {
    /// Restrict to one class.
    pub class_id: Option<Uuid>,
    /// Restrict to one academic year.
    pub academic_year_id: Option<Uuid>,
}

async fn list_heads(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> Result<Json<Vec<FeeHead>>, ApiError> {
    let heads = CatalogRepository::new((*state.db).clone()).list_heads().await?;
    Ok(Json(heads))
}

async fn create_head(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreateFeeHeadRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let head = CatalogRepository::new((*state.db).clone())
        .create_head(NewFeeHead {
            name: payload.name,
            new_student_only: payload.new_student_only,
        })
        .await?;

    info!(user_id = %auth.user_id(), fee_head_id = %head.id, "Fee head created via API");
    Ok((StatusCode::CREATED, Json(head)))
}

async fn list_structures(
    State(state): State<AppState>,
    Query(filter): Query<StructureFilter>,
    _auth: AuthUser,
) -> Result<Json<Vec<FeeStructure>>, ApiError> {
    let structures = CatalogRepository::new((*state.db).clone())
        .list_structures(
            filter.class_id.map(Into::into),
            filter.academic_year_id.map(Into::into),
        )
        .await?;
    Ok(Json(structures))
}

async fn configure_structure(
    State(state): State<AppState>,
    _auth: AuthUser,
    Json(payload): Json<ConfigureStructureRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let amount = parse_amount(&payload.amount)
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let rows = CatalogRepository::new((*state.db).clone())
        .configure_structure(FeeStructureConfig {
            class_id: payload.class_id.into(),
            academic_year_id: payload.academic_year_id.into(),
            fee_head_id: payload.fee_head_id.into(),
            amount,
            frequency: payload.frequency,
            due_date: payload.due_date,
            stream: payload.stream,
            subject_count: payload.subject_count,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(rows)))
}
