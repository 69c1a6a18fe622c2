//! Receipt lookup.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};
use bursar_db::{LedgerRepository, repositories::ReceiptView};
use bursar_shared::AppError;
use uuid::Uuid;

use crate::{AppState, error::ApiError, middleware::AuthUser};

/// Creates the payment routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/payments/{payment_id}", get(get_receipt))
}

async fn get_receipt(
    State(state): State<AppState>,
    Path(payment_id): Path<Uuid>,
    _auth: AuthUser,
) -> Result<Json<ReceiptView>, ApiError> {
    LedgerRepository::new((*state.db).clone())
        .receipt(payment_id.into())
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Payment not found: {payment_id}")).into())
}
