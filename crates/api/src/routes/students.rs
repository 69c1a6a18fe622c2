//! Student ledger and payment routes.

use std::time::Duration;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use bursar_core::ledger::StudentLedger;
use bursar_core::payment::{
    CollectPaymentInput, PaymentAllocator, PaymentError, PaymentMode, SelectedItem,
};
use bursar_core::reports::{BalanceStatement, PaymentHistoryEntry};
use bursar_db::{EnrollmentRepository, LedgerRepository, PaymentRepository};
use bursar_shared::types::{PageRequest, PageResponse, StudentId, parse_amount};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{AppState, error::ApiError, middleware::AuthUser};

/// Creates the student routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/students/{student_id}/ledger", get(get_ledger))
        .route(
            "/students/{student_id}/payments",
            get(payment_history).post(collect_payment),
        )
        .route(
            "/students/{student_id}/balance-statement",
            get(balance_statement),
        )
}

/// Academic year selector; the caller looks up the active year itself.
#[derive(Debug, Deserialize)]
pub struct YearQuery {
    /// Academic year to read.
    pub academic_year_id: Uuid,
}

/// One obligation selected for payment.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectedItemRequest {
    pub fee_structure_id: Uuid,
    /// Balance shown to the cashier when the item was picked, as a decimal string.
    pub balance_as_known: String,
}

/// Request body for collecting a payment.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectPaymentRequest {
    pub academic_year_id: Uuid,
    /// Obligations in the order the amount should be applied.
    pub items: Vec<SelectedItemRequest>,
    /// Amount collected, as a decimal string.
    pub total_amount: String,
    pub mode: PaymentMode,
    pub transaction_reference: Option<String>,
    pub remarks: Option<String>,
}

async fn get_ledger(
    State(state): State<AppState>,
    Path(student_id): Path<Uuid>,
    Query(query): Query<YearQuery>,
    _auth: AuthUser,
) -> Result<Json<StudentLedger>, ApiError> {
    let ledger = LedgerRepository::new((*state.db).clone())
        .get_ledger(
            student_id.into(),
            query.academic_year_id.into(),
            state.today(),
        )
        .await?;
    Ok(Json(ledger))
}

async fn collect_payment(
    State(state): State<AppState>,
    Path(student_id): Path<Uuid>,
    auth: AuthUser,
    Json(payload): Json<CollectPaymentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let items = payload
        .items
        .into_iter()
        .map(|i| {
            Ok(SelectedItem {
                fee_structure_id: i.fee_structure_id.into(),
                balance_as_known: amount(&i.balance_as_known)?,
            })
        })
        .collect::<Result<Vec<_>, PaymentError>>()?;

    let input = CollectPaymentInput {
        student_id: StudentId::from(student_id),
        academic_year_id: payload.academic_year_id.into(),
        items,
        total_amount: amount(&payload.total_amount)?,
        mode: payload.mode,
        transaction_reference: payload
            .transaction_reference
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty()),
        remarks: payload.remarks,
        collected_by: auth.user_id(),
    };

    PaymentAllocator::validate(&input.items, input.total_amount)?;
    EnrollmentRepository::new((*state.db).clone())
        .find_student(input.student_id)
        .await?;

    let repo = PaymentRepository::new((*state.db).clone(), state.fees.timezone);
    let timeout = Duration::from_secs(state.fees.payment_timeout_secs);
    let outcome = match tokio::time::timeout(timeout, repo.collect_payment(input)).await {
        Ok(result) => result?,
        Err(_) => {
            warn!(student_id = %student_id, timeout_secs = timeout.as_secs(), "Payment timed out");
            return Err(PaymentError::PersistenceFailure("payment timed out".to_string()).into());
        }
    };

    info!(
        student_id = %student_id,
        collected_by = %auth.user_id(),
        receipt_number = %outcome.receipt_number,
        "Payment collected"
    );
    Ok((StatusCode::CREATED, Json(outcome)))
}

fn amount(raw: &str) -> Result<Decimal, PaymentError> {
    parse_amount(raw).map_err(|e| PaymentError::InvalidAmount(e.to_string()))
}

async fn payment_history(
    State(state): State<AppState>,
    Path(student_id): Path<Uuid>,
    Query(page): Query<PageRequest>,
    _auth: AuthUser,
) -> Result<Json<PageResponse<PaymentHistoryEntry>>, ApiError> {
    let history = LedgerRepository::new((*state.db).clone())
        .payment_history(student_id.into(), page)
        .await?;
    Ok(Json(history))
}

async fn balance_statement(
    State(state): State<AppState>,
    Path(student_id): Path<Uuid>,
    Query(query): Query<YearQuery>,
    _auth: AuthUser,
) -> Result<Json<BalanceStatement>, ApiError> {
    let statement = LedgerRepository::new((*state.db).clone())
        .balance_statement(
            student_id.into(),
            query.academic_year_id.into(),
            state.today(),
        )
        .await?;
    Ok(Json(statement))
}
