//! Academic year lookup for clients that need the active year.

use axum::{Json, Router, extract::State, routing::get};
use bursar_core::catalog::AcademicYear;
use bursar_db::EnrollmentRepository;

use crate::{AppState, error::ApiError, middleware::AuthUser};

/// Creates the academic year routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/academic-years/active", get(active_year))
}

async fn active_year(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> Result<Json<AcademicYear>, ApiError> {
    let year = EnrollmentRepository::new((*state.db).clone())
        .active_year()
        .await?;
    Ok(Json(year))
}
