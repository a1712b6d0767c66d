//! Report endpoints

use std::sync::Arc;

use axum::{
    Extension, Json,
    extract::{Path, State},
};
use rolecall_core::{AttemptReport, Identity};

use crate::AppState;
use crate::error::ApiError;

/// GET /api/reports/:report_id - fetch a performance report
///
/// Only the owning identity of the module behind the report may read it.
pub async fn get_report(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
    Path(report_id): Path<String>,
) -> Result<Json<AttemptReport>, ApiError> {
    let report = state.reports.report_for_owner(&report_id, &identity).await?;
    Ok(Json(report))
}
