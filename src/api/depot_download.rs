// ==========================================
// Depot Management - depot list download
// ==========================================
// GET /api/DepotDownload/ExcelDown
// ==========================================

use crate::api::error::ApiError;
use crate::app::AppState;
use crate::export::{build_depot_workbook, export_file_name, XLSX_CONTENT_TYPE};
use axum::extract::State;
use axum::http::header;
use axum::response::{IntoResponse, Response};
use chrono::Local;

pub const EXCEL_DOWN_PATH: &str = "/api/DepotDownload/ExcelDown";
pub const NO_DEPOTS_MESSAGE: &str = "No depot records found.";

/// Download every live depot as an xlsx workbook
pub async fn excel_down(State(state): State<AppState>) -> Result<Response, ApiError> {
    let depots = state.depots.get_all().await?;
    if depots.is_empty() {
        return Err(ApiError::NotFound(NO_DEPOTS_MESSAGE.to_string()));
    }

    let count = depots.len();
    let content = tokio::task::spawn_blocking(move || build_depot_workbook(&depots))
        .await
        .map_err(|e| ApiError::InternalError(e.to_string()))??;

    let file_name = export_file_name(&Local::now());
    tracing::info!(rows = count, file = %file_name, "depot workbook exported");

    Ok((
        [
            (header::CONTENT_TYPE, XLSX_CONTENT_TYPE.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", file_name),
            ),
        ],
        content,
    )
        .into_response())
}
