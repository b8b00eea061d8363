// ==========================================
// Depot Management - depot JSON endpoints
// ==========================================
// GET    /api/Depots            paged list (query: pageIndex, pageSize,
//                               searchField, searchQuery, sortOrder)
// GET    /api/Depots/{id}       one depot
// POST   /api/Depots            create or edit through the form service
// DELETE /api/Depots/{id}       soft delete
// ==========================================

use crate::api::error::ApiError;
use crate::app::AppState;
use crate::domain::{ArticleSet, Depot};
use crate::repository::{DepotRepositoryExt, MutationOutcome};
use crate::service::SaveOutcome;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;

pub const DEPOTS_PATH: &str = "/api/Depots";
pub const DEPOT_BY_ID_PATH: &str = "/api/Depots/{id}";

/// Header carrying the acting user's name
pub const USER_NAME_HEADER: &str = "x-user-name";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ListQuery {
    pub page_index: u32,
    pub page_size: u32,
    pub search_field: String,
    pub search_query: String,
    pub sort_order: String,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            page_index: 0,
            page_size: 10,
            search_field: String::new(),
            search_query: String::new(),
            sort_order: String::new(),
        }
    }
}

/// Form payload; `id` 0 (or absent) creates
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepotForm {
    #[serde(default)]
    pub id: i64,
    pub name: Option<String>,
}

pub async fn list_depots(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ArticleSet<Depot>>, ApiError> {
    let page = state
        .depots
        .get_articles(
            query.page_index,
            query.page_size,
            &query.search_field,
            &query.search_query,
            &query.sort_order,
            (),
        )
        .await?;
    Ok(Json(page))
}

pub async fn get_depot(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Depot>, ApiError> {
    state
        .depots
        .get_by_id(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("Depot {} not found.", id)))
}

pub async fn save_depot(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(form): Json<DepotForm>,
) -> Result<Response, ApiError> {
    let user_name = headers
        .get(USER_NAME_HEADER)
        .and_then(|v| v.to_str().ok());

    // Edits start from the stored row so CreatedAt/CreatedBy survive
    let draft = match state.depot_form.load_draft(form.id).await? {
        Some(depot) => Depot {
            name: form.name,
            ..depot
        },
        None => return Err(ApiError::NotFound(format!("Depot {} not found.", form.id))),
    };

    match state.depot_form.save(draft, user_name).await? {
        SaveOutcome::Created(depot) => Ok((StatusCode::CREATED, Json(depot)).into_response()),
        SaveOutcome::Updated(depot) => Ok(Json(depot).into_response()),
        SaveOutcome::NotFound => Err(ApiError::NotFound(format!("Depot {} not found.", form.id))),
    }
}

pub async fn delete_depot(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    match state.depots.delete(id).await? {
        MutationOutcome::Updated => Ok(StatusCode::NO_CONTENT),
        MutationOutcome::NotFound => Err(ApiError::NotFound(format!("Depot {} not found.", id))),
    }
}
