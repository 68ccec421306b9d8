use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    models::MovieRecord,
    routes::AppState,
    services::title_search,
};

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    q: Option<String>,
}

/// Handler for the title list, optionally filtered by `q`
pub async fn list(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchQuery>,
) -> Json<Vec<String>> {
    let query = params.q.unwrap_or_default();
    let titles: Vec<String> = title_search::search_titles(&state.catalog, &query)
        .into_iter()
        .map(str::to_string)
        .collect();

    tracing::debug!(query = %query, results = titles.len(), "Title search completed");

    Json(titles)
}

/// Handler for a single catalog record by row index
pub async fn movie(
    State(state): State<Arc<AppState>>,
    Path(row_index): Path<usize>,
) -> AppResult<Json<MovieRecord>> {
    state
        .catalog
        .record_at(row_index)
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("No movie at row {}", row_index)))
}
