use axum::{extract::State, Json};
use std::sync::Arc;

use crate::{
    error::AppResult,
    models::{RecommendationRequest, RecommendationResponse},
    routes::AppState,
    services::recommendations,
};

/// Handler for recommendations endpoint
pub async fn recommend(
    State(state): State<Arc<AppState>>,
    Json(request): Json<RecommendationRequest>,
) -> AppResult<Json<RecommendationResponse>> {
    let top_n = request.top_n.unwrap_or(state.default_top_n);

    tracing::info!(
        title = %request.title,
        top_n = top_n,
        "Processing recommendation request"
    );

    let results = recommendations::get_recommendations(
        &state.catalog,
        state.poster_resolver.clone(),
        &request.title,
        top_n,
    )
    .await?;

    Ok(Json(RecommendationResponse {
        title: request.title,
        results,
    }))
}
