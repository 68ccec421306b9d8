use std::sync::Arc;

use crate::{
    catalog::CatalogStore,
    error::{AppError, AppResult},
    models::RecommendationResult,
    services::providers::PosterResolver,
};

/// Ranks every other title by similarity to `title` and keeps the best `top_n`
///
/// Returns `(row_index, score)` pairs, highest score first. The queried row is
/// excluded before ranking, equal scores keep catalog order, and `top_n` is
/// clamped to `[1, N-1]`.
pub fn rank_similar(
    store: &CatalogStore,
    title: &str,
    top_n: usize,
) -> AppResult<Vec<(usize, f64)>> {
    let row_index = store
        .find_by_title(title)
        .ok_or_else(|| AppError::UnknownTitle(title.to_string()))?;

    let scores = store
        .similarity_row(row_index)
        .ok_or_else(|| AppError::Internal(format!("No similarity row for index {}", row_index)))?;

    let top_n = top_n.clamp(1, store.len().saturating_sub(1).max(1));

    let mut candidates: Vec<(usize, f64)> = scores
        .iter()
        .copied()
        .enumerate()
        .filter(|&(j, _)| j != row_index)
        .collect();

    // Stable sort: exact ties stay in ascending row order
    candidates.sort_by(|a, b| b.1.total_cmp(&a.1));
    candidates.truncate(top_n);

    Ok(candidates)
}

/// Generates recommendations for a selected title
///
/// Ranking is deterministic for a given catalog. Posters are resolved
/// concurrently, one task per result, and joined back in ranking order; a
/// missing poster never fails the request.
pub async fn get_recommendations(
    store: &CatalogStore,
    poster_resolver: Arc<dyn PosterResolver>,
    title: &str,
    top_n: usize,
) -> AppResult<Vec<RecommendationResult>> {
    let ranked = rank_similar(store, title, top_n)?;

    let mut tasks = Vec::with_capacity(ranked.len());

    for &(row_index, score) in &ranked {
        let record = store
            .record_at(row_index)
            .ok_or_else(|| AppError::Internal(format!("No record at index {}", row_index)))?;

        let resolver = Arc::clone(&poster_resolver);
        let movie_title = record.title.clone();
        let year = record.year;
        let task = tokio::spawn(async move { resolver.resolve(&movie_title, year).await });

        tasks.push((record, score, task));
    }

    let mut results = Vec::with_capacity(tasks.len());

    for (record, score, task) in tasks {
        let poster_url = match task.await {
            Ok(poster_url) => poster_url,
            Err(e) => {
                tracing::error!(error = %e, title = %record.title, "Poster task join error");
                None
            }
        };

        let result = RecommendationResult {
            title: record.title.clone(),
            year: record.year,
            poster_url,
            score: round_score(score),
        };
        tracing::debug!(result = %result, poster = result.poster_url.is_some(), "Recommended");
        results.push(result);
    }

    tracing::info!(
        title = %title,
        requested = top_n,
        returned = results.len(),
        with_poster = results.iter().filter(|r| r.poster_url.is_some()).count(),
        "Recommendations generated"
    );

    Ok(results)
}

fn round_score(score: f64) -> f64 {
    (score * 100.0).round() / 100.0
}
