use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Application-level errors
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("Failed to load {path}: {reason}")]
    CatalogLoad { path: String, reason: String },

    #[error(
        "Catalog has {catalog_rows} rows but similarity matrix is {matrix_rows}x{matrix_cols}"
    )]
    Consistency {
        catalog_rows: usize,
        matrix_rows: usize,
        matrix_cols: usize,
    },

    #[error("Unknown title: {0}")]
    UnknownTitle(String),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    pub(crate) fn load(path: impl AsRef<std::path::Path>, reason: impl ToString) -> Self {
        AppError::CatalogLoad {
            path: path.as_ref().display().to_string(),
            reason: reason.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::UnknownTitle(_) => (StatusCode::NOT_FOUND, self.to_string()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::HttpClient(_) => (StatusCode::BAD_GATEWAY, self.to_string()),
            AppError::CatalogLoad { .. } | AppError::Consistency { .. } | AppError::Internal(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, self.to_string())
            }
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_title_maps_to_not_found() {
        let response = AppError::UnknownTitle("Zardoz".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_consistency_message() {
        let err = AppError::Consistency {
            catalog_rows: 4,
            matrix_rows: 3,
            matrix_cols: 3,
        };
        assert_eq!(
            err.to_string(),
            "Catalog has 4 rows but similarity matrix is 3x3"
        );
    }

    #[test]
    fn test_load_error_includes_path() {
        let err = AppError::load("data/movies.json", "No such file or directory");
        assert_eq!(
            err.to_string(),
            "Failed to load data/movies.json: No such file or directory"
        );
    }
}
