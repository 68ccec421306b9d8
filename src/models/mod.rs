use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt::Display;

/// Shown in place of a missing release year
pub const YEAR_PLACEHOLDER: &str = "----";

/// A movie in the catalog, addressed by its position
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MovieRecord {
    /// 0-based position in the catalog, also the similarity matrix coordinate
    pub row_index: usize,
    pub title: String,
    pub year: Option<i32>,
    /// Every other column of the catalog row
    pub metadata: Map<String, Value>,
}

/// A single recommended title returned to the client
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecommendationResult {
    pub title: String,
    pub year: Option<i32>,
    pub poster_url: Option<String>,
    /// Similarity to the queried title, rounded to 2 decimals
    pub score: f64,
}

impl RecommendationResult {
    /// Release year for display, `----` when unknown
    pub fn year_label(&self) -> String {
        self.year
            .map(|y| y.to_string())
            .unwrap_or_else(|| YEAR_PLACEHOLDER.to_string())
    }
}

impl Display for RecommendationResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({}) [{:.2}]", self.title, self.year_label(), self.score)
    }
}

/// Request body for the recommendations endpoint
#[derive(Debug, Deserialize)]
pub struct RecommendationRequest {
    pub title: String,
    #[serde(default)]
    pub top_n: Option<usize>,
}

/// Response with similar titles in descending score order
#[derive(Debug, Serialize, Deserialize)]
pub struct RecommendationResponse {
    pub title: String,
    pub results: Vec<RecommendationResult>,
}

// ============================================================================
// Catalog File Types
// ============================================================================

/// One row of the catalog file as stored on disk
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogRow {
    pub title: String,
    #[serde(default, deserialize_with = "deserialize_year")]
    pub year: Option<i32>,
    #[serde(flatten)]
    pub metadata: Map<String, Value>,
}

impl CatalogRow {
    pub fn into_record(self, row_index: usize) -> MovieRecord {
        MovieRecord {
            row_index,
            title: self.title,
            year: self.year,
            metadata: self.metadata,
        }
    }
}

/// Accepts `1999`, `1999.0` and `"1999"`; anything else is treated as unknown.
fn deserialize_year<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(year_from_value))
}

fn year_from_value(value: &Value) -> Option<i32> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64))
            .and_then(|y| i32::try_from(y).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

// ============================================================================
// OMDb API Types
// ============================================================================

/// Raw response from the OMDb title lookup
#[derive(Debug, Clone, Deserialize)]
pub struct OmdbResponse {
    #[serde(rename = "Response")]
    pub response: String,
    #[serde(rename = "Poster", default)]
    pub poster: Option<String>,
    #[serde(rename = "Error", default)]
    pub error: Option<String>,
}

impl OmdbResponse {
    pub fn is_match(&self) -> bool {
        self.response == "True"
    }
}
