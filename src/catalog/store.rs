use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;

use crate::{
    error::{AppError, AppResult},
    models::{CatalogRow, MovieRecord},
};

/// Pairs differing by less than this are considered symmetric
const SYMMETRY_TOLERANCE: f64 = 1e-9;

/// Movie records and their precomputed similarity matrix
///
/// Row `i` of the matrix belongs to `records[i]`. Immutable once loaded, so a
/// single instance can be shared across requests behind an `Arc`.
#[derive(Debug)]
pub struct CatalogStore {
    records: Vec<MovieRecord>,
    similarity: Vec<Vec<f64>>,
}

impl CatalogStore {
    /// Loads the catalog and similarity matrix from JSON files
    ///
    /// Fails with `CatalogLoad` if a file is missing or malformed and with
    /// `Consistency` if the matrix isn't `N x N` for an `N`-row catalog.
    pub fn load(catalog_path: impl AsRef<Path>, matrix_path: impl AsRef<Path>) -> AppResult<Self> {
        let rows: Vec<CatalogRow> = read_json(catalog_path.as_ref())?;
        let similarity: Vec<Vec<f64>> = read_json(matrix_path.as_ref())?;

        let store = Self::from_parts(rows, similarity).map_err(|e| match e {
            AppError::CatalogLoad { reason, .. } => AppError::load(matrix_path.as_ref(), reason),
            other => other,
        })?;

        tracing::info!(
            catalog = %catalog_path.as_ref().display(),
            matrix = %matrix_path.as_ref().display(),
            movies = store.len(),
            "Catalog loaded"
        );

        Ok(store)
    }

    /// Builds a store from already-parsed rows and matrix
    pub fn from_parts(rows: Vec<CatalogRow>, similarity: Vec<Vec<f64>>) -> AppResult<Self> {
        let matrix_rows = similarity.len();
        let matrix_cols = similarity.first().map_or(0, Vec::len);

        if let Some((i, row)) = similarity
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != matrix_cols)
        {
            return Err(AppError::load(
                "similarity matrix",
                format!(
                    "row {} has {} columns, expected {}",
                    i,
                    row.len(),
                    matrix_cols
                ),
            ));
        }

        if rows.len() != matrix_rows || rows.len() != matrix_cols {
            return Err(AppError::Consistency {
                catalog_rows: rows.len(),
                matrix_rows,
                matrix_cols,
            });
        }

        let records = rows
            .into_iter()
            .enumerate()
            .map(|(i, row)| row.into_record(i))
            .collect();

        let store = Self {
            records,
            similarity,
        };

        let asymmetric = store.asymmetric_pairs();
        if asymmetric > 0 {
            tracing::warn!(pairs = asymmetric, "Similarity matrix is not symmetric");
        }

        Ok(store)
    }

    /// Number of movies in the catalog
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Row index of the first record whose title matches exactly (case-sensitive)
    pub fn find_by_title(&self, title: &str) -> Option<usize> {
        self.records
            .iter()
            .position(|record| record.title == title)
    }

    /// All titles in stored order
    pub fn all_titles(&self) -> impl Iterator<Item = &str> + '_ {
        self.records.iter().map(|record| record.title.as_str())
    }

    pub fn record_at(&self, row_index: usize) -> Option<&MovieRecord> {
        self.records.get(row_index)
    }

    /// Similarity of `row_index` to every movie, itself included
    pub fn similarity_row(&self, row_index: usize) -> Option<&[f64]> {
        self.similarity.get(row_index).map(Vec::as_slice)
    }

    /// Count of `(i, j)` pairs with `i < j` where `m[i][j] != m[j][i]`
    fn asymmetric_pairs(&self) -> usize {
        let n = self.similarity.len();
        (0..n)
            .flat_map(|i| (i + 1..n).map(move |j| (i, j)))
            .filter(|&(i, j)| {
                (self.similarity[i][j] - self.similarity[j][i]).abs() > SYMMETRY_TOLERANCE
            })
            .count()
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> AppResult<T> {
    let bytes = fs::read(path).map_err(|e| AppError::load(path, e))?;
    serde_json::from_slice(&bytes).map_err(|e| AppError::load(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn rows(titles: &[&str]) -> Vec<CatalogRow> {
        titles
            .iter()
            .map(|t| serde_json::from_value(json!({ "title": t })).unwrap())
            .collect()
    }

    fn json_file(value: serde_json::Value) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", value).unwrap();
        file
    }

    #[test]
    fn test_load_from_files() {
        let catalog = json_file(json!([
            { "title": "Alien", "year": 1979, "genres": ["Horror"] },
            { "title": "Aliens", "year": 1986 },
            { "title": "Heat" }
        ]));
        let matrix = json_file(json!([
            [1.0, 0.8, 0.1],
            [0.8, 1.0, 0.2],
            [0.1, 0.2, 1.0]
        ]));

        let store = CatalogStore::load(catalog.path(), matrix.path()).unwrap();

        assert_eq!(store.len(), 3);
        assert_eq!(
            store.all_titles().collect::<Vec<_>>(),
            vec!["Alien", "Aliens", "Heat"]
        );
        let alien = store.record_at(0).unwrap();
        assert_eq!(alien.year, Some(1979));
        assert_eq!(alien.metadata["genres"], json!(["Horror"]));
        assert_eq!(store.record_at(2).unwrap().year, None);
        assert_eq!(store.similarity_row(1), Some(&[0.8, 1.0, 0.2][..]));
    }

    #[test]
    fn test_load_missing_catalog_file() {
        let matrix = json_file(json!([[1.0]]));
        let result = CatalogStore::load("/nonexistent/movies.json", matrix.path());

        match result {
            Err(AppError::CatalogLoad { path, .. }) => {
                assert_eq!(path, "/nonexistent/movies.json")
            }
            other => panic!("expected CatalogLoad, got {:?}", other),
        }
    }

    #[test]
    fn test_load_malformed_catalog() {
        let catalog = json_file(json!({ "title": "not a table" }));
        let matrix = json_file(json!([[1.0]]));

        let result = CatalogStore::load(catalog.path(), matrix.path());
        assert!(matches!(result, Err(AppError::CatalogLoad { .. })));
    }

    #[test]
    fn test_load_non_numeric_matrix() {
        let catalog = json_file(json!([{ "title": "Alien" }]));
        let matrix = json_file(json!([["high"]]));

        let result = CatalogStore::load(catalog.path(), matrix.path());
        assert!(matches!(result, Err(AppError::CatalogLoad { .. })));
    }

    #[test]
    fn test_load_ragged_matrix_reports_matrix_path() {
        let catalog = json_file(json!([{ "title": "A" }, { "title": "B" }]));
        let matrix = json_file(json!([[1.0, 0.5], [0.5]]));

        match CatalogStore::load(catalog.path(), matrix.path()) {
            Err(AppError::CatalogLoad { path, reason }) => {
                assert_eq!(path, matrix.path().display().to_string());
                assert!(reason.contains("row 1"));
            }
            other => panic!("expected CatalogLoad, got {:?}", other),
        }
    }

    #[test]
    fn test_size_mismatch_is_consistency_error() {
        let result = CatalogStore::from_parts(
            rows(&["A", "B", "C"]),
            vec![vec![1.0, 0.5], vec![0.5, 1.0]],
        );

        match result {
            Err(AppError::Consistency {
                catalog_rows,
                matrix_rows,
                matrix_cols,
            }) => {
                assert_eq!(catalog_rows, 3);
                assert_eq!(matrix_rows, 2);
                assert_eq!(matrix_cols, 2);
            }
            other => panic!("expected Consistency, got {:?}", other),
        }
    }

    #[test]
    fn test_non_square_matrix_is_consistency_error() {
        let result = CatalogStore::from_parts(
            rows(&["A", "B"]),
            vec![vec![1.0, 0.5, 0.1], vec![0.5, 1.0, 0.1]],
        );
        assert!(matches!(result, Err(AppError::Consistency { .. })));
    }

    #[test]
    fn test_empty_catalog() {
        let store = CatalogStore::from_parts(vec![], vec![]).unwrap();
        assert!(store.is_empty());
        assert_eq!(store.find_by_title("Anything"), None);
    }

    #[test]
    fn test_find_by_title_is_exact_and_first_match() {
        let store = CatalogStore::from_parts(
            rows(&["Dune", "Heat", "Dune"]),
            vec![vec![1.0; 3], vec![1.0; 3], vec![1.0; 3]],
        )
        .unwrap();

        assert_eq!(store.find_by_title("Dune"), Some(0));
        assert_eq!(store.find_by_title("Heat"), Some(1));
        assert_eq!(store.find_by_title("dune"), None);
        assert_eq!(store.find_by_title("Dune "), None);
        assert_eq!(store.find_by_title(""), None);
    }

    #[test]
    fn test_asymmetric_matrix_still_loads() {
        let store = CatalogStore::from_parts(
            rows(&["A", "B"]),
            vec![vec![1.0, 0.9], vec![0.3, 1.0]],
        )
        .unwrap();

        assert_eq!(store.asymmetric_pairs(), 1);
        assert_eq!(store.similarity_row(0), Some(&[1.0, 0.9][..]));
    }

    #[test]
    fn test_record_at_out_of_range() {
        let store = CatalogStore::from_parts(rows(&["A"]), vec![vec![1.0]]).unwrap();
        assert!(store.record_at(1).is_none());
        assert!(store.similarity_row(1).is_none());
    }
}
