use crate::catalog::CatalogStore;

/// Catalog titles containing `query`, ignoring case, in stored order
///
/// An empty query returns every title. Whitespace is matched literally.
pub fn search_titles<'a>(store: &'a CatalogStore, query: &str) -> Vec<&'a str> {
    let needle = query.to_lowercase();
    if needle.is_empty() {
        return store.all_titles().collect();
    }

    store
        .all_titles()
        .filter(|title| title.to_lowercase().contains(&needle))
        .collect()
}
