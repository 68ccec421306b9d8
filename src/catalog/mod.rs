pub mod loader;
pub mod store;

pub use loader::CatalogLoader;
pub use store::CatalogStore;
