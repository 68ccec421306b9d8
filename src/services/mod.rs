pub mod providers;
pub mod recommendations;
pub mod title_search;

pub use providers::{OmdbPosterResolver, PosterResolver};
