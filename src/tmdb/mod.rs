//! Search backend: provider trait and the TMDB client implementation.

mod client;
mod provider;

pub use client::{TmdbClient, DEFAULT_BASE_URL};
pub use provider::{Category, SearchCandidate, SearchProvider, VideoEntry};
