//! Posterforge - catalog enrichment pipeline
//!
//! Scans a semi-structured content file for record fragments, matches
//! their titles against TMDB with fuzzy scoring, and patches poster and
//! trailer URLs in place. This library crate exposes the core
//! functionality for integration testing.

pub mod config;
pub mod document;
pub mod paths;
pub mod pipeline;
pub mod resolve;
pub mod similarity;
pub mod tmdb;
