//! Similarity-retriever collaborator client.
//!
//! The embedding index and its persistence live in a sidecar service;
//! this crate is only the wire adapter. The sidecar consumes a free-text
//! query and returns ranked documents whose metadata mirrors the catalog
//! rows they were built from.

mod http;

pub use http::HttpRetriever;
