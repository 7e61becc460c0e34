//! Rule-based relevance scoring.
//!
//! Combines weighted word-boundary keyword matches on title and description
//! with a years-of-experience penalty and an optional embedding-similarity
//! bonus. Purely computational; the engine holds no I/O handles.

pub mod config;
pub mod engine;
pub mod error;


pub use config::ScoringConfig;
pub use engine::ScoringEngine;
pub use error::ScoringError;

pub(crate) use engine::cosine_similarity;
