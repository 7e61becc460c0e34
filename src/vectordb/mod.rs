//! Vector database access.
//!
//! [`QdrantClient`] wraps the raw Qdrant API; [`JobIndex`] layers job-posting
//! semantics on top: stable content ids as point ids, idempotent batch
//! upserts, and percentage-scaled similarity on retrieval.

pub mod client;
pub mod error;
pub mod index;
pub mod model;

#[cfg(any(test, feature = "mock"))]
pub mod mock;


pub use client::{QdrantClient, VectorDbClient};
pub use error::VectorDbError;
pub use index::{JobIndex, QueryHit, UpsertOutcome};
pub use model::{JobPoint, SearchHit};

#[cfg(any(test, feature = "mock"))]
pub use mock::MockVectorDb;
