use tracing::{debug, warn};

use super::client::VectorDbClient;
use super::error::VectorDbError;
use super::model::JobPoint;
use crate::model::CanonicalJobRecord;

/// Outcome of an indexing pass over a batch of records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpsertOutcome {
    /// Records written to the index in this pass.
    pub inserted: usize,
    /// Records skipped because their id was already present.
    pub skipped_existing: usize,
    /// Records skipped because no vector was supplied for them.
    pub skipped_unembedded: usize,
}

/// A single retrieval result with its similarity expressed as a percentage.
#[derive(Debug, Clone)]
pub struct QueryHit {
    pub record: CanonicalJobRecord,
    /// Cosine similarity scaled to 0..=100 and rounded to two decimals.
    pub similarity_score: f64,
}

/// Job-posting view over a vector database collection.
///
/// Point ids are the records' stable content ids, so re-running the same
/// collection pass against a populated index is a no-op for records already
/// stored.
pub struct JobIndex<V> {
    db: V,
    collection: String,
    vector_size: u64,
}

impl<V: VectorDbClient> JobIndex<V> {
    pub fn new(db: V, collection: impl Into<String>, vector_size: u64) -> Self {
        Self {
            db,
            collection: collection.into(),
            vector_size,
        }
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Creates the backing collection if it does not exist yet.
    pub async fn ensure_ready(&self) -> Result<(), VectorDbError> {
        self.db
            .ensure_collection(&self.collection, self.vector_size)
            .await
    }

    /// Indexes `records`, pairing each with its embedding by position.
    ///
    /// Records whose id is already present are skipped without re-embedding
    /// side effects; records whose embedding slot is `None` are counted but
    /// not written. The two slices must pair up one-to-one.
    pub async fn upsert_records(
        &self,
        records: Vec<CanonicalJobRecord>,
        embeddings: Vec<Option<Vec<f32>>>,
    ) -> Result<UpsertOutcome, VectorDbError> {
        if records.len() != embeddings.len() {
            return Err(VectorDbError::BatchMismatch {
                records: records.len(),
                embeddings: embeddings.len(),
            });
        }

        let ids: Vec<u64> = records.iter().map(|r| r.id).collect();
        let existing = match self.db.existing_ids(&self.collection, ids).await {
            Ok(found) => found,
            Err(e) => {
                // A failed lookup degrades to "nothing is stored yet"; the
                // upsert itself is idempotent.
                warn!(error = %e, "existence check failed, treating all ids as new");
                Vec::new()
            }
        };
        let existing: std::collections::HashSet<u64> = existing.into_iter().collect();

        let mut outcome = UpsertOutcome::default();
        let mut points = Vec::new();

        for (record, embedding) in records.into_iter().zip(embeddings) {
            if existing.contains(&record.id) {
                outcome.skipped_existing += 1;
                continue;
            }
            match embedding {
                Some(vector) => {
                    points.push(JobPoint { record, vector });
                }
                None => outcome.skipped_unembedded += 1,
            }
        }

        outcome.inserted = points.len();
        self.db.upsert_points(&self.collection, points).await?;

        debug!(
            inserted = outcome.inserted,
            skipped_existing = outcome.skipped_existing,
            skipped_unembedded = outcome.skipped_unembedded,
            "index pass complete"
        );

        Ok(outcome)
    }

    /// Returns whether `id` is already stored.
    ///
    /// Lookup failures are treated as absence so callers can keep going.
    pub async fn contains(&self, id: u64) -> bool {
        match self.db.existing_ids(&self.collection, vec![id]).await {
            Ok(found) => !found.is_empty(),
            Err(e) => {
                warn!(id, error = %e, "existence check failed");
                false
            }
        }
    }

    /// Retrieves the `limit` records most similar to `query_vector`.
    ///
    /// An empty index yields an empty result, not an error.
    pub async fn query(
        &self,
        query_vector: Vec<f32>,
        limit: u64,
    ) -> Result<Vec<QueryHit>, VectorDbError> {
        let hits = self.db.search(&self.collection, query_vector, limit).await?;

        Ok(hits
            .into_iter()
            .map(|hit| QueryHit {
                similarity_score: to_similarity_pct(hit.score),
                record: hit.record,
            })
            .collect())
    }

    /// Returns the number of stored records.
    pub async fn count(&self) -> Result<u64, VectorDbError> {
        self.db.count(&self.collection).await
    }
}

/// Converts a cosine similarity score into a 0..=100 percentage with two
/// decimal places, clamping out-of-range values from float noise.
fn to_similarity_pct(score: f32) -> f64 {
    let pct = (score as f64 * 100.0).clamp(0.0, 100.0);
    (pct * 100.0).round() / 100.0
}
