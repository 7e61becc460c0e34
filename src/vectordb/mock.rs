use std::collections::HashMap;

use super::client::VectorDbClient;
use super::error::VectorDbError;
use super::model::{JobPoint, SearchHit};
use crate::model::CanonicalJobRecord;
use crate::scoring::cosine_similarity;

/// In-memory stand-in for the real vector database.
#[derive(Default)]
pub struct MockVectorDb {
    collections: std::sync::RwLock<HashMap<String, MockCollection>>,
    fail_searches: std::sync::atomic::AtomicBool,
}

#[derive(Default, Clone)]
struct MockCollection {
    vector_size: u64,
    points: HashMap<u64, StoredPoint>,
}

#[derive(Clone)]
struct StoredPoint {
    vector: Vec<f32>,
    record: CanonicalJobRecord,
}

impl MockVectorDb {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn point_count(&self, collection: &str) -> Option<usize> {
        self.collections
            .read()
            .ok()?
            .get(collection)
            .map(|c| c.points.len())
    }

    /// Makes subsequent search and retrieve calls fail.
    pub fn set_failing(&self, failing: bool) {
        self.fail_searches
            .store(failing, std::sync::atomic::Ordering::SeqCst);
    }

    fn is_failing(&self) -> bool {
        self.fail_searches.load(std::sync::atomic::Ordering::SeqCst)
    }
}

impl VectorDbClient for MockVectorDb {
    async fn ensure_collection(&self, name: &str, vector_size: u64) -> Result<(), VectorDbError> {
        let mut collections =
            self.collections
                .write()
                .map_err(|e| VectorDbError::CreateCollectionFailed {
                    collection: name.to_string(),
                    message: e.to_string(),
                })?;

        collections
            .entry(name.to_string())
            .or_insert_with(|| MockCollection {
                vector_size,
                points: HashMap::new(),
            });

        Ok(())
    }

    async fn upsert_points(
        &self,
        collection: &str,
        points: Vec<JobPoint>,
    ) -> Result<(), VectorDbError> {
        let mut collections =
            self.collections
                .write()
                .map_err(|e| VectorDbError::UpsertFailed {
                    collection: collection.to_string(),
                    message: e.to_string(),
                })?;

        let coll =
            collections
                .get_mut(collection)
                .ok_or_else(|| VectorDbError::UpsertFailed {
                    collection: collection.to_string(),
                    message: "collection does not exist".to_string(),
                })?;

        for point in points {
            if point.vector.len() as u64 != coll.vector_size {
                return Err(VectorDbError::InvalidDimension {
                    expected: coll.vector_size as usize,
                    actual: point.vector.len(),
                });
            }
            coll.points.insert(
                point.record.id,
                StoredPoint {
                    vector: point.vector,
                    record: point.record,
                },
            );
        }

        Ok(())
    }

    async fn search(
        &self,
        collection: &str,
        query: Vec<f32>,
        limit: u64,
    ) -> Result<Vec<SearchHit>, VectorDbError> {
        if self.is_failing() {
            return Err(VectorDbError::SearchFailed {
                collection: collection.to_string(),
                message: "simulated search failure".to_string(),
            });
        }

        let collections = self
            .collections
            .read()
            .map_err(|e| VectorDbError::SearchFailed {
                collection: collection.to_string(),
                message: e.to_string(),
            })?;

        let coll = collections
            .get(collection)
            .ok_or_else(|| VectorDbError::SearchFailed {
                collection: collection.to_string(),
                message: "collection does not exist".to_string(),
            })?;

        let mut scored: Vec<SearchHit> = coll
            .points
            .values()
            .map(|stored| SearchHit {
                id: stored.record.id,
                score: cosine_similarity(&query, &stored.vector),
                record: stored.record.clone(),
            })
            .collect();

        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(limit as usize);

        Ok(scored)
    }

    async fn existing_ids(
        &self,
        collection: &str,
        ids: Vec<u64>,
    ) -> Result<Vec<u64>, VectorDbError> {
        if self.is_failing() {
            return Err(VectorDbError::RetrieveFailed {
                collection: collection.to_string(),
                message: "simulated retrieve failure".to_string(),
            });
        }

        let collections = self
            .collections
            .read()
            .map_err(|e| VectorDbError::RetrieveFailed {
                collection: collection.to_string(),
                message: e.to_string(),
            })?;

        let Some(coll) = collections.get(collection) else {
            return Ok(Vec::new());
        };

        Ok(ids
            .into_iter()
            .filter(|id| coll.points.contains_key(id))
            .collect())
    }

    async fn count(&self, collection: &str) -> Result<u64, VectorDbError> {
        let collections = self
            .collections
            .read()
            .map_err(|e| VectorDbError::CountFailed {
                collection: collection.to_string(),
                message: e.to_string(),
            })?;

        Ok(collections
            .get(collection)
            .map(|c| c.points.len() as u64)
            .unwrap_or(0))
    }
}
