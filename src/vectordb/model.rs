use std::collections::HashMap;

use chrono::NaiveDate;
use qdrant_client::qdrant::ScoredPoint;
use qdrant_client::qdrant::point_id::PointIdOptions;

use crate::model::{CanonicalJobRecord, RawPosting};

/// A canonical record paired with its embedding, ready for upsert.
#[derive(Debug, Clone)]
pub struct JobPoint {
    pub record: CanonicalJobRecord,
    pub vector: Vec<f32>,
}

impl JobPoint {
    pub fn new(record: CanonicalJobRecord, vector: Vec<f32>) -> Self {
        Self { record, vector }
    }

    /// Flattens the record into a Qdrant payload map.
    pub fn payload(&self) -> HashMap<String, qdrant_client::qdrant::Value> {
        let posting = &self.record.posting;
        let mut payload: HashMap<String, qdrant_client::qdrant::Value> = HashMap::new();
        payload.insert("title".to_string(), posting.title.clone().into());
        payload.insert("company".to_string(), posting.company.clone().into());
        payload.insert("source_site".to_string(), posting.source_site.clone().into());
        payload.insert(
            "persona_source".to_string(),
            posting.persona_source.clone().into(),
        );
        payload.insert(
            "search_term_used".to_string(),
            posting.search_term_used.clone().into(),
        );
        if let Some(location) = &posting.location {
            payload.insert("location".to_string(), location.clone().into());
        }
        if let Some(description) = &posting.description {
            payload.insert("description".to_string(), description.clone().into());
        }
        if let Some(url) = &posting.url {
            payload.insert("url".to_string(), url.clone().into());
        }
        if let Some(posted_at) = posting.posted_at {
            payload.insert("posted_at".to_string(), posted_at.to_string().into());
        }
        payload
    }
}

/// One nearest-neighbour search hit, reconstructed from index payload.
#[derive(Debug, Clone)]
pub struct SearchHit {
    pub id: u64,
    /// Cosine similarity as reported by Qdrant (1.0 = identical direction).
    pub score: f32,
    pub record: CanonicalJobRecord,
}

impl SearchHit {
    pub fn from_scored_point(point: ScoredPoint) -> Option<Self> {
        let id = match point.id.and_then(|pid| pid.point_id_options) {
            Some(PointIdOptions::Num(n)) => n,
            _ => return None,
        };

        let payload = point.payload;
        let get_str = |key: &str| {
            payload
                .get(key)
                .and_then(|v| v.as_str())
                .map(|s| s.to_string())
        };

        let posting = RawPosting {
            title: get_str("title").unwrap_or_default(),
            company: get_str("company").unwrap_or_default(),
            location: get_str("location"),
            description: get_str("description"),
            url: get_str("url"),
            posted_at: get_str("posted_at").and_then(|s| s.parse::<NaiveDate>().ok()),
            source_site: get_str("source_site").unwrap_or_default(),
            persona_source: get_str("persona_source").unwrap_or_default(),
            search_term_used: get_str("search_term_used").unwrap_or_default(),
        };

        Some(SearchHit {
            id,
            score: point.score,
            record: CanonicalJobRecord { id, posting },
        })
    }
}
