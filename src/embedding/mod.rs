//! Embedding capability boundary.
//!
//! The pipeline only needs "text in, vector out". Provider specifics
//! (retries, HTTP) live behind [`Embedder`]; the pipeline pre-truncates
//! input defensively before calling through.

pub mod error;

pub use error::EmbedError;

use crate::constants::EMBED_MAX_CHARS;
use crate::gemini::GeminiClient;

/// Minimal async embedding interface used by the pipeline.
pub trait Embedder: Send + Sync {
    /// Embeds one text into a dense vector.
    fn embed(
        &self,
        text: &str,
    ) -> impl std::future::Future<Output = Result<Vec<f32>, EmbedError>> + Send;
}

impl Embedder for GeminiClient {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbedError> {
        let text = truncate_chars(text, EMBED_MAX_CHARS);
        self.embed_text(text).await.map_err(EmbedError::from)
    }
}

/// Truncates to at most `max_chars` characters (char-boundary safe).
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}

#[cfg(any(test, feature = "mock"))]
pub use mock::MockEmbedder;

#[cfg(any(test, feature = "mock"))]
mod mock {
    use super::{EmbedError, Embedder};
    use crate::hashing::hash_to_u64;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicBool, Ordering};

    /// Deterministic in-process embedder.
    ///
    /// Identical texts produce identical vectors, so similarity assertions
    /// behave like a real embedding service's would for exact duplicates.
    #[derive(Debug)]
    pub struct MockEmbedder {
        dim: usize,
        failing: AtomicBool,
        fail_needles: Mutex<Vec<String>>,
    }

    impl MockEmbedder {
        pub fn new(dim: usize) -> Self {
            Self {
                dim,
                failing: AtomicBool::new(false),
                fail_needles: Mutex::new(Vec::new()),
            }
        }

        /// Makes every subsequent call fail, for degradation tests.
        pub fn set_failing(&self, failing: bool) {
            self.failing.store(failing, Ordering::SeqCst);
        }

        /// Fails only calls whose text contains `needle`.
        pub fn fail_containing(&self, needle: impl Into<String>) {
            if let Ok(mut needles) = self.fail_needles.lock() {
                needles.push(needle.into());
            }
        }

        fn should_fail(&self, text: &str) -> bool {
            if self.failing.load(Ordering::SeqCst) {
                return true;
            }
            self.fail_needles
                .lock()
                .map(|needles| needles.iter().any(|n| text.contains(n.as_str())))
                .unwrap_or(false)
        }

        /// The vector this mock will produce for `text`.
        pub fn vector_for(&self, text: &str) -> Vec<f32> {
            // Simple xorshift stream seeded by the content hash.
            let mut state = hash_to_u64(text.as_bytes()) | 1;
            (0..self.dim)
                .map(|_| {
                    state ^= state << 13;
                    state ^= state >> 7;
                    state ^= state << 17;
                    (state as f32 / u64::MAX as f32) * 2.0 - 1.0
                })
                .collect()
        }
    }

    impl Embedder for MockEmbedder {
        async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbedError> {
            if self.should_fail(text) {
                return Err(EmbedError::Provider {
                    message: "mock embedder configured to fail".to_string(),
                });
            }
            Ok(self.vector_for(text))
        }
    }
}
