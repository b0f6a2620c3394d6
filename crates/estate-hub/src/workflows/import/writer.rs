use std::sync::Arc;

use tracing::{debug, warn};

use super::domain::{CanonicalProperty, ImportFailure, ImportResult};
use super::store::PropertyStore;

pub const DEFAULT_CHUNK_SIZE: usize = 100;
pub const MAX_CHUNK_SIZE: usize = 1000;

/// Writes records in fixed-size chunks, one chunk at a time. A failed chunk
/// is recorded and skipped; the remaining chunks are still attempted.
pub struct BatchWriter {
    store: Arc<dyn PropertyStore>,
    chunk_size: usize,
}

impl BatchWriter {
    /// `chunk_size` is clamped to `1..=MAX_CHUNK_SIZE`.
    pub fn new(store: Arc<dyn PropertyStore>, chunk_size: usize) -> Self {
        Self {
            store,
            chunk_size: chunk_size.clamp(1, MAX_CHUNK_SIZE),
        }
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub async fn write_all(&self, records: &[CanonicalProperty]) -> ImportResult {
        let mut result = ImportResult {
            total: records.len(),
            ..ImportResult::default()
        };

        for (chunk_index, chunk) in records.chunks(self.chunk_size).enumerate() {
            match self.store.insert_many(chunk).await {
                Ok(()) => {
                    result.success += chunk.len();
                    debug!(chunk = chunk_index, records = chunk.len(), "chunk written");
                }
                Err(err) => {
                    result.failed += chunk.len();
                    warn!(chunk = chunk_index, records = chunk.len(), error = %err, "chunk write failed");
                    result.errors.push(ImportFailure {
                        chunk: chunk_index,
                        records: chunk.len(),
                        message: err.to_string(),
                    });
                }
            }
        }

        result
    }
}
