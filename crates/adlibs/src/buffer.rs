//! Bounded, lock-guarded record buffer.
//!
//! The buffer is the only state shared between the background data stream
//! and request handlers. Writers append under the lock; readers take a
//! cloned snapshot and never hold the lock while computing.

use std::collections::VecDeque;
use std::sync::{Arc, PoisonError, RwLock};

use tracing::trace;

use crate::campaign::CampaignRecord;

#[derive(Debug)]
struct Inner {
    records: VecDeque<CampaignRecord>,
    total_generated: u64,
}

/// A FIFO of campaign records holding at most `capacity` entries.
///
/// Cloning is cheap; clones share the same records.
#[derive(Debug, Clone)]
pub struct RecordBuffer {
    capacity: usize,
    inner: Arc<RwLock<Inner>>,
}

impl RecordBuffer {
    /// Create an empty buffer.
    ///
    /// A capacity of 0 is raised to 1.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            inner: Arc::new(RwLock::new(Inner {
                records: VecDeque::with_capacity(capacity),
                total_generated: 0,
            })),
        }
    }

    /// Append a record, evicting the oldest if the buffer is full.
    pub fn push(&self, record: CampaignRecord) {
        self.extend(std::iter::once(record));
    }

    /// Append records in order, evicting the oldest as needed.
    pub fn extend(&self, records: impl IntoIterator<Item = CampaignRecord>) {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        for record in records {
            if inner.records.len() == self.capacity {
                if let Some(evicted) = inner.records.pop_front() {
                    trace!("Evicted record {}", evicted.campaign_id);
                }
            }
            inner.records.push_back(record);
            inner.total_generated += 1;
        }
    }

    /// A copy of the current records, oldest first.
    #[must_use]
    pub fn snapshot(&self) -> Vec<CampaignRecord> {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        inner.records.iter().cloned().collect()
    }

    /// Number of records currently held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .records
            .len()
    }

    /// Check if the buffer holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Maximum number of records held.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Records ever appended, including evicted ones.
    #[must_use]
    pub fn total_generated(&self) -> u64 {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .total_generated
    }

    /// Remove all records.
    pub fn clear(&self) {
        self.inner
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .records
            .clear();
    }
}
