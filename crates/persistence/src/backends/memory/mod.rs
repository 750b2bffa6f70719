//! In-process backend.
//!
//! Keeps records in a map behind a `parking_lot::RwLock`. The lock is never
//! held across an `.await`. Search results come back in insertion order.

mod matcher;

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::core::{UserInfoSearch, UserInfoStorage};
use crate::error::{StorageError, StorageResult};
use crate::types::{KeyValueQuery, RawQuery, UserInfo};

use matcher::Clause;

/// Number of hits returned when a query does not ask for a size.
pub const DEFAULT_SEARCH_SIZE: u64 = 10;

/// Default cap on raw query `size`.
pub const DEFAULT_MAX_RESULT_WINDOW: u64 = 10000;

#[derive(Debug)]
struct StoredEntry {
    seq: u64,
    record: UserInfo,
}

#[derive(Debug, Default)]
struct MemoryState {
    next_seq: u64,
    records: HashMap<String, StoredEntry>,
}

/// In-memory user info backend.
#[derive(Debug)]
pub struct MemoryBackend {
    state: RwLock<MemoryState>,
    max_result_window: u64,
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryBackend {
    /// Creates an empty backend.
    pub fn new() -> Self {
        Self {
            state: RwLock::new(MemoryState::default()),
            max_result_window: DEFAULT_MAX_RESULT_WINDOW,
        }
    }

    /// Sets the cap applied to raw query `size`.
    pub fn with_max_result_window(mut self, max_result_window: u64) -> Self {
        self.max_result_window = max_result_window;
        self
    }

    /// Returns the number of stored records.
    pub fn len(&self) -> usize {
        self.state.read().records.len()
    }

    /// Returns `true` when nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn search(&self, clause: &Clause, from: u64, size: u64) -> Vec<UserInfo> {
        let state = self.state.read();

        let mut matched: Vec<&StoredEntry> = state
            .records
            .values()
            .filter(|entry| clause.matches(&entry.record))
            .collect();
        matched.sort_by_key(|entry| entry.seq);

        matched
            .into_iter()
            .skip(usize::try_from(from).unwrap_or(usize::MAX))
            .take(usize::try_from(size).unwrap_or(usize::MAX))
            .map(|entry| entry.record.clone())
            .collect()
    }
}

#[async_trait]
impl UserInfoStorage for MemoryBackend {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn insert(&self, record: &UserInfo) -> StorageResult<()> {
        let mut state = self.state.write();
        if state.records.contains_key(&record.id) {
            return Err(StorageError::Conflict {
                id: record.id.clone(),
            });
        }

        let seq = state.next_seq;
        state.next_seq += 1;
        state.records.insert(
            record.id.clone(),
            StoredEntry {
                seq,
                record: record.clone(),
            },
        );

        tracing::debug!(id = %record.id, "Inserted user info");
        Ok(())
    }

    async fn update(&self, record: &UserInfo) -> StorageResult<()> {
        let mut state = self.state.write();
        let entry = state
            .records
            .get_mut(&record.id)
            .ok_or_else(|| StorageError::NotFound {
                id: record.id.clone(),
            })?;

        // Merge semantics: an absent timestamp keeps the stored one
        let created_at = record.created_at.or(entry.record.created_at);
        entry.record = record.clone();
        entry.record.created_at = created_at;

        tracing::debug!(id = %record.id, "Updated user info");
        Ok(())
    }

    async fn delete(&self, id: &str) -> StorageResult<()> {
        self.state
            .write()
            .records
            .remove(id)
            .map(|_| tracing::debug!(id, "Deleted user info"))
            .ok_or_else(|| StorageError::NotFound { id: id.to_string() })
    }

    async fn find_one(&self, id: &str) -> StorageResult<UserInfo> {
        self.state
            .read()
            .records
            .get(id)
            .map(|entry| entry.record.clone())
            .ok_or_else(|| StorageError::NotFound { id: id.to_string() })
    }
}

#[async_trait]
impl UserInfoSearch for MemoryBackend {
    async fn find_by_key_and_value(&self, query: &KeyValueQuery) -> StorageResult<Vec<UserInfo>> {
        let clause = Clause::from_key_value(query)?;
        Ok(self.search(&clause, 0, DEFAULT_SEARCH_SIZE))
    }

    async fn find_by_query(&self, query: &RawQuery) -> StorageResult<Vec<UserInfo>> {
        let clause = Clause::from_raw(query)?;
        let size = query
            .size()
            .unwrap_or(DEFAULT_SEARCH_SIZE)
            .min(self.max_result_window);
        Ok(self.search(&clause, query.from().unwrap_or(0), size))
    }
}
