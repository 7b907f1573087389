//! In-memory memoization of batch results.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use crate::config::DEFAULT_CACHE_CAPACITY;
use crate::{BatchQuery, BatchResult};

/// Defines how an orchestrator call uses previously computed batches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CacheMode {
    /// Return the stored batch for an identical query if there is one;
    /// otherwise fetch and store the result. (Default)
    #[default]
    Use,
    /// Always fetch, replacing any stored batch for the query.
    Refresh,
    /// Always fetch and neither read nor write the cache.
    Bypass,
}

impl CacheMode {
    pub const fn reads(self) -> bool {
        matches!(self, Self::Use)
    }

    pub const fn writes(self) -> bool {
        !matches!(self, Self::Bypass)
    }
}

/// Batches keyed by the full query (symbols, period, interval, start, end).
///
/// Holds at most `capacity` batches. Storing a new query when full evicts
/// the oldest stored one; replacing an existing query keeps its place.
/// There is no time-based expiry. Callers serialize access (the orchestrator
/// keeps it behind an async mutex).
#[derive(Debug)]
pub struct BatchCache {
    map: HashMap<BatchQuery, Arc<BatchResult>>,
    order: VecDeque<BatchQuery>,
    capacity: usize,
}

impl Default for BatchCache {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CACHE_CAPACITY)
    }
}

impl BatchCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty cache bounded to `capacity` batches; zero is raised to one.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            map: HashMap::new(),
            order: VecDeque::new(),
            capacity: capacity.max(1),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn get(&self, query: &BatchQuery) -> Option<Arc<BatchResult>> {
        self.map.get(query).cloned()
    }

    pub fn put(&mut self, query: BatchQuery, batch: Arc<BatchResult>) {
        if self.map.insert(query.clone(), batch).is_some() {
            return;
        }
        self.order.push_back(query);

        while self.map.len() > self.capacity {
            let Some(oldest) = self.order.pop_front() else {
                break;
            };
            self.map.remove(&oldest);
        }
    }

    pub fn remove(&mut self, query: &BatchQuery) -> Option<Arc<BatchResult>> {
        let removed = self.map.remove(query)?;
        self.order.retain(|stored| stored != query);
        Some(removed)
    }

    pub fn clear(&mut self) {
        self.map.clear();
        self.order.clear();
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}
