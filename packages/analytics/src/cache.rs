//! Explicit query-result cache.
//!
//! Caching is a visible object the caller owns, not hidden memoization:
//! results are keyed by `(dataset, query name)` and the whole cache is
//! invalidated after any dataset load.

use std::collections::HashMap;

use duckdb::Connection;
use stop_ledger_analytics_models::QueryName;
use stop_ledger_database_models::TabularResult;

use crate::AnalyticsError;

/// Cache of catalog query results keyed by dataset identity and query name.
#[derive(Debug, Default)]
pub struct QueryCache {
    entries: HashMap<(String, QueryName), TabularResult>,
}

impl QueryCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached result for a key, if present.
    #[must_use]
    pub fn get(&self, dataset: &str, name: QueryName) -> Option<&TabularResult> {
        self.entries.get(&(dataset.to_string(), name))
    }

    /// Runs a catalog query through the cache, executing it only on a miss.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyticsError`] if the underlying query fails; failures
    /// are never cached.
    pub fn run_cached(
        &mut self,
        conn: &Connection,
        dataset: &str,
        name: QueryName,
    ) -> Result<TabularResult, AnalyticsError> {
        let key = (dataset.to_string(), name);
        if let Some(result) = self.entries.get(&key) {
            log::debug!("Query cache hit for '{name}' on dataset '{dataset}'");
            return Ok(result.clone());
        }

        let result = crate::run(conn, dataset, name)?;
        self.entries.insert(key, result.clone());
        Ok(result)
    }

    /// Drops every cached result. Called after any dataset load.
    pub fn invalidate_all(&mut self) {
        self.entries.clear();
    }

    /// Returns the number of cached results.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when nothing is cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
