//! Request Deduplication
//!
//! Claude request logs can describe the same logical request on several
//! lines (streamed updates, retried writes, resumed sessions copying earlier
//! history). This module collapses those observations into one record per
//! `(session_id, request_id)` key.
//!
//! ## Merge Rule
//!
//! For every key the merged record keeps:
//! - the latest timestamp observed
//! - the maximum of each usage counter, taken independently per counter
//!
//! The merge is a join (commutative, associative, idempotent), so the result
//! never depends on file discovery order or line order within a file.
//!
//! ## Key Types
//!
//! - [`RequestKey`] - identity of a logical request
//! - [`RequestUsage`] - the four token counters of a request
//! - [`RequestObservation`] - one log line's view of a request
//! - [`DeduplicationEngine`] - accumulates observations into merged records

use chrono::{DateTime, Utc};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestKey {
    pub session_id: String,
    pub request_id: String,
}

impl RequestKey {
    pub fn new(session_id: impl Into<String>, request_id: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            request_id: request_id.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RequestUsage {
    pub input_tokens: u64,
    pub cache_creation_input_tokens: u64,
    pub cache_read_input_tokens: u64,
    pub output_tokens: u64,
}

impl RequestUsage {
    /// Sum of the four counters, saturating at `u64::MAX`
    pub fn total(&self) -> u64 {
        self.input_tokens
            .saturating_add(self.cache_creation_input_tokens)
            .saturating_add(self.cache_read_input_tokens)
            .saturating_add(self.output_tokens)
    }

    /// Field-wise maximum
    pub fn max(self, other: RequestUsage) -> RequestUsage {
        RequestUsage {
            input_tokens: self.input_tokens.max(other.input_tokens),
            cache_creation_input_tokens: self
                .cache_creation_input_tokens
                .max(other.cache_creation_input_tokens),
            cache_read_input_tokens: self
                .cache_read_input_tokens
                .max(other.cache_read_input_tokens),
            output_tokens: self.output_tokens.max(other.output_tokens),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergedRequest {
    pub timestamp: DateTime<Utc>,
    pub usage: RequestUsage,
}

impl MergedRequest {
    pub fn absorb(&mut self, other: &MergedRequest) {
        self.timestamp = self.timestamp.max(other.timestamp);
        self.usage = self.usage.max(other.usage);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestObservation {
    pub key: RequestKey,
    pub timestamp: DateTime<Utc>,
    pub usage: RequestUsage,
}

impl RequestObservation {
    fn as_merged(&self) -> MergedRequest {
        MergedRequest {
            timestamp: self.timestamp,
            usage: self.usage,
        }
    }
}

#[derive(Debug, Default)]
pub struct DeduplicationEngine {
    merged: HashMap<RequestKey, MergedRequest>,
    observations: usize,
}

impl DeduplicationEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn observe(&mut self, observation: RequestObservation) {
        self.observations += 1;
        let incoming = observation.as_merged();
        self.merged
            .entry(observation.key)
            .and_modify(|existing| existing.absorb(&incoming))
            .or_insert(incoming);
    }

    /// Number of distinct requests seen so far
    pub fn len(&self) -> usize {
        self.merged.len()
    }

    pub fn is_empty(&self) -> bool {
        self.merged.is_empty()
    }

    /// Observations that collapsed into an already-known key
    pub fn duplicates(&self) -> usize {
        self.observations - self.merged.len()
    }

    pub fn into_merged(self) -> HashMap<RequestKey, MergedRequest> {
        self.merged
    }
}

impl Extend<RequestObservation> for DeduplicationEngine {
    fn extend<I: IntoIterator<Item = RequestObservation>>(&mut self, iter: I) {
        for observation in iter {
            self.observe(observation);
        }
    }
}

/// Merge an unordered collection of observations by request key.
pub fn merge_observations<I>(observations: I) -> HashMap<RequestKey, MergedRequest>
where
    I: IntoIterator<Item = RequestObservation>,
{
    let mut engine = DeduplicationEngine::new();
    engine.extend(observations);
    engine.into_merged()
}
