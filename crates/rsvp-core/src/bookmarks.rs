//! Read positions and the contract of the store that keeps them.
//!
//! Positions are percentages rather than word indices so that a document whose
//! word count drifts between extractions still reopens near the same place.

use crate::error::ReaderError;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::time::{SystemTime, UNIX_EPOCH};

/// Persisted progress marker for one document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadPosition {
    pub document_id: String,
    pub percentage: f64,
    pub updated_at_ms: u64,
}

impl ReadPosition {
    pub fn new(document_id: impl Into<String>, index: usize, word_count: usize) -> Self {
        Self {
            document_id: document_id.into(),
            percentage: percentage_for_index(index, word_count),
            updated_at_ms: now_unix_ms(),
        }
    }

    /// Index this position points at in a sequence of `word_count` words.
    pub fn index_for(&self, word_count: usize) -> usize {
        index_for_percentage(self.percentage, word_count)
    }
}

pub fn percentage_for_index(index: usize, word_count: usize) -> f64 {
    if word_count == 0 {
        return 0.0;
    }
    let pct = index as f64 / word_count as f64 * 100.0;
    pct.clamp(0.0, 100.0)
}

/// Rebuild an index from a stored percentage. The percentage is clamped first
/// so a shrunken document can never produce an out-of-range index.
pub fn index_for_percentage(percentage: f64, word_count: usize) -> usize {
    if word_count == 0 {
        return 0;
    }
    let pct = if percentage.is_finite() {
        percentage.clamp(0.0, 100.0)
    } else {
        0.0
    };
    // Nudge past representation error so a saved index round-trips exactly.
    let index = (pct / 100.0 * word_count as f64 + 1e-9).floor() as usize;
    index.min(word_count - 1)
}

pub fn now_unix_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as u64)
        .unwrap_or(0)
}

/// Durable mapping from document id to its last read position.
///
/// Saves are upserts and last-write-wins: implementations drop a save whose
/// `updated_at_ms` is older than what they already hold.
pub trait PositionStore {
    fn get_position(&self, document_id: &str) -> Result<Option<ReadPosition>, ReaderError>;
    fn save_position(&self, position: &ReadPosition) -> Result<(), ReaderError>;
}

impl<S: PositionStore + ?Sized> PositionStore for &S {
    fn get_position(&self, document_id: &str) -> Result<Option<ReadPosition>, ReaderError> {
        (**self).get_position(document_id)
    }

    fn save_position(&self, position: &ReadPosition) -> Result<(), ReaderError> {
        (**self).save_position(position)
    }
}

impl<S: PositionStore + ?Sized> PositionStore for std::sync::Arc<S> {
    fn get_position(&self, document_id: &str) -> Result<Option<ReadPosition>, ReaderError> {
        (**self).get_position(document_id)
    }

    fn save_position(&self, position: &ReadPosition) -> Result<(), ReaderError> {
        (**self).save_position(position)
    }
}

/// Returns true when `incoming` should replace `stored`.
pub fn supersedes(incoming: &ReadPosition, stored: Option<&ReadPosition>) -> bool {
    stored.is_none_or(|stored| incoming.updated_at_ms >= stored.updated_at_ms)
}

/// Serialises writes per document: at most one in flight, and while one is in
/// flight only the newest follow-up is kept.
#[derive(Debug, Default)]
pub struct PositionWriter {
    in_flight: HashSet<String>,
    parked: HashMap<String, ReadPosition>,
}

impl PositionWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the position to write right now, or `None` if it was parked
    /// behind an in-flight write for the same document.
    pub fn submit(&mut self, position: ReadPosition) -> Option<ReadPosition> {
        if self.in_flight.contains(&position.document_id) {
            if let Some(replaced) = self.parked.insert(position.document_id.clone(), position) {
                tracing::trace!(
                    document_id = %replaced.document_id,
                    "Coalesced parked position write"
                );
            }
            return None;
        }
        self.in_flight.insert(position.document_id.clone());
        Some(position)
    }

    /// Mark the in-flight write for `document_id` as finished and hand back
    /// the parked follow-up, which becomes the new in-flight write.
    pub fn complete(&mut self, document_id: &str) -> Option<ReadPosition> {
        match self.parked.remove(document_id) {
            Some(next) => Some(next),
            None => {
                self.in_flight.remove(document_id);
                None
            }
        }
    }

    pub fn is_in_flight(&self, document_id: &str) -> bool {
        self.in_flight.contains(document_id)
    }

    /// True when no write is in flight for any document.
    pub fn is_idle(&self) -> bool {
        self.in_flight.is_empty()
    }

    pub fn pending_count(&self) -> usize {
        self.parked.len()
    }
}
