//! Producer rotation tracking.
//!
//! The node reports which producer signed the current head block; this
//! module turns that per-poll observation into an edge-triggered round
//! count. A round is counted when the head producer changes, keyed by
//! the producer whose round begins.

use std::collections::HashMap;

/// Outcome of feeding one head-producer observation to the tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rotation {
    /// First observation ever; establishes the baseline without counting.
    Baseline,
    /// Same producer as the previous poll.
    Unchanged,
    /// The producer changed; `rounds` is the new producer's updated total.
    NewRound { rounds: u64 },
}

/// Tracks the active head producer across polls and counts round starts.
///
/// Single-writer by construction: only the poll loop feeds it. Counts
/// are monotone per producer and survive only as long as the process.
#[derive(Debug, Default)]
pub struct RotationTracker {
    current: Option<String>,
    rounds: HashMap<String, u64>,
}

impl RotationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the head producer seen by the latest poll.
    ///
    /// Consecutive identical observations are one round no matter how
    /// many polls they span; a producer that lost the head and regains
    /// it later starts a fresh round.
    pub fn observe(&mut self, producer: &str) -> Rotation {
        match self.current.as_deref() {
            None => {
                self.current = Some(producer.to_string());
                Rotation::Baseline
            }
            Some(current) if current == producer => Rotation::Unchanged,
            Some(_) => {
                let entry = self.rounds.entry(producer.to_string()).or_insert(0);
                *entry += 1;
                let rounds = *entry;
                self.current = Some(producer.to_string());
                Rotation::NewRound { rounds }
            }
        }
    }

    /// Producer seen by the most recent successful poll, if any.
    pub fn current_producer(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// Rounds counted so far for every producer that started one.
    pub fn round_counts(&self) -> &HashMap<String, u64> {
        &self.rounds
    }
}
