//! Search limits, cancellation, statistics and outcomes

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::common::{Path, SearchFailure};

/// Cloneable flag for stopping a running search from another thread
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Per-call bounds layered on top of the planner configuration
#[derive(Debug, Clone, Default)]
pub struct SearchLimits {
    /// Overrides the configured iteration budget
    pub max_iterations: Option<usize>,
    /// Wall-clock budget measured from the start of the search
    pub time_budget: Option<Duration>,
    pub cancellation: Option<CancellationToken>,
}

impl SearchLimits {
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = Some(max_iterations);
        self
    }

    pub fn with_time_budget(mut self, budget: Duration) -> Self {
        self.time_budget = Some(budget);
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    pub(super) fn deadline(&self, started: Instant) -> Option<Instant> {
        self.time_budget.map(|budget| started + budget)
    }

    pub(super) fn is_cancelled(&self) -> bool {
        self.cancellation
            .as_ref()
            .map_or(false, CancellationToken::is_cancelled)
    }
}

/// Counters collected during one search
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Main-loop iterations (open-set pops)
    pub iterations: usize,
    /// Nodes whose successors were generated
    pub nodes_expanded: usize,
    /// Successors pushed to the open set
    pub nodes_generated: usize,
    /// Pops discarded because their cell was already closed
    pub duplicates_skipped: usize,
    /// Successors that left the map
    pub rejected_out_of_bounds: usize,
    /// Successors whose footprint collided
    pub rejected_collision: usize,
}

/// Terminal state of a search
#[derive(Debug, Clone)]
pub enum SearchOutcome {
    Succeeded(Path),
    Failed(SearchFailure),
}

/// Outcome plus statistics of one search
#[derive(Debug, Clone)]
pub struct SearchReport {
    pub outcome: SearchOutcome,
    pub stats: SearchStats,
}

impl SearchReport {
    pub fn is_success(&self) -> bool {
        matches!(self.outcome, SearchOutcome::Succeeded(_))
    }

    pub fn path(&self) -> Option<&Path> {
        match &self.outcome {
            SearchOutcome::Succeeded(path) => Some(path),
            SearchOutcome::Failed(_) => None,
        }
    }

    pub fn failure(&self) -> Option<SearchFailure> {
        match self.outcome {
            SearchOutcome::Succeeded(_) => None,
            SearchOutcome::Failed(failure) => Some(failure),
        }
    }

    pub fn into_path(self) -> Option<Path> {
        match self.outcome {
            SearchOutcome::Succeeded(path) => Some(path),
            SearchOutcome::Failed(_) => None,
        }
    }
}
