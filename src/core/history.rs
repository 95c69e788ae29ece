//! Phase transition history tracking.
//!
//! Records the phases a switcher moved through, bounded so a wall that runs
//! for weeks does not grow without limit.

use super::phase::Phase;
use super::Timestamp;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::time::Duration;

/// Record of a single phase transition.
///
/// # Example
///
/// ```rust
/// use wallswitch::core::{Phase, PhaseTransition};
/// use chrono::Utc;
///
/// let transition = PhaseTransition {
///     from: Phase::Idle,
///     to: Phase::Preparing,
///     timestamp: Utc::now(),
///     deadline: None,
///     module: Some("clock".to_string()),
/// };
/// assert_eq!(transition.to, Phase::Preparing);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PhaseTransition {
    /// The phase being left
    pub from: Phase,
    /// The phase being entered
    pub to: Phase,
    /// Switcher clock when the transition happened
    pub timestamp: Timestamp,
    /// Deadline of the request carried into the new phase, if any
    pub deadline: Option<Timestamp>,
    /// Module the new phase is working towards (or showing)
    pub module: Option<String>,
}

/// Ordered, bounded history of phase transitions.
///
/// Once `limit` transitions are stored, recording a new one evicts the
/// oldest.
///
/// # Example
///
/// ```rust
/// use wallswitch::core::{Phase, PhaseHistory, PhaseTransition};
/// use chrono::Utc;
///
/// let mut history = PhaseHistory::with_limit(8);
/// history.record(PhaseTransition {
///     from: Phase::Idle,
///     to: Phase::Preparing,
///     timestamp: Utc::now(),
///     deadline: None,
///     module: None,
/// });
/// history.record(PhaseTransition {
///     from: Phase::Preparing,
///     to: Phase::Transitioning,
///     timestamp: Utc::now(),
///     deadline: None,
///     module: None,
/// });
///
/// assert_eq!(
///     history.get_path(),
///     vec![Phase::Idle, Phase::Preparing, Phase::Transitioning]
/// );
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PhaseHistory {
    transitions: VecDeque<PhaseTransition>,
    limit: usize,
}

impl Default for PhaseHistory {
    fn default() -> Self {
        Self::with_limit(Self::DEFAULT_LIMIT)
    }
}

impl PhaseHistory {
    /// Number of transitions kept when no limit is configured.
    pub const DEFAULT_LIMIT: usize = 64;

    /// Create an empty history keeping at most `limit` transitions.
    ///
    /// A limit of zero is treated as one.
    pub fn with_limit(limit: usize) -> Self {
        Self {
            transitions: VecDeque::new(),
            limit: limit.max(1),
        }
    }

    /// Record a transition, evicting the oldest one when full.
    pub fn record(&mut self, transition: PhaseTransition) {
        if self.transitions.len() == self.limit {
            self.transitions.pop_front();
        }
        self.transitions.push_back(transition);
    }

    /// Get the path of phases traversed.
    ///
    /// Starts with the `from` phase of the oldest retained transition,
    /// followed by the `to` phase of each transition.
    pub fn get_path(&self) -> Vec<Phase> {
        let mut path = Vec::with_capacity(self.transitions.len() + 1);
        if let Some(first) = self.transitions.front() {
            path.push(first.from);
        }
        path.extend(self.transitions.iter().map(|t| t.to));
        path
    }

    /// Duration from the first to the last retained transition.
    ///
    /// Returns `None` if there are no transitions.
    pub fn duration(&self) -> Option<Duration> {
        let (first, last) = (self.transitions.front()?, self.transitions.back()?);
        last.timestamp
            .signed_duration_since(first.timestamp)
            .to_std()
            .ok()
    }

    /// Most recent transition, if any.
    pub fn last(&self) -> Option<&PhaseTransition> {
        self.transitions.back()
    }

    /// Iterate retained transitions, oldest first.
    pub fn transitions(&self) -> impl Iterator<Item = &PhaseTransition> {
        self.transitions.iter()
    }

    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }
}
