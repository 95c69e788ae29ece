//! Core value types shared by the switcher.
//!
//! This module contains the plain data describing where a switcher is:
//! - Phase tags for the four lifecycle states
//! - Bounded history of phase transitions
//! - Request identities
//!
//! Nothing here touches collaborators or timers.

mod history;
mod phase;
mod request;

use chrono::{DateTime, Utc};

pub use history::{PhaseHistory, PhaseTransition};
pub use phase::Phase;
pub use request::RequestId;

/// Absolute point in time used for deadlines and the switcher clock.
pub type Timestamp = DateTime<Utc>;

/// `at + delta`, clamped to the representable range instead of panicking.
pub fn saturating_add(at: Timestamp, delta: chrono::Duration) -> Timestamp {
    at.checked_add_signed(delta).unwrap_or(if delta < chrono::Duration::zero() {
        Timestamp::MIN_UTC
    } else {
        Timestamp::MAX_UTC
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn saturating_add_clamps_both_ends() {
        assert_eq!(
            saturating_add(Timestamp::MAX_UTC, Duration::seconds(5)),
            Timestamp::MAX_UTC
        );
        assert_eq!(
            saturating_add(Timestamp::MIN_UTC, Duration::seconds(-5)),
            Timestamp::MIN_UTC
        );

        let at = Timestamp::default();
        assert_eq!(saturating_add(at, Duration::seconds(5)), at + Duration::seconds(5));
    }
}
