//! One-shot readiness signals.

use std::cell::Cell;
use std::rc::Rc;

/// A one-shot readiness flag shared between a producer and the switcher.
///
/// Collaborators hand out a `Signal` (a module definition's load signal, the
/// result of `will_be_shown_soon`) and call [`Signal::fire`] when the thing
/// it stands for is ready. The switcher notices on its next `run_pending` or
/// `advance_to`. Clones observe the same flag.
///
/// # Example
///
/// ```rust
/// use wallswitch::env::Signal;
///
/// let signal = Signal::pending();
/// let observer = signal.clone();
/// assert!(!observer.is_fired());
///
/// signal.fire();
/// signal.fire();
/// assert!(observer.is_fired());
/// ```
#[derive(Clone, Debug, Default)]
pub struct Signal {
    fired: Rc<Cell<bool>>,
}

impl Signal {
    /// A signal that has not fired yet.
    pub fn pending() -> Self {
        Self::default()
    }

    /// A signal that already fired.
    pub fn ready() -> Self {
        let signal = Self::default();
        signal.fire();
        signal
    }

    /// Mark the signal as fired. Firing more than once has no further effect.
    pub fn fire(&self) {
        self.fired.set(true);
    }

    pub fn is_fired(&self) -> bool {
        self.fired.get()
    }
}
