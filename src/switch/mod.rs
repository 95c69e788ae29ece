//! The module switch state machine.
//!
//! # Key Concepts
//!
//! - **States**: Idle, Preparing, Transitioning and Displaying, a closed sum
//!   type dispatched exhaustively
//! - **Engine**: [`ModuleSwitcher`] holds the current state, runs exit/enter
//!   hooks on every transition and owns the timer queue
//! - **Completion**: each request gets a [`CompletionHandle`] that resolves
//!   once, when its module reaches the screen
//!
//! # Preemption
//!
//! The latest request always wins. A request arriving while an earlier one
//! is Preparing or Transitioning abandons the earlier one: its timers are
//! canceled, its instance (if any) is told it will be hidden, and its
//! completion is discarded. The caller's handle never completes.

mod completion;
mod machine;
mod state;

pub use completion::{CompletionHandle, CompletionStatus};
pub use machine::ModuleSwitcher;
