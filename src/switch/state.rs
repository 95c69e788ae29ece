//! State variants of the module switch lifecycle.
//!
//! Each variant carries only its own fields. Reactions to a new switch
//! request live here; timer arming and signal polling live in the engine,
//! which owns the timer queue.

use super::completion::Completion;
use crate::core::{saturating_add, Phase, RequestId, Timestamp};
use crate::env::{ModuleDefinition, ModuleHandle, Signal, SwitchEnv};
use crate::timer::{TimerId, TimerQueue};

/// What an armed timer is for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum TimerPurpose {
    /// Preparing gave up waiting for the new module.
    PreparationTimeout,
    /// Transitioning adds the new module to the active set.
    Reveal,
    /// Transitioning removes the old module and settles.
    Retire,
}

/// A resolved request on its way to the screen.
pub(crate) struct SwitchRequest {
    pub definition: ModuleDefinition,
    pub deadline: Timestamp,
    pub completion: Completion,
}

pub(crate) enum SwitchState {
    Idle(Idle),
    Preparing(Preparing),
    Transitioning(Transitioning),
    Displaying(Displaying),
}

impl SwitchState {
    pub fn phase(&self) -> Phase {
        match self {
            Self::Idle(_) => Phase::Idle,
            Self::Preparing(_) => Phase::Preparing,
            Self::Transitioning(_) => Phase::Transitioning,
            Self::Displaying(_) => Phase::Displaying,
        }
    }

    pub fn deadline(&self) -> Option<Timestamp> {
        match self {
            Self::Preparing(p) => Some(p.deadline),
            Self::Transitioning(t) => Some(t.deadline),
            Self::Idle(_) | Self::Displaying(_) => None,
        }
    }

    /// The module actually on screen: the basis for the next swap.
    pub fn on_screen(&self) -> &ModuleHandle {
        match self {
            Self::Idle(i) => &i.empty,
            Self::Preparing(p) => &p.old_module,
            Self::Transitioning(t) => &t.old_module,
            Self::Displaying(d) => &d.module,
        }
    }

    /// Instance created for the live request but not yet settled.
    pub fn in_flight(&self) -> Option<&ModuleHandle> {
        match self {
            Self::Preparing(p) => p.new_module(),
            Self::Transitioning(t) => Some(&t.new_module),
            Self::Idle(_) | Self::Displaying(_) => None,
        }
    }

    /// Name of the module this phase is working towards or showing.
    pub fn target_name(&self) -> Option<&str> {
        match self {
            Self::Idle(_) => None,
            Self::Preparing(p) => Some(p.definition.name()),
            Self::Transitioning(t) => Some(t.new_module.name()),
            Self::Displaying(d) => Some(d.module.name()),
        }
    }

    /// The request still waiting for its completion, if any.
    pub fn live_request(&self) -> Option<RequestId> {
        match self {
            Self::Preparing(p) => Some(p.completion.request()),
            Self::Transitioning(t) => Some(t.completion.request()),
            Self::Idle(_) | Self::Displaying(_) => None,
        }
    }

    pub fn timer(&self) -> Option<TimerId> {
        match self {
            Self::Preparing(p) => p.timer,
            Self::Transitioning(t) => t.timer,
            Self::Idle(_) | Self::Displaying(_) => None,
        }
    }

    /// Exit hook: release whatever timer the state holds.
    pub fn exit(&mut self, timers: &mut TimerQueue<TimerPurpose>) {
        let timer = match self {
            Self::Preparing(p) => p.timer.take(),
            Self::Transitioning(t) => t.timer.take(),
            Self::Idle(_) | Self::Displaying(_) => None,
        };
        if let Some(id) = timer {
            timers.cancel(id);
        }
    }

    /// React to a new switch request. Every variant answers with a fresh
    /// Preparing state.
    pub fn on_switch(self, request: SwitchRequest, env: &mut SwitchEnv) -> SwitchState {
        let next = match self {
            Self::Idle(idle) => idle.on_switch(request),
            Self::Preparing(prep) => prep.on_switch(request),
            Self::Transitioning(trans) => trans.on_switch(request, env),
            Self::Displaying(display) => display.on_switch(request),
        };
        Self::Preparing(next)
    }

    /// Preparing is done (or gave up): move to Transitioning.
    pub fn begin_transition(self, window: chrono::Duration) -> SwitchState {
        match self {
            Self::Preparing(prep) => Self::Transitioning(prep.into_transitioning(window)),
            other => other,
        }
    }

    /// The old module is gone: move to Displaying.
    pub fn settle(self) -> SwitchState {
        match self {
            Self::Transitioning(trans) => Self::Displaying(trans.into_displaying()),
            other => other,
        }
    }
}

pub(crate) struct Idle {
    pub empty: ModuleHandle,
}

impl Idle {
    pub fn new(empty: ModuleHandle) -> Self {
        Self { empty }
    }

    fn on_switch(self, request: SwitchRequest) -> Preparing {
        Preparing::new(self.empty, request)
    }
}

pub(crate) enum PrepareStage {
    /// Waiting on the definition's load signal.
    AwaitingLoad,
    /// Instantiated; waiting on the instance's show-readiness signal.
    AwaitingShow { module: ModuleHandle, shown: Signal },
}

/// What a Preparing state can do next, given the signals it waits on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum PrepareProgress {
    Loaded,
    ReadyToShow,
}

pub(crate) struct Preparing {
    pub old_module: ModuleHandle,
    pub definition: ModuleDefinition,
    pub deadline: Timestamp,
    pub completion: Completion,
    pub stage: PrepareStage,
    /// `old_module` has been told about the deadline.
    pub old_notified: bool,
    pub timer: Option<TimerId>,
}

impl Preparing {
    pub fn new(old_module: ModuleHandle, request: SwitchRequest) -> Self {
        Self {
            old_module,
            definition: request.definition,
            deadline: request.deadline,
            completion: request.completion,
            stage: PrepareStage::AwaitingLoad,
            old_notified: false,
            timer: None,
        }
    }

    pub fn new_module(&self) -> Option<&ModuleHandle> {
        match &self.stage {
            PrepareStage::AwaitingLoad => None,
            PrepareStage::AwaitingShow { module, .. } => Some(module),
        }
    }

    pub fn progress(&self) -> Option<PrepareProgress> {
        match &self.stage {
            PrepareStage::AwaitingLoad if self.definition.is_loaded() => {
                Some(PrepareProgress::Loaded)
            }
            PrepareStage::AwaitingShow { shown, .. } if shown.is_fired() => {
                Some(PrepareProgress::ReadyToShow)
            }
            _ => None,
        }
    }

    fn on_switch(self, request: SwitchRequest) -> Preparing {
        if let PrepareStage::AwaitingShow { module, .. } = &self.stage {
            module.will_be_hidden_soon(request.deadline);
            module.dispose();
            tracing::trace!(module = module.name(), id = %module.id(), "disposed abandoned module");
        }
        self.completion.discard();
        Preparing::new(self.old_module, request)
    }

    fn into_transitioning(self, window: chrono::Duration) -> Transitioning {
        let new_module = match self.stage {
            PrepareStage::AwaitingShow { module, .. } => module,
            // Timed out before the definition loaded: nothing to show yet.
            PrepareStage::AwaitingLoad => ModuleHandle::empty(),
        };
        Transitioning::new(
            self.old_module,
            new_module,
            self.deadline,
            saturating_add(self.deadline, window),
            self.completion,
        )
    }
}

pub(crate) struct Transitioning {
    pub old_module: ModuleHandle,
    pub new_module: ModuleHandle,
    pub deadline: Timestamp,
    pub end_deadline: Timestamp,
    pub completion: Completion,
    pub timer: Option<TimerId>,
}

impl Transitioning {
    pub fn new(
        old_module: ModuleHandle,
        new_module: ModuleHandle,
        deadline: Timestamp,
        end_deadline: Timestamp,
        completion: Completion,
    ) -> Self {
        Self {
            old_module,
            new_module,
            deadline,
            end_deadline,
            completion,
            timer: None,
        }
    }

    fn on_switch(self, request: SwitchRequest, env: &mut SwitchEnv) -> Preparing {
        self.new_module.will_be_hidden_soon(request.deadline);
        // Removal is idempotent, so it runs whether or not the reveal fired.
        env.ticker.remove(&self.new_module);
        // The old module stays the basis: it is what is really on screen.
        // It is not told about the new deadline here.
        self.completion.discard();
        Preparing::new(self.old_module, request)
    }

    fn into_displaying(self) -> Displaying {
        Displaying {
            module: self.new_module,
            completion: Some(self.completion),
        }
    }
}

pub(crate) struct Displaying {
    pub module: ModuleHandle,
    /// Resolved on entry, then empty.
    pub completion: Option<Completion>,
}

impl Displaying {
    fn on_switch(self, request: SwitchRequest) -> Preparing {
        Preparing::new(self.module, request)
    }
}
