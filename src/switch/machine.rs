//! The switcher engine.

use super::completion::{completion, CompletionHandle};
use super::state::{
    Idle, PrepareProgress, PrepareStage, SwitchRequest, SwitchState, TimerPurpose,
};
use crate::builder::SwitcherBuilder;
use crate::config::SwitchConfig;
use crate::core::{saturating_add, Phase, PhaseHistory, PhaseTransition, Timestamp};
use crate::env::{ModuleHandle, Observation, SwitchEnv, SwitchEvent};
use crate::error::SwitchError;
use crate::timer::{FiredTimer, TimerQueue};

/// Coordinates module swaps on one wall.
///
/// The switcher is single-threaded and never blocks. Its owner drives it:
/// `request_switch` starts a swap, `run_pending` lets continuations whose
/// signals fired make progress, and `advance_to` moves the clock, firing due
/// timers in deadline order.
///
/// # Example
///
/// ```rust
/// use wallswitch::env::{ActiveModules, FixedGeometry, ModuleDefinition, StaticRegistry};
/// use wallswitch::testing::RecordingRuntime;
/// use wallswitch::{ModuleSwitcher, Phase};
/// use chrono::{Duration, Utc};
///
/// let start = Utc::now();
/// let active = ActiveModules::new();
/// let mut switcher = ModuleSwitcher::builder()
///     .registry(StaticRegistry::new().with(ModuleDefinition::new("clock")))
///     .runtime(RecordingRuntime::new())
///     .ticker(active.clone())
///     .geometry(FixedGeometry::default())
///     .start_at(start)
///     .build()
///     .unwrap();
///
/// let mut handle = switcher.request_switch("clock", start + Duration::seconds(1)).unwrap();
/// switcher.advance_to(start + Duration::seconds(6));
///
/// assert_eq!(switcher.phase(), Phase::Displaying);
/// assert!(handle.is_displayed());
/// assert_eq!(active.names(), vec!["clock".to_string()]);
/// ```
pub struct ModuleSwitcher {
    state: SwitchState,
    env: SwitchEnv,
    timers: TimerQueue<TimerPurpose>,
    config: SwitchConfig,
    history: PhaseHistory,
    empty: ModuleHandle,
    now: Timestamp,
}

impl ModuleSwitcher {
    /// Create a switcher in Idle, with an empty wall, at time `now`.
    pub fn new(env: SwitchEnv, config: SwitchConfig, now: Timestamp) -> Self {
        let empty = ModuleHandle::empty();
        Self {
            state: SwitchState::Idle(Idle::new(empty.clone())),
            env,
            timers: TimerQueue::new(),
            history: PhaseHistory::with_limit(config.history_limit),
            config,
            empty,
            now,
        }
    }

    pub fn builder() -> SwitcherBuilder {
        SwitcherBuilder::new()
    }

    /// Ask for `module_name` to be on screen from `deadline` on.
    ///
    /// Returns immediately. The handle resolves once the module reaches
    /// Displaying. If a later request wins first it never resolves.
    /// An unregistered name fails here, before any side effect.
    pub fn request_switch(
        &mut self,
        module_name: &str,
        deadline: Timestamp,
    ) -> Result<CompletionHandle, SwitchError> {
        let definition =
            self.env
                .registry
                .resolve(module_name)
                .ok_or_else(|| SwitchError::UnknownModule {
                    name: module_name.to_string(),
                })?;

        let (completion, handle) = completion();
        let superseded = self.state.live_request();
        let request = SwitchRequest {
            definition,
            deadline,
            completion,
        };
        self.transition(move |current, env| current.on_switch(request, env));

        if let Some(request) = superseded {
            self.emit(SwitchEvent::RequestSuperseded { request });
        }
        Ok(handle)
    }

    /// Run every continuation whose signal has fired, without moving time.
    ///
    /// Returns how many continuations ran.
    pub fn run_pending(&mut self) -> usize {
        let mut steps = 0;
        while self.poll_signals() {
            steps += 1;
        }
        steps
    }

    /// Move the clock to `now`, firing due timers in deadline order.
    ///
    /// Continuations run before the first timer and after each one. The
    /// clock never moves backwards.
    pub fn advance_to(&mut self, now: Timestamp) {
        self.run_pending();
        while let Some(fired) = self.timers.pop_due(now) {
            self.now = self.now.max(fired.at);
            self.fire(fired);
            self.run_pending();
        }
        self.now = self.now.max(now);
    }

    pub fn advance_by(&mut self, delta: chrono::Duration) {
        self.advance_to(saturating_add(self.now, delta));
    }

    pub fn phase(&self) -> Phase {
        self.state.phase()
    }

    /// The module on screen; the empty placeholder before the first switch.
    pub fn on_screen(&self) -> &ModuleHandle {
        self.state.on_screen()
    }

    /// The instance being brought in by the live request, once it exists.
    pub fn in_flight(&self) -> Option<&ModuleHandle> {
        self.state.in_flight()
    }

    /// Deadline of the live request, if one is in flight.
    pub fn deadline(&self) -> Option<Timestamp> {
        self.state.deadline()
    }

    pub fn now(&self) -> Timestamp {
        self.now
    }

    /// Earliest outstanding timer, for an outer loop to sleep until.
    pub fn next_deadline(&self) -> Option<Timestamp> {
        self.timers.next_deadline()
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    pub fn history(&self) -> &PhaseHistory {
        &self.history
    }

    pub fn config(&self) -> &SwitchConfig {
        &self.config
    }

    /// Leave the current state, build the next from it, enter the next.
    ///
    /// The outgoing state's exit hook always completes before the incoming
    /// state's entry.
    fn transition<F>(&mut self, next: F)
    where
        F: FnOnce(SwitchState, &mut SwitchEnv) -> SwitchState,
    {
        let from = self.state.phase();
        let vacant = SwitchState::Idle(Idle::new(self.empty.clone()));
        let mut outgoing = std::mem::replace(&mut self.state, vacant);
        outgoing.exit(&mut self.timers);
        let incoming = next(outgoing, &mut self.env);
        self.enter(from, incoming);
    }

    fn enter(&mut self, from: Phase, mut next: SwitchState) {
        let to = next.phase();
        let deadline = next.deadline();
        let module = next.target_name().map(str::to_string);
        tracing::debug!(%from, %to, ?deadline, module = module.as_deref(), "phase transition");

        self.history.record(PhaseTransition {
            from,
            to,
            timestamp: self.now,
            deadline,
            module,
        });
        self.observe(to, deadline, None);

        match &mut next {
            SwitchState::Idle(_) => {}
            SwitchState::Preparing(prep) => {
                prep.timer = Some(
                    self.timers
                        .arm(prep.deadline, TimerPurpose::PreparationTimeout),
                );
            }
            SwitchState::Transitioning(trans) => {
                trans.timer = Some(self.timers.arm(trans.deadline, TimerPurpose::Reveal));
            }
            SwitchState::Displaying(display) => {
                if let Some(completion) = display.completion.take() {
                    completion.resolve();
                }
            }
        }
        self.state = next;
    }

    fn poll_signals(&mut self) -> bool {
        let progress = match &self.state {
            SwitchState::Preparing(prep) => prep.progress(),
            _ => None,
        };
        match progress {
            Some(PrepareProgress::Loaded) => {
                self.instantiate_target();
                true
            }
            Some(PrepareProgress::ReadyToShow) => {
                let window = self.config.transition_window();
                self.transition(move |current, _| current.begin_transition(window));
                true
            }
            None => false,
        }
    }

    /// The definition loaded: create the instance and tell both modules
    /// about the deadline, old one first.
    fn instantiate_target(&mut self) {
        let SwitchState::Preparing(prep) = &mut self.state else {
            return;
        };
        let geometry = self.env.geometry.current_geometry();
        let module = self
            .env
            .runtime
            .instantiate(&prep.definition, &geometry, prep.deadline);

        if !prep.old_notified {
            prep.old_module.will_be_hidden_soon(prep.deadline);
            prep.old_notified = true;
        }
        let shown = module.will_be_shown_soon(prep.deadline);
        let name = module.name().to_string();
        prep.stage = PrepareStage::AwaitingShow { module, shown };

        self.emit(SwitchEvent::ModuleInstantiated { module: name });
    }

    fn fire(&mut self, fired: FiredTimer<TimerPurpose>) {
        if self.state.timer() != Some(fired.id) {
            tracing::warn!(
                timer = %fired.id,
                purpose = ?fired.payload,
                phase = %self.state.phase(),
                "timer fired outside its state"
            );
            return;
        }
        match fired.payload {
            TimerPurpose::PreparationTimeout => self.on_preparation_timeout(),
            TimerPurpose::Reveal => self.on_reveal(),
            TimerPurpose::Retire => self.on_retire(),
        }
    }

    fn on_preparation_timeout(&mut self) {
        let SwitchState::Preparing(prep) = &mut self.state else {
            return;
        };
        prep.timer = None;
        let module = prep.definition.name().to_string();
        tracing::error!(
            module = %module,
            deadline = %prep.deadline,
            instantiated = prep.new_module().is_some(),
            "preparation timed out, forcing transition"
        );
        if !prep.old_notified {
            prep.old_module.will_be_hidden_soon(prep.deadline);
            prep.old_notified = true;
        }
        self.emit(SwitchEvent::PreparationTimeout { module });

        let window = self.config.transition_window();
        self.transition(move |current, _| current.begin_transition(window));
    }

    fn on_reveal(&mut self) {
        let SwitchState::Transitioning(trans) = &mut self.state else {
            return;
        };
        self.env.ticker.add(&trans.new_module);
        trans.timer = Some(self.timers.arm(trans.end_deadline, TimerPurpose::Retire));
        let module = trans.new_module.name().to_string();
        self.emit(SwitchEvent::ModuleRevealed { module });
    }

    fn on_retire(&mut self) {
        let SwitchState::Transitioning(trans) = &mut self.state else {
            return;
        };
        trans.timer = None;
        self.env.ticker.remove(&trans.old_module);
        let module = trans.old_module.name().to_string();
        self.emit(SwitchEvent::ModuleRetired { module });

        self.transition(|current, _| current.settle());
    }

    fn emit(&mut self, event: SwitchEvent) {
        self.observe(self.state.phase(), self.state.deadline(), Some(event));
    }

    fn observe(&mut self, state: Phase, deadline: Option<Timestamp>, event: Option<SwitchEvent>) {
        if !self.config.monitoring {
            return;
        }
        if let Some(sink) = self.env.monitor.as_mut() {
            sink.observe(Observation {
                time: self.now,
                state,
                deadline,
                event,
            });
        }
    }
}
