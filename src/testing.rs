//! Recording collaborators for tests and demos.
//!
//! [`RecordingRuntime`] instantiates modules that log every lifecycle call
//! into a shared [`LifecycleLog`]. [`Harness`] wires a switcher to a static
//! registry, a recording runtime, an [`ActiveModules`] set and a
//! [`RecordingSink`], keeping a clone of each so tests can inspect them.

use crate::config::SwitchConfig;
use crate::core::Timestamp;
use crate::env::{
    ActiveModules, FixedGeometry, Geometry, ModuleDefinition, ModuleHandle, ModuleRuntime,
    RecordingSink, RunningModule, Signal, StaticRegistry, SwitchEnv,
};
use crate::switch::ModuleSwitcher;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// One lifecycle call made on a recording module.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LifecycleCall {
    Instantiated { module: String, deadline: Timestamp },
    ShownSoon { module: String, deadline: Timestamp },
    HiddenSoon { module: String, deadline: Timestamp },
    Disposed { module: String },
}

impl LifecycleCall {
    pub fn module(&self) -> &str {
        match self {
            Self::Instantiated { module, .. }
            | Self::ShownSoon { module, .. }
            | Self::HiddenSoon { module, .. }
            | Self::Disposed { module } => module,
        }
    }
}

/// Shared, ordered log of lifecycle calls.
#[derive(Clone, Debug, Default)]
pub struct LifecycleLog {
    calls: Rc<RefCell<Vec<LifecycleCall>>>,
}

impl LifecycleLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, call: LifecycleCall) {
        self.calls.borrow_mut().push(call);
    }

    pub fn calls(&self) -> Vec<LifecycleCall> {
        self.calls.borrow().clone()
    }

    pub fn clear(&self) {
        self.calls.borrow_mut().clear();
    }

    /// Calls concerning `module`, in order.
    pub fn calls_for(&self, module: &str) -> Vec<LifecycleCall> {
        self.calls
            .borrow()
            .iter()
            .filter(|c| c.module() == module)
            .cloned()
            .collect()
    }

    /// Names of every module instantiated, in order.
    pub fn instantiated(&self) -> Vec<String> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|c| match c {
                LifecycleCall::Instantiated { module, .. } => Some(module.clone()),
                _ => None,
            })
            .collect()
    }

    /// Deadlines `module` was told it will be hidden at.
    pub fn hidden_deadlines(&self, module: &str) -> Vec<Timestamp> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|c| match c {
                LifecycleCall::HiddenSoon {
                    module: m,
                    deadline,
                } if m == module => Some(*deadline),
                _ => None,
            })
            .collect()
    }

    pub fn dispose_count(&self, module: &str) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|c| matches!(c, LifecycleCall::Disposed { module: m } if m == module))
            .count()
    }
}

/// A module that only records what happens to it.
pub struct RecordingModule {
    name: String,
    log: LifecycleLog,
    shown: Option<Signal>,
}

impl RunningModule for RecordingModule {
    fn will_be_shown_soon(&self, deadline: Timestamp) -> Signal {
        self.log.push(LifecycleCall::ShownSoon {
            module: self.name.clone(),
            deadline,
        });
        self.shown.clone().unwrap_or_else(Signal::ready)
    }

    fn will_be_hidden_soon(&self, deadline: Timestamp) {
        self.log.push(LifecycleCall::HiddenSoon {
            module: self.name.clone(),
            deadline,
        });
    }

    fn dispose(&self) {
        self.log.push(LifecycleCall::Disposed {
            module: self.name.clone(),
        });
    }
}

/// Runtime producing [`RecordingModule`]s.
///
/// Instances are ready to show immediately unless a show signal was held for
/// their module name with [`hold_show`](Self::hold_show). Clones share the
/// log, held signals and instance list.
#[derive(Clone, Default)]
pub struct RecordingRuntime {
    log: LifecycleLog,
    held: Rc<RefCell<HashMap<String, Signal>>>,
    instances: Rc<RefCell<Vec<ModuleHandle>>>,
    geometries: Rc<RefCell<Vec<Geometry>>>,
}

impl RecordingRuntime {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn log(&self) -> LifecycleLog {
        self.log.clone()
    }

    /// Future instances of `module` become ready to show when `signal` fires.
    pub fn hold_show(&self, module: &str, signal: Signal) {
        self.held.borrow_mut().insert(module.to_string(), signal);
    }

    /// Fire the held show signal of `module`, if any.
    pub fn release_show(&self, module: &str) {
        if let Some(signal) = self.held.borrow().get(module) {
            signal.fire();
        }
    }

    pub fn instances(&self) -> Vec<ModuleHandle> {
        self.instances.borrow().clone()
    }

    /// Geometry passed to each instantiation, in order.
    pub fn geometries(&self) -> Vec<Geometry> {
        self.geometries.borrow().clone()
    }
}

impl ModuleRuntime for RecordingRuntime {
    fn instantiate(
        &mut self,
        definition: &ModuleDefinition,
        geometry: &Geometry,
        deadline: Timestamp,
    ) -> ModuleHandle {
        let name = definition.name().to_string();
        self.log.push(LifecycleCall::Instantiated {
            module: name.clone(),
            deadline,
        });
        self.geometries.borrow_mut().push(*geometry);

        let shown = self.held.borrow().get(&name).cloned();
        let handle = ModuleHandle::new(
            &name,
            RecordingModule {
                name: name.clone(),
                log: self.log.clone(),
                shown,
            },
        );
        self.instances.borrow_mut().push(handle.clone());
        handle
    }
}

/// A switcher wired to recording collaborators.
pub struct Harness {
    pub switcher: ModuleSwitcher,
    pub runtime: RecordingRuntime,
    pub active: ActiveModules,
    pub monitor: RecordingSink,
    pub log: LifecycleLog,
    pub start: Timestamp,
}

impl Harness {
    /// Fixed start time so runs are reproducible.
    pub fn start_time() -> Timestamp {
        Timestamp::default() + chrono::Duration::seconds(1_700_000_000)
    }

    /// Harness with default configuration and monitoring enabled.
    pub fn new(definitions: Vec<ModuleDefinition>) -> Self {
        Self::with_config(definitions, SwitchConfig::default().with_monitoring(true))
    }

    pub fn with_config(definitions: Vec<ModuleDefinition>, config: SwitchConfig) -> Self {
        let registry = definitions
            .into_iter()
            .fold(StaticRegistry::new(), StaticRegistry::with);
        let runtime = RecordingRuntime::new();
        let active = ActiveModules::new();
        let monitor = RecordingSink::new();
        let start = Self::start_time();

        let env = SwitchEnv::new(
            registry,
            runtime.clone(),
            active.clone(),
            FixedGeometry(Geometry::new(0, 0, 1920, 1080)),
        )
        .with_monitor(monitor.clone());

        Self {
            switcher: ModuleSwitcher::new(env, config, start),
            log: runtime.log(),
            runtime,
            active,
            monitor,
            start,
        }
    }
}
