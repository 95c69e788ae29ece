//! The active ticking set.

use super::module::{ModuleHandle, ModuleId};
use std::cell::RefCell;
use std::rc::Rc;

/// Set of modules the rendering loop ticks.
///
/// Both operations must tolerate redundant calls: adding a module already
/// present and removing one that was never added are no-ops.
pub trait Ticker {
    fn add(&mut self, module: &ModuleHandle);
    fn remove(&mut self, module: &ModuleHandle);
}

/// Shared, insertion-ordered active set.
///
/// Clones view the same set, so a rendering loop can hold one clone while
/// the switcher mutates another.
///
/// # Example
///
/// ```rust
/// use wallswitch::env::{ActiveModules, EmptyModule, ModuleHandle, Ticker};
///
/// let active = ActiveModules::new();
/// let mut ticker = active.clone();
/// let clock = ModuleHandle::new("clock", EmptyModule);
///
/// ticker.add(&clock);
/// ticker.add(&clock);
/// assert_eq!(active.names(), vec!["clock".to_string()]);
///
/// ticker.remove(&clock);
/// ticker.remove(&clock);
/// assert!(active.is_empty());
/// ```
#[derive(Clone, Debug, Default)]
pub struct ActiveModules {
    modules: Rc<RefCell<Vec<ModuleHandle>>>,
}

impl ActiveModules {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn names(&self) -> Vec<String> {
        self.modules
            .borrow()
            .iter()
            .map(|m| m.name().to_string())
            .collect()
    }

    pub fn contains(&self, id: ModuleId) -> bool {
        self.modules.borrow().iter().any(|m| m.id() == id)
    }

    pub fn len(&self) -> usize {
        self.modules.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.borrow().is_empty()
    }
}

impl Ticker for ActiveModules {
    fn add(&mut self, module: &ModuleHandle) {
        let mut modules = self.modules.borrow_mut();
        if !modules.contains(module) {
            modules.push(module.clone());
        }
    }

    fn remove(&mut self, module: &ModuleHandle) {
        self.modules.borrow_mut().retain(|m| m != module);
    }
}
