//! Module definitions, running instances and the collaborators that produce
//! them.

use super::geometry::Geometry;
use super::signal::Signal;
use crate::core::Timestamp;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Registry-resolved descriptor for a loadable module.
///
/// The load signal fires once the module's code and assets are safe to
/// instantiate. Clones share the signal.
#[derive(Clone, Debug)]
pub struct ModuleDefinition {
    name: String,
    loaded: Signal,
}

impl ModuleDefinition {
    /// A definition that is already loaded.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_load_signal(name, Signal::ready())
    }

    /// A definition that becomes loadable when `loaded` fires.
    pub fn with_load_signal(name: impl Into<String>, loaded: Signal) -> Self {
        Self {
            name: name.into(),
            loaded,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn load_signal(&self) -> &Signal {
        &self.loaded
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded.is_fired()
    }
}

/// Lifecycle hooks of a live module instance.
///
/// Methods take `&self`: instances are shared between the switcher and the
/// ticker on a single thread, so implementors use interior mutability.
pub trait RunningModule {
    /// The module will become visible at `deadline`. The returned signal
    /// fires once the module is ready to be shown.
    fn will_be_shown_soon(&self, deadline: Timestamp) -> Signal;

    /// The module will stop being visible at `deadline`.
    fn will_be_hidden_soon(&self, deadline: Timestamp);

    /// Release everything the instance holds.
    fn dispose(&self);
}

/// Stand-in for "nothing on screen".
#[derive(Clone, Copy, Debug, Default)]
pub struct EmptyModule;

impl RunningModule for EmptyModule {
    fn will_be_shown_soon(&self, _deadline: Timestamp) -> Signal {
        Signal::ready()
    }

    fn will_be_hidden_soon(&self, _deadline: Timestamp) {}

    fn dispose(&self) {}
}

static NEXT_MODULE_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of a module instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ModuleId(u64);

impl ModuleId {
    fn next() -> Self {
        Self(NEXT_MODULE_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "module#{}", self.0)
    }
}

/// Shared reference to a running module instance.
///
/// Cloning is cheap and keeps the same identity; equality compares
/// identities, not names.
#[derive(Clone)]
pub struct ModuleHandle {
    id: ModuleId,
    name: Rc<str>,
    placeholder: bool,
    module: Rc<dyn RunningModule>,
}

impl ModuleHandle {
    pub fn new(name: impl AsRef<str>, module: impl RunningModule + 'static) -> Self {
        Self::from_rc(name, Rc::new(module))
    }

    pub fn from_rc(name: impl AsRef<str>, module: Rc<dyn RunningModule>) -> Self {
        Self {
            id: ModuleId::next(),
            name: Rc::from(name.as_ref()),
            placeholder: false,
            module,
        }
    }

    /// A fresh placeholder standing for an empty wall.
    pub fn empty() -> Self {
        Self {
            id: ModuleId::next(),
            name: Rc::from(EMPTY_MODULE_NAME),
            placeholder: true,
            module: Rc::new(EmptyModule),
        }
    }

    pub fn id(&self) -> ModuleId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_empty(&self) -> bool {
        self.placeholder
    }

    pub fn will_be_shown_soon(&self, deadline: Timestamp) -> Signal {
        self.module.will_be_shown_soon(deadline)
    }

    pub fn will_be_hidden_soon(&self, deadline: Timestamp) {
        self.module.will_be_hidden_soon(deadline)
    }

    pub fn dispose(&self) {
        self.module.dispose()
    }
}

/// Name reported by the empty placeholder module.
pub const EMPTY_MODULE_NAME: &str = "<empty>";

impl PartialEq for ModuleHandle {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ModuleHandle {}

impl fmt::Debug for ModuleHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModuleHandle")
            .field("id", &self.id)
            .field("name", &self.name)
            .finish()
    }
}

/// Resolves module names to loadable definitions.
pub trait ModuleRegistry {
    fn resolve(&self, name: &str) -> Option<ModuleDefinition>;
}

/// Registry backed by a fixed map of definitions.
///
/// # Example
///
/// ```rust
/// use wallswitch::env::{ModuleDefinition, ModuleRegistry, StaticRegistry};
///
/// let registry = StaticRegistry::new()
///     .with(ModuleDefinition::new("clock"))
///     .with(ModuleDefinition::new("weather"));
///
/// assert!(registry.resolve("clock").is_some());
/// assert!(registry.resolve("news").is_none());
/// ```
#[derive(Clone, Debug, Default)]
pub struct StaticRegistry {
    definitions: HashMap<String, ModuleDefinition>,
}

impl StaticRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a definition, replacing any previous one with the same name.
    pub fn register(&mut self, definition: ModuleDefinition) {
        self.definitions
            .insert(definition.name().to_string(), definition);
    }

    pub fn with(mut self, definition: ModuleDefinition) -> Self {
        self.register(definition);
        self
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

impl ModuleRegistry for StaticRegistry {
    fn resolve(&self, name: &str) -> Option<ModuleDefinition> {
        self.definitions.get(name).cloned()
    }
}

/// Instantiates module definitions into running instances.
pub trait ModuleRuntime {
    fn instantiate(
        &mut self,
        definition: &ModuleDefinition,
        geometry: &Geometry,
        deadline: Timestamp,
    ) -> ModuleHandle;
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn handles_compare_by_identity() {
        let a = ModuleHandle::new("clock", EmptyModule);
        let b = ModuleHandle::new("clock", EmptyModule);

        assert_eq!(a, a.clone());
        assert_ne!(a, b);
        assert_eq!(a.name(), b.name());
    }

    #[test]
    fn empty_handle_is_flagged_and_ready() {
        let empty = ModuleHandle::empty();
        assert!(empty.is_empty());
        assert_eq!(empty.name(), EMPTY_MODULE_NAME);
        assert!(empty.will_be_shown_soon(Utc::now()).is_fired());
        assert!(!ModuleHandle::new("clock", EmptyModule).is_empty());
    }

    #[test]
    fn definition_shares_load_signal() {
        let signal = Signal::pending();
        let definition = ModuleDefinition::with_load_signal("slow", signal.clone());
        let resolved = definition.clone();

        assert!(!resolved.is_loaded());
        signal.fire();
        assert!(resolved.is_loaded());
    }

    #[test]
    fn static_registry_replaces_duplicates() {
        let mut registry = StaticRegistry::new();
        registry.register(ModuleDefinition::with_load_signal("clock", Signal::pending()));
        registry.register(ModuleDefinition::new("clock"));

        assert_eq!(registry.len(), 1);
        assert!(registry.resolve("clock").unwrap().is_loaded());
    }
}
