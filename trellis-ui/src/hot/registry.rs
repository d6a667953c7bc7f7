use super::record::Behavior;
use smartstring::{LazyCompact, SmartString};
use std::collections::HashMap;
use std::rc::Rc;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error("Behavior lookup for '{class_name}' failed: {reason}")]
    Lookup { class_name: String, reason: String },

    #[error("Behavior resolver panicked while resolving '{0}'")]
    Panicked(String),
}

pub type Result<T> = std::result::Result<T, ResolveError>;

/// Finds the latest behavior registered under a class name.
///
/// `Ok(None)` means the class is unknown; both that and `Err` leave a
/// record's current behavior in place during migration.
pub trait BehaviorResolver {
    fn resolve(&self, class_name: &str) -> Result<Option<Rc<Behavior>>>;
}

impl<F> BehaviorResolver for F
where
    F: Fn(&str) -> Result<Option<Rc<Behavior>>>,
{
    fn resolve(&self, class_name: &str) -> Result<Option<Rc<Behavior>>> {
        self(class_name)
    }
}

/// Class name to current behavior
#[derive(Default)]
pub struct BehaviorRegistry {
    behaviors: HashMap<SmartString<LazyCompact>, Rc<Behavior>>,
}

impl BehaviorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the behavior for its class name
    pub fn register(&mut self, behavior: Behavior) -> Rc<Behavior> {
        let behavior = Rc::new(behavior);
        let previous = self
            .behaviors
            .insert(behavior.class_name().into(), behavior.clone());
        if previous.is_some() {
            tracing::debug!(class = behavior.class_name(), "replaced behavior");
        }
        behavior
    }

    pub fn get(&self, class_name: &str) -> Option<Rc<Behavior>> {
        self.behaviors.get(class_name).cloned()
    }

    pub fn len(&self) -> usize {
        self.behaviors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.behaviors.is_empty()
    }
}

impl BehaviorResolver for BehaviorRegistry {
    fn resolve(&self, class_name: &str) -> Result<Option<Rc<Behavior>>> {
        Ok(self.get(class_name))
    }
}
