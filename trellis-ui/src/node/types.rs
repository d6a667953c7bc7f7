use smartstring::{LazyCompact, SmartString};
use std::fmt;
use std::rc::Rc;

/// Opaque handle to a platform node, allocated by a [`NodeFactory`](crate::platform::NodeFactory).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

/// Platform-independent event payload handed to listeners.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub name: SmartString<LazyCompact>,
    pub target: NodeId,
    /// Current value of the target for input-like nodes
    pub value: Option<String>,
    /// Current checked state of the target for checkbox-like nodes
    pub checked: Option<bool>,
}

impl Event {
    pub fn new(name: &str, target: NodeId) -> Self {
        Self {
            name: name.into(),
            target,
            value: None,
            checked: None,
        }
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn with_checked(mut self, checked: bool) -> Self {
        self.checked = Some(checked);
        self
    }
}

/// Event handler attached to a node.
///
/// Two listeners are the same listener only if they share the same
/// allocation; cloning keeps identity, re-wrapping a closure does not.
#[derive(Clone)]
pub struct Listener(Rc<dyn Fn(&Event)>);

impl Listener {
    pub fn new(f: impl Fn(&Event) + 'static) -> Self {
        Self(Rc::new(f))
    }

    pub fn call(&self, event: &Event) {
        (self.0)(event)
    }

    /// Stable identity of the underlying allocation
    pub fn id(&self) -> usize {
        Rc::as_ptr(&self.0) as *const () as usize
    }
}

impl PartialEq for Listener {
    fn eq(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}

impl Eq for Listener {}

impl fmt::Debug for Listener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Listener({:#x})", self.id())
    }
}

impl<F> From<F> for Listener
where
    F: Fn(&Event) + 'static,
{
    fn from(f: F) -> Self {
        Self::new(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_listener_identity_survives_clone() {
        let listener = Listener::new(|_| {});
        let clone = listener.clone();
        assert_eq!(listener, clone);
        assert_ne!(listener, Listener::new(|_| {}));
    }

    #[test]
    fn test_listener_call() {
        let hits = Rc::new(Cell::new(0));
        let counter = hits.clone();
        let listener = Listener::new(move |event| {
            assert_eq!(event.name.as_str(), "click");
            counter.set(counter.get() + 1);
        });

        listener.call(&Event::new("click", NodeId(3)));
        listener.call(&Event::new("click", NodeId(3)));
        assert_eq!(hits.get(), 2);
    }
}
