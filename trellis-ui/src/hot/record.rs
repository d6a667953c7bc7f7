use crate::widget::Widget;
use indexmap::IndexMap;
use smartstring::{LazyCompact, SmartString};
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

type Name = SmartString<LazyCompact>;

pub type RenderFn = Rc<dyn Fn(&Record) -> Widget>;
pub type HookFn = Rc<dyn Fn(&Record)>;

/// Dispatch table for records of one class.
///
/// A reload registers a fresh `Behavior` under the same class name; live
/// records are then rebound to it without touching their fields.
pub struct Behavior {
    class_name: Name,
    render: Option<RenderFn>,
    on_mount: Option<HookFn>,
    on_unmount: Option<HookFn>,
}

impl Behavior {
    pub fn new(class_name: &str) -> Self {
        Self {
            class_name: class_name.into(),
            render: None,
            on_mount: None,
            on_unmount: None,
        }
    }

    pub fn with_render(mut self, f: impl Fn(&Record) -> Widget + 'static) -> Self {
        self.render = Some(Rc::new(f));
        self
    }

    pub fn with_on_mount(mut self, f: impl Fn(&Record) + 'static) -> Self {
        self.on_mount = Some(Rc::new(f));
        self
    }

    pub fn with_on_unmount(mut self, f: impl Fn(&Record) + 'static) -> Self {
        self.on_unmount = Some(Rc::new(f));
        self
    }

    pub fn class_name(&self) -> &str {
        &self.class_name
    }
}

impl fmt::Debug for Behavior {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Behavior")
            .field("class_name", &self.class_name)
            .field("render", &self.render.is_some())
            .finish()
    }
}

/// Live data object: fields plus a swappable behavior.
///
/// Identity is the allocation; records are always handled through `Rc`.
pub struct Record {
    behavior: RefCell<Rc<Behavior>>,
    fields: RefCell<IndexMap<Name, Value>>,
    revision: Cell<u64>,
}

impl Record {
    pub fn new(behavior: Rc<Behavior>) -> Rc<Self> {
        Rc::new(Self {
            behavior: RefCell::new(behavior),
            fields: RefCell::new(IndexMap::new()),
            revision: Cell::new(0),
        })
    }

    pub fn with_fields<'a>(
        behavior: Rc<Behavior>,
        fields: impl IntoIterator<Item = (&'a str, Value)>,
    ) -> Rc<Self> {
        let record = Self::new(behavior);
        record
            .fields
            .borrow_mut()
            .extend(fields.into_iter().map(|(k, v)| (Name::from(k), v)));
        record
    }

    pub fn behavior(&self) -> Rc<Behavior> {
        self.behavior.borrow().clone()
    }

    pub fn class_name(&self) -> String {
        self.behavior.borrow().class_name().to_string()
    }

    /// Swap the behavior in place; fields and revision are untouched
    pub fn rebind(&self, behavior: Rc<Behavior>) {
        *self.behavior.borrow_mut() = behavior;
    }

    pub fn get(&self, name: &str) -> Option<Value> {
        self.fields.borrow().get(name).cloned()
    }

    pub fn set(&self, name: &str, value: impl Into<Value>) {
        self.fields.borrow_mut().insert(name.into(), value.into());
        self.revision.set(self.revision.get() + 1);
    }

    pub fn remove(&self, name: &str) -> Option<Value> {
        let removed = self.fields.borrow_mut().shift_remove(name);
        if removed.is_some() {
            self.revision.set(self.revision.get() + 1);
        }
        removed
    }

    /// Bumped on every field write
    pub fn revision(&self) -> u64 {
        self.revision.get()
    }

    pub fn field_names(&self) -> Vec<String> {
        self.fields.borrow().keys().map(|k| k.to_string()).collect()
    }

    /// Snapshot of the field values, in field order
    pub fn field_values(&self) -> Vec<Value> {
        self.fields.borrow().values().cloned().collect()
    }

    pub fn render(&self) -> Widget {
        let behavior = self.behavior();
        match &behavior.render {
            Some(render) => render(self),
            None => {
                tracing::warn!(class = %behavior.class_name, "behavior has no render function");
                Widget::text("")
            }
        }
    }

    pub(crate) fn mounted(&self) {
        let behavior = self.behavior();
        if let Some(hook) = &behavior.on_mount {
            hook(self);
        }
    }

    pub(crate) fn unmounted(&self) {
        let behavior = self.behavior();
        if let Some(hook) = &behavior.on_unmount {
            hook(self);
        }
    }
}

impl fmt::Debug for Record {
    // Fields are not printed: record graphs may be cyclic
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Record")
            .field("class", &self.class_name())
            .field("fields", &self.field_names())
            .field("revision", &self.revision())
            .finish()
    }
}

/// Reachable data, as seen by the migrator
#[derive(Debug, Clone)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(Name),
    List(Vec<Value>),
    Record(Rc<Record>),
}

impl Value {
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s.as_str()),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Record(a), Value::Record(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(value as i64)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Str(value.into())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Str(value.into())
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Value::List(value)
    }
}

impl From<Rc<Record>> for Value {
    fn from(value: Rc<Record>) -> Self {
        Value::Record(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_bumps_revision() {
        let record = Record::new(Rc::new(Behavior::new("Counter")));
        assert_eq!(record.revision(), 0);

        record.set("count", 1);
        record.set("count", 2);
        assert_eq!(record.revision(), 2);
        assert_eq!(record.get("count"), Some(Value::Int(2)));

        assert_eq!(record.remove("missing"), None);
        assert_eq!(record.revision(), 2);
    }

    #[test]
    fn test_rebind_keeps_fields() {
        let record = Record::with_fields(
            Rc::new(Behavior::new("Counter")),
            [("count", Value::from(5)), ("label", Value::from("clicks"))],
        );
        let next = Rc::new(Behavior::new("Counter"));

        record.rebind(next.clone());
        assert!(Rc::ptr_eq(&record.behavior(), &next));
        assert_eq!(record.get("count"), Some(Value::Int(5)));
        assert_eq!(record.field_names(), vec!["count", "label"]);
        assert_eq!(record.revision(), 0);
    }

    #[test]
    fn test_render_without_render_fn_is_empty_text() {
        let record = Record::new(Rc::new(Behavior::new("Model")));
        match record.render() {
            Widget::Text(text) => assert_eq!(text.value(), ""),
            other => panic!("Expected text widget, got {:?}", other),
        }
    }

    #[test]
    fn test_debug_does_not_follow_cycles() {
        let record = Record::new(Rc::new(Behavior::new("Node")));
        record.set("me", record.clone());
        let printed = format!("{:?}", record);
        assert!(printed.contains("Node"));
        record.remove("me");
    }
}
