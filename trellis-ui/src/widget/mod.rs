//! Immutable descriptions of desired output.
//!
//! A [`Widget`] is a pure value: cloning is cheap (payloads are reference
//! counted) and identity across re-renders comes only from its [`Key`],
//! never from structural equality.

mod element;

pub use element::{class_map, ElementBuilder, ElementWidget};

use crate::element::{BuildContext, ComponentElement, HtmlElement, RenderElement, TextElement};
use crate::hot::Record;
use crate::node::NodeId;
use smartstring::{LazyCompact, SmartString};
use std::fmt;
use std::rc::Rc;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WidgetError {
    #[error("Only one of children and raw content can be set on <{tag}>")]
    ChildrenAndRawContent { tag: String },
}

pub type Result<T> = std::result::Result<T, WidgetError>;

/// Application-supplied identity token for matching widgets across renders
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Key {
    Str(SmartString<LazyCompact>),
    Int(i64),
    /// Unsigned values above `i64::MAX`; smaller ones are `Int`
    Uint(u64),
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Str(s) => f.write_str(s),
            Key::Int(n) => write!(f, "{}", n),
            Key::Uint(n) => write!(f, "{}", n),
        }
    }
}

impl From<&str> for Key {
    fn from(value: &str) -> Self {
        Key::Str(value.into())
    }
}

impl From<String> for Key {
    fn from(value: String) -> Self {
        Key::Str(value.into())
    }
}

macro_rules! int_key {
    ($($t:ty),*) => {
        $(impl From<$t> for Key {
            fn from(value: $t) -> Self {
                Key::Int(i64::from(value))
            }
        })*
    };
}

macro_rules! uint_key {
    ($($t:ty),*) => {
        $(impl From<$t> for Key {
            fn from(value: $t) -> Self {
                match i64::try_from(value) {
                    Ok(n) => Key::Int(n),
                    Err(_) => Key::Uint(value as u64),
                }
            }
        })*
    };
}

int_key!(i32, i64, u32);
uint_key!(u64, usize);

/// Key/position pair putting keyed and unkeyed siblings in one namespace.
///
/// Keyed widgets map to `(Some(key), 0)`; unkeyed ones to `(None, n)` where
/// `n` counts the unkeyed siblings before them.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) struct IndexedKey(Option<Key>, usize);

#[derive(Default)]
pub(crate) struct KeyIndexer {
    unkeyed: usize,
}

impl KeyIndexer {
    pub(crate) fn next(&mut self, key: Option<&Key>) -> IndexedKey {
        match key {
            Some(key) => IndexedKey(Some(key.clone()), 0),
            None => {
                let index = self.unkeyed;
                self.unkeyed += 1;
                IndexedKey(None, index)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextWidget {
    value: String,
    key: Option<Key>,
}

impl TextWidget {
    pub fn value(&self) -> &str {
        &self.value
    }
}

/// Widget rendered by the behavior of a live [`Record`]
#[derive(Debug, Clone)]
pub struct ComponentWidget {
    record: Rc<Record>,
    key: Option<Key>,
}

impl ComponentWidget {
    pub fn record(&self) -> &Rc<Record> {
        &self.record
    }

    pub fn class_name(&self) -> String {
        self.record.class_name()
    }
}

#[derive(Debug, Clone)]
pub enum Widget {
    Element(Rc<ElementWidget>),
    Text(Rc<TextWidget>),
    Component(Rc<ComponentWidget>),
}

impl Widget {
    pub fn text(value: impl Into<String>) -> Self {
        Widget::Text(Rc::new(TextWidget {
            value: value.into(),
            key: None,
        }))
    }

    pub fn component(record: Rc<Record>) -> Self {
        Widget::Component(Rc::new(ComponentWidget { record, key: None }))
    }

    pub fn key(&self) -> Option<&Key> {
        match self {
            Widget::Element(w) => w.key(),
            Widget::Text(w) => w.key.as_ref(),
            Widget::Component(w) => w.key.as_ref(),
        }
    }

    pub fn with_key(self, key: impl Into<Key>) -> Self {
        let key = Some(key.into());
        match self {
            Widget::Element(mut w) => {
                Rc::make_mut(&mut w).key = key;
                Widget::Element(w)
            }
            Widget::Text(mut w) => {
                Rc::make_mut(&mut w).key = key;
                Widget::Text(w)
            }
            Widget::Component(mut w) => {
                Rc::make_mut(&mut w).key = key;
                Widget::Component(w)
            }
        }
    }

    /// Short description for logs
    pub fn describe(&self) -> String {
        match self {
            Widget::Element(w) => format!("<{}>", w.tag()),
            Widget::Text(w) => format!("{:?}", w.value),
            Widget::Component(w) => w.class_name(),
        }
    }

    /// Realize this widget as a new, un-mounted element under `parent`.
    /// The caller attaches the returned element's node.
    pub fn create_element(
        &self,
        cx: &mut BuildContext<'_>,
        parent: NodeId,
    ) -> Box<dyn RenderElement> {
        match self {
            Widget::Element(w) => Box::new(HtmlElement::new(cx, parent, w.clone())),
            Widget::Text(w) => Box::new(TextElement::new(cx, parent, w.clone())),
            Widget::Component(w) => Box::new(ComponentElement::new(cx, parent, w.clone())),
        }
    }
}

impl From<&str> for Widget {
    fn from(value: &str) -> Self {
        Widget::text(value)
    }
}

impl From<String> for Widget {
    fn from(value: String) -> Self {
        Widget::text(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indexed_keys_count_only_unkeyed() {
        let mut indexer = KeyIndexer::default();
        let a = indexer.next(None);
        let b = indexer.next(Some(&Key::from("b")));
        let c = indexer.next(None);

        assert_eq!(a, IndexedKey(None, 0));
        assert_eq!(b, IndexedKey(Some(Key::from("b")), 0));
        assert_eq!(c, IndexedKey(None, 1));
    }

    #[test]
    fn test_with_key() {
        let widget = Widget::text("a").with_key(7);
        assert_eq!(widget.key(), Some(&Key::Int(7)));
        assert_eq!(Widget::text("a").key(), None);
    }

    #[test]
    fn test_key_display() {
        assert_eq!(Key::from("row").to_string(), "row");
        assert_eq!(Key::from(42u32).to_string(), "42");
        assert_eq!(Key::from(u64::MAX).to_string(), "18446744073709551615");
    }

    #[test]
    fn test_large_unsigned_keys_do_not_wrap() {
        assert_ne!(Key::from(u64::MAX), Key::from(-1i64));
        assert_ne!(Key::from(usize::MAX), Key::from(-1i64));
        assert_eq!(Key::from(u64::MAX), Key::Uint(u64::MAX));
        assert_eq!(Key::from(5u64), Key::from(5i64));
        assert_eq!(Key::from(5usize), Key::Int(5));
    }
}
