use super::{Key, Result, Widget, WidgetError};
use crate::node::Listener;
use indexmap::IndexMap;
use smartstring::{LazyCompact, SmartString};
use std::rc::Rc;

type Name = SmartString<LazyCompact>;

/// Tagged platform element: attributes, style, listeners and either
/// children or raw content.
#[derive(Debug, Clone)]
pub struct ElementWidget {
    tag: Name,
    namespace: Option<Name>,
    scope: Option<String>,
    attributes: IndexMap<Name, Option<String>>,
    style: IndexMap<Name, Option<String>>,
    listeners: IndexMap<Name, Listener>,
    children: Vec<Widget>,
    raw_content: Option<String>,
    pub(super) key: Option<Key>,
}

impl ElementWidget {
    pub fn builder(tag: &str) -> ElementBuilder {
        ElementBuilder {
            inner: ElementWidget {
                tag: tag.into(),
                namespace: None,
                scope: None,
                attributes: IndexMap::new(),
                style: IndexMap::new(),
                listeners: IndexMap::new(),
                children: Vec::new(),
                raw_content: None,
                key: None,
            },
        }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// Style-scope prefix written to the configured scope attribute
    pub fn scope(&self) -> Option<&str> {
        self.scope.as_deref()
    }

    pub fn attributes(&self) -> &IndexMap<Name, Option<String>> {
        &self.attributes
    }

    /// Present value of an attribute; explicitly cleared counts as absent
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name)?.as_deref()
    }

    pub fn style(&self) -> &IndexMap<Name, Option<String>> {
        &self.style
    }

    pub fn style_value(&self, name: &str) -> Option<&str> {
        self.style.get(name)?.as_deref()
    }

    pub fn listeners(&self) -> &IndexMap<Name, Listener> {
        &self.listeners
    }

    pub fn children(&self) -> &[Widget] {
        &self.children
    }

    pub fn raw_content(&self) -> Option<&str> {
        self.raw_content.as_deref()
    }

    pub fn key(&self) -> Option<&Key> {
        self.key.as_ref()
    }
}

pub struct ElementBuilder {
    inner: ElementWidget,
}

impl ElementBuilder {
    pub fn namespace(mut self, namespace: &str) -> Self {
        self.inner.namespace = Some(namespace.into());
        self
    }

    pub fn scope(mut self, prefix: impl Into<String>) -> Self {
        self.inner.scope = Some(prefix.into());
        self
    }

    pub fn attr(mut self, name: &str, value: impl Into<String>) -> Self {
        self.inner.attributes.insert(name.into(), Some(value.into()));
        self
    }

    /// Set or explicitly clear an attribute
    pub fn attr_opt(mut self, name: &str, value: Option<String>) -> Self {
        self.inner.attributes.insert(name.into(), value);
        self
    }

    /// Set the `class` attribute from a list of names
    pub fn classes<'a>(self, names: impl IntoIterator<Item = &'a str>) -> Self {
        let joined = names.into_iter().collect::<Vec<_>>().join(" ");
        self.attr("class", joined)
    }

    pub fn style(mut self, name: &str, value: impl Into<String>) -> Self {
        self.inner.style.insert(name.into(), Some(value.into()));
        self
    }

    pub fn style_opt(mut self, name: &str, value: Option<String>) -> Self {
        self.inner.style.insert(name.into(), value);
        self
    }

    pub fn on(mut self, event: &str, listener: impl Into<Listener>) -> Self {
        self.inner.listeners.insert(event.into(), listener.into());
        self
    }

    pub fn child(mut self, child: impl Into<Widget>) -> Self {
        self.inner.children.push(child.into());
        self
    }

    pub fn children(mut self, children: impl IntoIterator<Item = Widget>) -> Self {
        self.inner.children.extend(children);
        self
    }

    pub fn raw_content(mut self, html: impl Into<String>) -> Self {
        self.inner.raw_content = Some(html.into());
        self
    }

    pub fn key(mut self, key: impl Into<Key>) -> Self {
        self.inner.key = Some(key.into());
        self
    }

    pub fn build(self) -> Result<Widget> {
        let inner = self.inner;
        if !inner.children.is_empty() && inner.raw_content.is_some() {
            return Err(WidgetError::ChildrenAndRawContent {
                tag: inner.tag.to_string(),
            });
        }
        Ok(Widget::Element(Rc::new(inner)))
    }
}

/// Collapse `(name, enabled)` pairs into the enabled names, in order
pub fn class_map<'a>(items: &[(&'a str, bool)]) -> Vec<&'a str> {
    items
        .iter()
        .filter(|(_, enabled)| *enabled)
        .map(|(name, _)| *name)
        .collect()
}
