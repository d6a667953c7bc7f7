use super::{reconcile_children, BuildContext, RenderElement};
use crate::hot::Value;
use crate::node::{Listener, NodeId};
use crate::platform::NodeFactory;
use crate::widget::{ElementWidget, Widget};
use indexmap::IndexMap;
use smartstring::{LazyCompact, SmartString};
use std::rc::Rc;

type Name = SmartString<LazyCompact>;

/// Attributes whose live node state can drift from the last applied value
/// through user interaction, so they are written on every update.
const LIVE_ATTRIBUTES: [&str; 2] = ["checked", "value"];

/// Element realizing a tagged [`ElementWidget`]
pub struct HtmlElement {
    parent: NodeId,
    node: NodeId,
    widget: Widget,
    current: Rc<ElementWidget>,
    children: Vec<Box<dyn RenderElement>>,
}

impl HtmlElement {
    pub fn new(cx: &mut BuildContext<'_>, parent: NodeId, widget: Rc<ElementWidget>) -> Self {
        let node = cx.factory.create_node(widget.tag(), widget.namespace());

        if let Some(scope) = widget.scope() {
            cx.factory
                .set_attribute(node, cx.config.scope_attribute(), scope);
        }
        for (name, value) in widget.attributes() {
            if let Some(value) = value {
                cx.factory.set_attribute(node, name, value);
            }
        }
        for (name, value) in widget.style() {
            if let Some(value) = value {
                cx.factory.set_style(node, name, value);
            }
        }
        for (event, listener) in widget.listeners() {
            cx.factory.add_event_listener(node, event, listener);
        }

        let mut children = Vec::with_capacity(widget.children().len());
        for child in widget.children() {
            let element = child.create_element(cx, node);
            cx.factory.append_child(node, element.node());
            children.push(element);
        }
        if let Some(html) = widget.raw_content() {
            cx.factory.set_inner_html(node, html);
        }

        Self {
            parent,
            node,
            widget: Widget::Element(widget.clone()),
            current: widget,
            children,
        }
    }

    pub fn children(&self) -> &[Box<dyn RenderElement>] {
        &self.children
    }

    fn update_scope(&self, cx: &mut BuildContext<'_>, next: &ElementWidget) {
        if self.current.scope() == next.scope() {
            return;
        }
        let attribute = cx.config.scope_attribute();
        match next.scope() {
            Some(scope) => cx.factory.set_attribute(self.node, attribute, scope),
            None => cx.factory.remove_attribute(self.node, attribute),
        }
    }

    fn update_attributes(&self, factory: &mut dyn NodeFactory, next: &ElementWidget, force: bool) {
        let node = self.node;
        let old = self.current.attributes();
        diff_values(old, next.attributes(), force, |name, value| match value {
            Some(value) => factory.set_attribute(node, name, value),
            None => factory.remove_attribute(node, name),
        });

        for name in LIVE_ATTRIBUTES {
            let value = next.attribute(name);
            if value.is_some() || self.current.attribute(name).is_some() {
                apply_live_attribute(factory, node, name, value);
            }
        }
    }

    fn update_style(&self, factory: &mut dyn NodeFactory, next: &ElementWidget, force: bool) {
        let node = self.node;
        diff_values(self.current.style(), next.style(), force, |name, value| match value {
            Some(value) => factory.set_style(node, name, value),
            None => factory.remove_style(node, name),
        });
    }

    fn update_listeners(&self, factory: &mut dyn NodeFactory, next: &ElementWidget) {
        let old = self.current.listeners();
        let new = next.listeners();

        for (event, old_listener) in old {
            let new_listener = new.get(event);
            if new_listener != Some(old_listener) {
                factory.remove_event_listener(self.node, event, old_listener);
                if let Some(listener) = new_listener {
                    factory.add_event_listener(self.node, event, listener);
                }
            }
        }
        // Presence is checked against the old listener map, not the style map
        for (event, listener) in new {
            if !old.contains_key(event) {
                factory.add_event_listener(self.node, event, listener);
            }
        }
    }

    fn update_children(&mut self, cx: &mut BuildContext<'_>, next: &ElementWidget, force: bool) {
        match next.raw_content() {
            Some(html) => {
                reconcile_children(cx, self.node, &mut self.children, &[], force);
                if force || self.current.raw_content() != Some(html) {
                    cx.factory.set_inner_html(self.node, html);
                }
            }
            None => {
                if self.current.raw_content().is_some() {
                    cx.factory.clear(self.node);
                }
                reconcile_children(cx, self.node, &mut self.children, next.children(), force);
            }
        }
    }
}

impl RenderElement for HtmlElement {
    fn node(&self) -> NodeId {
        self.node
    }

    fn parent(&self) -> NodeId {
        self.parent
    }

    fn widget(&self) -> &Widget {
        &self.widget
    }

    fn mounted(&mut self) {
        for child in &mut self.children {
            child.mounted();
        }
    }

    fn update(&mut self, cx: &mut BuildContext<'_>, widget: &Widget, force: bool) -> bool {
        let Widget::Element(next) = widget else {
            return false;
        };
        if next.tag() != self.current.tag() {
            return false;
        }

        self.update_scope(cx, next);
        self.update_attributes(cx.factory, next, force);
        self.update_style(cx.factory, next, force);
        self.update_listeners(cx.factory, next);
        self.update_children(cx, next, force);

        self.current = next.clone();
        self.widget = widget.clone();
        true
    }

    fn unmounted(&mut self) {
        for child in &mut self.children {
            child.unmounted();
        }
    }

    fn collect_state(&self, out: &mut Vec<Value>) {
        for child in &self.children {
            child.collect_state(out);
        }
    }
}

/// Apply changed, newly present and removed entries; explicitly cleared
/// entries count as absent. With `force`, equal entries are applied too.
fn diff_values(
    old: &IndexMap<Name, Option<String>>,
    new: &IndexMap<Name, Option<String>>,
    force: bool,
    mut apply: impl FnMut(&str, Option<&str>),
) {
    for (name, old_value) in old {
        let new_value = new.get(name).and_then(|v| v.as_deref());
        if old_value.as_deref() != new_value || (force && new_value.is_some()) {
            apply(name.as_str(), new_value);
        }
    }
    for (name, new_value) in new {
        if old.contains_key(name) {
            continue;
        }
        if let Some(value) = new_value.as_deref() {
            apply(name.as_str(), Some(value));
        }
    }
}

fn apply_live_attribute(
    factory: &mut dyn NodeFactory,
    node: NodeId,
    name: &str,
    value: Option<&str>,
) {
    match name {
        "checked" => factory.set_checked(node, value.is_some()),
        "value" => factory.set_value(node, value),
        _ => {}
    }
}
