use smartstring::{LazyCompact, SmartString};
use std::collections::HashMap;
use trellis_ui::node::{Event, Listener, NodeId};
use trellis_ui::NodeFactory;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement, HtmlInputElement, HtmlTextAreaElement, Node};

type Name = SmartString<LazyCompact>;
type ListenerKey = (NodeId, Name, usize);

/// [`NodeFactory`] backed by the browser DOM.
///
/// Hands out [`NodeId`]s for the nodes it creates (or adopts) and keeps the
/// handle tree in step with the document so removed subtrees and their
/// listener closures can be released.
pub struct DomFactory {
    document: Document,
    next_id: u32,
    nodes: HashMap<NodeId, Node>,
    parents: HashMap<NodeId, NodeId>,
    children: HashMap<NodeId, Vec<NodeId>>,
    listeners: HashMap<ListenerKey, Closure<dyn FnMut(web_sys::Event)>>,
}

impl DomFactory {
    pub fn new(document: Document) -> Self {
        Self {
            document,
            next_id: 0,
            nodes: HashMap::new(),
            parents: HashMap::new(),
            children: HashMap::new(),
            listeners: HashMap::new(),
        }
    }

    /// Factory for the current window's document
    pub fn from_window() -> Result<Self, JsValue> {
        let document = web_sys::window()
            .ok_or("no window")?
            .document()
            .ok_or("no document")?;
        Ok(Self::new(document))
    }

    /// Register an existing node (typically the mount container)
    pub fn adopt(&mut self, node: Node) -> NodeId {
        self.insert(node)
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    fn insert(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        self.nodes.insert(id, node);
        id
    }

    fn element(&self, id: NodeId) -> Option<&Element> {
        self.nodes.get(&id)?.dyn_ref::<Element>()
    }

    fn unlink(&mut self, id: NodeId) {
        if let Some(parent) = self.parents.remove(&id) {
            if let Some(siblings) = self.children.get_mut(&parent) {
                siblings.retain(|c| *c != id);
            }
        }
    }

    fn link(&mut self, parent: NodeId, child: NodeId, before: Option<NodeId>) {
        self.unlink(child);
        let siblings = self.children.entry(parent).or_default();
        let index = before
            .and_then(|r| siblings.iter().position(|c| *c == r))
            .unwrap_or(siblings.len());
        siblings.insert(index, child);
        self.parents.insert(child, parent);
    }

    /// Forget a subtree's handles and drop its listener closures
    fn release(&mut self, id: NodeId) {
        self.unlink(id);
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            self.nodes.remove(&current);
            self.parents.remove(&current);
            if let Some(children) = self.children.remove(&current) {
                stack.extend(children);
            }
            self.listeners.retain(|(node, _, _), _| *node != current);
        }
    }

    fn release_children(&mut self, id: NodeId) {
        let children = self.children.get(&id).cloned().unwrap_or_default();
        for child in children {
            self.release(child);
        }
    }
}

fn report(op: &str, node: NodeId, result: Result<(), JsValue>) {
    if let Err(error) = result {
        let message = match error.dyn_ref::<js_sys::Error>() {
            Some(e) => String::from(e.message()),
            None => format!("{:?}", error),
        };
        tracing::error!(op, node = node.0, %message, "DOM operation failed");
    }
}

/// Translate a DOM event into the platform-independent payload
fn to_event(event: &web_sys::Event, target: NodeId) -> Event {
    let mut out = Event::new(&event.type_(), target);
    let Some(source) = event.target() else {
        return out;
    };
    if let Some(input) = source.dyn_ref::<HtmlInputElement>() {
        out = out.with_value(input.value()).with_checked(input.checked());
    } else if let Some(area) = source.dyn_ref::<HtmlTextAreaElement>() {
        out = out.with_value(area.value());
    }
    out
}

impl NodeFactory for DomFactory {
    fn create_node(&mut self, tag: &str, namespace: Option<&str>) -> NodeId {
        let created = match namespace {
            Some(ns) => self.document.create_element_ns(Some(ns), tag),
            None => self.document.create_element(tag),
        };
        match created {
            Ok(element) => self.insert(element.into()),
            Err(error) => {
                tracing::error!(tag, ?error, "failed to create element, using a placeholder");
                let placeholder = self.document.create_comment(tag);
                self.insert(placeholder.into())
            }
        }
    }

    fn create_text(&mut self, value: &str) -> NodeId {
        let text = self.document.create_text_node(value);
        self.insert(text.into())
    }

    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) {
        if let Some(el) = self.element(node) {
            report("set_attribute", node, el.set_attribute(name, value));
        }
    }

    fn remove_attribute(&mut self, node: NodeId, name: &str) {
        if let Some(el) = self.element(node) {
            report("remove_attribute", node, el.remove_attribute(name));
        }
    }

    fn set_style(&mut self, node: NodeId, name: &str, value: &str) {
        if let Some(el) = self.element(node).and_then(|e| e.dyn_ref::<HtmlElement>()) {
            report("set_style", node, el.style().set_property(name, value));
        }
    }

    fn remove_style(&mut self, node: NodeId, name: &str) {
        if let Some(el) = self.element(node).and_then(|e| e.dyn_ref::<HtmlElement>()) {
            report(
                "remove_style",
                node,
                el.style().remove_property(name).map(drop),
            );
        }
    }

    fn add_event_listener(&mut self, node: NodeId, event: &str, listener: &Listener) {
        let Some(target) = self.nodes.get(&node) else {
            return;
        };
        let handler = listener.clone();
        let closure = Closure::<dyn FnMut(web_sys::Event)>::new(move |e: web_sys::Event| {
            handler.call(&to_event(&e, node));
        });
        report(
            "add_event_listener",
            node,
            target
                .add_event_listener_with_callback(event, closure.as_ref().unchecked_ref()),
        );
        self.listeners.insert((node, event.into(), listener.id()), closure);
    }

    fn remove_event_listener(&mut self, node: NodeId, event: &str, listener: &Listener) {
        let key: ListenerKey = (node, event.into(), listener.id());
        let Some(closure) = self.listeners.remove(&key) else {
            return;
        };
        if let Some(target) = self.nodes.get(&node) {
            report(
                "remove_event_listener",
                node,
                target
                    .remove_event_listener_with_callback(event, closure.as_ref().unchecked_ref()),
            );
        }
    }

    fn set_inner_html(&mut self, node: NodeId, html: &str) {
        self.release_children(node);
        if let Some(el) = self.element(node) {
            el.set_inner_html(html);
        }
    }

    fn clear(&mut self, node: NodeId) {
        self.release_children(node);
        if let Some(n) = self.nodes.get(&node) {
            n.set_text_content(None);
        }
    }

    fn append_child(&mut self, parent: NodeId, child: NodeId) {
        if let (Some(p), Some(c)) = (self.nodes.get(&parent), self.nodes.get(&child)) {
            report("append_child", parent, p.append_child(c).map(drop));
        }
        self.link(parent, child, None);
    }

    fn insert_before(&mut self, parent: NodeId, child: NodeId, reference: NodeId) {
        if let (Some(p), Some(c)) = (self.nodes.get(&parent), self.nodes.get(&child)) {
            let r = self.nodes.get(&reference);
            report("insert_before", parent, p.insert_before(c, r).map(drop));
        }
        self.link(parent, child, Some(reference));
    }

    fn remove(&mut self, node: NodeId) {
        if let Some(n) = self.nodes.get(&node) {
            if let Some(parent) = n.parent_node() {
                report("remove", node, parent.remove_child(n).map(drop));
            }
        }
        self.release(node);
    }

    fn next_sibling(&self, node: NodeId) -> Option<NodeId> {
        let siblings = self.children.get(self.parents.get(&node)?)?;
        let position = siblings.iter().position(|c| *c == node)?;
        siblings.get(position + 1).copied()
    }

    fn set_text(&mut self, node: NodeId, value: &str) {
        if let Some(n) = self.nodes.get(&node) {
            n.set_text_content(Some(value));
        }
    }

    fn text(&self, node: NodeId) -> Option<String> {
        let n = self.nodes.get(&node)?;
        if n.node_type() == Node::TEXT_NODE {
            n.text_content()
        } else {
            None
        }
    }

    fn set_checked(&mut self, node: NodeId, checked: bool) {
        if let Some(input) = self.element(node).and_then(|e| e.dyn_ref::<HtmlInputElement>()) {
            input.set_checked(checked);
        }
    }

    fn set_value(&mut self, node: NodeId, value: Option<&str>) {
        let Some(el) = self.element(node) else {
            return;
        };
        let value = value.unwrap_or("");
        if let Some(input) = el.dyn_ref::<HtmlInputElement>() {
            input.set_value(value);
        } else if let Some(area) = el.dyn_ref::<HtmlTextAreaElement>() {
            area.set_value(value);
        }
    }
}
