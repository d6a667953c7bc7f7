use super::NodeFactory;
use crate::node::{Event, Listener, MemoryNode, NodeArena, NodeId, NodeKind, RenderCommand};
use std::fmt::Write;

/// Headless node factory.
///
/// Keeps every node in a [`NodeArena`] and records each mutation as a
/// [`RenderCommand`], so callers can assert on exactly what a reconciliation
/// pass did.
pub struct MemoryFactory {
    arena: NodeArena,
    commands: Vec<RenderCommand>,
}

impl MemoryFactory {
    pub fn new() -> Self {
        Self {
            arena: NodeArena::new(),
            commands: Vec::new(),
        }
    }

    /// Create a detached element to mount into, without recording it
    pub fn create_container(&mut self, tag: &str) -> NodeId {
        self.arena.create(MemoryNode::element(tag, None))
    }

    pub fn take_commands(&mut self) -> Vec<RenderCommand> {
        std::mem::take(&mut self.commands)
    }

    pub fn commands(&self) -> &[RenderCommand] {
        &self.commands
    }

    pub fn clear_commands(&mut self) {
        self.commands.clear();
    }

    pub fn arena(&self) -> &NodeArena {
        &self.arena
    }

    pub fn node(&self, id: NodeId) -> Option<&MemoryNode> {
        self.arena.get(id)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.arena.children(id)
    }

    /// Mutable access for simulating user interaction (typing, toggling)
    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut MemoryNode> {
        self.arena.get_mut(id)
    }

    /// Invoke every listener registered for `event.name` on the target node.
    /// Returns how many listeners ran.
    pub fn dispatch(&self, event: &Event) -> usize {
        let listeners: Vec<Listener> = match self.arena.get(event.target) {
            Some(node) => node
                .listeners
                .iter()
                .filter(|(name, _)| *name == event.name)
                .map(|(_, l)| l.clone())
                .collect(),
            None => return 0,
        };
        for listener in &listeners {
            listener.call(event);
        }
        listeners.len()
    }

    /// Serialize a subtree as markup, in child order
    pub fn to_markup(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.write_markup(id, &mut out);
        out
    }

    fn write_markup(&self, id: NodeId, out: &mut String) {
        let Some(node) = self.arena.get(id) else {
            return;
        };
        match &node.kind {
            NodeKind::Text(value) => out.push_str(value),
            NodeKind::Element { tag, .. } => {
                let _ = write!(out, "<{}", tag);
                for (name, value) in &node.attributes {
                    let _ = write!(out, " {}=\"{}\"", name, value);
                }
                if !node.styles.is_empty() {
                    let style = node
                        .styles
                        .iter()
                        .map(|(k, v)| format!("{}: {};", k, v))
                        .collect::<Vec<_>>()
                        .join(" ");
                    let _ = write!(out, " style=\"{}\"", style);
                }
                out.push('>');
                if let Some(html) = &node.inner_html {
                    out.push_str(html);
                }
                for child in &node.children {
                    self.write_markup(*child, out);
                }
                let _ = write!(out, "</{}>", tag);
            }
        }
    }

    fn record(&mut self, cmd: RenderCommand) {
        tracing::trace!(?cmd, "platform mutation");
        self.commands.push(cmd);
    }
}

impl Default for MemoryFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl NodeFactory for MemoryFactory {
    fn create_node(&mut self, tag: &str, namespace: Option<&str>) -> NodeId {
        let node = self.arena.create(MemoryNode::element(tag, namespace));
        self.record(RenderCommand::CreateNode {
            node,
            tag: tag.into(),
            namespace: namespace.map(Into::into),
        });
        node
    }

    fn create_text(&mut self, value: &str) -> NodeId {
        let node = self.arena.create(MemoryNode::text(value));
        self.record(RenderCommand::CreateText {
            node,
            value: value.to_string(),
        });
        node
    }

    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) {
        if let Some(n) = self.arena.get_mut(node) {
            n.attributes.insert(name.into(), value.to_string());
        }
        self.record(RenderCommand::SetAttribute {
            node,
            name: name.into(),
            value: value.to_string(),
        });
    }

    fn remove_attribute(&mut self, node: NodeId, name: &str) {
        if let Some(n) = self.arena.get_mut(node) {
            n.attributes.shift_remove(name);
        }
        self.record(RenderCommand::RemoveAttribute {
            node,
            name: name.into(),
        });
    }

    fn set_style(&mut self, node: NodeId, name: &str, value: &str) {
        if let Some(n) = self.arena.get_mut(node) {
            n.styles.insert(name.into(), value.to_string());
        }
        self.record(RenderCommand::SetStyle {
            node,
            name: name.into(),
            value: value.to_string(),
        });
    }

    fn remove_style(&mut self, node: NodeId, name: &str) {
        if let Some(n) = self.arena.get_mut(node) {
            n.styles.shift_remove(name);
        }
        self.record(RenderCommand::RemoveStyle {
            node,
            name: name.into(),
        });
    }

    fn add_event_listener(&mut self, node: NodeId, event: &str, listener: &Listener) {
        if let Some(n) = self.arena.get_mut(node) {
            n.listeners.push((event.into(), listener.clone()));
        }
        self.record(RenderCommand::AddListener {
            node,
            event: event.into(),
        });
    }

    fn remove_event_listener(&mut self, node: NodeId, event: &str, listener: &Listener) {
        if let Some(n) = self.arena.get_mut(node) {
            if let Some(pos) = n
                .listeners
                .iter()
                .position(|(name, l)| name == event && l == listener)
            {
                n.listeners.remove(pos);
            }
        }
        self.record(RenderCommand::RemoveListener {
            node,
            event: event.into(),
        });
    }

    fn set_inner_html(&mut self, node: NodeId, html: &str) {
        self.arena.dispose_children(node);
        if let Some(n) = self.arena.get_mut(node) {
            n.inner_html = Some(html.to_string());
        }
        self.record(RenderCommand::SetInnerHtml {
            node,
            html: html.to_string(),
        });
    }

    fn clear(&mut self, node: NodeId) {
        self.arena.dispose_children(node);
        if let Some(n) = self.arena.get_mut(node) {
            n.inner_html = None;
        }
        self.record(RenderCommand::Clear { node });
    }

    fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.arena.attach(parent, child, None);
        self.record(RenderCommand::AppendChild { parent, child });
    }

    fn insert_before(&mut self, parent: NodeId, child: NodeId, reference: NodeId) {
        // Detach first so the reference index is measured without the moved node
        self.arena.detach(child);
        let index = self
            .arena
            .children(parent)
            .iter()
            .position(|c| *c == reference);
        self.arena.attach(parent, child, index);
        self.record(RenderCommand::InsertBefore {
            parent,
            child,
            reference,
        });
    }

    fn remove(&mut self, node: NodeId) {
        // Removed nodes are never re-inserted by the reconciler
        self.arena.dispose(node);
        self.record(RenderCommand::Remove { node });
    }

    fn next_sibling(&self, node: NodeId) -> Option<NodeId> {
        self.arena.next_sibling(node)
    }

    fn set_text(&mut self, node: NodeId, value: &str) {
        if let Some(n) = self.arena.get_mut(node) {
            if let NodeKind::Text(text) = &mut n.kind {
                *text = value.to_string();
            }
        }
        self.record(RenderCommand::SetText {
            node,
            value: value.to_string(),
        });
    }

    fn text(&self, node: NodeId) -> Option<String> {
        match &self.arena.get(node)?.kind {
            NodeKind::Text(value) => Some(value.clone()),
            NodeKind::Element { .. } => None,
        }
    }

    fn set_checked(&mut self, node: NodeId, checked: bool) {
        if let Some(n) = self.arena.get_mut(node) {
            n.checked = checked;
        }
        self.record(RenderCommand::SetChecked { node, checked });
    }

    fn set_value(&mut self, node: NodeId, value: Option<&str>) {
        if let Some(n) = self.arena.get_mut(node) {
            n.value = value.map(str::to_string);
        }
        self.record(RenderCommand::SetValue {
            node,
            value: value.map(str::to_string),
        });
    }
}
