mod memory;

pub use memory::MemoryFactory;

use crate::node::{Listener, NodeId};

/// Creates and mutates real output nodes.
///
/// Implementations handle a specific platform (browser DOM, headless
/// arena, ...). Nodes are addressed by the [`NodeId`] handles the factory
/// hands out; the reconciler never sees the concrete node type.
pub trait NodeFactory {
    fn create_node(&mut self, tag: &str, namespace: Option<&str>) -> NodeId;
    fn create_text(&mut self, value: &str) -> NodeId;

    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str);
    fn remove_attribute(&mut self, node: NodeId, name: &str);

    fn set_style(&mut self, node: NodeId, name: &str, value: &str);
    fn remove_style(&mut self, node: NodeId, name: &str);

    fn add_event_listener(&mut self, node: NodeId, event: &str, listener: &Listener);
    fn remove_event_listener(&mut self, node: NodeId, event: &str, listener: &Listener);

    /// Replace the node's content with raw markup
    fn set_inner_html(&mut self, node: NodeId, html: &str);
    /// Empty the node's content
    fn clear(&mut self, node: NodeId);

    fn append_child(&mut self, parent: NodeId, child: NodeId);
    fn insert_before(&mut self, parent: NodeId, child: NodeId, reference: NodeId);
    /// Detach the node from its parent
    fn remove(&mut self, node: NodeId);
    /// The node after `node` under the same parent
    fn next_sibling(&self, node: NodeId) -> Option<NodeId>;

    fn set_text(&mut self, node: NodeId, value: &str);
    fn text(&self, node: NodeId) -> Option<String>;

    /// Write the live checked state, which can drift from the attribute
    fn set_checked(&mut self, node: NodeId, checked: bool);
    /// Write the live value, which can drift from the attribute
    fn set_value(&mut self, node: NodeId, value: Option<&str>);
}
