use super::types::{Listener, NodeId};
use indexmap::IndexMap;
use smallvec::SmallVec;
use smartstring::{LazyCompact, SmartString};

type Name = SmartString<LazyCompact>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Element {
        tag: Name,
        namespace: Option<Name>,
    },
    Text(String),
}

/// A headless platform node
#[derive(Debug, Clone)]
pub struct MemoryNode {
    pub kind: NodeKind,
    pub attributes: IndexMap<Name, String>,
    pub styles: IndexMap<Name, String>,
    pub listeners: SmallVec<[(Name, Listener); 2]>,
    pub inner_html: Option<String>,
    pub children: Vec<NodeId>,
    /// Live checked state, distinct from the `checked` attribute
    pub checked: bool,
    /// Live value, distinct from the `value` attribute
    pub value: Option<String>,
}

impl MemoryNode {
    pub fn element(tag: &str, namespace: Option<&str>) -> Self {
        Self::with_kind(NodeKind::Element {
            tag: tag.into(),
            namespace: namespace.map(Into::into),
        })
    }

    pub fn text(value: &str) -> Self {
        Self::with_kind(NodeKind::Text(value.to_string()))
    }

    fn with_kind(kind: NodeKind) -> Self {
        Self {
            kind,
            attributes: IndexMap::new(),
            styles: IndexMap::new(),
            listeners: SmallVec::new(),
            inner_html: None,
            children: Vec::new(),
            checked: false,
            value: None,
        }
    }

    pub fn tag(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Element { tag, .. } => Some(tag),
            NodeKind::Text(_) => None,
        }
    }
}

/// Arena-based storage for headless nodes.
///
/// Disposed slots are recycled, so an id is only meaningful while its node
/// is alive.
pub struct NodeArena {
    nodes: Vec<Option<MemoryNode>>,
    parents: Vec<Option<NodeId>>,
    free_list: Vec<u32>,
}

impl NodeArena {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            parents: Vec::new(),
            free_list: Vec::new(),
        }
    }

    pub fn create(&mut self, node: MemoryNode) -> NodeId {
        let index = match self.free_list.pop() {
            Some(idx) => idx as usize,
            None => self.nodes.len(),
        };

        if index >= self.nodes.len() {
            self.nodes.push(Some(node));
            self.parents.push(None);
        } else {
            self.nodes[index] = Some(node);
            self.parents[index] = None;
        }

        NodeId(index as u32)
    }

    pub fn get(&self, id: NodeId) -> Option<&MemoryNode> {
        self.nodes.get(id.0 as usize)?.as_ref()
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut MemoryNode> {
        self.nodes.get_mut(id.0 as usize)?.as_mut()
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        *self.parents.get(id.0 as usize)?
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        let siblings = self.children(self.parent(id)?);
        let position = siblings.iter().position(|c| *c == id)?;
        siblings.get(position + 1).copied()
    }

    /// Unlink a node from its parent, keeping it alive
    pub fn detach(&mut self, id: NodeId) {
        let Some(parent) = self.parent(id) else {
            return;
        };
        if let Some(p) = self.get_mut(parent) {
            p.children.retain(|c| *c != id);
        }
        self.parents[id.0 as usize] = None;
    }

    /// Link `child` under `parent` at `index` (or last), moving it if it is attached elsewhere
    pub fn attach(&mut self, parent: NodeId, child: NodeId, index: Option<usize>) {
        self.detach(child);
        let Some(p) = self.get_mut(parent) else {
            return;
        };
        match index {
            Some(i) if i <= p.children.len() => p.children.insert(i, child),
            _ => p.children.push(child),
        }
        if let Some(slot) = self.parents.get_mut(child.0 as usize) {
            *slot = Some(parent);
        }
    }

    /// Drop a node and its whole subtree
    pub fn dispose(&mut self, id: NodeId) {
        self.detach(id);
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.nodes.get_mut(current.0 as usize).and_then(Option::take) {
                stack.extend(node.children);
                self.free_list.push(current.0);
            }
            if let Some(slot) = self.parents.get_mut(current.0 as usize) {
                *slot = None;
            }
        }
    }

    /// Drop every child subtree of `id`
    pub fn dispose_children(&mut self, id: NodeId) {
        let children = self.children(id).to_vec();
        for child in children {
            self.dispose(child);
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len() - self.free_list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for NodeArena {
    fn default() -> Self {
        Self::new()
    }
}
