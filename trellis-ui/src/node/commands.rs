use super::types::NodeId;
use smartstring::{LazyCompact, SmartString};

type Name = SmartString<LazyCompact>;

/// A single platform mutation, as recorded by [`MemoryFactory`](crate::platform::MemoryFactory).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderCommand {
    CreateNode {
        node: NodeId,
        tag: Name,
        namespace: Option<Name>,
    },
    CreateText {
        node: NodeId,
        value: String,
    },
    SetAttribute {
        node: NodeId,
        name: Name,
        value: String,
    },
    RemoveAttribute {
        node: NodeId,
        name: Name,
    },
    SetStyle {
        node: NodeId,
        name: Name,
        value: String,
    },
    RemoveStyle {
        node: NodeId,
        name: Name,
    },
    AddListener {
        node: NodeId,
        event: Name,
    },
    RemoveListener {
        node: NodeId,
        event: Name,
    },
    SetInnerHtml {
        node: NodeId,
        html: String,
    },
    Clear {
        node: NodeId,
    },
    AppendChild {
        parent: NodeId,
        child: NodeId,
    },
    InsertBefore {
        parent: NodeId,
        child: NodeId,
        reference: NodeId,
    },
    Remove {
        node: NodeId,
    },
    SetText {
        node: NodeId,
        value: String,
    },
    SetChecked {
        node: NodeId,
        checked: bool,
    },
    SetValue {
        node: NodeId,
        value: Option<String>,
    },
}

impl RenderCommand {
    /// Node a command mutates (the parent for structural commands)
    pub fn node(&self) -> NodeId {
        match self {
            RenderCommand::CreateNode { node, .. }
            | RenderCommand::CreateText { node, .. }
            | RenderCommand::SetAttribute { node, .. }
            | RenderCommand::RemoveAttribute { node, .. }
            | RenderCommand::SetStyle { node, .. }
            | RenderCommand::RemoveStyle { node, .. }
            | RenderCommand::AddListener { node, .. }
            | RenderCommand::RemoveListener { node, .. }
            | RenderCommand::SetInnerHtml { node, .. }
            | RenderCommand::Clear { node }
            | RenderCommand::Remove { node }
            | RenderCommand::SetText { node, .. }
            | RenderCommand::SetChecked { node, .. }
            | RenderCommand::SetValue { node, .. } => *node,
            RenderCommand::AppendChild { parent, .. }
            | RenderCommand::InsertBefore { parent, .. } => *parent,
        }
    }

    pub fn is_create(&self) -> bool {
        matches!(
            self,
            RenderCommand::CreateNode { .. } | RenderCommand::CreateText { .. }
        )
    }
}
