use super::{update_or_replace, BuildContext, RenderElement};
use crate::node::NodeId;
use crate::widget::{IndexedKey, KeyIndexer, Widget};
use std::collections::HashMap;

/// Keyed reconciliation of one sibling list.
///
/// Keyed children are matched by key; unkeyed children strictly by their
/// ordinal among unkeyed siblings. Each new widget, left to right, either
/// moves its match into place with a single insert-before and updates it,
/// or creates a new element at that slot. Leftover children are removed
/// from the end.
pub(crate) fn reconcile_children(
    cx: &mut BuildContext<'_>,
    parent: NodeId,
    children: &mut Vec<Box<dyn RenderElement>>,
    widgets: &[Widget],
    force: bool,
) {
    let mut indexer = KeyIndexer::default();
    let mut current: HashMap<IndexedKey, NodeId> = HashMap::with_capacity(children.len());
    for child in children.iter() {
        current.insert(indexer.next(child.widget().key()), child.node());
    }

    let mut indexer = KeyIndexer::default();
    for (index, widget) in widgets.iter().enumerate() {
        let indexed = indexer.next(widget.key());

        // Unprocessed children all sit at or after `index`; a match is
        // consumed so a duplicate key can't claim the same element twice.
        let position = current.remove(&indexed).and_then(|node| {
            children[index..]
                .iter()
                .position(|c| c.node() == node)
                .map(|offset| index + offset)
        });

        match position {
            Some(position) => {
                if position != index {
                    let reference = children[index].node();
                    cx.factory
                        .insert_before(parent, children[position].node(), reference);
                    let element = children.remove(position);
                    children.insert(index, element);
                    tracing::trace!(from = position, to = index, "moved child");
                }
                update_or_replace(cx, &mut children[index], widget, force);
            }
            None => {
                let element = widget.create_element(cx, parent);
                match children.get(index) {
                    Some(next) => cx.factory.insert_before(parent, element.node(), next.node()),
                    None => cx.factory.append_child(parent, element.node()),
                }
                children.insert(index, element);
                children[index].mounted();
                tracing::trace!(at = index, widget = %widget.describe(), "created child");
            }
        }
    }

    while children.len() > widgets.len() {
        if let Some(mut stale) = children.pop() {
            cx.factory.remove(stale.node());
            stale.unmounted();
            tracing::trace!(widget = %stale.widget().describe(), "removed child");
        }
    }
}
