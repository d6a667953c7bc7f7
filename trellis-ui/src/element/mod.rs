//! Live counterparts of widgets and the reconciliation protocol.

mod component;
mod html;
mod reconcile;
mod text;

pub use component::ComponentElement;
pub use html::HtmlElement;
pub use text::TextElement;

pub(crate) use reconcile::reconcile_children;

use crate::config::RenderConfig;
use crate::hot::Value;
use crate::node::NodeId;
use crate::platform::NodeFactory;
use crate::widget::Widget;

/// Everything an element needs while realizing or patching nodes
pub struct BuildContext<'a> {
    pub factory: &'a mut dyn NodeFactory,
    pub config: &'a RenderConfig,
}

impl<'a> BuildContext<'a> {
    pub fn new(factory: &'a mut dyn NodeFactory, config: &'a RenderConfig) -> Self {
        Self { factory, config }
    }
}

/// Mutable, live realization of a [`Widget`].
///
/// An element exclusively owns one platform node and its child elements.
/// `parent` is the node of the owning element, a back-reference only.
pub trait RenderElement {
    fn node(&self) -> NodeId;

    fn parent(&self) -> NodeId;

    /// Widget applied by the last successful create or update
    fn widget(&self) -> &Widget;

    /// Called top-down once the subtree exists and is attached
    fn mounted(&mut self);

    /// Reconcile against `widget`. Returns `false` without touching
    /// anything when the widget can't be applied to this element; the
    /// caller must then replace the element.
    fn update(&mut self, cx: &mut BuildContext<'_>, widget: &Widget, force: bool) -> bool;

    /// Called top-down when the element leaves the tree
    fn unmounted(&mut self);

    /// Push the live data records this subtree holds
    fn collect_state(&self, out: &mut Vec<Value>);
}

/// Update `element` in place, or replace it at the same position when the
/// widget is incompatible. Returns whether the existing element was reused.
///
/// Replacement destroys first: the stale node is removed and unmounted,
/// then the new element is created, inserted where the stale node was and
/// mounted.
pub(crate) fn update_or_replace(
    cx: &mut BuildContext<'_>,
    element: &mut Box<dyn RenderElement>,
    widget: &Widget,
    force: bool,
) -> bool {
    if element.update(cx, widget, force) {
        return true;
    }

    tracing::debug!(
        from = %element.widget().describe(),
        to = %widget.describe(),
        "incompatible widget, replacing element"
    );

    let parent = element.parent();
    let stale_node = element.node();
    let anchor = cx.factory.next_sibling(stale_node);
    cx.factory.remove(stale_node);
    element.unmounted();

    let replacement = widget.create_element(cx, parent);
    match anchor {
        Some(next) => cx.factory.insert_before(parent, replacement.node(), next),
        None => cx.factory.append_child(parent, replacement.node()),
    }
    *element = replacement;
    element.mounted();
    false
}
