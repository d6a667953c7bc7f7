use super::{update_or_replace, BuildContext, RenderElement};
use crate::hot::Value;
use crate::node::NodeId;
use crate::widget::{ComponentWidget, Widget};
use std::rc::Rc;

/// Element for a [`ComponentWidget`].
///
/// Owns no node of its own: it renders its record through the record's
/// current behavior and delegates to the resulting child element. An
/// element stays bound to one record for its whole life.
///
/// Every update renders again. Output may depend on nested records or
/// captured state, so the child diff is what keeps unchanged output silent.
pub struct ComponentElement {
    parent: NodeId,
    widget: Widget,
    component: Rc<ComponentWidget>,
    child: Box<dyn RenderElement>,
}

impl ComponentElement {
    pub fn new(
        cx: &mut BuildContext<'_>,
        parent: NodeId,
        component: Rc<ComponentWidget>,
    ) -> Self {
        let rendered = component.record().render();
        let child = rendered.create_element(cx, parent);
        Self {
            parent,
            widget: Widget::Component(component.clone()),
            component,
            child,
        }
    }

    pub fn child(&self) -> &dyn RenderElement {
        self.child.as_ref()
    }
}

impl RenderElement for ComponentElement {
    fn node(&self) -> NodeId {
        self.child.node()
    }

    fn parent(&self) -> NodeId {
        self.parent
    }

    fn widget(&self) -> &Widget {
        &self.widget
    }

    fn mounted(&mut self) {
        self.component.record().mounted();
        self.child.mounted();
    }

    fn update(&mut self, cx: &mut BuildContext<'_>, widget: &Widget, force: bool) -> bool {
        let Widget::Component(next) = widget else {
            return false;
        };
        let record = next.record();
        if !Rc::ptr_eq(record, self.component.record()) {
            return false;
        }

        let rendered = record.render();
        update_or_replace(cx, &mut self.child, &rendered, force);
        tracing::trace!(
            class = %record.class_name(),
            revision = record.revision(),
            "re-rendered"
        );

        self.widget = widget.clone();
        self.component = next.clone();
        true
    }

    fn unmounted(&mut self) {
        self.component.record().unmounted();
        self.child.unmounted();
    }

    fn collect_state(&self, out: &mut Vec<Value>) {
        out.push(Value::Record(self.component.record().clone()));
        self.child.collect_state(out);
    }
}
