use super::{BuildContext, RenderElement};
use crate::hot::Value;
use crate::node::NodeId;
use crate::widget::{TextWidget, Widget};
use std::rc::Rc;

pub struct TextElement {
    parent: NodeId,
    node: NodeId,
    widget: Widget,
    current: Rc<TextWidget>,
}

impl TextElement {
    pub fn new(cx: &mut BuildContext<'_>, parent: NodeId, widget: Rc<TextWidget>) -> Self {
        let node = cx.factory.create_text(widget.value());
        Self {
            parent,
            node,
            widget: Widget::Text(widget.clone()),
            current: widget,
        }
    }
}

impl RenderElement for TextElement {
    fn node(&self) -> NodeId {
        self.node
    }

    fn parent(&self) -> NodeId {
        self.parent
    }

    fn widget(&self) -> &Widget {
        &self.widget
    }

    fn mounted(&mut self) {}

    fn update(&mut self, cx: &mut BuildContext<'_>, widget: &Widget, force: bool) -> bool {
        let Widget::Text(next) = widget else {
            return false;
        };
        if force || next.value() != self.current.value() {
            cx.factory.set_text(self.node, next.value());
        }
        self.current = next.clone();
        self.widget = widget.clone();
        true
    }

    fn unmounted(&mut self) {}

    fn collect_state(&self, _out: &mut Vec<Value>) {}
}
