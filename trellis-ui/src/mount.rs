use crate::config::RenderConfig;
use crate::element::{update_or_replace, BuildContext, RenderElement};
use crate::hot::{migrate, BehaviorResolver, MigrationReport, Value};
use crate::node::NodeId;
use crate::platform::NodeFactory;
use crate::widget::Widget;
use std::cell::RefCell;
use std::rc::Rc;

/// Shared handle to a mount, as stashed across hot reloads
pub type MountRef<F> = Rc<RefCell<Mount<F>>>;

/// A widget tree rendered into a container node.
///
/// The mount owns the factory and the root element; `rebuild` reconciles
/// the whole tree against a new root widget.
pub struct Mount<F: NodeFactory> {
    factory: F,
    config: RenderConfig,
    container: NodeId,
    root: Box<dyn RenderElement>,
}

impl<F: NodeFactory> Mount<F> {
    /// Render `widget` and append it to `container`
    pub fn new(factory: F, container: NodeId, widget: &Widget) -> Self {
        Self::with_config(factory, container, widget, RenderConfig::default())
    }

    pub fn with_config(
        mut factory: F,
        container: NodeId,
        widget: &Widget,
        config: RenderConfig,
    ) -> Self {
        let mut root = {
            let mut cx = BuildContext::new(&mut factory, &config);
            let root = widget.create_element(&mut cx, container);
            cx.factory.append_child(container, root.node());
            root
        };
        root.mounted();
        tracing::debug!(container = container.0, root = %widget.describe(), "mounted");

        Self {
            factory,
            config,
            container,
            root,
        }
    }

    /// Reconcile the tree against `widget`. Every component renders again;
    /// `force` also rewrites live attributes and text that compare equal.
    /// Returns whether the root element was kept.
    pub fn rebuild(&mut self, widget: &Widget, force: bool) -> bool {
        let mut cx = BuildContext::new(&mut self.factory, &self.config);
        let kept = update_or_replace(&mut cx, &mut self.root, widget, force);
        tracing::trace!(kept, force, "rebuilt");
        kept
    }

    /// Every record held by the live tree, as one migratable value
    pub fn state_graph(&self) -> Value {
        let mut records = Vec::new();
        self.root.collect_state(&mut records);
        Value::List(records)
    }

    /// Rebind the live records to the resolver's behaviors, then force a
    /// full rebuild against `widget`
    pub fn hot_reload(
        &mut self,
        widget: &Widget,
        resolver: &dyn BehaviorResolver,
    ) -> MigrationReport {
        let report = migrate(&self.state_graph(), resolver);
        self.rebuild(widget, true);
        report
    }

    /// Remove the rendered tree from the container and hand back the factory
    pub fn unmount(mut self) -> F {
        self.factory.remove(self.root.node());
        self.root.unmounted();
        tracing::debug!(container = self.container.0, "unmounted");
        self.factory
    }

    pub fn factory(&self) -> &F {
        &self.factory
    }

    pub fn factory_mut(&mut self) -> &mut F {
        &mut self.factory
    }

    pub fn container(&self) -> NodeId {
        self.container
    }

    pub fn root_node(&self) -> NodeId {
        self.root.node()
    }

    pub fn root(&self) -> &dyn RenderElement {
        self.root.as_ref()
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::RenderCommand;
    use crate::platform::MemoryFactory;
    use crate::widget::ElementWidget;

    fn mount(widget: &Widget) -> Mount<MemoryFactory> {
        let mut factory = MemoryFactory::new();
        let container = factory.create_container("body");
        Mount::new(factory, container, widget)
    }

    #[test]
    fn test_initial_render() {
        let widget = ElementWidget::builder("p").child("hi").build().unwrap();
        let m = mount(&widget);
        assert_eq!(
            m.factory().to_markup(m.container()),
            "<body><p>hi</p></body>"
        );
    }

    #[test]
    fn test_root_replacement_keeps_container_position() {
        let mut m = mount(&ElementWidget::builder("div").build().unwrap());
        let old = m.root_node();

        m.factory_mut().clear_commands();
        assert!(!m.rebuild(&Widget::text("plain"), false));

        let commands = m.factory_mut().take_commands();
        assert_eq!(commands[0], RenderCommand::Remove { node: old });
        assert!(matches!(commands[1], RenderCommand::CreateText { .. }));
        assert_eq!(
            commands.last(),
            Some(&RenderCommand::AppendChild {
                parent: m.container(),
                child: m.root_node(),
            })
        );
        assert_eq!(m.factory().children(m.container()), &[m.root_node()]);
        assert_eq!(
            m.factory().to_markup(m.container()),
            "<body>plain</body>"
        );
    }

    #[test]
    fn test_unmount_returns_factory() {
        let m = mount(&Widget::text("bye"));
        let container = m.container();
        let factory = m.unmount();
        assert!(factory.children(container).is_empty());
    }
}
