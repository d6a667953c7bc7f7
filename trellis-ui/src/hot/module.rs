use super::BehaviorResolver;
use crate::config::RenderConfig;
use crate::mount::{Mount, MountRef};
use crate::node::NodeId;
use crate::platform::NodeFactory;
use crate::widget::Widget;
use std::any::Any;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// Values carried from one module instance to its replacement
pub type Stash = HashMap<String, Box<dyn Any>>;

/// Host hook for a module that can be replaced at runtime.
///
/// `data` exposes what the previous instance stashed (absent on a cold
/// start); `dispose` registers a handler that fills the stash just before
/// this instance is thrown away.
pub trait HotModule {
    /// Declare that this module can take over from its predecessor
    fn accept(&mut self);

    fn data(&mut self) -> Option<&mut Stash>;

    fn dispose(&mut self, handler: Box<dyn FnOnce(&mut Stash)>);
}

/// Mount `widget`, reusing the mount stashed by a previous module instance
/// when there is one.
///
/// Without a host (`hot` is `None`) this is a plain mount through
/// `create`, which supplies the factory and container. With a stashed
/// mount, the live records are migrated through `resolver` and the tree is
/// force-rebuilt in place; `create` is not called.
pub fn hot_mount<F, C>(
    hot: Option<&mut dyn HotModule>,
    widget: &Widget,
    resolver: &dyn BehaviorResolver,
    config: RenderConfig,
    create: C,
) -> MountRef<F>
where
    F: NodeFactory + 'static,
    C: FnOnce() -> (F, NodeId),
{
    let key = config.hot_key().to_string();

    let Some(hot) = hot else {
        let (factory, container) = create();
        let mount = Mount::with_config(factory, container, widget, config);
        return Rc::new(RefCell::new(mount));
    };

    let stashed = hot
        .data()
        .and_then(|stash| stash.remove(&key))
        .and_then(|entry| match entry.downcast::<MountRef<F>>() {
            Ok(mount) => Some(*mount),
            Err(_) => {
                tracing::warn!(
                    key = %key,
                    "stashed entry is not a mount of this factory type, ignoring"
                );
                None
            }
        });
    hot.accept();

    let mount = match stashed {
        Some(mount) => {
            tracing::debug!("Hot reloading '{}' mount", key);
            let report = mount.borrow_mut().hot_reload(widget, resolver);
            tracing::debug!(
                visited = report.visited,
                rebound = report.rebound,
                "Reloaded '{}' mount",
                key
            );
            mount
        }
        None => {
            tracing::debug!("Initial render of '{}' mount", key);
            let (factory, container) = create();
            let mount = Mount::with_config(factory, container, widget, config);
            Rc::new(RefCell::new(mount))
        }
    };

    let stash_mount = mount.clone();
    hot.dispose(Box::new(move |stash: &mut Stash| {
        tracing::debug!("Disposing '{}' mount", key);
        stash.insert(key, Box::new(stash_mount));
    }));

    mount
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hot::BehaviorRegistry;
    use crate::platform::MemoryFactory;

    #[derive(Default)]
    struct FakeHost {
        stash: Option<Stash>,
        accepted: bool,
        handler: Option<Box<dyn FnOnce(&mut Stash)>>,
    }

    impl HotModule for FakeHost {
        fn accept(&mut self) {
            self.accepted = true;
        }

        fn data(&mut self) -> Option<&mut Stash> {
            self.stash.as_mut()
        }

        fn dispose(&mut self, handler: Box<dyn FnOnce(&mut Stash)>) {
            self.handler = Some(handler);
        }
    }

    fn create() -> (MemoryFactory, NodeId) {
        let mut factory = MemoryFactory::new();
        let container = factory.create_container("body");
        (factory, container)
    }

    #[test]
    fn test_without_host_is_plain_mount() {
        let registry = BehaviorRegistry::new();
        let mount = hot_mount(
            None,
            &Widget::text("a"),
            &registry,
            RenderConfig::default(),
            create,
        );
        let m = mount.borrow();
        assert_eq!(
            m.factory().to_markup(m.container()),
            "<body>a</body>"
        );
    }

    #[test]
    fn test_foreign_stash_entry_is_ignored() {
        let registry = BehaviorRegistry::new();
        let mut stash = Stash::new();
        stash.insert(
            RenderConfig::default().hot_key().to_string(),
            Box::new(42u32),
        );
        let mut host = FakeHost {
            stash: Some(stash),
            ..FakeHost::default()
        };

        let mount = hot_mount(
            Some(&mut host as &mut dyn HotModule),
            &Widget::text("a"),
            &registry,
            RenderConfig::default(),
            create,
        );
        assert!(host.accepted);
        assert!(host.handler.is_some());
        assert_eq!(mount.borrow().factory().commands().len(), 2);
    }
}
