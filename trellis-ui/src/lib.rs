pub mod config;
pub mod element;
pub mod hot;
pub mod mount;
pub mod node;
pub mod platform;
pub mod widget;

// Re-export key types
pub use config::RenderConfig;
pub use hot::{hot_mount, migrate, Behavior, BehaviorRegistry, HotModule, Record, Value};
pub use mount::{Mount, MountRef};
pub use node::{Event, Listener, NodeId};
pub use platform::{MemoryFactory, NodeFactory};
pub use widget::{class_map, ElementWidget, Key, Widget, WidgetError};
