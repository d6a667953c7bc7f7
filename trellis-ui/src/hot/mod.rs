//! Live data records and hot-reload state migration.

mod migrate;
mod module;
mod record;
mod registry;

pub use migrate::{migrate, MigrationReport};
pub use module::{hot_mount, HotModule, Stash};
pub use record::{Behavior, HookFn, Record, RenderFn, Value};
pub use registry::{BehaviorRegistry, BehaviorResolver, ResolveError, Result as ResolveResult};
