mod arena;
mod commands;
mod types;

pub use arena::{MemoryNode, NodeArena, NodeKind};
pub use commands::RenderCommand;
pub use types::{Event, Listener, NodeId};
