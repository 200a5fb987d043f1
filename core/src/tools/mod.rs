pub mod error;
pub mod native;
pub mod registry;
pub mod traits;

// Re-export common types
pub use error::{ToolError, ToolResult};
pub use native::listenhub_registry;
pub use registry::ToolRegistry;
pub use traits::{no_progress, ProgressSink, Tool, ToolHints};
