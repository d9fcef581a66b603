pub mod codebase_tree;
pub mod dispatcher;
pub mod registry;
pub mod trait_def;

pub use codebase_tree::{CodebaseTreeArgs, CodebaseTreeTool, CODEBASE_TREE_TOOL};
pub use dispatcher::ToolDispatcher;
pub use registry::ToolRegistry;
pub use trait_def::{Tool, ToolError};
