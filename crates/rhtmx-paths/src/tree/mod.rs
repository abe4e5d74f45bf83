/// Route tree module
///
/// The input model (`Branch`, `RouteNode`) and the walk that turns it into a
/// compiled tree of absolute paths and URL formatters.

pub mod node;
pub mod walker;

// Re-export commonly used types
pub use node::{Branch, RouteNode};
pub use walker::{compile, compile_json, CompiledBranch, CompiledNode};
