//! # RHTMX Paths
//!
//! Declare an application's routes once, as a nested tree, and get back a
//! tree of the same shape holding absolute paths and URL builders:
//! - Base fragments accumulate down the tree (`/api` + `/users` + `/:id`)
//! - Parameter segments (`/users/:id`) with strict or lenient key checking
//! - Declared query keys (`/search?q={}&page={}`)
//! - Optional whole-URL validation against a built-in or custom pattern
//! - Optional prefix (scheme and host) added after validation
//!
//! ## Example
//!
//! ```
//! use rhtmx_paths::{compile, values, Branch, Options};
//!
//! let routes = Branch::new("/api")
//!     .leaf("Search", "/search")
//!     .branch("Users", Branch::new("/users").leaf("One", "/:id"));
//!
//! let paths = compile(&routes, &Options::default()).unwrap();
//!
//! assert_eq!(paths.branch("Users").unwrap().base(), "/api/users");
//! assert_eq!(
//!     paths.route("Users.One").unwrap().with_path(values! { "id" => 42 }).unwrap(),
//!     "/api/users/42"
//! );
//! assert_eq!(
//!     paths.route("Search").unwrap().with_search(&values! { "q" => "foo" }).unwrap(),
//!     "/api/search?q=foo"
//! );
//! ```
//!
//! ## Route files
//!
//! Trees can also be declared in TOML or JSON and loaded with
//! [`RoutesFile::load`], which reads an `[options]` table next to the
//! `[routes]` tree.

// ============================================================================
// Modules
// ============================================================================

mod config;
mod error;
mod formatter;
pub mod query;
pub mod segment;
mod tree;
mod validate;
mod value;

// ============================================================================
// Public API
// ============================================================================

pub use config::{
    FormatOptions, Options, RoutesFile, UrlCheck, DEFAULT_BASE_KEY, DEFAULT_SIGIL,
};
pub use error::{PathError, Result};
pub use formatter::{compile_path, CompiledLeaf, Formatter, LeafKind};
pub use tree::{compile, compile_json, Branch, CompiledBranch, CompiledNode, RouteNode};
pub use validate::DEFAULT_URL_PATTERN;
pub use value::{PathArgs, Value, Values};
