/// Tree walk: route tree → compiled tree
///
/// Recursive descent that accumulates absolute prefixes, compiles every leaf,
/// and produces an output tree with exactly the input's keys at every level.

use tracing::debug;

use super::node::{Branch, RouteNode, ROOT_LABEL};
use crate::config::Options;
use crate::error::{PathError, Result};
use crate::formatter::{compile_base, compile_leaf, CompiledLeaf, FormatContext};

/// One node of the compiled tree
#[derive(Debug, Clone)]
pub enum CompiledNode {
    Leaf(CompiledLeaf),
    Branch(CompiledBranch),
}

impl CompiledNode {
    pub fn as_leaf(&self) -> Option<&CompiledLeaf> {
        match self {
            CompiledNode::Leaf(leaf) => Some(leaf),
            CompiledNode::Branch(_) => None,
        }
    }

    pub fn as_branch(&self) -> Option<&CompiledBranch> {
        match self {
            CompiledNode::Branch(branch) => Some(branch),
            CompiledNode::Leaf(_) => None,
        }
    }
}

/// A compiled branch
///
/// The base-key entry is kept as a constant leaf under the base-key name, so
/// the key set mirrors the input object (base key first, then children in
/// declaration order).
///
/// # Examples
///
/// ```
/// use rhtmx_paths::{compile, values, Branch, Options};
///
/// let routes = Branch::new("/api").branch("Users", Branch::new("/users").leaf("One", "/:id"));
/// let paths = compile(&routes, &Options::default()).unwrap();
///
/// assert_eq!(paths.base(), "/api");
/// assert_eq!(paths.branch("Users").unwrap().base(), "/api/users");
///
/// let one = paths.route("Users.One").unwrap();
/// assert_eq!(one.with_path(values! { "id" => 42 }).unwrap(), "/api/users/42");
/// assert_eq!(one.url().unwrap(), "/api/users/:id");
/// ```
#[derive(Debug, Clone)]
pub struct CompiledBranch {
    base_key: String,
    entries: Vec<(String, CompiledNode)>,
}

impl CompiledBranch {
    pub fn base_key(&self) -> &str {
        &self.base_key
    }

    /// Absolute prefix of this branch (prepend included)
    pub fn base(&self) -> &str {
        self.leaf(&self.base_key)
            .and_then(CompiledLeaf::as_str)
            .unwrap_or_default()
    }

    pub fn get(&self, key: &str) -> Option<&CompiledNode> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, node)| node)
    }

    pub fn leaf(&self, key: &str) -> Option<&CompiledLeaf> {
        self.get(key).and_then(CompiledNode::as_leaf)
    }

    pub fn branch(&self, key: &str) -> Option<&CompiledBranch> {
        self.get(key).and_then(CompiledNode::as_branch)
    }

    /// Follows a dotted key path: `"Posts.Private.Delete"`
    pub fn lookup(&self, dotted: &str) -> Option<&CompiledNode> {
        let (first, rest) = match dotted.split_once('.') {
            Some((first, rest)) => (first, Some(rest)),
            None => (dotted, None),
        };
        match (self.get(first)?, rest) {
            (node, None) => Some(node),
            (CompiledNode::Branch(branch), Some(rest)) => branch.lookup(rest),
            (CompiledNode::Leaf(_), Some(_)) => None,
        }
    }

    /// Dotted lookup that must end at a leaf
    pub fn route(&self, dotted: &str) -> Option<&CompiledLeaf> {
        self.lookup(dotted).and_then(CompiledNode::as_leaf)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CompiledNode)> {
        self.entries.iter().map(|(k, node)| (k.as_str(), node))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of leaves in this subtree, base entries excluded
    pub fn leaf_count(&self) -> usize {
        self.iter()
            .filter(|(key, _)| *key != self.base_key)
            .map(|(_, node)| match node {
                CompiledNode::Leaf(_) => 1,
                CompiledNode::Branch(branch) => branch.leaf_count(),
            })
            .sum()
    }
}

/// Walk state shared by every level of one compilation
struct Walker<'a> {
    base_key: &'a str,
    enforce_leading_slash: bool,
    context: FormatContext,
}

impl Walker<'_> {
    fn check_fragment(&self, fragment: &str, parent: &str) -> Result<()> {
        if self.enforce_leading_slash && !fragment.is_empty() && !fragment.starts_with('/') {
            return Err(PathError::ForwardSlashViolation {
                path: fragment.to_string(),
                parent: parent.to_string(),
            });
        }
        Ok(())
    }

    /// Compiles `branch`, whose own base was already checked by the caller
    fn walk(&self, branch: &Branch, prefix: &str, label: &str) -> Result<CompiledBranch> {
        let local_prefix = format!("{}{}", prefix, branch.base());
        debug!(label, base = %local_prefix, "compiling branch");

        let mut entries = Vec::with_capacity(branch.len() + 1);
        entries.push((
            self.base_key.to_string(),
            CompiledNode::Leaf(compile_base(&local_prefix, &self.context)?),
        ));

        for (key, node) in branch.children() {
            if key == self.base_key {
                return Err(PathError::ReservedKey {
                    key: key.to_string(),
                    label: label.to_string(),
                });
            }
            let compiled = match node {
                RouteNode::Leaf(fragment) => {
                    self.check_fragment(fragment, label)?;
                    CompiledNode::Leaf(compile_leaf(&format!("{}{}", local_prefix, fragment), &self.context)?)
                }
                RouteNode::Branch(child) => {
                    self.check_fragment(child.base(), label)?;
                    CompiledNode::Branch(self.walk(child, &local_prefix, key)?)
                }
            };
            entries.push((key.to_string(), compiled));
        }

        Ok(CompiledBranch {
            base_key: self.base_key.to_string(),
            entries,
        })
    }
}

/// Compiles a route tree
///
/// Fails fast on the first structural problem. The result is immutable and
/// independent of any other compilation of the same tree.
pub fn compile(root: &Branch, options: &Options) -> Result<CompiledBranch> {
    let walker = Walker {
        base_key: &options.base_key,
        enforce_leading_slash: options.enforce_leading_slash,
        context: FormatContext::new(&options.format, options.prepend.clone())?,
    };
    walker.check_fragment(root.base(), ROOT_LABEL)?;
    let compiled = walker.walk(root, "", ROOT_LABEL)?;
    debug!(leaves = compiled.leaf_count(), "compiled route tree");
    Ok(compiled)
}

/// Compiles a duck-typed tree (JSON object, or TOML converted to JSON)
///
/// ```
/// use rhtmx_paths::{compile_json, Options};
/// use serde_json::json;
///
/// let paths = compile_json(
///     &json!({ "_": "/api", "Users": { "_": "/users", "Add": "/add" } }),
///     &Options::default(),
/// )
/// .unwrap();
/// assert_eq!(paths.route("Users.Add").unwrap().as_str(), Some("/api/users/add"));
/// ```
pub fn compile_json(root: &serde_json::Value, options: &Options) -> Result<CompiledBranch> {
    let branch = Branch::from_json(root, &options.base_key)?;
    compile(&branch, options)
}
