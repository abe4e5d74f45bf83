/// Route tree input model
///
/// Branches carry their base fragment as a field, so the base-key invariant
/// holds by construction for trees built in code. Duck-typed input (JSON or
/// TOML) goes through [`Branch::from_json`], which checks it node by node.

use serde_json::Value as Json;

use crate::error::{PathError, Result};

/// Label used for the root node in error messages
pub const ROOT_LABEL: &str = "<root>";

/// One node of the route tree
#[derive(Debug, Clone, PartialEq)]
pub enum RouteNode {
    /// Path template, e.g. `/delete/:id` or `/search?q={}`
    Leaf(String),
    Branch(Branch),
}

impl From<Branch> for RouteNode {
    fn from(branch: Branch) -> Self {
        RouteNode::Branch(branch)
    }
}

impl From<&str> for RouteNode {
    fn from(fragment: &str) -> Self {
        RouteNode::Leaf(fragment.to_string())
    }
}

impl From<String> for RouteNode {
    fn from(fragment: String) -> Self {
        RouteNode::Leaf(fragment)
    }
}

/// A branch: its own base fragment plus ordered children
///
/// # Examples
///
/// ```
/// use rhtmx_paths::Branch;
///
/// let routes = Branch::new("/api")
///     .leaf("Health", "/health")
///     .branch("Users", Branch::new("/users").leaf("One", "/:id"));
///
/// assert_eq!(routes.base(), "/api");
/// assert_eq!(routes.keys().collect::<Vec<_>>(), vec!["Health", "Users"]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Branch {
    base: String,
    children: Vec<(String, RouteNode)>,
}

impl Branch {
    pub fn new(base: impl Into<String>) -> Self {
        Branch {
            base: base.into(),
            children: Vec::new(),
        }
    }

    /// Adds a leaf template under `key`
    pub fn leaf(self, key: impl Into<String>, fragment: impl Into<String>) -> Self {
        self.child(key, RouteNode::Leaf(fragment.into()))
    }

    /// Adds a nested branch under `key`
    pub fn branch(self, key: impl Into<String>, branch: Branch) -> Self {
        self.child(key, RouteNode::Branch(branch))
    }

    /// Adds any node under `key`, replacing an existing child in place
    pub fn child(mut self, key: impl Into<String>, node: impl Into<RouteNode>) -> Self {
        self.insert(key, node);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, node: impl Into<RouteNode>) {
        let key = key.into();
        let node = node.into();
        match self.children.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = node,
            None => self.children.push((key, node)),
        }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn get(&self, key: &str) -> Option<&RouteNode> {
        self.children
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, node)| node)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.children.iter().map(|(k, _)| k.as_str())
    }

    pub fn children(&self) -> impl Iterator<Item = (&str, &RouteNode)> {
        self.children.iter().map(|(k, node)| (k.as_str(), node))
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Reads a duck-typed tree: objects are branches, strings are leaves
    ///
    /// Every object needs a string under `base_key`. A missing or non-string
    /// base, a non-object root, or a child that is neither string nor object
    /// fails with `MissingBaseKey` naming the offending node.
    ///
    /// # Examples
    ///
    /// ```
    /// use rhtmx_paths::Branch;
    /// use serde_json::json;
    ///
    /// let tree = Branch::from_json(&json!({ "_": "/api", "Health": "/health" }), "_").unwrap();
    /// assert_eq!(tree.base(), "/api");
    ///
    /// let err = Branch::from_json(&json!({ "_": "/api", "Users": { "Add": "/add" } }), "_");
    /// assert!(err.is_err());
    /// ```
    pub fn from_json(value: &Json, base_key: &str) -> Result<Self> {
        branch_from_json(value, base_key, ROOT_LABEL)
    }
}

fn branch_from_json(value: &Json, base_key: &str, label: &str) -> Result<Branch> {
    let missing = || PathError::MissingBaseKey {
        label: label.to_string(),
    };

    let object = value.as_object().ok_or_else(missing)?;
    let base = object
        .get(base_key)
        .and_then(Json::as_str)
        .ok_or_else(missing)?;

    let mut branch = Branch::new(base);
    for (key, child) in object.iter().filter(|(key, _)| *key != base_key) {
        let node = match child {
            Json::String(fragment) => RouteNode::Leaf(fragment.clone()),
            // Anything else is recursed into and rejected there with this key
            other => RouteNode::Branch(branch_from_json(other, base_key, key)?),
        };
        branch.insert(key.as_str(), node);
    }
    Ok(branch)
}
