// File: src/config.rs
// Purpose: Compiler options and route declaration files

use anyhow::{Context, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fs;
use std::path::Path;

use crate::tree::{compile_json, CompiledBranch};

/// Reserved branch key holding the branch's own fragment
pub const DEFAULT_BASE_KEY: &str = "_";

/// Marks a parameter segment: `/users/:id`
pub const DEFAULT_SIGIL: char = ':';

/// URL validation setting
///
/// In configuration files: `true` (built-in pattern), `false` (off) or a
/// pattern string.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum UrlCheck {
    #[default]
    Disabled,
    Default,
    Pattern(String),
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum UrlCheckRepr {
    Flag(bool),
    Pattern(String),
}

impl<'de> Deserialize<'de> for UrlCheck {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        Ok(match UrlCheckRepr::deserialize(deserializer)? {
            UrlCheckRepr::Flag(true) => UrlCheck::Default,
            UrlCheckRepr::Flag(false) => UrlCheck::Disabled,
            UrlCheckRepr::Pattern(pattern) => UrlCheck::Pattern(pattern),
        })
    }
}

impl Serialize for UrlCheck {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            UrlCheck::Disabled => UrlCheckRepr::Flag(false),
            UrlCheck::Default => UrlCheckRepr::Flag(true),
            UrlCheck::Pattern(pattern) => UrlCheckRepr::Pattern(pattern.clone()),
        }
        .serialize(serializer)
    }
}

/// Options for a single path formatter
///
/// Also usable on its own with [`compile_path`](crate::compile_path).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormatOptions {
    /// Require supplied keys to match declared parameters exactly (default: true)
    #[serde(default = "default_true")]
    pub strict_key_names: bool,

    /// Whole-URL validation (default: disabled)
    #[serde(default)]
    pub regex: UrlCheck,

    /// Parameter segment marker (default: `:`)
    #[serde(default = "default_sigil")]
    pub sigil: char,

    /// Percent-encode substituted path values and query pairs (default: false)
    #[serde(default = "default_false")]
    pub percent_encode: bool,
}

/// Options for compiling a whole route tree
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Options {
    /// Prefix added to every URL after validation, e.g. scheme and host
    #[serde(default)]
    pub prepend: Option<String>,

    /// Reserved branch key name (default: `_`)
    #[serde(default = "default_base_key")]
    pub base_key: String,

    /// Reject fragments that do not begin with `/` (default: false)
    #[serde(default = "default_false")]
    pub enforce_leading_slash: bool,

    #[serde(flatten)]
    pub format: FormatOptions,
}

// Default values
fn default_true() -> bool {
    true
}

fn default_false() -> bool {
    false
}

fn default_sigil() -> char {
    DEFAULT_SIGIL
}

fn default_base_key() -> String {
    DEFAULT_BASE_KEY.to_string()
}

// Default implementations
impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            strict_key_names: true,
            regex: UrlCheck::Disabled,
            sigil: default_sigil(),
            percent_encode: false,
        }
    }
}

impl Default for Options {
    fn default() -> Self {
        Self {
            prepend: None,
            base_key: default_base_key(),
            enforce_leading_slash: false,
            format: FormatOptions::default(),
        }
    }
}

impl FormatOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_strict_key_names(mut self, strict: bool) -> Self {
        self.strict_key_names = strict;
        self
    }

    pub fn with_regex(mut self, check: UrlCheck) -> Self {
        self.regex = check;
        self
    }

    pub fn with_sigil(mut self, sigil: char) -> Self {
        self.sigil = sigil;
        self
    }

    pub fn with_percent_encode(mut self, encode: bool) -> Self {
        self.percent_encode = encode;
        self
    }
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_prepend(mut self, prepend: impl Into<String>) -> Self {
        self.prepend = Some(prepend.into());
        self
    }

    pub fn with_base_key(mut self, base_key: impl Into<String>) -> Self {
        self.base_key = base_key.into();
        self
    }

    pub fn with_leading_slash_enforced(mut self, enforce: bool) -> Self {
        self.enforce_leading_slash = enforce;
        self
    }

    pub fn with_strict_key_names(mut self, strict: bool) -> Self {
        self.format.strict_key_names = strict;
        self
    }

    pub fn with_regex(mut self, check: UrlCheck) -> Self {
        self.format.regex = check;
        self
    }

    pub fn with_sigil(mut self, sigil: char) -> Self {
        self.format.sigil = sigil;
        self
    }

    pub fn with_percent_encode(mut self, encode: bool) -> Self {
        self.format.percent_encode = encode;
        self
    }
}

/// A route declaration file: options plus the route tree
///
/// ```toml
/// [options]
/// prepend = "http://localhost:3000"
/// regex = true
///
/// [routes]
/// _ = "/api"
/// Health = "/health"
///
/// [routes.Users]
/// _ = "/users"
/// One = "/:id"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutesFile {
    #[serde(default)]
    pub options: Options,

    #[serde(default)]
    pub routes: serde_json::Value,
}

impl RoutesFile {
    /// Load a declaration file; `.json` files are read as JSON, others as TOML
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read routes file: {:?}", path))?;

        let file = if path.extension().is_some_and(|ext| ext == "json") {
            Self::from_json_str(&content)
        } else {
            Self::from_toml_str(&content)
        }
        .with_context(|| format!("Failed to parse routes file: {:?}", path))?;

        tracing::debug!(path = %path.display(), "loaded routes file");
        Ok(file)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Compile the declared routes with the declared options
    pub fn compile(&self) -> crate::Result<CompiledBranch> {
        compile_json(&self.routes, &self.options)
    }
}
