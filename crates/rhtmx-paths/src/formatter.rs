// File: src/formatter.rs
// Purpose: Per-leaf compilation into constant URLs or URL formatters

use std::fmt;

use crate::config::FormatOptions;
use crate::error::Result;
use crate::query::{parse_query_keys, serialize_checked, split_template};
use crate::segment::{parse_segments, substitute, ParsedSegments};
use crate::validate::Validator;
use crate::value::{PathArgs, Values};

/// Runtime shape of a compiled leaf
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeafKind {
    /// No path parameters, no declared query keys
    Constant,
    /// Path parameters only
    Path,
    /// Declared query keys only
    Query,
    /// Both path parameters and declared query keys
    PathQuery,
}

impl LeafKind {
    /// Picks the shape from slot counts
    pub fn from_counts(path_slots: usize, query_slots: usize) -> Self {
        match (path_slots, query_slots) {
            (0, 0) => LeafKind::Constant,
            (_, 0) => LeafKind::Path,
            (0, _) => LeafKind::Query,
            _ => LeafKind::PathQuery,
        }
    }
}

impl fmt::Display for LeafKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LeafKind::Constant => "constant",
            LeafKind::Path => "path",
            LeafKind::Query => "query",
            LeafKind::PathQuery => "path+query",
        };
        f.write_str(name)
    }
}

/// Settings shared by every formatter of one compilation
///
/// Built once per tree (or per standalone template) so the validation
/// pattern is compiled a single time.
#[derive(Debug, Clone, Default)]
pub struct FormatContext {
    pub strict: bool,
    pub encode: bool,
    pub sigil: char,
    pub validator: Validator,
    pub prepend: Option<String>,
}

impl FormatContext {
    pub fn new(options: &FormatOptions, prepend: Option<String>) -> Result<Self> {
        Ok(FormatContext {
            strict: options.strict_key_names,
            encode: options.percent_encode,
            sigil: options.sigil,
            validator: Validator::from_check(&options.regex)?,
            prepend,
        })
    }

    fn apply_prepend(&self, url: String) -> String {
        match &self.prepend {
            Some(prefix) => format!("{}{}", prefix, url),
            None => url,
        }
    }
}

/// URL builder bound to one parsed template
///
/// Holds only immutable data; calls never mutate it, so one formatter can be
/// shared across threads.
#[derive(Debug, Clone)]
pub struct Formatter {
    template: String,
    segments: ParsedSegments,
    query_keys: Vec<String>,
    context: FormatContext,
}

impl Formatter {
    fn new(
        template: &str,
        segments: ParsedSegments,
        query_keys: Vec<String>,
        context: &FormatContext,
    ) -> Self {
        Formatter {
            template: template.to_string(),
            segments,
            query_keys,
            context: context.clone(),
        }
    }

    /// Full source template, including any query declaration
    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn param_names(&self) -> impl Iterator<Item = &str> {
        self.segments.param_names()
    }

    pub fn query_keys(&self) -> &[String] {
        &self.query_keys
    }

    /// Substitutes, serializes, validates, then prepends
    ///
    /// Validation sees the URL before the prepend prefix is added. Without
    /// path values a parameterized route renders its shape (`/users/:id`),
    /// which is not validated.
    pub fn format(&self, path: Option<&PathArgs>, search: Option<&Values>) -> Result<String> {
        let ctx = &self.context;
        let mut url = substitute(&self.segments, path, ctx.strict, ctx.encode, &self.template)?;
        url.push_str(&serialize_checked(
            search,
            &self.query_keys,
            ctx.strict,
            ctx.encode,
            &self.template,
        )?);
        if path.is_some() || !self.segments.has_params() {
            ctx.validator.validate(&url)?;
        }
        Ok(ctx.apply_prepend(url))
    }
}

/// A compiled route leaf
///
/// Constants carry their final URL (validated and prepended at compile time)
/// and still accept search values, which renders `url?key=value`.
///
/// # Examples
///
/// ```
/// use rhtmx_paths::{compile_path, values, FormatOptions, LeafKind};
///
/// let leaf = compile_path("/users/:id", &FormatOptions::default()).unwrap();
/// assert_eq!(leaf.kind(), LeafKind::Path);
/// assert_eq!(leaf.with_path(values! { "id" => 7 }).unwrap(), "/users/7");
/// assert_eq!(leaf.url().unwrap(), "/users/:id");
/// ```
#[derive(Debug, Clone)]
pub enum CompiledLeaf {
    Constant { url: String, formatter: Formatter },
    Path(Formatter),
    Query(Formatter),
    PathQuery(Formatter),
}

impl CompiledLeaf {
    pub fn kind(&self) -> LeafKind {
        match self {
            CompiledLeaf::Constant { .. } => LeafKind::Constant,
            CompiledLeaf::Path(_) => LeafKind::Path,
            CompiledLeaf::Query(_) => LeafKind::Query,
            CompiledLeaf::PathQuery(_) => LeafKind::PathQuery,
        }
    }

    pub fn formatter(&self) -> &Formatter {
        match self {
            CompiledLeaf::Constant { formatter, .. }
            | CompiledLeaf::Path(formatter)
            | CompiledLeaf::Query(formatter)
            | CompiledLeaf::PathQuery(formatter) => formatter,
        }
    }

    /// The constant URL, for leaves without parameters
    pub fn as_str(&self) -> Option<&str> {
        match self {
            CompiledLeaf::Constant { url, .. } => Some(url),
            _ => None,
        }
    }

    /// Source template (without prepend)
    pub fn template(&self) -> &str {
        self.formatter().template()
    }

    /// Formats with optional path and search values
    pub fn format(&self, path: Option<&PathArgs>, search: Option<&Values>) -> Result<String> {
        match (self, path, search) {
            (CompiledLeaf::Constant { url, .. }, None, None) => Ok(url.clone()),
            _ => self.formatter().format(path, search),
        }
    }

    /// URL with no values supplied: the constant, or the template with placeholders
    pub fn url(&self) -> Result<String> {
        self.format(None, None)
    }

    pub fn with_path(&self, path: impl Into<PathArgs>) -> Result<String> {
        self.format(Some(&path.into()), None)
    }

    pub fn with_search(&self, search: &Values) -> Result<String> {
        self.format(None, Some(search))
    }

    pub fn with_path_and_search(&self, path: impl Into<PathArgs>, search: &Values) -> Result<String> {
        self.format(Some(&path.into()), Some(search))
    }
}

/// Compiles one absolute leaf template into its runtime shape
///
/// The query half starts at the first `?`; its keys become the declared query
/// parameters. Constants are validated once here.
pub fn compile_leaf(template: &str, context: &FormatContext) -> Result<CompiledLeaf> {
    let (path, declaration) = split_template(template);
    let segments = parse_segments(path, context.sigil);
    let query_keys = declaration.map(parse_query_keys).unwrap_or_default();
    let kind = LeafKind::from_counts(segments.param_count(), query_keys.len());

    let leaf = match kind {
        LeafKind::Constant => {
            context.validator.validate(path)?;
            let formatter = Formatter::new(template, segments, query_keys, context);
            CompiledLeaf::Constant {
                url: context.apply_prepend(path.to_string()),
                formatter,
            }
        }
        LeafKind::Path => CompiledLeaf::Path(Formatter::new(template, segments, query_keys, context)),
        LeafKind::Query => CompiledLeaf::Query(Formatter::new(template, segments, query_keys, context)),
        LeafKind::PathQuery => {
            CompiledLeaf::PathQuery(Formatter::new(template, segments, query_keys, context))
        }
    };

    tracing::trace!(template, %kind, "compiled leaf");
    Ok(leaf)
}

/// Compiles a branch base: always a constant, validated once like any other
pub fn compile_base(path: &str, context: &FormatContext) -> Result<CompiledLeaf> {
    context.validator.validate(path)?;
    let segments = ParsedSegments::literal(path, context.sigil);
    Ok(CompiledLeaf::Constant {
        url: context.apply_prepend(path.to_string()),
        formatter: Formatter::new(path, segments, Vec::new(), context),
    })
}

/// Compiles a standalone path template, outside any tree
///
/// # Examples
///
/// ```
/// use rhtmx_paths::{compile_path, values, FormatOptions, LeafKind};
///
/// let leaf = compile_path("/search?q={}&page={}", &FormatOptions::default()).unwrap();
/// assert_eq!(leaf.kind(), LeafKind::Query);
/// let url = leaf.with_search(&values! { "q" => "rust", "page" => 2 }).unwrap();
/// assert_eq!(url, "/search?q=rust&page=2");
/// ```
pub fn compile_path(template: &str, options: &FormatOptions) -> Result<CompiledLeaf> {
    let context = FormatContext::new(options, None)?;
    compile_leaf(template, &context)
}
