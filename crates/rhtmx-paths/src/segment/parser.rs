/// Path template parsing
///
/// Turns a slash-joined path template into its segments and the positions of
/// its parameter slots. Built once per leaf at compile time.

use super::pattern::{classify_segment, SegmentKind};

/// Parsed form of a path template
///
/// `segments` keeps every non-empty segment in order, with parameter segments
/// already de-sigiled; `param_indexes` lists the positions of the parameters.
///
/// # Examples
///
/// ```
/// use rhtmx_paths::segment::parse_segments;
///
/// let parsed = parse_segments("/api/users/:id", ':');
/// assert_eq!(parsed.segments(), ["api", "users", "id"]);
/// assert_eq!(parsed.param_indexes(), [2]);
/// assert_eq!(parsed.template(), "/api/users/:id");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedSegments {
    template: String,
    segments: Vec<String>,
    param_indexes: Vec<usize>,
    leading_slash: bool,
    sigil: char,
}

impl ParsedSegments {
    /// Treats the whole path as literal text, ignoring any sigils
    ///
    /// Used for branch bases, which never take parameters.
    pub fn literal(path: &str, sigil: char) -> Self {
        ParsedSegments {
            template: path.to_string(),
            segments: split_segments(path).map(str::to_string).collect(),
            param_indexes: Vec::new(),
            leading_slash: path.starts_with('/'),
            sigil,
        }
    }

    /// The source template, unchanged
    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn param_indexes(&self) -> &[usize] {
        &self.param_indexes
    }

    /// Parameter names in declaration order
    pub fn param_names(&self) -> impl Iterator<Item = &str> {
        self.param_indexes.iter().map(|&i| self.segments[i].as_str())
    }

    pub fn param_count(&self) -> usize {
        self.param_indexes.len()
    }

    pub fn has_params(&self) -> bool {
        !self.param_indexes.is_empty()
    }

    pub fn leading_slash(&self) -> bool {
        self.leading_slash
    }

    pub fn sigil(&self) -> char {
        self.sigil
    }
}

/// Accumulator for fold-based parsing
///
/// All mutation is local to the fold; each step returns the updated state.
struct ParseState {
    segments: Vec<String>,
    param_indexes: Vec<usize>,
}

impl ParseState {
    fn new() -> Self {
        ParseState {
            segments: Vec::new(),
            param_indexes: Vec::new(),
        }
    }

    fn with_literal(mut self, text: String) -> Self {
        self.segments.push(text);
        self
    }

    fn with_param(mut self, name: String) -> Self {
        self.param_indexes.push(self.segments.len());
        self.segments.push(name);
        self
    }

    fn into_parsed(self, template: &str, sigil: char) -> ParsedSegments {
        ParsedSegments {
            template: template.to_string(),
            segments: self.segments,
            param_indexes: self.param_indexes,
            leading_slash: template.starts_with('/'),
            sigil,
        }
    }
}

/// Non-empty segments; leading, trailing and doubled slashes fall away
fn split_segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

/// Processes one segment into the parse state
fn process_segment(state: ParseState, segment: &str, sigil: char) -> ParseState {
    match classify_segment(segment, sigil) {
        SegmentKind::Param(name) => state.with_param(name),
        SegmentKind::Literal(text) => state.with_literal(text),
    }
}

/// Parses a path template into segments and parameter positions
///
/// Uses a single fold over the `/`-split segments:
/// - empty segments are dropped (so `//` and trailing `/` normalize away)
/// - segments starting with `sigil` become parameter slots
///
/// # Examples
///
/// ```
/// use rhtmx_paths::segment::parse_segments;
///
/// let parsed = parse_segments("/posts//misc/:id/something/:foo/", ':');
/// assert_eq!(parsed.segments(), ["posts", "misc", "id", "something", "foo"]);
/// assert_eq!(parsed.param_names().collect::<Vec<_>>(), vec!["id", "foo"]);
///
/// let parsed = parse_segments("/health", ':');
/// assert!(!parsed.has_params());
/// ```
///
/// # Performance
///
/// - O(n) where n is template length
/// - One allocation per segment
pub fn parse_segments(path: &str, sigil: char) -> ParsedSegments {
    split_segments(path)
        .fold(ParseState::new(), |state, segment| process_segment(state, segment, sigil))
        .into_parsed(path, sigil)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_static() {
        let parsed = parse_segments("/api/health", ':');
        assert_eq!(parsed.segments(), ["api", "health"]);
        assert!(parsed.param_indexes().is_empty());
        assert!(parsed.leading_slash());
    }

    #[test]
    fn test_parse_params() {
        let parsed = parse_segments("/api/:id/blah/:name", ':');
        assert_eq!(parsed.segments(), ["api", "id", "blah", "name"]);
        assert_eq!(parsed.param_indexes(), [1, 3]);
        assert_eq!(parsed.param_count(), 2);
    }

    #[test]
    fn test_parse_normalizes_slashes() {
        let parsed = parse_segments("//api///users/", ':');
        assert_eq!(parsed.segments(), ["api", "users"]);
        assert_eq!(parsed.template(), "//api///users/");
    }

    #[test]
    fn test_parse_without_leading_slash() {
        let parsed = parse_segments("users/:id", ':');
        assert!(!parsed.leading_slash());
        assert_eq!(parsed.param_indexes(), [1]);
    }

    #[test]
    fn test_parse_root_and_empty() {
        assert!(parse_segments("/", ':').segments().is_empty());
        assert!(parse_segments("", ':').segments().is_empty());
    }

    #[test]
    fn test_literal_ignores_sigils() {
        let parsed = ParsedSegments::literal("/users/:id", ':');
        assert!(!parsed.has_params());
        assert_eq!(parsed.segments(), ["users", ":id"]);
    }
}
