/// Segment classification for path templates
///
/// Pure functions: same input → same output, no side effects.

/// A single `/`-delimited segment of a path template
///
/// # Examples
///
/// ```
/// use rhtmx_paths::segment::{classify_segment, SegmentKind};
///
/// assert_eq!(classify_segment("users", ':'), SegmentKind::Literal("users".to_string()));
/// assert_eq!(classify_segment(":id", ':'), SegmentKind::Param("id".to_string()));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum SegmentKind {
    /// Named parameter, sigil already stripped: `:id` → `id`
    Param(String),
    /// Static text segment
    Literal(String),
}

impl SegmentKind {
    pub fn is_param(&self) -> bool {
        matches!(self, SegmentKind::Param(_))
    }

    /// Segment text; for parameters, the name without sigil
    pub fn text(&self) -> &str {
        match self {
            SegmentKind::Param(name) | SegmentKind::Literal(name) => name,
        }
    }
}

/// Classifies a segment as parameter or literal
///
/// A segment is a parameter when it starts with `sigil` and a name follows.
/// A lone sigil stays literal since it names nothing.
///
/// # Examples
///
/// ```
/// use rhtmx_paths::segment::{classify_segment, SegmentKind};
///
/// assert!(classify_segment(":slug", ':').is_param());
/// assert!(!classify_segment(":", ':').is_param());
/// assert!(classify_segment("{id", '{').is_param());
/// ```
pub fn classify_segment(segment: &str, sigil: char) -> SegmentKind {
    match segment.strip_prefix(sigil) {
        Some(name) if !name.is_empty() => SegmentKind::Param(name.to_string()),
        _ => SegmentKind::Literal(segment.to_string()),
    }
}
