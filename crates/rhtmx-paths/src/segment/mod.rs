/// Segment module for path templates
///
/// Splits a path template into `/`-delimited segments, tells literal segments
/// from parameter slots, and substitutes call-time values into the slots.
/// Parsing happens once per leaf; substitution reuses the parsed form on
/// every call.

pub mod parser;
pub mod pattern;
pub mod substitute;

// Re-export commonly used types
pub use parser::{parse_segments, ParsedSegments};
pub use pattern::{classify_segment, SegmentKind};
pub use substitute::substitute;
