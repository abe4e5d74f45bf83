// File: src/validate.rs
// Purpose: Optional whole-URL shape check

use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::UrlCheck;
use crate::error::{PathError, Result};

/// Built-in URL shape pattern
///
/// Path segments may hold unreserved characters, `%` escapes and `:` parameter
/// placeholders. The optional query tail must be `key=value(&key=value)*`,
/// with values free of whitespace and shell-unsafe characters.
pub const DEFAULT_URL_PATTERN: &str = concat!(
    r"^(?:/[A-Za-z0-9._~:%-]*)*",
    r"(?:\?[A-Za-z0-9._~%-]+=[^\s&=?#<>\\^`|*()$;'!]*",
    r"(?:&[A-Za-z0-9._~%-]+=[^\s&=?#<>\\^`|*()$;'!]*)*)?$"
);

static DEFAULT_URL_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(DEFAULT_URL_PATTERN).expect("default URL pattern is valid"));

/// Checks fully substituted URLs against a pattern
///
/// Cheap to clone: `Regex` shares its compiled program.
#[derive(Debug, Clone, Default)]
pub enum Validator {
    #[default]
    Disabled,
    Pattern(Regex),
}

impl Validator {
    /// Builds a validator from the configured check
    pub fn from_check(check: &UrlCheck) -> Result<Self> {
        match check {
            UrlCheck::Disabled => Ok(Validator::Disabled),
            UrlCheck::Default => Ok(Validator::Pattern(DEFAULT_URL_REGEX.clone())),
            UrlCheck::Pattern(pattern) => Regex::new(pattern)
                .map(Validator::Pattern)
                .map_err(|source| PathError::InvalidRegex {
                    pattern: pattern.clone(),
                    source,
                }),
        }
    }

    /// Fails with `RegexValidationFailure` when `url` does not match
    ///
    /// A no-op when validation is disabled.
    pub fn validate(&self, url: &str) -> Result<()> {
        match self {
            Validator::Pattern(regex) if !regex.is_match(url) => {
                tracing::debug!(url, pattern = regex.as_str(), "URL rejected by validation pattern");
                Err(PathError::RegexValidationFailure {
                    url: url.to_string(),
                })
            }
            _ => Ok(()),
        }
    }
}
