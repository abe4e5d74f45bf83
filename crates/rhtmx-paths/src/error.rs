// File: src/error.rs
// Purpose: Error type shared by tree compilation and URL formatting

use thiserror::Error;

/// Errors raised while compiling a route tree or formatting a URL
///
/// Structural variants (`MissingBaseKey`, `ReservedKey`, `ForwardSlashViolation`,
/// `InvalidRegex`) abort compilation. The remaining variants are raised by a
/// single formatter call and leave the compiled tree usable.
#[derive(Debug, Error)]
pub enum PathError {
    /// A branch has no base-key entry, or the entry is not a string
    #[error("Base key must exist on every object and the value must be a string: {label}")]
    MissingBaseKey { label: String },

    /// A builder child was registered under the reserved base-key name
    #[error("Key \"{key}\" under \"{label}\" collides with the base key")]
    ReservedKey { key: String, label: String },

    /// Strict mode: number of supplied path values differs from the declared parameters
    #[error(
        "Option strict_key_names is set but the number of keys on the value object ({found}) \
         did not match the number of URL parameters ({expected}) for route \"{route}\""
    )]
    ParamCountMismatch {
        route: String,
        expected: usize,
        found: usize,
    },

    /// Strict mode: a declared path parameter was not supplied
    #[error(
        "Option strict_key_names is set but \"{key}\" was not present on the value object \
         for route \"{route}\""
    )]
    MissingParamKey { key: String, route: String },

    /// Strict mode: supplied query keys differ from the declared query keys
    #[error(
        "Option strict_key_names is set but the query keys [{}] did not match the declared \
         keys [{}] for route \"{route}\"",
        .found.join(", "),
        .expected.join(", ")
    )]
    QueryKeyMismatch {
        route: String,
        expected: Vec<String>,
        found: Vec<String>,
    },

    /// The fully substituted URL does not match the validation pattern
    #[error("URL \"{url}\" failed to pass validation")]
    RegexValidationFailure { url: String },

    /// A fragment does not start with `/`
    #[error("Path \"{path}\" under \"{parent}\" must begin with a forward slash")]
    ForwardSlashViolation { path: String, parent: String },

    /// A custom validation pattern could not be compiled
    #[error("Invalid URL validation pattern \"{pattern}\": {source}")]
    InvalidRegex {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, PathError>;
