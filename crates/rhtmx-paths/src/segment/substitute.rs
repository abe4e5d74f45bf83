/// Parameter substitution for parsed path templates

use std::borrow::Cow;

use super::parser::ParsedSegments;
use crate::error::{PathError, Result};
use crate::value::{PathArgs, Value};

/// Produces the concrete path for one call
///
/// - `None` → the source template, unchanged (describes the route shape)
/// - `PathArgs::Scalar` → the value fills every parameter slot
/// - `PathArgs::Map` → each slot takes the value under its name
///
/// With `strict` set, a map must hold exactly one key per parameter
/// (`ParamCountMismatch`) and every parameter must be present
/// (`MissingParamKey`). Without it, extra keys are ignored and unsupplied
/// parameters keep their placeholder.
///
/// The result is the slash-joined segments, with a leading slash when the
/// template had one.
///
/// # Examples
///
/// ```
/// use rhtmx_paths::segment::{parse_segments, substitute};
/// use rhtmx_paths::{values, PathArgs};
///
/// let parsed = parse_segments("/api/users/:id", ':');
/// let args = PathArgs::from(values! { "id" => 42 });
/// let path = substitute(&parsed, Some(&args), true, false, "/api/users/:id").unwrap();
/// assert_eq!(path, "/api/users/42");
///
/// let shape = substitute(&parsed, None, true, false, "/api/users/:id").unwrap();
/// assert_eq!(shape, "/api/users/:id");
/// ```
pub fn substitute(
    parsed: &ParsedSegments,
    args: Option<&PathArgs>,
    strict: bool,
    encode: bool,
    route: &str,
) -> Result<String> {
    let Some(args) = args else {
        return Ok(parsed.template().to_string());
    };

    if let (true, PathArgs::Map(values)) = (strict, args) {
        if values.len() != parsed.param_count() {
            return Err(PathError::ParamCountMismatch {
                route: route.to_string(),
                expected: parsed.param_count(),
                found: values.len(),
            });
        }
    }

    let mut segments: Vec<Cow<'_, str>> = parsed
        .segments()
        .iter()
        .map(|s| Cow::Borrowed(s.as_str()))
        .collect();

    for &index in parsed.param_indexes() {
        let name = parsed.segments()[index].as_str();
        segments[index] = match args {
            PathArgs::Scalar(value) => Cow::Owned(render(value, encode)),
            PathArgs::Map(values) => match values.get(name) {
                Some(value) => Cow::Owned(render(value, encode)),
                None if strict => {
                    return Err(PathError::MissingParamKey {
                        key: name.to_string(),
                        route: route.to_string(),
                    })
                }
                None => Cow::Owned(format!("{}{}", parsed.sigil(), name)),
            },
        };
    }

    let joined = segments.join("/");
    Ok(if parsed.leading_slash() {
        format!("/{}", joined)
    } else {
        joined
    })
}

fn render(value: &Value, encode: bool) -> String {
    let text = value.to_text();
    if encode {
        urlencoding::encode(&text).into_owned()
    } else {
        text
    }
}
