//! Bracket-path key parsing.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::{DecodeError, Result};

/// Default root prefix the form widget uses for nested field names.
pub const DEFAULT_ROOT: &str = "root";

/// Pattern for one bracketed group within an already-matched key.
static SEGMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]*)\]").expect("segment pattern is valid"));

/// Decoding configuration: the root prefix and its compiled key pattern.
///
/// The key pattern is compiled once per options value, so per-field parsing
/// is allocation-only. The root prefix must match the form widget's
/// configured root name; everything that does not match
/// `<root>[seg1][seg2]...` passes through as a verbatim top-level field.
///
/// # Examples
///
/// ```
/// use nested_form_decode::{DecodeOptions, parse_key};
///
/// let options = DecodeOptions::new();
/// assert_eq!(
///     parse_key("root[address][street]", &options).unwrap(),
///     vec!["address", "street"],
/// );
/// assert_eq!(parse_key("name", &options).unwrap(), vec!["name"]);
///
/// let custom = DecodeOptions::with_root("person");
/// assert_eq!(parse_key("person[age]", &custom).unwrap(), vec!["age"]);
/// ```
#[derive(Debug, Clone)]
pub struct DecodeOptions {
    root: String,
    key_pattern: Regex,
}

impl DecodeOptions {
    /// Creates options with the [`DEFAULT_ROOT`] prefix.
    pub fn new() -> Self {
        Self::with_root(DEFAULT_ROOT)
    }

    /// Creates options with a custom root prefix.
    pub fn with_root(root: impl Into<String>) -> Self {
        let root = root.into();
        let key_pattern = Regex::new(&format!(r"^{}(\[[^\]]*\])+$", regex::escape(&root)))
            .expect("key pattern is valid for any escaped root");
        Self { root, key_pattern }
    }

    /// The configured root prefix.
    pub fn root(&self) -> &str {
        &self.root
    }

    pub(crate) fn is_bracket_path(&self, key: &str) -> bool {
        self.key_pattern.is_match(key)
    }
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self::new()
    }
}

/// Parses a submitted field name into its ordered path segments.
///
/// A key matching `<root>[seg1][seg2]...[segN]` yields `[seg1, ..., segN]`.
/// Anything else is a verbatim top-level field with the single-segment path
/// `[key]` — a valid alternate case, not an error. The only failure mode is
/// an empty bracketed group (`root[]`), rejected with
/// [`DecodeError::EmptySegment`].
pub fn parse_key(key: &str, options: &DecodeOptions) -> Result<Vec<String>> {
    if !options.is_bracket_path(key) {
        return Ok(vec![key.to_string()]);
    }
    let groups = &key[options.root().len()..];
    let mut segments = Vec::new();
    for captures in SEGMENT.captures_iter(groups) {
        let segment = &captures[1];
        if segment.is_empty() {
            return Err(DecodeError::EmptySegment {
                key: key.to_string(),
            });
        }
        segments.push(segment.to_string());
    }
    Ok(segments)
}

/// Returns `true` when a segment is a decimal list index.
pub(crate) fn is_index(segment: &str) -> bool {
    !segment.is_empty() && segment.bytes().all(|byte| byte.is_ascii_digit())
}
