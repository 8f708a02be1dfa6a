//! Decode flat bracket-path form submissions into nested JSON trees.
//!
//! Form widgets submit nested data as a flat mapping of bracket-path field
//! names to string values (`root[address][street]`, `root[hobbies][0]`,
//! `root[contacts][1][_type]`). This crate reconstructs the nested
//! structure the model layer expects, in three steps:
//!
//! - [`parse_key`] — splits a bracket-path key into ordered path segments
//!   (keys outside the grammar pass through as verbatim top-level fields).
//! - [`TreeBuilder`] — accumulates `(path, value)` pairs into an
//!   auto-vivifying tree, deferring the list-vs-object decision.
//! - [`reconcile`] — converts every branch whose keys are contiguous
//!   decimal indexes into an ordered sequence, recursively.
//!
//! The primary entry point is [`decode_form`], which runs all three over
//! one submission. Value-level validation (parsing `"21"` into an integer,
//! resolving polymorphic variants) is the consumer's job — see the
//! `nested-form-core` registry types.
//!
//! # Example
//!
//! ```
//! use nested_form_decode::{DecodeOptions, decode_form};
//! use serde_json::json;
//!
//! let options = DecodeOptions::new();
//! let tree = decode_form(
//!     [
//!         ("name", json!("John Doe")),
//!         ("root[address][city]", json!("New York")),
//!         ("root[hobbies][0]", json!("walking")),
//!         ("root[hobbies][1]", json!("reading")),
//!     ],
//!     &options,
//! )
//! .unwrap();
//!
//! assert_eq!(
//!     tree,
//!     json!({
//!         "name": "John Doe",
//!         "address": {"city": "New York"},
//!         "hobbies": ["walking", "reading"],
//!     })
//! );
//! ```

mod build;
mod error;
mod path;
mod reconcile;

pub use build::TreeBuilder;
pub use error::{DecodeError, Result};
pub use path::{DEFAULT_ROOT, DecodeOptions, parse_key};
pub use reconcile::reconcile;

pub use nested_form_core::Node;

use serde_json::Value;

/// Decodes one submission's flat fields into a nested value tree.
///
/// Fields are applied in iteration order, which makes the duplicate-path
/// tie-break deterministic: the last write in input order wins. The result
/// is an insertion-order-preserving tree of objects, arrays, and scalar
/// leaves, ready for the external validation layer.
///
/// # Errors
///
/// Any [`DecodeError`] aborts the whole submission; a malformed nested
/// input never partially applies.
///
/// # Examples
///
/// ```
/// use nested_form_decode::{DecodeError, DecodeOptions, decode_form};
/// use serde_json::json;
///
/// let options = DecodeOptions::new();
/// let err = decode_form(
///     [("root[a][0]", json!("x")), ("root[a][foo]", json!("y"))],
///     &options,
/// )
/// .unwrap_err();
/// assert_eq!(err, DecodeError::AmbiguousStructure { path: "a".to_string() });
/// ```
pub fn decode_form<I, K>(fields: I, options: &DecodeOptions) -> Result<Value>
where
    I: IntoIterator<Item = (K, Value)>,
    K: AsRef<str>,
{
    let mut builder = TreeBuilder::new(options);
    for (key, value) in fields {
        builder.insert(key.as_ref(), value)?;
    }
    reconcile(builder.finish())
}
