//! Discriminator injection into exported variant schema documents.
//!
//! Applied once per variant at schema-export time, never per request. The
//! injected property restricts the discriminator to the variant's own tag
//! and pre-fills it as the default, so the form widget includes the tag in
//! every submission without the operator ever typing it.

use serde_json::{Value, json};

use crate::error::{Result, VariantError};

/// Injects the reserved discriminator property into a schema document.
///
/// The document must already carry a `properties` object; a document
/// without one is rejected with
/// [`MissingSchema`](VariantError::MissingSchema) so a malformed capability
/// export is caught at startup rather than at submission time. The injected
/// property is an enumerated string with the variant's tag as its only
/// allowed value and as its default:
///
/// ```json
/// {"type": "string", "enum": ["Friend"], "default": "Friend", "title": "Type"}
/// ```
///
/// # Examples
///
/// ```
/// use nested_form_core::augment_schema;
/// use serde_json::json;
///
/// let mut document = json!({
///     "title": "Friend",
///     "type": "object",
///     "properties": {"name": {"type": "string"}},
/// });
/// augment_schema(&mut document, "_type", "Friend").unwrap();
///
/// assert_eq!(document["properties"]["_type"]["enum"], json!(["Friend"]));
/// assert_eq!(document["properties"]["_type"]["default"], json!("Friend"));
/// ```
pub fn augment_schema(document: &mut Value, key: &str, tag: &str) -> Result<()> {
    let properties = document
        .get_mut("properties")
        .and_then(Value::as_object_mut)
        .ok_or_else(|| VariantError::MissingSchema {
            tag: tag.to_string(),
        })?;
    properties.insert(
        key.to_string(),
        json!({
            "type": "string",
            "enum": [tag],
            "default": tag,
            "title": "Type",
        }),
    );
    Ok(())
}

/// Returns an augmented copy of a schema document.
///
/// Convenience over [`augment_schema`] for callers that want to keep the
/// raw document around.
pub fn augmented(document: &Value, key: &str, tag: &str) -> Result<Value> {
    let mut copy = document.clone();
    augment_schema(&mut copy, key, tag)?;
    Ok(copy)
}
