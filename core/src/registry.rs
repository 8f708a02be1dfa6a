//! Variant capabilities and the process-wide tag registry.

use std::sync::Arc;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Result, VariantError};
use crate::schema::augment_schema;

/// Reserved discriminator key injected into variant schemas and read back
/// from decoded sub-trees.
pub const DISCRIMINATOR_KEY: &str = "_type";

/// The capability a concrete variant of a polymorphic type exposes.
///
/// Implementors supply the variant's fixed identifying tag, its exported
/// schema document, and structural validation. The provided
/// [`accept`](VariantSchema::accept) method performs the discriminator
/// check every construction path must pass through: a sub-tree tagged as a
/// different variant is rejected with
/// [`DiscriminatorMismatch`](VariantError::DiscriminatorMismatch) before any
/// validation runs.
pub trait VariantSchema: std::fmt::Debug + Send + Sync {
    /// The variant's fixed identifying tag (conventionally its type name).
    fn tag(&self) -> &str;

    /// The variant's exported schema document, without augmentation.
    fn json_schema(&self) -> Value;

    /// Names of the fields this variant declares.
    fn field_names(&self) -> Vec<String>;

    /// The variant's declared default value, if any.
    fn default_value(&self) -> Option<Value> {
        None
    }

    /// Structural validation of a decoded sub-tree against this variant.
    ///
    /// Value-level validation (string-to-int parsing and the like) belongs
    /// to the external model layer; implementations here check structure
    /// only.
    fn validate(&self, tree: &Value) -> Result<()>;

    /// Checks the sub-tree's discriminator against this variant's fixed
    /// tag, then delegates to [`validate`](VariantSchema::validate).
    ///
    /// `key` is the reserved discriminator key configured on the registry.
    fn accept(&self, tree: &Value, key: &str) -> Result<()> {
        let found = tree
            .get(key)
            .and_then(Value::as_str)
            .ok_or_else(|| VariantError::MissingDiscriminator {
                key: key.to_string(),
            })?;
        if found != self.tag() {
            return Err(VariantError::DiscriminatorMismatch {
                expected: self.tag().to_string(),
                found: found.to_string(),
            });
        }
        self.validate(tree)
    }
}

/// A [`VariantSchema`] backed by a plain JSON Schema document.
///
/// Field names come from the document's `properties` object, the default
/// from its `default` member, and validation checks that the sub-tree is an
/// object carrying every `required` field. External model layers with
/// richer validation implement [`VariantSchema`] themselves.
///
/// # Examples
///
/// ```
/// use nested_form_core::{DocumentVariant, VariantSchema};
/// use serde_json::json;
///
/// let variant = DocumentVariant::new(
///     "Friend",
///     json!({
///         "title": "Friend",
///         "type": "object",
///         "properties": {"name": {"type": "string"}, "known_since": {"type": "string"}},
///         "required": ["name"],
///     }),
/// );
///
/// assert_eq!(variant.tag(), "Friend");
/// assert_eq!(variant.field_names(), vec!["name", "known_since"]);
/// assert!(variant.validate(&json!({"name": "Ann"})).is_ok());
/// assert!(variant.validate(&json!({})).is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentVariant {
    tag: String,
    schema: Value,
}

impl DocumentVariant {
    /// Creates a variant capability with an explicit tag.
    pub fn new(tag: impl Into<String>, schema: Value) -> Self {
        Self {
            tag: tag.into(),
            schema,
        }
    }

    /// Creates a variant capability tagged by the document's `title`.
    ///
    /// # Examples
    ///
    /// ```
    /// use nested_form_core::{DocumentVariant, VariantSchema};
    /// use serde_json::json;
    ///
    /// let doc = json!({"title": "FamilyMember", "type": "object", "properties": {}});
    /// let variant = DocumentVariant::from_document(doc).unwrap();
    /// assert_eq!(variant.tag(), "FamilyMember");
    /// ```
    pub fn from_document(schema: Value) -> Result<Self> {
        let tag = schema
            .get("title")
            .and_then(Value::as_str)
            .ok_or_else(|| VariantError::MissingSchema {
                tag: "<untitled>".to_string(),
            })?
            .to_string();
        Ok(Self { tag, schema })
    }
}

impl VariantSchema for DocumentVariant {
    fn tag(&self) -> &str {
        &self.tag
    }

    fn json_schema(&self) -> Value {
        self.schema.clone()
    }

    fn field_names(&self) -> Vec<String> {
        self.schema
            .get("properties")
            .and_then(Value::as_object)
            .map(|properties| properties.keys().cloned().collect())
            .unwrap_or_default()
    }

    fn default_value(&self) -> Option<Value> {
        self.schema.get("default").cloned()
    }

    fn validate(&self, tree: &Value) -> Result<()> {
        let Some(object) = tree.as_object() else {
            return Err(VariantError::Invalid {
                tag: self.tag.clone(),
                reason: "expected an object".to_string(),
            });
        };
        if let Some(required) = self.schema.get("required").and_then(Value::as_array) {
            for field in required.iter().filter_map(Value::as_str) {
                if !object.contains_key(field) {
                    return Err(VariantError::Invalid {
                        tag: self.tag.clone(),
                        reason: format!("missing required field '{field}'"),
                    });
                }
            }
        }
        Ok(())
    }
}

/// Process-wide mapping from discriminator tag to variant capability.
///
/// Built once at startup by explicit, append-only registration — each
/// variant registers itself deterministically rather than being discovered
/// through type introspection. Immutable afterwards: the registry is
/// `Send + Sync` and is shared across request-processing threads without
/// locking.
///
/// # Examples
///
/// ```
/// use nested_form_core::{DocumentVariant, VariantRegistry};
/// use serde_json::json;
/// use std::sync::Arc;
///
/// let mut registry = VariantRegistry::new();
/// registry
///     .register(Arc::new(DocumentVariant::new(
///         "Friend",
///         json!({"type": "object", "properties": {}}),
///     )))
///     .unwrap();
///
/// assert!(registry.resolve("Friend").is_some());
/// assert!(registry.resolve("Ghost").is_none());
/// ```
#[derive(Debug)]
pub struct VariantRegistry {
    discriminator: String,
    variants: IndexMap<String, Arc<dyn VariantSchema>>,
}

impl VariantRegistry {
    /// Creates an empty registry using the default [`DISCRIMINATOR_KEY`].
    pub fn new() -> Self {
        Self::with_discriminator(DISCRIMINATOR_KEY)
    }

    /// Creates an empty registry with a custom reserved discriminator key.
    pub fn with_discriminator(key: impl Into<String>) -> Self {
        Self {
            discriminator: key.into(),
            variants: IndexMap::new(),
        }
    }

    /// The reserved discriminator key this registry reads and injects.
    pub fn discriminator(&self) -> &str {
        &self.discriminator
    }

    /// Registers a variant under its own tag.
    ///
    /// Registration is append-only: re-registering an existing tag fails
    /// with [`DuplicateVariant`](VariantError::DuplicateVariant) instead of
    /// replacing, so registry contents never depend on initialization
    /// order.
    pub fn register(&mut self, variant: Arc<dyn VariantSchema>) -> Result<()> {
        let tag = variant.tag().to_string();
        if self.variants.contains_key(&tag) {
            return Err(VariantError::DuplicateVariant { tag });
        }
        self.variants.insert(tag, variant);
        Ok(())
    }

    /// Looks up a variant by tag.
    pub fn resolve(&self, tag: &str) -> Option<&Arc<dyn VariantSchema>> {
        self.variants.get(tag)
    }

    /// Determines which variant a reconciled sub-tree represents.
    ///
    /// Reads the reserved discriminator key from the sub-tree; fails with
    /// [`MissingDiscriminator`](VariantError::MissingDiscriminator) when
    /// absent and [`UnknownVariant`](VariantError::UnknownVariant) when the
    /// tag names no registered variant.
    ///
    /// # Examples
    ///
    /// ```
    /// use nested_form_core::{DocumentVariant, VariantRegistry, VariantError};
    /// use serde_json::json;
    /// use std::sync::Arc;
    ///
    /// let mut registry = VariantRegistry::new();
    /// registry
    ///     .register(Arc::new(DocumentVariant::new(
    ///         "Friend",
    ///         json!({"type": "object", "properties": {}}),
    ///     )))
    ///     .unwrap();
    ///
    /// let tree = json!({"_type": "Ghost", "name": "X"});
    /// assert_eq!(
    ///     registry.resolve_tree(&tree).unwrap_err(),
    ///     VariantError::UnknownVariant { tag: "Ghost".to_string() },
    /// );
    /// ```
    pub fn resolve_tree(&self, tree: &Value) -> Result<&Arc<dyn VariantSchema>> {
        let tag = tree
            .get(&self.discriminator)
            .and_then(Value::as_str)
            .ok_or_else(|| VariantError::MissingDiscriminator {
                key: self.discriminator.clone(),
            })?;
        self.resolve(tag)
            .ok_or_else(|| VariantError::UnknownVariant {
                tag: tag.to_string(),
            })
    }

    /// Resolves a sub-tree and delegates structural validation to the
    /// selected variant.
    pub fn validate_tree(&self, tree: &Value) -> Result<&Arc<dyn VariantSchema>> {
        let variant = self.resolve_tree(tree)?;
        variant.accept(tree, &self.discriminator)?;
        Ok(variant)
    }

    /// The variant's exported schema document with the discriminator
    /// property injected.
    pub fn augmented_schema(&self, tag: &str) -> Result<Value> {
        let variant = self
            .resolve(tag)
            .ok_or_else(|| VariantError::UnknownVariant {
                tag: tag.to_string(),
            })?;
        let mut document = variant.json_schema();
        augment_schema(&mut document, &self.discriminator, variant.tag())?;
        Ok(document)
    }

    /// Registered tags, in registration order.
    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.variants.keys().map(String::as_str)
    }

    /// Number of registered variants.
    pub fn len(&self) -> usize {
        self.variants.len()
    }

    /// Returns `true` when nothing is registered yet.
    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }
}

impl Default for VariantRegistry {
    fn default() -> Self {
        Self::new()
    }
}
