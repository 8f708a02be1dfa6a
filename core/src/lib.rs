//! Core types for nested form decoding and variant resolution.
//!
//! This crate defines the foundational types shared by the decoding
//! pipeline and its consumers:
//!
//! - [`Node`] — the intermediate tree built from a flat form submission
//!   (insertion-ordered branches, sequences, and leaf values).
//! - [`VariantSchema`] — the capability a polymorphic variant exposes to
//!   this core: its tag, its exported schema document, its field set, and
//!   a validation seam.
//! - [`VariantRegistry`] — the process-wide, append-only mapping from
//!   discriminator tag to variant capability, built once at startup.
//! - [`augment_schema`] — injection of the reserved discriminator property
//!   into a variant's exported schema document, so the form widget
//!   round-trips the tag without operator input.
//!
//! Resolution failures ([`VariantError`]) carry the offending tag or key so
//! the caller can render a useful rejection.
//!
//! # Example
//!
//! ```
//! use nested_form_core::*;
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! let friend = DocumentVariant::new(
//!     "Friend",
//!     json!({"title": "Friend", "type": "object", "properties": {"name": {"type": "string"}}}),
//! );
//!
//! let mut registry = VariantRegistry::new();
//! registry.register(Arc::new(friend)).unwrap();
//!
//! let tree = json!({"_type": "Friend", "name": "Ann"});
//! let variant = registry.resolve_tree(&tree).unwrap();
//! assert_eq!(variant.tag(), "Friend");
//!
//! // The exported schema carries the discriminator with a fixed default.
//! let schema = registry.augmented_schema("Friend").unwrap();
//! assert_eq!(schema["properties"]["_type"]["default"], json!("Friend"));
//! ```

mod error;
mod node;
mod registry;
mod schema;

pub use error::{Result, VariantError};
pub use node::Node;
pub use registry::{DISCRIMINATOR_KEY, DocumentVariant, VariantRegistry, VariantSchema};
pub use schema::{augment_schema, augmented};
