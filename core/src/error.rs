//! Error types for variant registration and resolution.

use thiserror::Error;

/// Failures raised while registering variants or resolving a decoded
/// sub-tree against the registry.
///
/// Each variant names the offending tag or key. All failures are local and
/// synchronous; none is retryable, and none may be downgraded to a warning.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VariantError {
    /// The sub-tree has no discriminator field at all.
    #[error("missing discriminator field '{key}'")]
    MissingDiscriminator {
        /// Reserved discriminator key that was expected (e.g. `_type`).
        key: String,
    },

    /// The discriminator is present but names no registered variant.
    #[error("unknown variant tag '{tag}'")]
    UnknownVariant {
        /// Tag read from the sub-tree.
        tag: String,
    },

    /// A variant was asked to accept a sub-tree tagged as a different one.
    #[error("cannot load a '{found}' as a '{expected}'")]
    DiscriminatorMismatch {
        /// Tag of the variant doing the accepting.
        expected: String,
        /// Tag carried by the sub-tree.
        found: String,
    },

    /// A second registration attempted to reuse an existing tag.
    #[error("variant tag '{tag}' is already registered")]
    DuplicateVariant {
        /// Tag of the rejected registration.
        tag: String,
    },

    /// A variant's exported document is not an augmentable object schema.
    #[error("variant '{tag}' has no properties object in its schema document")]
    MissingSchema {
        /// Tag of the variant whose document was rejected.
        tag: String,
    },

    /// The variant's own validation rejected the sub-tree.
    #[error("variant '{tag}' rejected value: {reason}")]
    Invalid {
        /// Tag of the validating variant.
        tag: String,
        /// Human-readable rejection reason.
        reason: String,
    },
}

/// Convenience alias for results with [`VariantError`].
pub type Result<T> = std::result::Result<T, VariantError>;
