use docfield_core::field::FieldType;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, MetaError>;

/// Failures raised by the metadata layer.
///
/// Validation findings are never errors; see [`crate::validate::Violation`].
#[derive(Debug, Error)]
pub enum MetaError {
    /// The field type carries no configurable metadata.
    #[error("unsupported field type for metadata: {field_type}")]
    UnsupportedFieldType { field_type: FieldType },

    /// An edit names a member the field's metadata variant does not have.
    #[error("change `{change}` does not apply to {field_type} metadata")]
    InapplicableChange {
        change: &'static str,
        field_type: FieldType,
    },

    /// Metadata could not be encoded for the draft store.
    #[error("failed to encode field metadata: {0}")]
    Encode(#[from] serde_json::Error),

    /// The draft store refused the write.
    #[error("draft store rejected `{key}`: {reason}")]
    DraftRejected { key: String, reason: String },
}
