#![forbid(unsafe_code)]

//! Top-level error type for docfield hosts.
//!
//! Each crate keeps its own error enum; this one wraps them so a host can
//! propagate any of them with `?` and still match on the source.

use thiserror::Error;

pub use docfield_core::GeometryError;
pub use docfield_editor::{CollectionError, EditorError};
pub use docfield_meta::MetaError;

/// Any docfield failure.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Meta(#[from] MetaError),

    #[error(transparent)]
    Editor(#[from] EditorError),

    /// Host configuration JSON could not be read.
    #[error("invalid editor config: {0}")]
    Config(#[source] serde_json::Error),
}

impl From<CollectionError> for Error {
    fn from(error: CollectionError) -> Self {
        Self::Editor(EditorError::Collection(error))
    }
}

/// Standard result type for docfield APIs.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use docfield_core::field::FieldType;

    #[test]
    fn collection_errors_route_through_editor() {
        let error = Error::from(CollectionError::IndexOutOfRange { index: 1, len: 0 });
        assert!(matches!(
            error,
            Error::Editor(EditorError::Collection(CollectionError::IndexOutOfRange { .. }))
        ));
        assert_eq!(error.to_string(), "field index 1 out of range (len 0)");
    }

    #[test]
    fn meta_errors_keep_their_message() {
        let error = Error::from(MetaError::UnsupportedFieldType {
            field_type: FieldType::Signature,
        });
        assert_eq!(
            error.to_string(),
            "unsupported field type for metadata: SIGNATURE"
        );
    }
}
