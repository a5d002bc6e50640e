use docfield_core::GeometryError;
use docfield_core::field::{FieldType, FormId};
use docfield_meta::MetaError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, EditorError>;

/// Rejected field collection mutations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CollectionError {
    /// The form id was already issued in this session.
    #[error("form id `{form_id}` is already in use")]
    DuplicateFormId { form_id: FormId },

    #[error("field index {index} out of range (len {len})")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("no field with form id `{form_id}`")]
    UnknownFormId { form_id: FormId },

    /// Metadata variant does not match the field's type.
    #[error("{meta_type} metadata cannot be attached to {field_type} field `{form_id}`")]
    MetaTypeMismatch {
        form_id: FormId,
        field_type: FieldType,
        meta_type: FieldType,
    },
}

/// Editor-level failures.
#[derive(Debug, Error)]
pub enum EditorError {
    #[error(transparent)]
    Collection(#[from] CollectionError),

    #[error(transparent)]
    Meta(#[from] MetaError),

    #[error(transparent)]
    Geometry(#[from] GeometryError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_form_id_message() {
        let error = CollectionError::DuplicateFormId {
            form_id: FormId::new("fDup"),
        };
        assert_eq!(error.to_string(), "form id `fDup` is already in use");
    }

    #[test]
    fn editor_error_is_transparent() {
        let error = EditorError::from(CollectionError::IndexOutOfRange { index: 4, len: 2 });
        assert_eq!(error.to_string(), "field index 4 out of range (len 2)");
    }
}
