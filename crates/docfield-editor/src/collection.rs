#![forbid(unsafe_code)]

//! Ordered collection of placed fields.
//!
//! Fields are addressed by index for geometry updates (the order the host
//! renders them in) and by form id for metadata updates. New fields append
//! at the end.
//!
//! # Invariants
//!
//! 1. Form ids are unique for the life of the collection, including the ids
//!    of fields that have since been removed.
//! 2. A geometry update replaces only the members its patch carries.
//! 3. Metadata attached to a field always matches the field's type.

use ahash::AHashSet;
use docfield_core::field::{FormId, GeometryPatch};
use docfield_meta::FieldMeta;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::CollectionError;
use crate::field::PlacedField;

/// Record of one applied geometry update.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeometryChange {
    pub index: usize,
    pub patch: GeometryPatch,
}

#[derive(Debug, Clone, Default)]
pub struct FieldCollection {
    fields: Vec<PlacedField>,
    issued: AHashSet<FormId>,
}

impl FieldCollection {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a field, returning its index.
    pub fn append(&mut self, field: PlacedField) -> Result<usize, CollectionError> {
        if self.issued.contains(&field.form_id) {
            warn!(
                message = "collection.duplicate_form_id",
                form_id = %field.form_id
            );
            return Err(CollectionError::DuplicateFormId {
                form_id: field.form_id,
            });
        }
        self.issued.insert(field.form_id.clone());
        self.fields.push(field);
        Ok(self.fields.len() - 1)
    }

    /// Replace the patched members of the field at `index`.
    pub fn update_geometry(
        &mut self,
        index: usize,
        patch: GeometryPatch,
    ) -> Result<GeometryChange, CollectionError> {
        let len = self.fields.len();
        let Some(field) = self.fields.get_mut(index) else {
            warn!(message = "collection.index_out_of_range", index, len);
            return Err(CollectionError::IndexOutOfRange { index, len });
        };
        field.apply_patch(&patch);
        Ok(GeometryChange { index, patch })
    }

    /// Replace the metadata of the field with `form_id`, returning its index.
    pub fn update_meta(
        &mut self,
        form_id: &FormId,
        meta: FieldMeta,
    ) -> Result<usize, CollectionError> {
        let Some(index) = self.position(form_id) else {
            warn!(message = "collection.unknown_form_id", form_id = %form_id);
            return Err(CollectionError::UnknownFormId {
                form_id: form_id.clone(),
            });
        };
        let field = &mut self.fields[index];
        if meta.field_type() != field.field_type {
            warn!(
                message = "collection.meta_type_mismatch",
                form_id = %form_id,
                field_type = %field.field_type,
                meta_type = %meta.field_type()
            );
            return Err(CollectionError::MetaTypeMismatch {
                form_id: form_id.clone(),
                field_type: field.field_type,
                meta_type: meta.field_type(),
            });
        }
        field.field_meta = Some(meta);
        Ok(index)
    }

    /// Remove the field at `index`. Its form id stays reserved.
    pub fn remove(&mut self, index: usize) -> Result<PlacedField, CollectionError> {
        if index >= self.fields.len() {
            return Err(CollectionError::IndexOutOfRange {
                index,
                len: self.fields.len(),
            });
        }
        Ok(self.fields.remove(index))
    }

    /// Remove every field. Form ids stay reserved.
    pub fn remove_all(&mut self) -> Vec<PlacedField> {
        std::mem::take(&mut self.fields)
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&PlacedField> {
        self.fields.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PlacedField> {
        self.fields.iter()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[PlacedField] {
        &self.fields
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    #[must_use]
    pub fn position(&self, form_id: &FormId) -> Option<usize> {
        self.fields.iter().position(|field| &field.form_id == form_id)
    }

    #[must_use]
    pub fn find(&self, form_id: &FormId) -> Option<&PlacedField> {
        self.fields.iter().find(|field| &field.form_id == form_id)
    }

    /// Whether `form_id` was ever appended, even if since removed.
    #[must_use]
    pub fn is_issued(&self, form_id: &FormId) -> bool {
        self.issued.contains(form_id)
    }
}

impl<'a> IntoIterator for &'a FieldCollection {
    type Item = &'a PlacedField;
    type IntoIter = std::slice::Iter<'a, PlacedField>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docfield_core::field::FieldType;
    use docfield_core::geometry::PageRect;
    use tracing_test::traced_test;

    fn field(id: &str, field_type: FieldType) -> PlacedField {
        PlacedField::new(
            FormId::new(id),
            field_type,
            1,
            PageRect::new(10.0, 10.0, 20.0, 5.0),
            "a@example.com",
        )
    }

    #[test]
    fn append_keeps_order() {
        let mut fields = FieldCollection::new();
        assert_eq!(fields.append(field("f1", FieldType::Name)), Ok(0));
        assert_eq!(fields.append(field("f2", FieldType::Date)), Ok(1));
        let ids: Vec<_> = fields.iter().map(|f| f.form_id.as_str()).collect();
        assert_eq!(ids, ["f1", "f2"]);
    }

    #[test]
    fn duplicate_form_id_is_rejected_even_after_removal() {
        let mut fields = FieldCollection::new();
        fields.append(field("f1", FieldType::Name)).unwrap();
        assert_eq!(
            fields.append(field("f1", FieldType::Date)),
            Err(CollectionError::DuplicateFormId {
                form_id: FormId::new("f1")
            })
        );

        fields.remove(0).unwrap();
        assert!(fields.is_empty());
        assert!(fields.is_issued(&FormId::new("f1")));
        assert!(fields.append(field("f1", FieldType::Date)).is_err());
    }

    #[test]
    #[traced_test]
    fn duplicate_append_is_logged() {
        let mut fields = FieldCollection::new();
        fields.append(field("fX", FieldType::Radio)).unwrap();
        assert!(fields.append(field("fX", FieldType::Radio)).is_err());
        assert!(logs_contain("collection.duplicate_form_id"));
        assert_eq!(fields.len(), 1);
    }

    #[test]
    fn move_patch_keeps_size() {
        let mut fields = FieldCollection::new();
        fields.append(field("f1", FieldType::Text)).unwrap();
        let change = fields
            .update_geometry(0, GeometryPatch::moved(PageRect::new(50.0, 60.0, 1.0, 1.0)))
            .unwrap();
        assert_eq!(change.index, 0);
        assert_eq!(
            fields.get(0).map(PlacedField::rect),
            Some(PageRect::new(50.0, 60.0, 20.0, 5.0))
        );
    }

    #[test]
    fn resize_patch_replaces_all_members() {
        let mut fields = FieldCollection::new();
        fields.append(field("f1", FieldType::Text)).unwrap();
        let rect = PageRect::new(5.0, 6.0, 30.0, 8.0);
        fields.update_geometry(0, GeometryPatch::resized(rect)).unwrap();
        assert_eq!(fields.get(0).map(PlacedField::rect), Some(rect));
    }

    #[test]
    fn geometry_update_out_of_range() {
        let mut fields = FieldCollection::new();
        assert_eq!(
            fields.update_geometry(3, GeometryPatch::default()),
            Err(CollectionError::IndexOutOfRange { index: 3, len: 0 })
        );
    }

    #[test]
    fn meta_update_checks_type() {
        let mut fields = FieldCollection::new();
        fields.append(field("f1", FieldType::Number)).unwrap();
        let id = FormId::new("f1");

        let text = FieldMeta::default_for(FieldType::Text).unwrap();
        assert!(matches!(
            fields.update_meta(&id, text),
            Err(CollectionError::MetaTypeMismatch { .. })
        ));

        let number = FieldMeta::default_for(FieldType::Number).unwrap();
        assert_eq!(fields.update_meta(&id, number.clone()), Ok(0));
        assert_eq!(fields.find(&id).and_then(|f| f.field_meta.clone()), Some(number));

        assert!(matches!(
            fields.update_meta(&FormId::new("missing"), FieldMeta::default_for(FieldType::Number).unwrap()),
            Err(CollectionError::UnknownFormId { .. })
        ));
    }

    #[test]
    fn remove_all_empties_collection() {
        let mut fields = FieldCollection::new();
        fields.append(field("f1", FieldType::Name)).unwrap();
        fields.append(field("f2", FieldType::Name)).unwrap();
        let removed = fields.remove_all();
        assert_eq!(removed.len(), 2);
        assert!(fields.is_empty());
        assert!(fields.remove(0).is_err());
        assert_eq!(fields.position(&FormId::new("f2")), None);
    }
}
