#![forbid(unsafe_code)]

//! Placed fields and their persisted input records.

use docfield_core::field::{FieldType, FormId, GeometryPatch};
use docfield_core::geometry::PageRect;
use docfield_core::{GeometryError, Result};
use docfield_core::recipient::{Recipient, SendStatus};
use docfield_meta::FieldMeta;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

/// A field positioned on a page, in page percentages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacedField {
    pub form_id: FormId,
    /// Persisted id, when the field already existed in storage.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub native_id: Option<i64>,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    /// 1-based page number.
    pub page_number: u32,
    pub page_x: f64,
    pub page_y: f64,
    pub page_width: f64,
    pub page_height: f64,
    pub signer_email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_meta: Option<FieldMeta>,
}

impl PlacedField {
    #[must_use]
    pub fn new(
        form_id: FormId,
        field_type: FieldType,
        page_number: u32,
        rect: PageRect,
        signer_email: impl Into<String>,
    ) -> Self {
        Self {
            form_id,
            native_id: None,
            field_type,
            page_number,
            page_x: rect.x,
            page_y: rect.y,
            page_width: rect.width,
            page_height: rect.height,
            signer_email: signer_email.into(),
            field_meta: None,
        }
    }

    #[must_use]
    pub const fn rect(&self) -> PageRect {
        PageRect::new(self.page_x, self.page_y, self.page_width, self.page_height)
    }

    pub fn set_rect(&mut self, rect: PageRect) {
        self.page_x = rect.x;
        self.page_y = rect.y;
        self.page_width = rect.width;
        self.page_height = rect.height;
    }

    /// Replace only the members the patch carries.
    pub fn apply_patch(&mut self, patch: &GeometryPatch) {
        self.set_rect(patch.apply_to(self.rect()));
    }

    /// Positive size, fully on its page.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.rect().is_within_page()
    }

    /// Whether `selected` may move, resize, or remove this field.
    ///
    /// Fields belong to their signer; nobody edits fields of a recipient who
    /// was already sent the document.
    #[must_use]
    pub fn editable_by(&self, selected: Option<&Recipient>) -> bool {
        selected.is_some_and(|recipient| {
            recipient.email == self.signer_email && recipient.send_status != SendStatus::Sent
        })
    }
}

/// A field record as persisted by the document store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredField {
    pub id: i64,
    pub document_id: i64,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    /// 1-based page number.
    pub page: u32,
    pub position_x: f64,
    pub position_y: f64,
    pub width: f64,
    pub height: f64,
    pub recipient_id: i64,
    #[serde(default)]
    pub field_meta: Option<Value>,
}

impl StoredField {
    /// Editor view of a stored record.
    ///
    /// The signer email comes from `recipients` (empty when the recipient is
    /// gone). The stored rectangle is clamped onto the page. Stored metadata
    /// is coerced over the type's defaults; types without metadata carry
    /// none.
    ///
    /// Fails for page number 0.
    pub fn to_placed(&self, recipients: &[Recipient]) -> Result<PlacedField> {
        if self.page == 0 {
            warn!(message = "field.load.invalid_page", native_id = self.id);
            return Err(GeometryError::InvalidPageNumber {
                page_number: self.page,
            });
        }

        let stored_rect = PageRect::new(self.position_x, self.position_y, self.width, self.height);
        let rect = stored_rect.clamped();
        if rect != stored_rect {
            warn!(
                message = "field.load.clamped",
                native_id = self.id,
                page_x = self.position_x,
                page_y = self.position_y,
                page_width = self.width,
                page_height = self.height
            );
        }

        let signer_email = recipients
            .iter()
            .find(|recipient| recipient.id == self.recipient_id)
            .map(|recipient| recipient.email.clone())
            .unwrap_or_default();
        if signer_email.is_empty() {
            warn!(
                message = "field.load.orphaned",
                native_id = self.id,
                recipient_id = self.recipient_id
            );
        }

        let field_meta = self
            .field_meta
            .as_ref()
            .filter(|_| self.field_type.has_advanced_settings())
            .and_then(|stored| FieldMeta::from_stored(self.field_type, stored).ok());

        Ok(PlacedField {
            form_id: FormId::for_stored(self.id, self.document_id),
            native_id: Some(self.id),
            field_type: self.field_type,
            page_number: self.page,
            page_x: rect.x,
            page_y: rect.y,
            page_width: rect.width,
            page_height: rect.height,
            signer_email,
            field_meta,
        })
    }
}
