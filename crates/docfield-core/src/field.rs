#![forbid(unsafe_code)]

//! Field identity and kind.

use std::fmt;
use std::hash::BuildHasher;

use serde::{Deserialize, Serialize};

use crate::geometry::PageRect;

/// Kind of a placed field. Fixed for the lifetime of the field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FieldType {
    Signature,
    Email,
    Name,
    Date,
    Text,
    Number,
    Radio,
    Checkbox,
    Dropdown,
}

impl FieldType {
    /// Every field type, in palette order.
    pub const ALL: [Self; 9] = [
        Self::Signature,
        Self::Email,
        Self::Name,
        Self::Date,
        Self::Text,
        Self::Number,
        Self::Radio,
        Self::Checkbox,
        Self::Dropdown,
    ];

    /// Stable upper-case tag, as stored.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Signature => "SIGNATURE",
            Self::Email => "EMAIL",
            Self::Name => "NAME",
            Self::Date => "DATE",
            Self::Text => "TEXT",
            Self::Number => "NUMBER",
            Self::Radio => "RADIO",
            Self::Checkbox => "CHECKBOX",
            Self::Dropdown => "DROPDOWN",
        }
    }

    /// Human-facing name.
    #[must_use]
    pub const fn friendly_name(self) -> &'static str {
        match self {
            Self::Signature => "Signature",
            Self::Email => "Email",
            Self::Name => "Name",
            Self::Date => "Date",
            Self::Text => "Text",
            Self::Number => "Number",
            Self::Radio => "Radio",
            Self::Checkbox => "Checkbox",
            Self::Dropdown => "Select",
        }
    }

    /// Whether the field carries user-configurable metadata.
    #[must_use]
    pub const fn has_advanced_settings(self) -> bool {
        matches!(
            self,
            Self::Text | Self::Number | Self::Radio | Self::Checkbox | Self::Dropdown
        )
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// FormId
// ---------------------------------------------------------------------------

/// Client-side field identifier, stable for the editing session.
///
/// Not the persisted id: fields that already exist in storage carry that as
/// `native_id` and get a form id derived from it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormId(String);

impl FormId {
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Form id for a field loaded from storage.
    #[must_use]
    pub fn for_stored(native_id: i64, document_id: i64) -> Self {
        Self(format!("{native_id}-{document_id}"))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FormId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FormId {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

/// Length of generated form ids.
pub const FORM_ID_LEN: usize = 12;

const FORM_ID_ALPHABET: &[u8; 62] =
    b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

/// Issues fresh form ids for newly placed fields.
///
/// Ids are a bijective mix of a per-allocator seed and a counter, so one
/// allocator never repeats itself. Generated ids are alphanumeric and can
/// never collide with the `"{native}-{document}"` ids of stored fields.
#[derive(Debug, Clone)]
pub struct FormIdAllocator {
    seed: u64,
    next: u64,
}

impl FormIdAllocator {
    /// Allocator with an explicit seed (deterministic ids for tests/replay).
    #[must_use]
    pub const fn with_seed(seed: u64) -> Self {
        Self { seed, next: 0 }
    }

    /// Allocate the next id.
    pub fn allocate(&mut self) -> FormId {
        let counter = self.next;
        self.next = self.next.wrapping_add(1);

        let mut value = splitmix64(self.seed ^ splitmix64(counter));
        // 62^11 > 2^64, so eleven digits hold the whole value.
        let mut digits = [0u8; FORM_ID_LEN - 1];
        for digit in digits.iter_mut().rev() {
            *digit = FORM_ID_ALPHABET[(value % 62) as usize];
            value /= 62;
        }

        let mut id = String::with_capacity(FORM_ID_LEN);
        id.push('f');
        id.extend(digits.iter().map(|&b| char::from(b)));
        FormId(id)
    }

    /// Number of ids issued so far.
    #[must_use]
    pub const fn issued(&self) -> u64 {
        self.next
    }
}

impl Default for FormIdAllocator {
    /// Allocator seeded from process randomness.
    fn default() -> Self {
        Self::with_seed(ahash::RandomState::new().hash_one(FORM_ID_LEN))
    }
}

fn splitmix64(mut z: u64) -> u64 {
    z = z.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

// ---------------------------------------------------------------------------
// GeometryPatch
// ---------------------------------------------------------------------------

/// Partial replacement of a field's page geometry.
///
/// A move patches only the origin; a resize patches origin and size (dragging
/// a left or top handle moves the origin too). Members left `None` are kept.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeometryPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_y: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_height: Option<f64>,
}

impl GeometryPatch {
    /// Patch produced by a move: origin only.
    #[must_use]
    pub const fn moved(rect: PageRect) -> Self {
        Self {
            page_x: Some(rect.x),
            page_y: Some(rect.y),
            page_width: None,
            page_height: None,
        }
    }

    /// Patch produced by a resize: origin and size.
    #[must_use]
    pub const fn resized(rect: PageRect) -> Self {
        Self {
            page_x: Some(rect.x),
            page_y: Some(rect.y),
            page_width: Some(rect.width),
            page_height: Some(rect.height),
        }
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.page_x.is_none()
            && self.page_y.is_none()
            && self.page_width.is_none()
            && self.page_height.is_none()
    }

    /// Apply onto `rect`, keeping unpatched members.
    #[must_use]
    pub fn apply_to(&self, rect: PageRect) -> PageRect {
        PageRect {
            x: self.page_x.unwrap_or(rect.x),
            y: self.page_y.unwrap_or(rect.y),
            width: self.page_width.unwrap_or(rect.width),
            height: self.page_height.unwrap_or(rect.height),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_type_serializes_upper_case() {
        assert_eq!(
            serde_json::to_string(&FieldType::Checkbox).unwrap(),
            "\"CHECKBOX\""
        );
        let parsed: FieldType = serde_json::from_str("\"DROPDOWN\"").unwrap();
        assert_eq!(parsed, FieldType::Dropdown);
        for ty in FieldType::ALL {
            assert_eq!(
                serde_json::to_string(&ty).unwrap(),
                format!("\"{}\"", ty.as_str())
            );
        }
    }

    #[test]
    fn only_form_types_have_advanced_settings() {
        let configurable: Vec<_> = FieldType::ALL
            .into_iter()
            .filter(|ty| ty.has_advanced_settings())
            .collect();
        assert_eq!(
            configurable,
            vec![
                FieldType::Text,
                FieldType::Number,
                FieldType::Radio,
                FieldType::Checkbox,
                FieldType::Dropdown
            ]
        );
    }

    #[test]
    fn allocator_ids_are_unique_and_fixed_length() {
        let mut ids = FormIdAllocator::with_seed(7);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..10_000 {
            let id = ids.allocate();
            assert_eq!(id.as_str().len(), FORM_ID_LEN);
            assert!(id.as_str().chars().all(|c| c.is_ascii_alphanumeric()));
            assert!(seen.insert(id));
        }
        assert_eq!(ids.issued(), 10_000);
    }

    #[test]
    fn allocator_is_deterministic_per_seed() {
        let mut a = FormIdAllocator::with_seed(42);
        let mut b = FormIdAllocator::with_seed(42);
        assert_eq!(a.allocate(), b.allocate());
        assert_eq!(a.allocate(), b.allocate());
    }

    #[test]
    fn stored_form_id_joins_native_and_document() {
        assert_eq!(FormId::for_stored(12, 3).as_str(), "12-3");
    }

    #[test]
    fn move_patch_keeps_size() {
        let base = PageRect::new(10.0, 10.0, 25.0, 10.0);
        let moved = GeometryPatch::moved(PageRect::new(30.0, 40.0, 99.0, 99.0)).apply_to(base);
        assert_eq!(moved, PageRect::new(30.0, 40.0, 25.0, 10.0));
    }

    #[test]
    fn empty_patch_serializes_to_empty_object() {
        assert!(GeometryPatch::default().is_empty());
        assert_eq!(
            serde_json::to_string(&GeometryPatch::default()).unwrap(),
            "{}"
        );
    }
}
