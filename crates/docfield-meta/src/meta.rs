#![forbid(unsafe_code)]

//! Per-type field metadata.
//!
//! [`FieldMeta`] is a tagged union with one variant per configurable field
//! type. Each variant has one default state ([`FieldMeta::default_for`]) and
//! one rule set ([`FieldMeta::validate`]).
//!
//! # Invariants
//!
//! 1. A `FieldMeta` variant always matches the field type it was built for;
//!    [`FieldMeta::field_type`] recovers it.
//! 2. Stored metadata is read as "stored members over the default state".
//!    Members the stored value does not mention keep their defaults.
//! 3. Coercion never fails on data: malformed stored values fall back to the
//!    default state and are logged at `warn`.
//!
//! # Failure Modes
//!
//! | Input | Result |
//! |-------|--------|
//! | Field type without metadata | `MetaError::UnsupportedFieldType` |
//! | Stored value not an object | layer skipped, `warn` |
//! | Stored `type` tag for another variant | layer skipped, `warn` |
//! | Stored member of the wrong JSON type | default state, `warn` |
//! | Unparsable numeric member | member unset |

use docfield_core::field::FieldType;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

use crate::error::{MetaError, Result};
use crate::numeric::{lenient_count, lenient_number};
use crate::validate::{self, ValidationReport};

/// One option of a radio, checkbox, or dropdown field.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FieldOption {
    pub value: String,
    /// Pre-checked state. Ignored for dropdown options.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub checked: bool,
}

impl FieldOption {
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            checked: false,
        }
    }

    #[must_use]
    pub fn checked(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            checked: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TextFieldMeta {
    pub label: String,
    pub placeholder: String,
    pub text: String,
    #[serde(deserialize_with = "lenient_count")]
    pub character_limit: Option<u32>,
    pub required: bool,
    pub read_only: bool,
}

impl Default for TextFieldMeta {
    fn default() -> Self {
        Self {
            label: String::new(),
            placeholder: String::new(),
            text: String::new(),
            character_limit: Some(0),
            required: false,
            read_only: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NumberFieldMeta {
    pub label: String,
    pub placeholder: String,
    pub number_format: String,
    #[serde(deserialize_with = "lenient_number")]
    pub value: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    pub min_value: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    pub max_value: Option<f64>,
    pub required: bool,
    pub read_only: bool,
}

impl Default for NumberFieldMeta {
    fn default() -> Self {
        Self {
            label: String::new(),
            placeholder: String::new(),
            number_format: String::new(),
            value: Some(0.0),
            min_value: Some(0.0),
            max_value: Some(0.0),
            required: false,
            read_only: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RadioFieldMeta {
    pub label: String,
    pub placeholder: String,
    pub values: Vec<FieldOption>,
    pub required: bool,
    pub read_only: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CheckboxFieldMeta {
    pub label: String,
    pub placeholder: String,
    pub values: Vec<FieldOption>,
    /// Stored rule label, e.g. `"Select at least"`. Empty when unset.
    pub validation_rule: String,
    #[serde(deserialize_with = "lenient_count")]
    pub validation_length: Option<u32>,
    pub required: bool,
    pub read_only: bool,
}

impl Default for CheckboxFieldMeta {
    fn default() -> Self {
        Self {
            label: String::new(),
            placeholder: String::new(),
            values: Vec::new(),
            validation_rule: String::new(),
            validation_length: Some(0),
            required: false,
            read_only: false,
        }
    }
}

impl CheckboxFieldMeta {
    /// The parsed validation rule, if one is set and recognised.
    #[must_use]
    pub fn rule(&self) -> Option<CheckboxRule> {
        CheckboxRule::parse(&self.validation_rule)
    }

    #[must_use]
    pub fn checked_count(&self) -> usize {
        self.values.iter().filter(|option| option.checked).count()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DropdownFieldMeta {
    pub label: String,
    pub placeholder: String,
    pub values: Vec<FieldOption>,
    pub default_value: String,
    pub required: bool,
    pub read_only: bool,
}

/// How many checkbox options a signer must tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CheckboxRule {
    AtLeast,
    Exactly,
    AtMost,
}

impl CheckboxRule {
    pub const ALL: [Self; 3] = [Self::AtLeast, Self::Exactly, Self::AtMost];

    /// Label as stored in `validationRule`.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::AtLeast => "Select at least",
            Self::Exactly => "Select exactly",
            Self::AtMost => "Select at most",
        }
    }

    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        Self::ALL
            .into_iter()
            .find(|rule| rule.label().eq_ignore_ascii_case(raw))
    }

    /// Whether `checked` ticked options satisfy the rule for `length`.
    #[must_use]
    pub const fn admits(self, checked: usize, length: u32) -> bool {
        let length = length as usize;
        match self {
            Self::AtLeast => checked >= length,
            Self::Exactly => checked == length,
            Self::AtMost => checked <= length,
        }
    }
}

// ---------------------------------------------------------------------------
// FieldMeta
// ---------------------------------------------------------------------------

/// Metadata of one configurable field, tagged by field kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FieldMeta {
    Text(TextFieldMeta),
    Number(NumberFieldMeta),
    Radio(RadioFieldMeta),
    Checkbox(CheckboxFieldMeta),
    Dropdown(DropdownFieldMeta),
}

impl FieldMeta {
    /// Default state for a field type.
    ///
    /// Signature, email, name, and date fields carry no metadata; asking for
    /// one is a caller bug and yields [`MetaError::UnsupportedFieldType`].
    pub fn default_for(field_type: FieldType) -> Result<Self> {
        match field_type {
            FieldType::Text => Ok(Self::Text(TextFieldMeta::default())),
            FieldType::Number => Ok(Self::Number(NumberFieldMeta::default())),
            FieldType::Radio => Ok(Self::Radio(RadioFieldMeta::default())),
            FieldType::Checkbox => Ok(Self::Checkbox(CheckboxFieldMeta::default())),
            FieldType::Dropdown => Ok(Self::Dropdown(DropdownFieldMeta::default())),
            FieldType::Signature | FieldType::Email | FieldType::Name | FieldType::Date => {
                Err(MetaError::UnsupportedFieldType { field_type })
            }
        }
    }

    /// Read stored metadata as "stored over default".
    ///
    /// Only an unsupported field type is an error; any defect in `stored`
    /// falls back to the default state.
    pub fn from_stored(field_type: FieldType, stored: &Value) -> Result<Self> {
        Self::from_layers(field_type, [stored])
    }

    /// Merge stored layers over the default state, later layers winning.
    ///
    /// `null` layers are skipped silently.
    pub fn from_layers<'a, I>(field_type: FieldType, layers: I) -> Result<Self>
    where
        I: IntoIterator<Item = &'a Value>,
    {
        let default = Self::default_for(field_type)?;
        let tag = default.tag();
        let mut merged = Map::new();

        for layer in layers {
            match layer {
                Value::Null => {}
                Value::Object(members) => {
                    if let Some(found) = members.get("type") {
                        let matches = found
                            .as_str()
                            .is_some_and(|found| found.eq_ignore_ascii_case(tag));
                        if !matches {
                            warn!(
                                message = "meta.coerce.type_mismatch",
                                field_type = %field_type,
                                found = %found
                            );
                            continue;
                        }
                    }
                    for (key, value) in members {
                        if key != "type" {
                            merged.insert(key.clone(), value.clone());
                        }
                    }
                }
                other => {
                    warn!(
                        message = "meta.coerce.not_object",
                        field_type = %field_type,
                        found = %other
                    );
                }
            }
        }

        merged.insert("type".to_owned(), Value::String(tag.to_owned()));
        match serde_json::from_value(Value::Object(merged)) {
            Ok(meta) => Ok(meta),
            Err(error) => {
                warn!(
                    message = "meta.coerce.malformed",
                    field_type = %field_type,
                    error = %error
                );
                Ok(default)
            }
        }
    }

    /// Serde tag of this variant.
    #[must_use]
    pub const fn tag(&self) -> &'static str {
        match self {
            Self::Text(_) => "text",
            Self::Number(_) => "number",
            Self::Radio(_) => "radio",
            Self::Checkbox(_) => "checkbox",
            Self::Dropdown(_) => "dropdown",
        }
    }

    #[must_use]
    pub const fn field_type(&self) -> FieldType {
        match self {
            Self::Text(_) => FieldType::Text,
            Self::Number(_) => FieldType::Number,
            Self::Radio(_) => FieldType::Radio,
            Self::Checkbox(_) => FieldType::Checkbox,
            Self::Dropdown(_) => FieldType::Dropdown,
        }
    }

    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::Text(meta) => &meta.label,
            Self::Number(meta) => &meta.label,
            Self::Radio(meta) => &meta.label,
            Self::Checkbox(meta) => &meta.label,
            Self::Dropdown(meta) => &meta.label,
        }
    }

    #[must_use]
    pub fn placeholder(&self) -> &str {
        match self {
            Self::Text(meta) => &meta.placeholder,
            Self::Number(meta) => &meta.placeholder,
            Self::Radio(meta) => &meta.placeholder,
            Self::Checkbox(meta) => &meta.placeholder,
            Self::Dropdown(meta) => &meta.placeholder,
        }
    }

    #[must_use]
    pub const fn required(&self) -> bool {
        match self {
            Self::Text(meta) => meta.required,
            Self::Number(meta) => meta.required,
            Self::Radio(meta) => meta.required,
            Self::Checkbox(meta) => meta.required,
            Self::Dropdown(meta) => meta.required,
        }
    }

    #[must_use]
    pub const fn read_only(&self) -> bool {
        match self {
            Self::Text(meta) => meta.read_only,
            Self::Number(meta) => meta.read_only,
            Self::Radio(meta) => meta.read_only,
            Self::Checkbox(meta) => meta.read_only,
            Self::Dropdown(meta) => meta.read_only,
        }
    }

    /// Every rule this state violates.
    #[must_use]
    pub fn validate(&self) -> ValidationReport {
        match self {
            Self::Text(meta) => validate::text(meta),
            Self::Number(meta) => validate::number(meta),
            Self::Radio(meta) => validate::radio(meta),
            Self::Checkbox(meta) => validate::checkbox(meta),
            Self::Dropdown(meta) => validate::dropdown(meta),
        }
    }
}
