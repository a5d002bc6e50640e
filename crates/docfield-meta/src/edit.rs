#![forbid(unsafe_code)]

//! The metadata edit path.
//!
//! [`FieldMetaEditor`] holds the working state of one field's settings. Each
//! [`MetaChange`] substitutes one member into a copy of the current state,
//! validates that prospective state, and then applies it. Violations never
//! stop a change; they come back as a [`ValidationReport`] for the caller to
//! show, or to hold back a save with.
//!
//! # Invariants
//!
//! 1. The stored report always describes the current state.
//! 2. A change that names a member the variant lacks leaves the state
//!    untouched and returns [`MetaError::InapplicableChange`].
//! 3. Numeric text that does not parse becomes unset.

use docfield_core::field::{FieldType, FormId};
use serde_json::Value;
use tracing::{debug, warn};

use crate::draft::{DraftStore, draft_key};
use crate::error::{MetaError, Result};
use crate::meta::{FieldMeta, FieldOption};
use crate::numeric::{parse_count_input, parse_numeric_input};
use crate::validate::ValidationReport;

/// One field-level settings change.
///
/// Numeric members take the raw input text.
#[derive(Debug, Clone, PartialEq)]
pub enum MetaChange {
    Label(String),
    Placeholder(String),
    Text(String),
    CharacterLimit(String),
    NumberFormat(String),
    Value(String),
    MinValue(String),
    MaxValue(String),
    ValidationRule(String),
    ValidationLength(String),
    DefaultValue(String),
    Options(Vec<FieldOption>),
    Required(bool),
    ReadOnly(bool),
    ToggleRequired,
    ToggleReadOnly,
}

impl MetaChange {
    /// Member name, for logs and errors.
    #[must_use]
    pub const fn key(&self) -> &'static str {
        match self {
            Self::Label(_) => "label",
            Self::Placeholder(_) => "placeholder",
            Self::Text(_) => "text",
            Self::CharacterLimit(_) => "character_limit",
            Self::NumberFormat(_) => "number_format",
            Self::Value(_) => "value",
            Self::MinValue(_) => "min_value",
            Self::MaxValue(_) => "max_value",
            Self::ValidationRule(_) => "validation_rule",
            Self::ValidationLength(_) => "validation_length",
            Self::DefaultValue(_) => "default_value",
            Self::Options(_) => "values",
            Self::Required(_) | Self::ToggleRequired => "required",
            Self::ReadOnly(_) | Self::ToggleReadOnly => "read_only",
        }
    }
}

impl FieldMeta {
    /// The prospective state after `change`, without touching `self`.
    pub fn with_change(&self, change: &MetaChange) -> Result<Self> {
        let mut next = self.clone();
        let applied = match (&mut next, change) {
            (meta, MetaChange::Label(label)) => {
                *meta.label_mut() = label.clone();
                true
            }
            (meta, MetaChange::Placeholder(placeholder)) => {
                *meta.placeholder_mut() = placeholder.clone();
                true
            }
            (meta, MetaChange::Required(required)) => {
                *meta.required_mut() = *required;
                true
            }
            (meta, MetaChange::ReadOnly(read_only)) => {
                *meta.read_only_mut() = *read_only;
                true
            }
            (meta, MetaChange::ToggleRequired) => {
                let required = meta.required_mut();
                *required = !*required;
                true
            }
            (meta, MetaChange::ToggleReadOnly) => {
                let read_only = meta.read_only_mut();
                *read_only = !*read_only;
                true
            }

            (Self::Text(meta), MetaChange::Text(text)) => {
                meta.text = text.clone();
                true
            }
            (Self::Text(meta), MetaChange::CharacterLimit(raw)) => {
                meta.character_limit = parse_count_input(raw);
                true
            }

            (Self::Number(meta), MetaChange::NumberFormat(format)) => {
                meta.number_format = format.clone();
                true
            }
            (Self::Number(meta), MetaChange::Value(raw)) => {
                meta.value = parse_numeric_input(raw);
                true
            }
            (Self::Number(meta), MetaChange::MinValue(raw)) => {
                meta.min_value = parse_numeric_input(raw);
                true
            }
            (Self::Number(meta), MetaChange::MaxValue(raw)) => {
                meta.max_value = parse_numeric_input(raw);
                true
            }

            (Self::Radio(meta), MetaChange::Options(values)) => {
                meta.values = values.clone();
                true
            }

            (Self::Checkbox(meta), MetaChange::Options(values)) => {
                meta.values = values.clone();
                true
            }
            (Self::Checkbox(meta), MetaChange::ValidationRule(rule)) => {
                meta.validation_rule = rule.clone();
                true
            }
            (Self::Checkbox(meta), MetaChange::ValidationLength(raw)) => {
                meta.validation_length = parse_count_input(raw);
                true
            }

            (Self::Dropdown(meta), MetaChange::Options(values)) => {
                meta.values = values.clone();
                true
            }
            (Self::Dropdown(meta), MetaChange::DefaultValue(value)) => {
                meta.default_value = value.clone();
                true
            }

            _ => false,
        };

        if applied {
            Ok(next)
        } else {
            Err(MetaError::InapplicableChange {
                change: change.key(),
                field_type: self.field_type(),
            })
        }
    }

    fn label_mut(&mut self) -> &mut String {
        match self {
            Self::Text(meta) => &mut meta.label,
            Self::Number(meta) => &mut meta.label,
            Self::Radio(meta) => &mut meta.label,
            Self::Checkbox(meta) => &mut meta.label,
            Self::Dropdown(meta) => &mut meta.label,
        }
    }

    fn placeholder_mut(&mut self) -> &mut String {
        match self {
            Self::Text(meta) => &mut meta.placeholder,
            Self::Number(meta) => &mut meta.placeholder,
            Self::Radio(meta) => &mut meta.placeholder,
            Self::Checkbox(meta) => &mut meta.placeholder,
            Self::Dropdown(meta) => &mut meta.placeholder,
        }
    }

    fn required_mut(&mut self) -> &mut bool {
        match self {
            Self::Text(meta) => &mut meta.required,
            Self::Number(meta) => &mut meta.required,
            Self::Radio(meta) => &mut meta.required,
            Self::Checkbox(meta) => &mut meta.required,
            Self::Dropdown(meta) => &mut meta.required,
        }
    }

    fn read_only_mut(&mut self) -> &mut bool {
        match self {
            Self::Text(meta) => &mut meta.read_only,
            Self::Number(meta) => &mut meta.read_only,
            Self::Radio(meta) => &mut meta.read_only,
            Self::Checkbox(meta) => &mut meta.read_only,
            Self::Dropdown(meta) => &mut meta.read_only,
        }
    }
}

// ---------------------------------------------------------------------------
// FieldMetaEditor
// ---------------------------------------------------------------------------

/// Result of [`FieldMetaEditor::save`].
#[derive(Debug, Clone, PartialEq)]
pub struct SavedMeta {
    pub meta: FieldMeta,
    pub report: ValidationReport,
}

/// Working settings state for one field.
#[derive(Debug, Clone)]
pub struct FieldMetaEditor {
    form_id: FormId,
    state: FieldMeta,
    report: ValidationReport,
}

impl FieldMetaEditor {
    /// Editor over the type's default state.
    pub fn new(form_id: FormId, field_type: FieldType) -> Result<Self> {
        Ok(Self::with_state(form_id, FieldMeta::default_for(field_type)?))
    }

    /// Editor over an explicit state.
    #[must_use]
    pub fn with_state(form_id: FormId, state: FieldMeta) -> Self {
        let report = state.validate();
        Self {
            form_id,
            state,
            report,
        }
    }

    /// Open settings as default state, then draft, then persisted metadata.
    ///
    /// An unreadable draft is skipped.
    pub fn open<D>(
        form_id: FormId,
        field_type: FieldType,
        drafts: &D,
        persisted: Option<&Value>,
    ) -> Result<Self>
    where
        D: DraftStore + ?Sized,
    {
        let key = draft_key(&form_id, field_type);
        let draft = drafts
            .load(&key)
            .and_then(|raw| match serde_json::from_str::<Value>(&raw) {
                Ok(value) => Some(value),
                Err(error) => {
                    warn!(message = "meta.draft.unreadable", key = %key, error = %error);
                    None
                }
            })
            .unwrap_or(Value::Null);
        let null = Value::Null;
        let persisted = persisted.unwrap_or(&null);

        let state = FieldMeta::from_layers(field_type, [&draft, persisted])?;
        debug!(
            message = "meta.open",
            form_id = %form_id,
            field_type = %field_type,
            has_draft = !draft.is_null(),
            has_persisted = !persisted.is_null()
        );
        Ok(Self::with_state(form_id, state))
    }

    #[must_use]
    pub fn form_id(&self) -> &FormId {
        &self.form_id
    }

    #[must_use]
    pub const fn field_type(&self) -> FieldType {
        self.state.field_type()
    }

    #[must_use]
    pub const fn state(&self) -> &FieldMeta {
        &self.state
    }

    /// Violations of the current state.
    #[must_use]
    pub const fn report(&self) -> &ValidationReport {
        &self.report
    }

    #[must_use]
    pub fn draft_key(&self) -> String {
        draft_key(&self.form_id, self.field_type())
    }

    /// Validate the prospective state, then apply it.
    ///
    /// The change is applied even when the report is non-empty.
    pub fn apply(&mut self, change: MetaChange) -> Result<&ValidationReport> {
        let next = self.state.with_change(&change)?;
        let report = next.validate();
        debug!(
            message = "meta.edit",
            form_id = %self.form_id,
            change = change.key(),
            violations = report.len()
        );
        self.state = next;
        self.report = report;
        Ok(&self.report)
    }

    /// Write the current state to the draft store and hand it back with its
    /// report. The caller decides whether violations block persistence.
    pub fn save<D>(&self, drafts: &mut D) -> Result<SavedMeta>
    where
        D: DraftStore + ?Sized,
    {
        let json = serde_json::to_string(&self.state)?;
        let key = self.draft_key();
        drafts.save(&key, json)?;
        debug!(
            message = "meta.save",
            key = %key,
            violations = self.report.len()
        );
        Ok(SavedMeta {
            meta: self.state.clone(),
            report: self.report.clone(),
        })
    }
}
