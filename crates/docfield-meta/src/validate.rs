#![forbid(unsafe_code)]

//! Metadata validation rules.
//!
//! Each configurable field type has one rule set. A rule set reports every
//! violated rule, in a fixed order, rather than stopping at the first one.
//! Violations are advisory data: callers decide whether to surface them or to
//! block a save.
//!
//! Unset numeric members take part in comparisons as `0`, with one exception:
//! an unset number value never triggers the minimum/maximum rules.

use std::collections::HashSet;
use std::fmt;

use crate::meta::{
    CheckboxFieldMeta, CheckboxRule, DropdownFieldMeta, FieldOption, NumberFieldMeta,
    RadioFieldMeta, TextFieldMeta,
};

/// One violated metadata rule.
#[derive(Debug, Clone, PartialEq)]
pub enum Violation {
    /// Number value below a positive minimum.
    BelowMinimum { value: f64, min: f64 },
    /// Number value above a positive maximum.
    AboveMaximum { value: f64, max: f64 },
    /// Minimum greater than maximum, whatever the value.
    MinExceedsMax { min: f64, max: f64 },
    /// Read-only number field whose value is below 1.
    ReadOnlyNeedsPositiveValue,
    /// Read-only text field with no text.
    ReadOnlyNeedsText,
    /// Read-only choice field with nothing selected.
    ReadOnlyNeedsSelection,
    /// Read-only dropdown without a default value.
    ReadOnlyNeedsDefault,
    /// A field cannot be both read-only and required.
    ReadOnlyAndRequired,
    /// Text longer than the positive character limit.
    ExceedsCharacterLimit { length: usize, limit: u32 },
    /// Radio fields allow at most one checked option.
    MultipleChecked { checked: usize },
    /// Two options share a value.
    DuplicateOption { value: String },
    /// Checkbox rule chosen without a count.
    MissingValidationLength,
    /// Checkbox rule count larger than the number of options.
    ValidationLengthExceedsOptions { length: u32, options: usize },
    /// Read-only checkbox whose ticked options break its own rule.
    CheckedCountViolatesRule {
        rule: CheckboxRule,
        length: u32,
        checked: usize,
    },
    /// Dropdown default that is not one of the options.
    DefaultNotAnOption { value: String },
}

impl Violation {
    /// Stable machine-readable code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::BelowMinimum { .. } => "below_minimum",
            Self::AboveMaximum { .. } => "above_maximum",
            Self::MinExceedsMax { .. } => "min_exceeds_max",
            Self::ReadOnlyNeedsPositiveValue => "read_only_needs_positive_value",
            Self::ReadOnlyNeedsText => "read_only_needs_text",
            Self::ReadOnlyNeedsSelection => "read_only_needs_selection",
            Self::ReadOnlyNeedsDefault => "read_only_needs_default",
            Self::ReadOnlyAndRequired => "read_only_and_required",
            Self::ExceedsCharacterLimit { .. } => "exceeds_character_limit",
            Self::MultipleChecked { .. } => "multiple_checked",
            Self::DuplicateOption { .. } => "duplicate_option",
            Self::MissingValidationLength => "missing_validation_length",
            Self::ValidationLengthExceedsOptions { .. } => "validation_length_exceeds_options",
            Self::CheckedCountViolatesRule { .. } => "checked_count_violates_rule",
            Self::DefaultNotAnOption { .. } => "default_not_an_option",
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BelowMinimum { value, min } => {
                write!(f, "Value {value} is less than the min value {min}")
            }
            Self::AboveMaximum { value, max } => {
                write!(f, "Value {value} is greater than the max value {max}")
            }
            Self::MinExceedsMax { .. } => f.write_str("Min value cannot be greater than max value"),
            Self::ReadOnlyNeedsPositiveValue => {
                f.write_str("A read-only field must have a value greater than 0")
            }
            Self::ReadOnlyNeedsText => f.write_str("A read-only field must have text"),
            Self::ReadOnlyNeedsSelection => {
                f.write_str("A read-only field must have at least one option selected")
            }
            Self::ReadOnlyNeedsDefault => f.write_str("A read-only field must have a default value"),
            Self::ReadOnlyAndRequired => f.write_str("A field cannot be both read-only and required"),
            Self::ExceedsCharacterLimit { length, limit } => {
                write!(f, "Text is {length} characters long, the limit is {limit}")
            }
            Self::MultipleChecked { checked } => {
                write!(f, "Only one option can be checked ({checked} are)")
            }
            Self::DuplicateOption { value } => write!(f, "Option \"{value}\" appears more than once"),
            Self::MissingValidationLength => {
                f.write_str("A validation rule needs a number of options")
            }
            Self::ValidationLengthExceedsOptions { length, options } => write!(
                f,
                "Validation length {length} exceeds the {options} available options"
            ),
            Self::CheckedCountViolatesRule {
                rule,
                length,
                checked,
            } => write!(
                f,
                "{} {length} option(s) is required, but {checked} are checked",
                rule.label()
            ),
            Self::DefaultNotAnOption { value } => {
                write!(f, "Default value \"{value}\" is not one of the options")
            }
        }
    }
}

/// All violations found for one metadata state.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ValidationReport {
    pub violations: Vec<Violation>,
}

impl ValidationReport {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            violations: Vec::new(),
        }
    }

    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.violations.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Violation> {
        self.violations.iter()
    }

    /// Whether a violation with this code was reported.
    #[must_use]
    pub fn has(&self, code: &str) -> bool {
        self.violations.iter().any(|violation| violation.code() == code)
    }

    /// Human-readable messages, in report order.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.violations.iter().map(ToString::to_string).collect()
    }

    fn push(&mut self, violation: Violation) {
        self.violations.push(violation);
    }

    fn push_if(&mut self, condition: bool, violation: Violation) {
        if condition {
            self.push(violation);
        }
    }
}

impl<'a> IntoIterator for &'a ValidationReport {
    type Item = &'a Violation;
    type IntoIter = std::slice::Iter<'a, Violation>;

    fn into_iter(self) -> Self::IntoIter {
        self.violations.iter()
    }
}

// ---------------------------------------------------------------------------
// Rule sets
// ---------------------------------------------------------------------------

pub(crate) fn number(meta: &NumberFieldMeta) -> ValidationReport {
    let mut report = ValidationReport::new();
    let min = meta.min_value.unwrap_or(0.0);
    let max = meta.max_value.unwrap_or(0.0);

    if let Some(value) = meta.value {
        report.push_if(min > 0.0 && value < min, Violation::BelowMinimum { value, min });
        report.push_if(max > 0.0 && value > max, Violation::AboveMaximum { value, max });
    }
    report.push_if(min > max, Violation::MinExceedsMax { min, max });
    report.push_if(
        meta.read_only && meta.value.unwrap_or(0.0) < 1.0,
        Violation::ReadOnlyNeedsPositiveValue,
    );
    report.push_if(meta.read_only && meta.required, Violation::ReadOnlyAndRequired);
    report
}

pub(crate) fn text(meta: &TextFieldMeta) -> ValidationReport {
    let mut report = ValidationReport::new();
    let limit = meta.character_limit.unwrap_or(0);
    let length = meta.text.chars().count();

    report.push_if(
        limit > 0 && length > limit as usize,
        Violation::ExceedsCharacterLimit { length, limit },
    );
    report.push_if(
        meta.read_only && meta.text.is_empty(),
        Violation::ReadOnlyNeedsText,
    );
    report.push_if(meta.read_only && meta.required, Violation::ReadOnlyAndRequired);
    report
}

pub(crate) fn radio(meta: &RadioFieldMeta) -> ValidationReport {
    let mut report = ValidationReport::new();
    let checked = meta.values.iter().filter(|option| option.checked).count();

    report.push_if(checked > 1, Violation::MultipleChecked { checked });
    push_duplicates(&mut report, &meta.values);
    report.push_if(
        meta.read_only && checked == 0,
        Violation::ReadOnlyNeedsSelection,
    );
    report.push_if(meta.read_only && meta.required, Violation::ReadOnlyAndRequired);
    report
}

pub(crate) fn checkbox(meta: &CheckboxFieldMeta) -> ValidationReport {
    let mut report = ValidationReport::new();
    let length = meta.validation_length.unwrap_or(0);
    let options = meta.values.len();
    let rule_set = !meta.validation_rule.trim().is_empty();

    report.push_if(rule_set && length == 0, Violation::MissingValidationLength);
    report.push_if(
        rule_set && length as usize > options,
        Violation::ValidationLengthExceedsOptions { length, options },
    );
    if let Some(rule) = meta.rule().filter(|_| meta.read_only) {
        let checked = meta.checked_count();
        report.push_if(
            length > 0 && !rule.admits(checked, length),
            Violation::CheckedCountViolatesRule {
                rule,
                length,
                checked,
            },
        );
    }
    push_duplicates(&mut report, &meta.values);
    report.push_if(meta.read_only && meta.required, Violation::ReadOnlyAndRequired);
    report
}

pub(crate) fn dropdown(meta: &DropdownFieldMeta) -> ValidationReport {
    let mut report = ValidationReport::new();
    let default = meta.default_value.as_str();

    report.push_if(
        !default.is_empty() && !meta.values.iter().any(|option| option.value == default),
        Violation::DefaultNotAnOption {
            value: default.to_owned(),
        },
    );
    push_duplicates(&mut report, &meta.values);
    report.push_if(
        meta.read_only && default.is_empty(),
        Violation::ReadOnlyNeedsDefault,
    );
    report.push_if(meta.read_only && meta.required, Violation::ReadOnlyAndRequired);
    report
}

/// One violation per duplicated value, in first-repeat order.
fn push_duplicates(report: &mut ValidationReport, options: &[FieldOption]) {
    let mut seen = HashSet::with_capacity(options.len());
    let mut reported = HashSet::new();
    for option in options {
        if !seen.insert(option.value.as_str()) && reported.insert(option.value.as_str()) {
            report.push(Violation::DuplicateOption {
                value: option.value.clone(),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn number_meta(value: Option<f64>, min: Option<f64>, max: Option<f64>) -> NumberFieldMeta {
        NumberFieldMeta {
            value,
            min_value: min,
            max_value: max,
            ..NumberFieldMeta::default()
        }
    }

    fn codes(report: &ValidationReport) -> Vec<&'static str> {
        report.iter().map(Violation::code).collect()
    }

    // -- Number --

    #[test]
    fn default_number_state_is_valid() {
        assert!(number(&NumberFieldMeta::default()).is_valid());
    }

    #[test]
    fn min_exceeding_max_is_reported_regardless_of_value() {
        for value in [None, Some(0.0), Some(7.0), Some(100.0)] {
            let report = number(&number_meta(value, Some(10.0), Some(5.0)));
            assert!(report.has("min_exceeds_max"), "value {value:?}");
            assert_eq!(
                report
                    .iter()
                    .filter(|violation| violation.code() == "min_exceeds_max")
                    .count(),
                1
            );
        }
    }

    #[test]
    fn value_below_minimum() {
        let report = number(&number_meta(Some(3.0), Some(10.0), None));
        assert_eq!(codes(&report), vec!["below_minimum"]);
        assert_eq!(
            report.messages(),
            vec!["Value 3 is less than the min value 10".to_owned()]
        );
    }

    #[test]
    fn value_above_maximum() {
        let report = number(&number_meta(Some(30.0), Some(0.0), Some(20.0)));
        assert_eq!(codes(&report), vec!["above_maximum"]);
    }

    #[test]
    fn zero_bounds_are_inactive() {
        assert!(number(&number_meta(Some(-50.0), Some(0.0), Some(0.0))).is_valid());
        assert!(number(&number_meta(Some(1e9), None, None)).is_valid());
    }

    #[test]
    fn unset_value_skips_bound_rules() {
        let report = number(&number_meta(None, Some(10.0), Some(20.0)));
        assert!(report.is_valid());
    }

    #[test]
    fn read_only_needs_positive_value() {
        let meta = NumberFieldMeta {
            read_only: true,
            ..number_meta(Some(0.0), None, None)
        };
        assert_eq!(codes(&number(&meta)), vec!["read_only_needs_positive_value"]);

        let unset = NumberFieldMeta {
            read_only: true,
            ..number_meta(None, None, None)
        };
        assert!(number(&unset).has("read_only_needs_positive_value"));
    }

    #[test]
    fn read_only_and_required_reports_both() {
        let meta = NumberFieldMeta {
            read_only: true,
            required: true,
            ..number_meta(Some(0.0), None, None)
        };
        assert_eq!(
            codes(&number(&meta)),
            vec!["read_only_needs_positive_value", "read_only_and_required"]
        );
    }

    #[test]
    fn every_violation_is_reported() {
        let meta = NumberFieldMeta {
            read_only: true,
            required: true,
            ..number_meta(Some(0.5), Some(10.0), Some(5.0))
        };
        assert_eq!(
            codes(&number(&meta)),
            vec![
                "below_minimum",
                "min_exceeds_max",
                "read_only_needs_positive_value",
                "read_only_and_required",
            ]
        );
    }

    // -- Text --

    #[test]
    fn text_over_limit_counts_characters() {
        let meta = TextFieldMeta {
            text: "héllo".to_owned(),
            character_limit: Some(4),
            ..TextFieldMeta::default()
        };
        assert_eq!(
            number_of(&text(&meta), "exceeds_character_limit"),
            1,
            "{:?}",
            text(&meta)
        );
        let at_limit = TextFieldMeta {
            character_limit: Some(5),
            ..meta
        };
        assert!(text(&at_limit).is_valid());
    }

    #[test]
    fn read_only_text_needs_content() {
        let meta = TextFieldMeta {
            read_only: true,
            ..TextFieldMeta::default()
        };
        assert_eq!(codes(&text(&meta)), vec!["read_only_needs_text"]);
    }

    // -- Radio --

    #[test]
    fn radio_allows_single_check() {
        let meta = RadioFieldMeta {
            values: vec![FieldOption::checked("a"), FieldOption::checked("b")],
            ..RadioFieldMeta::default()
        };
        assert_eq!(codes(&radio(&meta)), vec!["multiple_checked"]);
    }

    #[test]
    fn duplicates_are_reported_once_per_value() {
        let meta = RadioFieldMeta {
            values: vec![
                FieldOption::new("a"),
                FieldOption::new("a"),
                FieldOption::new("a"),
                FieldOption::new("b"),
                FieldOption::new("b"),
            ],
            ..RadioFieldMeta::default()
        };
        assert_eq!(
            radio(&meta).violations,
            vec![
                Violation::DuplicateOption {
                    value: "a".to_owned()
                },
                Violation::DuplicateOption {
                    value: "b".to_owned()
                },
            ]
        );
    }

    #[test]
    fn read_only_radio_needs_selection() {
        let meta = RadioFieldMeta {
            read_only: true,
            values: vec![FieldOption::new("a")],
            ..RadioFieldMeta::default()
        };
        assert_eq!(codes(&radio(&meta)), vec!["read_only_needs_selection"]);
    }

    // -- Checkbox --

    fn checkbox_meta(rule: CheckboxRule, length: u32, checked: usize) -> CheckboxFieldMeta {
        CheckboxFieldMeta {
            values: (0..4)
                .map(|index| FieldOption {
                    value: format!("option-{index}"),
                    checked: index < checked,
                })
                .collect(),
            validation_rule: rule.label().to_owned(),
            validation_length: Some(length),
            ..CheckboxFieldMeta::default()
        }
    }

    #[test]
    fn rule_without_length_is_reported() {
        let meta = checkbox_meta(CheckboxRule::AtLeast, 0, 0);
        assert_eq!(codes(&checkbox(&meta)), vec!["missing_validation_length"]);
    }

    #[test]
    fn length_beyond_options_is_reported() {
        let meta = checkbox_meta(CheckboxRule::AtMost, 5, 0);
        assert_eq!(
            codes(&checkbox(&meta)),
            vec!["validation_length_exceeds_options"]
        );
    }

    #[test]
    fn read_only_checkbox_checks_its_own_rule() {
        let mut meta = checkbox_meta(CheckboxRule::Exactly, 2, 3);
        assert!(checkbox(&meta).is_valid(), "rule only binds read-only fields");

        meta.read_only = true;
        assert_eq!(
            checkbox(&meta).violations,
            vec![Violation::CheckedCountViolatesRule {
                rule: CheckboxRule::Exactly,
                length: 2,
                checked: 3,
            }]
        );

        let satisfied = checkbox_meta(CheckboxRule::AtLeast, 2, 3);
        assert!(
            checkbox(&CheckboxFieldMeta {
                read_only: true,
                ..satisfied
            })
            .is_valid()
        );
    }

    // -- Dropdown --

    #[test]
    fn dropdown_default_must_be_an_option() {
        let meta = DropdownFieldMeta {
            values: vec![FieldOption::new("red"), FieldOption::new("blue")],
            default_value: "green".to_owned(),
            ..DropdownFieldMeta::default()
        };
        assert_eq!(codes(&dropdown(&meta)), vec!["default_not_an_option"]);

        let ok = DropdownFieldMeta {
            default_value: "blue".to_owned(),
            ..meta
        };
        assert!(dropdown(&ok).is_valid());
    }

    #[test]
    fn read_only_dropdown_needs_default() {
        let meta = DropdownFieldMeta {
            read_only: true,
            required: true,
            ..DropdownFieldMeta::default()
        };
        assert_eq!(
            codes(&dropdown(&meta)),
            vec!["read_only_needs_default", "read_only_and_required"]
        );
    }

    fn number_of(report: &ValidationReport, code: &str) -> usize {
        report.iter().filter(|violation| violation.code() == code).count()
    }
}
