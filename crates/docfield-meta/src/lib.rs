#![forbid(unsafe_code)]

//! Field metadata for docfield: per-type settings, defaults, and validation.
//!
//! # Role in docfield
//! Text, number, radio, checkbox, and dropdown fields carry settings the
//! document author configures (labels, bounds, options, read-only and
//! required flags). This crate owns their shape and their rules. It knows
//! nothing about page geometry.
//!
//! # This crate provides
//! - [`FieldMeta`], one tagged variant per configurable field type, with its
//!   default state and fail-closed coercion from stored JSON.
//! - [`ValidationReport`] listing every [`Violation`] of a state.
//! - [`FieldMetaEditor`], the edit path that validates each prospective
//!   change and applies it regardless.
//! - [`DraftStore`], the seam to the host's draft storage.

pub mod draft;
pub mod edit;
pub mod error;
pub mod meta;
pub mod numeric;
pub mod validate;

pub use draft::{DraftStore, MemoryDraftStore, draft_key};
pub use edit::{FieldMetaEditor, MetaChange, SavedMeta};
pub use error::{MetaError, Result};
pub use meta::{
    CheckboxFieldMeta, CheckboxRule, DropdownFieldMeta, FieldMeta, FieldOption, NumberFieldMeta,
    RadioFieldMeta, TextFieldMeta,
};
pub use numeric::{parse_count_input, parse_numeric_input};
pub use validate::{ValidationReport, Violation};
