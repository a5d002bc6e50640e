#![forbid(unsafe_code)]

//! docfield public facade crate.
//!
//! Re-exports the types a host needs to place fields on document pages and
//! configure their metadata, plus a small prelude for day-to-day usage.
//!
//! ```no_run
//! use docfield::prelude::*;
//!
//! # fn host(locator: &SurfaceMap) -> docfield::Result<()> {
//! let mut editor = FieldEditor::new(EditorConfig::default());
//! editor.set_recipients(vec![Recipient::new(1, "a@example.com", RecipientRole::Signer)]);
//! editor.arm(FieldType::Signature);
//! editor.handle_event(&Event::Pointer(PointerEvent::released(500.0, 350.0)), locator);
//! for event in editor.drain_events() {
//!     // forward to the host UI
//!     let _ = event;
//! }
//! # Ok(())
//! # }
//! ```

use tracing::debug;

pub mod error;

pub use error::{Error, Result};

// --- Core re-exports -------------------------------------------------------

pub use docfield_core::bounds::{FieldBoundsTracker, FieldSizing};
pub use docfield_core::event::{CancelReason, Event, PointerEvent, PointerEventKind};
pub use docfield_core::field::{FieldType, FormId, FormIdAllocator, GeometryPatch};
pub use docfield_core::geometry::{PagePoint, PageRect, PageSize, PixelPoint, PixelRect, PixelSize};
pub use docfield_core::recipient::{Recipient, RecipientRole, SendStatus};
pub use docfield_core::surface::{PageSurface, PageSurfaceLocator, SurfaceMap};

// --- Metadata re-exports ---------------------------------------------------

pub use docfield_meta::{
    CheckboxFieldMeta, CheckboxRule, DraftStore, DropdownFieldMeta, FieldMeta, FieldMetaEditor,
    FieldOption, MemoryDraftStore, MetaChange, NumberFieldMeta, RadioFieldMeta, SavedMeta,
    TextFieldMeta, ValidationReport, Violation,
};

// --- Editor re-exports -----------------------------------------------------

pub use docfield_editor::{
    EditorConfig, EditorEvent, FieldCollection, FieldEditor, GeometryChange, ListenerCommand,
    PlacedField, PlacementEffect, PlacementState, PlacementTransition, StoredField,
};

// --- Helpers ---------------------------------------------------------------

/// Whether a report should hold back persisting the settings it describes.
///
/// Violations never stop an edit from applying; a host that wants to refuse
/// saving an inconsistent state asks this first.
#[must_use]
pub fn is_blocking(report: &ValidationReport) -> bool {
    !report.is_valid()
}

/// Read an [`EditorConfig`] from host JSON. Missing members take defaults.
pub fn editor_config_from_json(json: &str) -> Result<EditorConfig> {
    let config: EditorConfig = serde_json::from_str(json).map_err(Error::Config)?;
    debug!(
        message = "config.loaded",
        min_width_px = config.sizing.min_width_px,
        min_height_px = config.sizing.min_height_px,
        seeded = config.id_seed.is_some()
    );
    Ok(config)
}

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        CancelReason, DraftStore, EditorConfig, EditorEvent, Error, Event, FieldEditor, FieldMeta,
        FieldType, FormId, ListenerCommand, MemoryDraftStore, MetaChange, PageSurface,
        PageSurfaceLocator, PixelPoint, PixelRect, PixelSize, PlacedField, PointerEvent,
        Recipient, RecipientRole, Result, StoredField, SurfaceMap, ValidationReport, is_blocking,
    };

    pub use crate::{core, editor, meta};
}

pub use docfield_core as core;
pub use docfield_editor as editor;
pub use docfield_meta as meta;
