#![forbid(unsafe_code)]

//! Editor: placement sessions, the field collection, and the editor facade.
//!
//! # Role in docfield
//! `docfield-editor` turns host pointer events into placed fields and keeps
//! the ordered list of fields the document author is working on. It sits on
//! top of `docfield-core` (geometry, surfaces, events) and `docfield-meta`
//! (settings attached to each field).
//!
//! # Primary responsibilities
//! - **Placement**: [`PlacementSession`], the arm / preview / release machine.
//! - **Collection**: [`FieldCollection`] with unique form ids and partial
//!   geometry patches.
//! - **Loading**: [`StoredField::to_placed`] for persisted fields.
//! - **Facade**: [`FieldEditor`], which routes events, queues host
//!   notifications, and opens and saves field settings.

pub mod collection;
pub mod editor;
pub mod error;
pub mod field;
pub mod session;

pub use collection::{FieldCollection, GeometryChange};
pub use editor::{EditorConfig, EditorEvent, FieldEditor};
pub use error::{CollectionError, EditorError, Result};
pub use field::{PlacedField, StoredField};
pub use session::{
    ListenerCommand, PlacementContext, PlacementEffect, PlacementNoopReason, PlacementPreview,
    PlacementSession, PlacementState, PlacementTransition,
};
