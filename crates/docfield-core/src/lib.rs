#![forbid(unsafe_code)]

//! Core: page geometry, field identity, recipients, and host events.
//!
//! # Role in docfield
//! `docfield-core` is the leaf of the workspace. It owns the two coordinate
//! spaces (device pixels and page percent) and the resolver between them,
//! the field sizing floor, and the small shared vocabulary (field types, form
//! ids, recipients, page surfaces, host events) the other crates build on.
//!
//! # Primary responsibilities
//! - **Geometry**: pixel ↔ percent conversion, centring, clamping.
//! - **Bounds**: minimum on-screen field size, recomputed on surface resize.
//! - **Field identity**: [`field::FieldType`], [`field::FormId`] and its allocator.
//! - **Surfaces**: the [`surface::PageSurfaceLocator`] seam to the PDF viewer.
//!
//! # How it fits in the system
//! `docfield-meta` uses the field types to pick metadata rules;
//! `docfield-editor` drives placement sessions and the field collection on
//! top of the resolver here.

pub mod bounds;
pub mod error;
pub mod event;
pub mod field;
pub mod geometry;
pub mod recipient;
pub mod surface;

pub use error::{GeometryError, Result};
