#![forbid(unsafe_code)]

//! Canonical host events consumed by the placement engine.
//!
//! The host (browser shell, native viewer, test harness) translates its own
//! pointer and layout notifications into [`Event`] values. All coordinates are
//! device pixels in one space shared with the page surface rectangles; the
//! host is responsible for using viewport-relative coordinates for both.
//!
//! # Design Notes
//!
//! - There is no pointer-down: placement starts from the palette (`arm`), and
//!   the release is the terminating action.
//! - Layout changes arrive as explicit [`Event::SurfaceResized`]
//!   notifications; the engine never polls the host.

use serde::{Deserialize, Serialize};

use crate::geometry::{PixelPoint, PixelSize};

/// Canonical host event.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Event {
    /// Pointer activity.
    Pointer(PointerEvent),

    /// A page surface changed size (window resize, zoom, reflow).
    SurfaceResized {
        /// 1-based page number.
        page_number: u32,
        /// New surface size in device pixels.
        size: PixelSize,
    },

    /// The host wants any in-flight placement abandoned.
    Cancel {
        reason: CancelReason,
    },
}

/// A pointer event in device pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    pub kind: PointerEventKind,
    pub position: PixelPoint,
}

impl PointerEvent {
    #[must_use]
    pub const fn new(kind: PointerEventKind, position: PixelPoint) -> Self {
        Self { kind, position }
    }

    #[must_use]
    pub const fn moved(x: f64, y: f64) -> Self {
        Self::new(PointerEventKind::Move, PixelPoint::new(x, y))
    }

    #[must_use]
    pub const fn released(x: f64, y: f64) -> Self {
        Self::new(PointerEventKind::Release, PixelPoint::new(x, y))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerEventKind {
    /// Pointer moved.
    Move,
    /// Pointer button released; terminates an armed placement.
    Release,
}

/// Why an armed placement was abandoned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CancelReason {
    /// Released outside any page surface.
    NoSurface,
    /// Released on a page, but the field would not fit there.
    OutOfBounds,
    /// No recipient selected, or the selected one cannot receive fields.
    NoRecipient,
    /// The host navigated away from the editor.
    Navigation,
    /// The window or editor lost focus.
    Blur,
    /// Cancelled by API call.
    Programmatic,
}
