#![forbid(unsafe_code)]

//! On-screen field size floor.
//!
//! A new field is sized relative to the page it lands on, but never smaller
//! than a fixed pixel minimum so it stays usable on small or zoomed-out pages:
//!
//! ```text
//! width  = max(page_width  * default_width_percent  / 100, min_width_px)
//! height = max(page_height * default_height_percent / 100, min_height_px)
//! ```
//!
//! The host reports page size changes (window resize, zoom, reflow) through
//! [`FieldBoundsTracker::surface_changed`]; the tracker never polls.

use serde::{Deserialize, Serialize};

use crate::geometry::{PAGE_PERCENT_MAX, PixelSize};

/// Minimum field width in device pixels.
pub const MIN_FIELD_WIDTH_PX: f64 = 200.0;
/// Minimum field height in device pixels.
pub const MIN_FIELD_HEIGHT_PX: f64 = 60.0;
/// Default field width as a percentage of the page width.
pub const DEFAULT_FIELD_WIDTH_PERCENT: f64 = 15.0;
/// Default field height as a percentage of the page height.
pub const DEFAULT_FIELD_HEIGHT_PERCENT: f64 = 5.0;

/// Sizing policy for newly placed fields.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldSizing {
    /// Pixel floor for the width (default: 200).
    pub min_width_px: f64,
    /// Pixel floor for the height (default: 60).
    pub min_height_px: f64,
    /// Share of the page width (default: 15%).
    pub default_width_percent: f64,
    /// Share of the page height (default: 5%).
    pub default_height_percent: f64,
}

impl Default for FieldSizing {
    fn default() -> Self {
        Self {
            min_width_px: MIN_FIELD_WIDTH_PX,
            min_height_px: MIN_FIELD_HEIGHT_PX,
            default_width_percent: DEFAULT_FIELD_WIDTH_PERCENT,
            default_height_percent: DEFAULT_FIELD_HEIGHT_PERCENT,
        }
    }
}

impl FieldSizing {
    /// The pixel floor alone, used before any page has been measured.
    #[must_use]
    pub const fn minimum(&self) -> PixelSize {
        PixelSize::new(self.min_width_px, self.min_height_px)
    }

    /// Field pixel bounds for a page of the given pixel size.
    #[must_use]
    pub fn bounds_for(&self, page: PixelSize) -> PixelSize {
        PixelSize::new(
            (page.width * self.default_width_percent / PAGE_PERCENT_MAX).max(self.min_width_px),
            (page.height * self.default_height_percent / PAGE_PERCENT_MAX)
                .max(self.min_height_px),
        )
    }
}

/// Keeps the current field pixel bounds in step with the page surface size.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldBoundsTracker {
    sizing: FieldSizing,
    page: Option<PixelSize>,
    bounds: PixelSize,
}

impl FieldBoundsTracker {
    #[must_use]
    pub fn new(sizing: FieldSizing) -> Self {
        Self {
            sizing,
            page: None,
            bounds: sizing.minimum(),
        }
    }

    #[must_use]
    pub const fn sizing(&self) -> FieldSizing {
        self.sizing
    }

    /// Current field bounds in device pixels.
    #[must_use]
    pub const fn bounds(&self) -> PixelSize {
        self.bounds
    }

    /// Last page size reported by the host, if any.
    #[must_use]
    pub const fn page(&self) -> Option<PixelSize> {
        self.page
    }

    /// Record a new page surface size and recompute the bounds.
    ///
    /// Returns `true` when the bounds changed. Non-finite or non-positive
    /// sizes (surface not laid out yet) are ignored.
    pub fn surface_changed(&mut self, page: PixelSize) -> bool {
        if !(page.width.is_finite() && page.height.is_finite())
            || page.width <= 0.0
            || page.height <= 0.0
        {
            tracing::debug!(
                message = "bounds.surface_ignored",
                width = page.width,
                height = page.height
            );
            return false;
        }

        self.page = Some(page);
        let next = self.sizing.bounds_for(page);
        if next == self.bounds {
            return false;
        }

        tracing::debug!(
            message = "bounds.recomputed",
            page_width = page.width,
            page_height = page.height,
            field_width = next.width,
            field_height = next.height
        );
        self.bounds = next;
        true
    }
}

impl Default for FieldBoundsTracker {
    fn default() -> Self {
        Self::new(FieldSizing::default())
    }
}
