#![forbid(unsafe_code)]

//! Geometric primitives and the pixel ↔ page-percent resolver.
//!
//! Two coordinate spaces meet here:
//!
//! - **Device pixels** ([`PixelPoint`], [`PixelSize`], [`PixelRect`]): what the
//!   host measures at query time. These change with zoom, scroll, window size,
//!   and device pixel ratio, and are never persisted.
//! - **Page percent** ([`PagePoint`], [`PageSize`], [`PageRect`]): position and
//!   size relative to one page surface, `0..=100` on each axis. Width is scaled
//!   by the page width and height by the page height; the page aspect ratio is
//!   never assumed to be 1:1.
//!
//! # Invariants
//!
//! 1. For a non-degenerate page, `from_page_percent(to_page_percent(p))`
//!    reproduces `p` within floating-point tolerance.
//! 2. [`PageRect::clamped`] is idempotent and its output satisfies
//!    [`PageRect::is_within_page`].
//! 3. Degenerate pages (zero, negative, or non-finite size) are rejected with
//!    [`GeometryError::DegeneratePage`] rather than producing NaN.

use serde::{Deserialize, Serialize};

use crate::error::{GeometryError, Result};

/// Full extent of a page axis in percent.
pub const PAGE_PERCENT_MAX: f64 = 100.0;

// ---------------------------------------------------------------------------
// Pixel space
// ---------------------------------------------------------------------------

/// A point in device pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PixelPoint {
    pub x: f64,
    pub y: f64,
}

impl PixelPoint {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Offset this point by `-size / 2` on both axes.
    ///
    /// Used for the live preview marker, whose top-left sits half a field
    /// away from the pointer so the marker is centred under it.
    #[must_use]
    pub fn centered_origin(self, size: PixelSize) -> Self {
        Self {
            x: self.x - size.width / 2.0,
            y: self.y - size.height / 2.0,
        }
    }
}

/// A size in device pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PixelSize {
    pub width: f64,
    pub height: f64,
}

impl PixelSize {
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// A bounding rectangle in device pixels, as reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PixelRect {
    /// Left edge.
    pub left: f64,
    /// Top edge.
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl PixelRect {
    /// Create a new rectangle.
    #[must_use]
    pub const fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Right edge.
    #[inline]
    #[must_use]
    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    /// Bottom edge.
    #[inline]
    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    #[inline]
    #[must_use]
    pub const fn size(&self) -> PixelSize {
        PixelSize::new(self.width, self.height)
    }

    /// True when the rectangle cannot anchor percentages.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        !(self.width.is_finite() && self.height.is_finite() && self.left.is_finite()
            && self.top.is_finite())
            || self.width <= 0.0
            || self.height <= 0.0
    }

    /// Check if a point is inside the rectangle (edges inclusive).
    #[must_use]
    pub fn contains(&self, point: PixelPoint) -> bool {
        point.x >= self.left
            && point.x <= self.right()
            && point.y >= self.top
            && point.y <= self.bottom()
    }

    /// Check whether a box of `size`, centred on `point`, fits inside the
    /// rectangle.
    ///
    /// A field that would hang over any page edge when dropped under the
    /// pointer is out of bounds, even if the pointer itself is on the page.
    #[must_use]
    pub fn contains_centered(&self, point: PixelPoint, size: PixelSize) -> bool {
        let half_width = size.width / 2.0;
        let half_height = size.height / 2.0;

        point.x >= self.left + half_width
            && point.x <= self.right() - half_width
            && point.y >= self.top + half_height
            && point.y <= self.bottom() - half_height
    }

    fn ensure_anchorable(&self) -> Result<()> {
        if self.is_degenerate() {
            return Err(GeometryError::DegeneratePage {
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Page-percent space
// ---------------------------------------------------------------------------

/// A point relative to a page, in percent of the page width / height.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PagePoint {
    pub x: f64,
    pub y: f64,
}

impl PagePoint {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A size relative to a page, in percent of the page width / height.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PageSize {
    pub width: f64,
    pub height: f64,
}

impl PageSize {
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Position and size of a field on its page, all in percent.
///
/// The origin is the top-left corner. During a drag a rectangle may leave the
/// `0..=100` range; [`clamped`](Self::clamped) brings it back before it is
/// treated as settled geometry.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PageRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl PageRect {
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Build from an origin and a size.
    #[must_use]
    pub const fn from_parts(origin: PagePoint, size: PageSize) -> Self {
        Self::new(origin.x, origin.y, size.width, size.height)
    }

    #[must_use]
    pub const fn origin(&self) -> PagePoint {
        PagePoint::new(self.x, self.y)
    }

    #[must_use]
    pub const fn size(&self) -> PageSize {
        PageSize::new(self.width, self.height)
    }

    /// Clamp size into `0..=100` and origin into `0..=100 - size`.
    ///
    /// NaN members count as 0; infinities clamp to the nearest bound.
    /// Clamping an already clamped rectangle returns it unchanged.
    #[must_use]
    pub fn clamped(&self) -> Self {
        let width = nan_to_zero(self.width).clamp(0.0, PAGE_PERCENT_MAX);
        let height = nan_to_zero(self.height).clamp(0.0, PAGE_PERCENT_MAX);

        Self {
            x: nan_to_zero(self.x).clamp(0.0, PAGE_PERCENT_MAX - width),
            y: nan_to_zero(self.y).clamp(0.0, PAGE_PERCENT_MAX - height),
            width,
            height,
        }
    }

    /// True when the rectangle satisfies the settled-field invariant:
    /// positive size, non-negative origin, and no overhang past 100%.
    #[must_use]
    pub fn is_within_page(&self) -> bool {
        self.width > 0.0
            && self.height > 0.0
            && self.x >= 0.0
            && self.y >= 0.0
            && self.x + self.width <= PAGE_PERCENT_MAX
            && self.y + self.height <= PAGE_PERCENT_MAX
    }
}

#[inline]
fn nan_to_zero(value: f64) -> f64 {
    if value.is_nan() { 0.0 } else { value }
}

// ---------------------------------------------------------------------------
// Resolver
// ---------------------------------------------------------------------------

/// Convert a device-pixel point into page percent.
pub fn to_page_percent(point: PixelPoint, page: &PixelRect) -> Result<PagePoint> {
    page.ensure_anchorable()?;
    Ok(PagePoint {
        x: (point.x - page.left) / page.width * PAGE_PERCENT_MAX,
        y: (point.y - page.top) / page.height * PAGE_PERCENT_MAX,
    })
}

/// Convert a page-percent point back into device pixels for `page`.
#[must_use]
pub fn from_page_percent(point: PagePoint, page: &PixelRect) -> PixelPoint {
    PixelPoint {
        x: page.left + point.x / PAGE_PERCENT_MAX * page.width,
        y: page.top + point.y / PAGE_PERCENT_MAX * page.height,
    }
}

/// Scale a pixel size into page percent, each axis by its own page dimension.
pub fn size_to_page_percent(size: PixelSize, page: &PixelRect) -> Result<PageSize> {
    page.ensure_anchorable()?;
    Ok(PageSize {
        width: size.width / page.width * PAGE_PERCENT_MAX,
        height: size.height / page.height * PAGE_PERCENT_MAX,
    })
}

/// Shift `point` so that a box of `size` is centred on it.
#[must_use]
pub fn center_on(point: PagePoint, size: PageSize) -> PagePoint {
    PagePoint {
        x: point.x - size.width / 2.0,
        y: point.y - size.height / 2.0,
    }
}

/// Position and size of a rendered field box relative to its page.
///
/// The result is not clamped; callers clamp before committing.
pub fn rect_to_page_percent(node: &PixelRect, page: &PixelRect) -> Result<PageRect> {
    let origin = to_page_percent(PixelPoint::new(node.left, node.top), page)?;
    let size = size_to_page_percent(node.size(), page)?;
    Ok(PageRect::from_parts(origin, size))
}

/// Geometry of a field dropped with its centre under `pointer`.
///
/// Runs point→percent, size→percent, then centre-on-size. The result is
/// unclamped.
pub fn place_centered(pointer: PixelPoint, size: PixelSize, page: &PixelRect) -> Result<PageRect> {
    let point = to_page_percent(pointer, page)?;
    let size = size_to_page_percent(size, page)?;
    Ok(PageRect::from_parts(center_on(point, size), size))
}
