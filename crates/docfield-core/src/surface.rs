#![forbid(unsafe_code)]

//! Page surfaces: the rendered area of one document page.
//!
//! Surfaces belong to the PDF viewer. The engine reads them through
//! [`PageSurfaceLocator`] at the moment it needs them and keeps no copy of
//! their rectangles between host notifications.

use crate::error::{GeometryError, Result};
use crate::geometry::{PixelPoint, PixelRect};

/// One page's current bounding rectangle in device pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSurface {
    page_number: u32,
    rect: PixelRect,
}

impl PageSurface {
    /// Page numbers are 1-based.
    pub fn new(page_number: u32, rect: PixelRect) -> Result<Self> {
        if page_number == 0 {
            return Err(GeometryError::InvalidPageNumber { page_number });
        }
        Ok(Self { page_number, rect })
    }

    #[must_use]
    pub const fn page_number(&self) -> u32 {
        self.page_number
    }

    #[must_use]
    pub const fn rect(&self) -> PixelRect {
        self.rect
    }
}

/// Lookup of page surfaces, supplied by the host.
pub trait PageSurfaceLocator {
    /// The surface under a device-pixel point, if any.
    fn surface_at(&self, point: PixelPoint) -> Option<PageSurface>;

    /// The surface for a 1-based page number, if mounted.
    fn surface(&self, page_number: u32) -> Option<PageSurface>;
}

impl<L: PageSurfaceLocator + ?Sized> PageSurfaceLocator for &L {
    fn surface_at(&self, point: PixelPoint) -> Option<PageSurface> {
        (**self).surface_at(point)
    }

    fn surface(&self, page_number: u32) -> Option<PageSurface> {
        (**self).surface(page_number)
    }
}

/// Host-fed table of mounted pages.
///
/// Hosts without a live layout query push every layout change into the map
/// with [`set`](Self::set); unmounted pages are [`remove`](Self::remove)d.
#[derive(Debug, Clone, Default)]
pub struct SurfaceMap {
    surfaces: Vec<PageSurface>,
}

impl SurfaceMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the surface for its page number.
    pub fn set(&mut self, surface: PageSurface) {
        match self
            .surfaces
            .binary_search_by_key(&surface.page_number, PageSurface::page_number)
        {
            Ok(index) => self.surfaces[index] = surface,
            Err(index) => self.surfaces.insert(index, surface),
        }
    }

    pub fn remove(&mut self, page_number: u32) -> Option<PageSurface> {
        let index = self
            .surfaces
            .binary_search_by_key(&page_number, PageSurface::page_number)
            .ok()?;
        Some(self.surfaces.remove(index))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.surfaces.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.surfaces.is_empty()
    }
}

impl PageSurfaceLocator for SurfaceMap {
    fn surface_at(&self, point: PixelPoint) -> Option<PageSurface> {
        self.surfaces
            .iter()
            .find(|surface| surface.rect.contains(point))
            .copied()
    }

    fn surface(&self, page_number: u32) -> Option<PageSurface> {
        self.surfaces
            .binary_search_by_key(&page_number, PageSurface::page_number)
            .ok()
            .map(|index| self.surfaces[index])
    }
}
