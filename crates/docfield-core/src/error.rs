use thiserror::Error;

pub type Result<T> = std::result::Result<T, GeometryError>;

/// Failures raised while resolving page geometry.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    /// The page surface has no usable area (zero, negative, or non-finite).
    #[error("page surface cannot anchor percentages (width={width}, height={height})")]
    DegeneratePage { width: f64, height: f64 },

    /// Page numbers are 1-based.
    #[error("page number must be >= 1 (got {page_number})")]
    InvalidPageNumber { page_number: u32 },
}
