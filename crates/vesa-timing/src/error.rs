/// Errors that can occur while generating a timing.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TimingError {
    /// Reduced blanking selector not recognised.
    #[error("Unknown reduced blanking version {0:?} (expected off, v1, v2 or v2-video)")]
    UnknownReducedBlanking(String),

    /// Active area too small to hold a single character cell.
    #[error("Invalid geometry {h_active}x{v_active}")]
    InvalidGeometry { h_active: u32, v_active: u32 },

    /// Refresh rate is zero, negative or not a number.
    #[error("Invalid refresh rate {0}")]
    InvalidRefreshRate(f64),

    /// The formula produced a value that is not a valid count or period.
    #[error("Requested mode is degenerate: {field} = {value}")]
    Degenerate { field: &'static str, value: f64 },
}
