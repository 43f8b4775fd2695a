//! Closed-form VESA timing generators.
//!
//! [`cvt()`] implements Coordinated Video Timing 1.2 (standard and reduced
//! blanking) and [`gtf()`] the Generalized Timing Formula. Both return a
//! [`TimingParameterSet`] describing one complete video mode.

/// Error types for timing generation.
pub mod error;

/// Generator output.
pub mod params;

/// Coordinated Video Timing.
pub mod cvt;

/// Generalized Timing Formula.
pub mod gtf;

pub use cvt::{cvt, ReducedBlanking};
pub use error::TimingError;
pub use gtf::{gtf, GtfParams};
pub use params::TimingParameterSet;

/// Reject requests no formula can produce a mode for.
///
/// `min_h_active` is the generator's character cell width.
pub(crate) fn check_request(
    h_active: u32,
    v_active: u32,
    refresh_rate: f64,
    min_h_active: u32,
) -> Result<(), TimingError> {
    if h_active < min_h_active || v_active < 2 {
        return Err(TimingError::InvalidGeometry { h_active, v_active });
    }
    if !refresh_rate.is_finite() || refresh_rate <= 0.0 {
        return Err(TimingError::InvalidRefreshRate(refresh_rate));
    }
    Ok(())
}

/// Convert an intermediate result to a pixel or line count.
pub(crate) fn count(field: &'static str, value: f64) -> Result<u32, TimingError> {
    if !value.is_finite() || value < 0.0 || value > u32::MAX as f64 {
        return Err(TimingError::Degenerate { field, value });
    }
    Ok(value as u32)
}

/// Reject a non-positive or non-finite horizontal period estimate.
pub(crate) fn check_period(h_period: f64) -> Result<f64, TimingError> {
    if !h_period.is_finite() || h_period <= 0.0 {
        return Err(TimingError::Degenerate {
            field: "h_period",
            value: h_period,
        });
    }
    Ok(h_period)
}
