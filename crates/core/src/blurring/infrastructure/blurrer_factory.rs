use crate::blurring::domain::region_blurrer::RegionBlurrer;
use crate::shared::constants::{MAX_BLUR_RADIUS, MIN_BLUR_RADIUS};
use crate::shared::error::BlurError;

use super::cpu_gaussian_blurrer::CpuGaussianBlurrer;

/// Builds a blurrer for a given radius. Lets a session swap blur strength
/// without knowing the concrete implementation.
pub type BlurrerFactory = fn(f32) -> Result<Box<dyn RegionBlurrer>, BlurError>;

/// Creates the CPU Gaussian blurrer, clamping the radius to the supported range.
///
/// Non-finite or non-positive radii are still rejected.
pub fn create_blurrer(radius: f32) -> Result<Box<dyn RegionBlurrer>, BlurError> {
    if !(radius.is_finite() && radius > 0.0) {
        return Err(BlurError::InvalidRadius(radius));
    }
    let clamped = radius.clamp(MIN_BLUR_RADIUS, MAX_BLUR_RADIUS);
    if clamped != radius {
        log::warn!("Blur radius {radius} out of range, using {clamped}");
    }
    log::info!("Using CPU Gaussian blur (radius={clamped})");
    Ok(Box::new(CpuGaussianBlurrer::new(clamped)?))
}
