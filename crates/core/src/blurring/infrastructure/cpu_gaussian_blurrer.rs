use std::cell::RefCell;

use crate::blurring::domain::region_blurrer::RegionBlurrer;
use crate::shared::constants::DEFAULT_BLUR_RADIUS;
use crate::shared::error::BlurError;
use crate::shared::page::{Page, CHANNELS};
use crate::shared::region::Region;

use super::gaussian::{self, RoiRect};

/// Kernel length above which the downscale → blur → upscale path kicks in.
const DOWNSCALE_KERNEL_STEP: usize = 50;

/// CPU blurrer using a separable Gaussian over a rectangular ROI.
///
/// The ROI is cut out, blurred on its own (edges clamp to the ROI border)
/// and pasted back, so pixels outside the region never change and never
/// bleed in.
pub struct CpuGaussianBlurrer {
    radius: f32,
    kernel: Vec<f32>,
    scale: usize,
    small_kernel: Vec<f32>,
    roi_buf: RefCell<Vec<u8>>,
    blur_temp: RefCell<Vec<f32>>,
}

impl CpuGaussianBlurrer {
    pub fn new(radius: f32) -> Result<Self, BlurError> {
        if !(radius.is_finite() && radius > 0.0) {
            return Err(BlurError::InvalidRadius(radius));
        }
        let kernel_size = gaussian::kernel_size_for_sigma(radius);
        let scale = (kernel_size / DOWNSCALE_KERNEL_STEP).max(1);
        let small_sigma = radius / scale as f32;
        Ok(Self {
            radius,
            kernel: gaussian::gaussian_kernel_1d(kernel_size, radius),
            scale,
            small_kernel: gaussian::gaussian_kernel_1d(
                gaussian::kernel_size_for_sigma(small_sigma),
                small_sigma,
            ),
            roi_buf: RefCell::new(Vec::new()),
            blur_temp: RefCell::new(Vec::new()),
        })
    }
}

impl Default for CpuGaussianBlurrer {
    fn default() -> Self {
        Self::new(DEFAULT_BLUR_RADIUS).expect("default blur radius is positive")
    }
}

impl RegionBlurrer for CpuGaussianBlurrer {
    fn blur(&self, page: &mut Page, region: &Region) -> Result<(), BlurError> {
        if region.is_empty() {
            return Ok(());
        }
        if !region.fits_within(page.width(), page.height()) {
            return Err(BlurError::OutOfBounds {
                x: region.x,
                y: region.y,
                width: region.width,
                height: region.height,
                page_width: page.width(),
                page_height: page.height(),
            });
        }

        let pw = page.width() as usize;
        let rect = RoiRect {
            x: region.x as usize,
            y: region.y as usize,
            w: region.width as usize,
            h: region.height as usize,
        };
        let data = page.data_mut();

        let mut roi = self.roi_buf.borrow_mut();
        let mut temp = self.blur_temp.borrow_mut();
        gaussian::copy_roi_out(data, pw, CHANNELS, rect, &mut roi);
        gaussian::blur_roi(
            &mut roi,
            rect.w,
            rect.h,
            CHANNELS,
            &self.kernel,
            &self.small_kernel,
            self.scale,
            &mut temp,
        );
        gaussian::copy_roi_in(data, &roi, pw, CHANNELS, rect);

        log::debug!(
            "Blurred {}x{} at ({}, {}) on page {} (radius={})",
            rect.w,
            rect.h,
            rect.x,
            rect.y,
            page.index() + 1,
            self.radius
        );
        Ok(())
    }

    fn radius(&self) -> f32 {
        self.radius
    }
}
