use crate::shared::constants::PDF_POINTS_PER_INCH;
use crate::shared::geometry::{Point, Size};

/// Maps between a display surface and page bitmap pixels.
///
/// `display = offset + pixel * scale`, where `scale` is display units per
/// bitmap pixel and `offset` is where the bitmap's top-left corner is drawn.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DisplayTransform {
    pub scale: f32,
    pub offset: Point,
}

impl DisplayTransform {
    pub const fn identity() -> Self {
        Self {
            scale: 1.0,
            offset: Point::new(0.0, 0.0),
        }
    }

    /// Fit of an `image_width` x `image_height` bitmap inside `viewport`,
    /// centered with the aspect ratio preserved. Small pages are scaled up.
    ///
    /// Degenerate inputs fall back to the identity transform.
    pub fn contain(image_width: u32, image_height: u32, viewport: Size) -> Self {
        if image_width == 0
            || image_height == 0
            || !(viewport.width > 0.0 && viewport.height > 0.0)
        {
            return Self::identity();
        }
        let (iw, ih) = (image_width as f32, image_height as f32);
        let scale = (viewport.width / iw).min(viewport.height / ih);
        Self {
            scale,
            offset: Point::new(
                (viewport.width - iw * scale) / 2.0,
                (viewport.height - ih * scale) / 2.0,
            ),
        }
    }

    /// Transform for input given in PDF points on a page rasterized at `dpi`.
    pub fn for_dpi(dpi: u32) -> Self {
        Self {
            scale: PDF_POINTS_PER_INCH / dpi.max(1) as f32,
            offset: Point::new(0.0, 0.0),
        }
    }

    /// Display position to fractional bitmap pixel coordinates. Unclamped.
    pub fn to_pixel(&self, point: Point) -> (f32, f32) {
        (
            (point.x - self.offset.x) / self.scale,
            (point.y - self.offset.y) / self.scale,
        )
    }

    pub fn to_display(&self, x: f32, y: f32) -> Point {
        Point::new(
            self.offset.x + x * self.scale,
            self.offset.y + y * self.scale,
        )
    }
}

impl Default for DisplayTransform {
    fn default() -> Self {
        Self::identity()
    }
}
