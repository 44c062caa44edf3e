use crate::shared::constants::MIN_REGION_SIDE;

/// A blur target in page pixel coordinates.
///
/// Always lies fully inside the page it was built for when produced by
/// [`Region::clamped`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Region {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Region {
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Builds a region from two pixel-space corners given in any order,
    /// intersected with a `page_width` x `page_height` page.
    ///
    /// Corners are floored, so a corner at 9.7 lands on pixel column 9.
    /// Returns `None` when the intersection is thinner than
    /// [`MIN_REGION_SIDE`] on either axis, including when the rectangle lies
    /// entirely outside the page.
    pub fn clamped(
        (ax, ay): (f32, f32),
        (bx, by): (f32, f32),
        page_width: u32,
        page_height: u32,
    ) -> Option<Region> {
        if !(ax.is_finite() && ay.is_finite() && bx.is_finite() && by.is_finite()) {
            return None;
        }
        let x1 = clamp_axis(ax.min(bx), page_width);
        let y1 = clamp_axis(ay.min(by), page_height);
        let x2 = clamp_axis(ax.max(bx), page_width);
        let y2 = clamp_axis(ay.max(by), page_height);

        let width = x2.saturating_sub(x1);
        let height = y2.saturating_sub(y1);
        if width < MIN_REGION_SIDE || height < MIN_REGION_SIDE {
            return None;
        }
        Some(Region::new(x1, y1, width, height))
    }

    /// Exclusive right edge, saturating at `u32::MAX`.
    pub fn right(&self) -> u32 {
        self.x.saturating_add(self.width)
    }

    pub fn bottom(&self) -> u32 {
        self.y.saturating_add(self.height)
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn contains(&self, x: u32, y: u32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    pub fn fits_within(&self, page_width: u32, page_height: u32) -> bool {
        self.right() <= page_width && self.bottom() <= page_height
    }

    /// Overlap of two regions, or `None` when they only touch or are disjoint.
    pub fn intersection(&self, other: &Region) -> Option<Region> {
        let ix1 = self.x.max(other.x);
        let iy1 = self.y.max(other.y);
        let ix2 = self.right().min(other.right());
        let iy2 = self.bottom().min(other.bottom());
        if ix2 <= ix1 || iy2 <= iy1 {
            return None;
        }
        Some(Region::new(ix1, iy1, ix2 - ix1, iy2 - iy1))
    }
}

fn clamp_axis(value: f32, limit: u32) -> u32 {
    value.floor().clamp(0.0, limit as f32) as u32
}
