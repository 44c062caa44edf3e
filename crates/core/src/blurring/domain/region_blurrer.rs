use crate::shared::error::BlurError;
use crate::shared::page::Page;
use crate::shared::region::Region;

/// Domain interface for blurring one rectangular region of a page.
///
/// Implementations modify the page in place (`&mut Page`) and must leave
/// every pixel outside `region` untouched.
pub trait RegionBlurrer {
    fn blur(&self, page: &mut Page, region: &Region) -> Result<(), BlurError>;

    /// Strength of the blur as a Gaussian standard deviation in pixels.
    fn radius(&self) -> f32;
}
