use image::RgbImage;

/// Bytes per pixel. Pages are always stored as packed RGB.
pub const CHANNELS: usize = 3;

/// One rasterized document page: contiguous RGB bytes in row-major order.
///
/// The bitmap is the single source of truth for the page. Edits mutate it in
/// place and there is no copy of the original pixels.
#[derive(Clone, Debug, PartialEq)]
pub struct Page {
    data: Vec<u8>,
    width: u32,
    height: u32,
    index: usize,
    dpi: u32,
}

impl Page {
    pub fn new(data: Vec<u8>, width: u32, height: u32, index: usize, dpi: u32) -> Self {
        debug_assert_eq!(
            data.len(),
            (width as usize) * (height as usize) * CHANNELS,
            "data length must equal width * height * 3"
        );
        Self {
            data,
            width,
            height,
            index,
            dpi,
        }
    }

    pub fn from_rgb_image(image: RgbImage, index: usize, dpi: u32) -> Self {
        let (width, height) = image.dimensions();
        Self::new(image.into_raw(), width, height, index, dpi)
    }

    pub fn to_rgb_image(&self) -> Option<RgbImage> {
        RgbImage::from_raw(self.width, self.height, self.data.clone())
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn dpi(&self) -> u32 {
        self.dpi
    }

    pub fn pixel(&self, x: u32, y: u32) -> [u8; 3] {
        let offset = ((y as usize) * (self.width as usize) + x as usize) * CHANNELS;
        [
            self.data[offset],
            self.data[offset + 1],
            self.data[offset + 2],
        ]
    }

    /// Page size in PDF points at the resolution it was rasterized with.
    pub fn size_in_points(&self) -> (f32, f32) {
        let scale = crate::shared::constants::PDF_POINTS_PER_INCH / self.dpi.max(1) as f32;
        (self.width as f32 * scale, self.height as f32 * scale)
    }

    /// Opaque RGBA copy for display surfaces that only accept 4 channels.
    pub fn to_rgba(&self) -> Vec<u8> {
        let mut rgba = Vec::with_capacity(self.data.len() / CHANNELS * 4);
        for px in self.data.chunks_exact(CHANNELS) {
            rgba.extend_from_slice(px);
            rgba.push(u8::MAX);
        }
        rgba
    }
}
