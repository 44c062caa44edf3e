/// Gaussian standard deviation, in pixels, applied to committed selections.
pub const DEFAULT_BLUR_RADIUS: f32 = 15.0;

/// Rasterization resolution used when nothing else is configured.
pub const DEFAULT_DPI: u32 = 200;

pub const MIN_DPI: u32 = 72;
pub const MAX_DPI: u32 = 600;

pub const MIN_BLUR_RADIUS: f32 = 1.0;
pub const MAX_BLUR_RADIUS: f32 = 100.0;

pub const PDF_POINTS_PER_INCH: f32 = 72.0;

/// Regions thinner than this (in pixels) on either axis are treated as empty.
pub const MIN_REGION_SIDE: u32 = 2;

pub const PDF_EXTENSION: &str = "pdf";
