use std::cell::RefCell;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use image::{DynamicImage, RgbaImage};
use pdfium_render::prelude::*;

use crate::document::domain::page_rasterizer::PageRasterizer;
use crate::shared::constants::PDF_POINTS_PER_INCH;
use crate::shared::error::LoadError;
use crate::shared::page::Page;

const PDF_MAGIC: &[u8] = b"%PDF-";

/// Readers tolerate leading garbage before the header within the first KiB.
const HEADER_SEARCH_WINDOW: u64 = 1024;

/// Rasterizes PDF pages through the pdfium library.
///
/// The pdfium binding is resolved on first use, looking next to the
/// executable's working directory first and falling back to the system
/// library. A missing library surfaces as [`LoadError::RasterizerUnavailable`]
/// on load rather than at construction, so the app can start without it.
pub struct PdfiumRasterizer {
    library_dir: PathBuf,
    pdfium: RefCell<Option<Pdfium>>,
}

impl PdfiumRasterizer {
    pub fn new() -> Self {
        Self::with_library_dir("./")
    }

    pub fn with_library_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            library_dir: dir.into(),
            pdfium: RefCell::new(None),
        }
    }

    /// Runs `f` with a bound pdfium instance, binding it on first call.
    fn with_pdfium<T>(
        &self,
        f: impl FnOnce(&Pdfium) -> Result<T, LoadError>,
    ) -> Result<T, LoadError> {
        let mut slot = self.pdfium.borrow_mut();
        let pdfium = match slot.take() {
            Some(pdfium) => pdfium,
            None => bind_pdfium(&self.library_dir)?,
        };
        let result = f(&pdfium);
        *slot = Some(pdfium);
        result
    }
}

impl Default for PdfiumRasterizer {
    fn default() -> Self {
        Self::new()
    }
}

impl PageRasterizer for PdfiumRasterizer {
    fn rasterize(&self, path: &Path, dpi: u32) -> Result<Vec<Page>, LoadError> {
        sniff_pdf(path)?;
        self.with_pdfium(|pdfium| render_all(pdfium, path, dpi))
    }
}

/// Cheap format check that runs before pdfium is involved.
pub fn sniff_pdf(path: &Path) -> Result<(), LoadError> {
    if !path.is_file() {
        return Err(LoadError::NotFound(path.to_path_buf()));
    }
    let mut head = Vec::with_capacity(HEADER_SEARCH_WINDOW as usize);
    File::open(path)
        .and_then(|f| f.take(HEADER_SEARCH_WINDOW).read_to_end(&mut head))
        .map_err(|e| LoadError::InvalidDocument {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

    if head.windows(PDF_MAGIC.len()).any(|w| w == PDF_MAGIC) {
        Ok(())
    } else {
        Err(LoadError::NotAPdf(path.to_path_buf()))
    }
}

fn bind_pdfium(library_dir: &Path) -> Result<Pdfium, LoadError> {
    let bindings = Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(
        library_dir,
    ))
    .or_else(|_| Pdfium::bind_to_system_library())
    .map_err(|e| LoadError::RasterizerUnavailable(e.to_string()))?;
    log::info!("Bound pdfium library");
    Ok(Pdfium::new(bindings))
}

fn render_all(pdfium: &Pdfium, path: &Path, dpi: u32) -> Result<Vec<Page>, LoadError> {
    let invalid = |reason: String| LoadError::InvalidDocument {
        path: path.to_path_buf(),
        reason,
    };

    let document = pdfium
        .load_pdf_from_file(path, None)
        .map_err(|e| invalid(e.to_string()))?;

    let scale = dpi as f32 / PDF_POINTS_PER_INCH;
    let mut pages = Vec::with_capacity(document.pages().len() as usize);

    for (index, page) in document.pages().iter().enumerate() {
        let target_width = (page.width().value * scale).round().max(1.0) as i32;
        let target_height = (page.height().value * scale).round().max(1.0) as i32;
        let config = PdfRenderConfig::new()
            .set_target_width(target_width)
            .set_target_height(target_height);

        let bitmap = page
            .render_with_config(&config)
            .map_err(|e| invalid(format!("page {}: {e}", index + 1)))?;

        let (width, height) = (bitmap.width() as u32, bitmap.height() as u32);
        let rgba = RgbaImage::from_raw(width, height, bitmap.as_rgba_bytes())
            .ok_or_else(|| invalid(format!("page {}: bitmap size mismatch", index + 1)))?;
        let rgb = DynamicImage::ImageRgba8(rgba).to_rgb8();

        log::debug!("Rasterized page {} at {}x{} ({} dpi)", index + 1, width, height, dpi);
        pages.push(Page::from_rgb_image(rgb, index, dpi));
    }

    log::info!("Rasterized {} pages from {}", pages.len(), path.display());
    Ok(pages)
}
