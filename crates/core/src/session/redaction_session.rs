use std::path::Path;

use crate::blurring::domain::region_blurrer::RegionBlurrer;
use crate::blurring::infrastructure::blurrer_factory::{self, BlurrerFactory};
use crate::blurring::infrastructure::cpu_gaussian_blurrer::CpuGaussianBlurrer;
use crate::document::domain::document_writer::DocumentWriter;
use crate::document::domain::page_rasterizer::PageRasterizer;
use crate::document::infrastructure::lopdf_writer::LopdfWriter;
use crate::document::infrastructure::pdfium_rasterizer::PdfiumRasterizer;
use crate::document::page_store::PageStore;
use crate::editing::display_transform::DisplayTransform;
use crate::editing::region_editor::RegionEditor;
use crate::shared::constants::{DEFAULT_DPI, MAX_DPI, MIN_DPI, MIN_REGION_SIDE};
use crate::shared::error::{BlurError, EditError, IndexError, LoadError, WriteError};
use crate::shared::geometry::{DisplayRect, Point};
use crate::shared::page::Page;
use crate::shared::region::Region;

/// One editing session over one loaded document.
///
/// Owns the page store and the selection state together with the rasterizer,
/// writer and blurrer they are driven with. The desktop app and the CLI both
/// go through this type.
pub struct RedactionSession {
    store: PageStore,
    editor: RegionEditor,
    rasterizer: Box<dyn PageRasterizer>,
    writer: Box<dyn DocumentWriter>,
    blurrer: Box<dyn RegionBlurrer>,
    make_blurrer: BlurrerFactory,
    dpi: u32,
}

impl RedactionSession {
    pub fn new(
        rasterizer: Box<dyn PageRasterizer>,
        writer: Box<dyn DocumentWriter>,
        make_blurrer: BlurrerFactory,
        blur_radius: f32,
        dpi: u32,
    ) -> Result<Self, BlurError> {
        Ok(Self {
            store: PageStore::new(),
            editor: RegionEditor::new(),
            rasterizer,
            writer,
            blurrer: make_blurrer(blur_radius)?,
            make_blurrer,
            dpi: clamp_dpi(dpi),
        })
    }

    /// Session backed by pdfium, lopdf and the CPU Gaussian blurrer.
    pub fn with_defaults(blur_radius: f32, dpi: u32) -> Result<Self, BlurError> {
        Self::new(
            Box::new(PdfiumRasterizer::new()),
            Box::new(LopdfWriter::new()),
            blurrer_factory::create_blurrer,
            blur_radius,
            dpi,
        )
    }

    /// Loads `path`, replacing the current document only on success.
    pub fn open(&mut self, path: &Path) -> Result<usize, LoadError> {
        let count = self.store.load(path, self.rasterizer.as_ref(), self.dpi)?;
        self.editor.cancel_selection();
        log::info!("Opened {} ({} pages at {} dpi)", path.display(), count, self.dpi);
        Ok(count)
    }

    pub fn export(&self, path: &Path) -> Result<(), WriteError> {
        self.store.export_all(path, self.writer.as_ref())
    }

    pub fn page(&self, index: usize) -> Result<&Page, IndexError> {
        self.store.page(index)
    }

    pub fn current_page(&self) -> Option<&Page> {
        self.store.current_page()
    }

    pub fn current_index(&self) -> usize {
        self.store.current_index()
    }

    pub fn page_count(&self) -> usize {
        self.store.len()
    }

    pub fn is_loaded(&self) -> bool {
        !self.store.is_empty()
    }

    pub fn source_path(&self) -> Option<&Path> {
        self.store.source_path()
    }

    pub fn has_next(&self) -> bool {
        self.store.has_next()
    }

    pub fn has_previous(&self) -> bool {
        self.store.has_previous()
    }

    pub fn next_page(&mut self) -> bool {
        self.editor.cancel_selection();
        self.store.next_page()
    }

    pub fn previous_page(&mut self) -> bool {
        self.editor.cancel_selection();
        self.store.previous_page()
    }

    pub fn go_to(&mut self, index: usize) -> Result<(), IndexError> {
        self.editor.cancel_selection();
        self.store.go_to(index)
    }

    pub fn begin_selection(&mut self, point: Point) {
        if self.is_loaded() {
            self.editor.begin_selection(point);
        }
    }

    pub fn update_selection(&mut self, point: Point) -> Option<DisplayRect> {
        self.editor.update_selection(point)
    }

    pub fn cancel_selection(&mut self) {
        self.editor.cancel_selection();
    }

    pub fn live_selection(&self) -> Option<DisplayRect> {
        self.editor.live_rect()
    }

    pub fn is_selecting(&self) -> bool {
        self.editor.is_selecting()
    }

    pub fn drag_point(&self) -> Option<Point> {
        self.editor.drag_point()
    }

    /// Ends the current drag and blurs it on the current page.
    pub fn commit_selection(
        &mut self,
        point: Point,
        transform: &DisplayTransform,
    ) -> Result<Option<Region>, BlurError> {
        let Some(page) = self.store.current_page_mut() else {
            self.editor.cancel_selection();
            return Ok(None);
        };
        self.editor
            .commit_selection(point, transform, page, self.blurrer.as_ref())
    }

    /// Blurs `region` on page `page_index`, clamped to the page.
    ///
    /// Returns the region actually blurred, or `None` when the clamped region
    /// is too thin to blur.
    pub fn blur_region(
        &mut self,
        page_index: usize,
        region: Region,
    ) -> Result<Option<Region>, EditError> {
        let page = self.store.page_mut(page_index)?;
        let bounds = Region::new(0, 0, page.width(), page.height());
        let clamped = region
            .intersection(&bounds)
            .filter(|r| r.width >= MIN_REGION_SIDE && r.height >= MIN_REGION_SIDE);
        let Some(clamped) = clamped else {
            log::warn!("Region {:?} misses page {}, skipped", region, page_index + 1);
            return Ok(None);
        };
        self.blurrer.blur(page, &clamped)?;
        Ok(Some(clamped))
    }

    pub fn blur_radius(&self) -> f32 {
        self.blurrer.radius()
    }

    /// Rebuilds the blurrer. Already-blurred pixels are not touched.
    pub fn set_blur_radius(&mut self, radius: f32) -> Result<(), BlurError> {
        self.blurrer = (self.make_blurrer)(radius)?;
        Ok(())
    }

    pub fn dpi(&self) -> u32 {
        self.dpi
    }

    /// Sets the resolution used by the next `open`.
    pub fn set_dpi(&mut self, dpi: u32) {
        self.dpi = clamp_dpi(dpi);
    }
}

impl Default for RedactionSession {
    fn default() -> Self {
        Self {
            store: PageStore::new(),
            editor: RegionEditor::new(),
            rasterizer: Box::new(PdfiumRasterizer::new()),
            writer: Box::new(LopdfWriter::new()),
            blurrer: Box::new(CpuGaussianBlurrer::default()),
            make_blurrer: blurrer_factory::create_blurrer,
            dpi: DEFAULT_DPI,
        }
    }
}

fn clamp_dpi(dpi: u32) -> u32 {
    let clamped = dpi.clamp(MIN_DPI, MAX_DPI);
    if clamped != dpi {
        log::warn!("DPI {dpi} out of range, using {clamped}");
    }
    clamped
}
