use std::path::{Path, PathBuf};

use crate::document::domain::document_writer::DocumentWriter;
use crate::document::domain::page_rasterizer::PageRasterizer;
use crate::shared::error::{IndexError, LoadError, WriteError};
use crate::shared::page::Page;

/// The loaded document: one bitmap per page plus the page being viewed.
///
/// A failed load never disturbs the document already held. The current index
/// is always inside `0..len()` while a document is loaded.
#[derive(Default)]
pub struct PageStore {
    pages: Vec<Page>,
    current: usize,
    source: Option<PathBuf>,
}

impl PageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rasterizes `path` and replaces the held document on success.
    ///
    /// Returns the number of pages loaded.
    pub fn load(
        &mut self,
        path: &Path,
        rasterizer: &dyn PageRasterizer,
        dpi: u32,
    ) -> Result<usize, LoadError> {
        let pages = rasterizer.rasterize(path, dpi)?;
        if pages.is_empty() {
            return Err(LoadError::EmptyDocument(path.to_path_buf()));
        }
        self.pages = pages;
        self.current = 0;
        self.source = Some(path.to_path_buf());
        Ok(self.pages.len())
    }

    /// Encodes every page, edits included, as a new document at `path`.
    pub fn export_all(&self, path: &Path, writer: &dyn DocumentWriter) -> Result<(), WriteError> {
        if self.pages.is_empty() {
            return Err(WriteError::NothingToExport);
        }
        writer.write(path, &self.pages)
    }

    pub fn page(&self, index: usize) -> Result<&Page, IndexError> {
        let len = self.pages.len();
        self.pages.get(index).ok_or(IndexError { index, len })
    }

    pub fn page_mut(&mut self, index: usize) -> Result<&mut Page, IndexError> {
        let len = self.pages.len();
        self.pages.get_mut(index).ok_or(IndexError { index, len })
    }

    pub fn current_page(&self) -> Option<&Page> {
        self.pages.get(self.current)
    }

    pub fn current_page_mut(&mut self) -> Option<&mut Page> {
        self.pages.get_mut(self.current)
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn source_path(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn has_next(&self) -> bool {
        self.current + 1 < self.pages.len()
    }

    pub fn has_previous(&self) -> bool {
        self.current > 0
    }

    /// Moves forward one page. No-op on the last page; returns whether it moved.
    pub fn next_page(&mut self) -> bool {
        if self.has_next() {
            self.current += 1;
            true
        } else {
            false
        }
    }

    /// Moves back one page. No-op on the first page; returns whether it moved.
    pub fn previous_page(&mut self) -> bool {
        if self.has_previous() {
            self.current -= 1;
            true
        } else {
            false
        }
    }

    pub fn go_to(&mut self, index: usize) -> Result<(), IndexError> {
        self.page(index)?;
        self.current = index;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    struct StubRasterizer {
        page_count: usize,
    }

    impl PageRasterizer for StubRasterizer {
        fn rasterize(&self, _path: &Path, dpi: u32) -> Result<Vec<Page>, LoadError> {
            Ok((0..self.page_count)
                .map(|i| Page::new(vec![i as u8; 4 * 4 * 3], 4, 4, i, dpi))
                .collect())
        }
    }

    struct FailingRasterizer;

    impl PageRasterizer for FailingRasterizer {
        fn rasterize(&self, path: &Path, _dpi: u32) -> Result<Vec<Page>, LoadError> {
            Err(LoadError::NotAPdf(path.to_path_buf()))
        }
    }

    struct RecordingWriter {
        written: RefCell<Vec<(PathBuf, usize)>>,
    }

    impl DocumentWriter for RecordingWriter {
        fn write(&self, path: &Path, pages: &[Page]) -> Result<(), WriteError> {
            self.written
                .borrow_mut()
                .push((path.to_path_buf(), pages.len()));
            Ok(())
        }
    }

    fn loaded(page_count: usize) -> PageStore {
        let mut store = PageStore::new();
        store
            .load(Path::new("doc.pdf"), &StubRasterizer { page_count }, 72)
            .unwrap();
        store
    }

    #[test]
    fn test_new_store_is_empty() {
        let store = PageStore::new();
        assert!(store.is_empty());
        assert!(store.current_page().is_none());
        assert!(store.source_path().is_none());
    }

    #[test]
    fn test_load_replaces_pages_and_resets_index() {
        let mut store = loaded(3);
        store.next_page();
        store.next_page();

        let count = store
            .load(Path::new("other.pdf"), &StubRasterizer { page_count: 2 }, 150)
            .unwrap();
        assert_eq!(count, 2);
        assert_eq!(store.current_index(), 0);
        assert_eq!(store.source_path(), Some(Path::new("other.pdf")));
        assert_eq!(store.page(1).unwrap().dpi(), 150);
    }

    #[test]
    fn test_failed_load_keeps_previous_document() {
        let mut store = loaded(3);
        store.next_page();
        let before = store.pages().to_vec();

        let result = store.load(Path::new("notes.txt"), &FailingRasterizer, 72);

        assert!(matches!(result, Err(LoadError::NotAPdf(_))));
        assert_eq!(store.pages(), &before[..]);
        assert_eq!(store.current_index(), 1);
        assert_eq!(store.source_path(), Some(Path::new("doc.pdf")));
    }

    #[test]
    fn test_empty_document_is_load_error() {
        let mut store = loaded(2);
        let result = store.load(Path::new("blank.pdf"), &StubRasterizer { page_count: 0 }, 72);
        assert!(matches!(result, Err(LoadError::EmptyDocument(_))));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_page_out_of_bounds_is_index_error() {
        let store = loaded(2);
        assert_eq!(store.page(2).err(), Some(IndexError { index: 2, len: 2 }));
        assert!(store.page(1).is_ok());
    }

    #[test]
    fn test_navigation_stays_in_bounds() {
        let mut store = loaded(3);
        assert!(!store.previous_page());
        assert_eq!(store.current_index(), 0);

        assert!(store.next_page());
        assert!(store.next_page());
        assert!(!store.next_page());
        assert_eq!(store.current_index(), 2);

        assert!(store.previous_page());
        assert_eq!(store.current_index(), 1);
    }

    #[test]
    fn test_navigation_on_empty_store_is_noop() {
        let mut store = PageStore::new();
        assert!(!store.next_page());
        assert!(!store.previous_page());
        assert_eq!(store.current_index(), 0);
    }

    #[test]
    fn test_random_walk_never_leaves_bounds() {
        let mut store = loaded(4);
        // deterministic pseudo-random walk
        let mut seed = 17u32;
        for _ in 0..200 {
            seed = seed.wrapping_mul(1_103_515_245).wrapping_add(12_345);
            if seed >> 16 & 1 == 0 {
                store.next_page();
            } else {
                store.previous_page();
            }
            assert!(store.current_index() < store.len());
        }
    }

    #[test]
    fn test_go_to() {
        let mut store = loaded(3);
        store.go_to(2).unwrap();
        assert_eq!(store.current_page().unwrap().index(), 2);
        assert_eq!(store.go_to(3), Err(IndexError { index: 3, len: 3 }));
        assert_eq!(store.current_index(), 2);
    }

    #[test]
    fn test_current_page_mut_edits_stored_bitmap() {
        let mut store = loaded(2);
        store.next_page();
        store.current_page_mut().unwrap().data_mut()[0] = 99;
        assert_eq!(store.page(1).unwrap().data()[0], 99);
        assert_eq!(store.page(0).unwrap().data()[0], 0);
    }

    #[test]
    fn test_export_all_hands_every_page_to_writer() {
        let store = loaded(3);
        let writer = RecordingWriter {
            written: RefCell::new(Vec::new()),
        };
        store.export_all(Path::new("out.pdf"), &writer).unwrap();
        assert_eq!(
            writer.written.borrow().as_slice(),
            &[(PathBuf::from("out.pdf"), 3)]
        );
    }

    #[test]
    fn test_export_without_document_fails() {
        let writer = RecordingWriter {
            written: RefCell::new(Vec::new()),
        };
        let result = PageStore::new().export_all(Path::new("out.pdf"), &writer);
        assert!(matches!(result, Err(WriteError::NothingToExport)));
        assert!(writer.written.borrow().is_empty());
    }
}
