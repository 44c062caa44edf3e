use std::path::Path;

use crate::shared::error::LoadError;
use crate::shared::page::Page;

/// Turns a document on disk into one bitmap per page.
///
/// Implementations own all knowledge of the source format; callers only see
/// ordered [`Page`]s whose `index` matches their position.
pub trait PageRasterizer {
    fn rasterize(&self, path: &Path, dpi: u32) -> Result<Vec<Page>, LoadError>;
}
