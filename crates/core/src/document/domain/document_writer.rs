use std::path::Path;

use crate::shared::error::WriteError;
use crate::shared::page::Page;

/// Encodes in-memory page bitmaps as a new document, one output page per bitmap.
pub trait DocumentWriter {
    fn write(&self, path: &Path, pages: &[Page]) -> Result<(), WriteError>;
}
