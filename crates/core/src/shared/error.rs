use std::path::PathBuf;

use thiserror::Error;

/// Failure to turn a file into an in-memory document.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Not a PDF file: {}", .0.display())]
    NotAPdf(PathBuf),

    #[error("PDF rasterizer unavailable: {0}")]
    RasterizerUnavailable(String),

    #[error("Could not read {}: {reason}", .path.display())]
    InvalidDocument { path: PathBuf, reason: String },

    #[error("{} contains no pages", .0.display())]
    EmptyDocument(PathBuf),
}

/// Failure to export the in-memory document.
#[derive(Debug, Error)]
pub enum WriteError {
    #[error("No document loaded")]
    NothingToExport,

    #[error("Could not write {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Page index {index} out of range (document has {len} pages)")]
pub struct IndexError {
    pub index: usize,
    pub len: usize,
}

#[derive(Debug, Error, PartialEq)]
pub enum BlurError {
    #[error("Blur radius must be positive, got {0}")]
    InvalidRadius(f32),

    #[error("Region {x},{y} {width}x{height} exceeds page bounds {page_width}x{page_height}")]
    OutOfBounds {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
        page_width: u32,
        page_height: u32,
    },
}

/// Failure to apply an edit to a specific page.
#[derive(Debug, Error, PartialEq)]
pub enum EditError {
    #[error(transparent)]
    Index(#[from] IndexError),

    #[error(transparent)]
    Blur(#[from] BlurError),
}
