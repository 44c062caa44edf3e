pub mod lopdf_writer;
pub mod pdfium_rasterizer;
