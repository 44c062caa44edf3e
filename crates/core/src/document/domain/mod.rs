pub mod document_writer;
pub mod page_rasterizer;
