pub mod page_canvas;
