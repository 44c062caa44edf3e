pub mod domain;
pub mod infrastructure;
pub mod page_store;
