pub mod constants;
pub mod error;
pub mod geometry;
pub mod page;
pub mod region;
