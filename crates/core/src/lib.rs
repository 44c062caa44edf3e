pub mod blurring;
pub mod document;
pub mod editing;
pub mod session;
pub mod shared;
