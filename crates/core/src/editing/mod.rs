pub mod display_transform;
pub mod region_editor;
