pub mod editor;
pub mod validation;
