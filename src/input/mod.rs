//! Input processing module
//! Handles file detection, text extraction, and resume validation

pub mod file_detector;
pub mod manager;
pub mod text_extractor;

pub use manager::{InputManager, ParsedDocument, ResumeValidation};
