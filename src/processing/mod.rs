//! Text processing and analysis module

pub mod analyzer;
pub mod gap_analyzer;
pub mod matcher;
pub mod skill_extractor;
pub mod taxonomy;
pub mod term_weights;
pub mod text_processor;
