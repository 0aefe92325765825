//! File type detection

use crate::error::{Result, ResumeFitError};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    Pdf,
    Text,
    Markdown,
    Unknown,
}

impl FileType {
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "pdf" => FileType::Pdf,
            "txt" => FileType::Text,
            "md" | "markdown" => FileType::Markdown,
            _ => FileType::Unknown,
        }
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .ok_or_else(|| {
                ResumeFitError::InvalidInput(format!("File has no extension: {}", path.display()))
            })?;

        Ok(Self::from_extension(extension))
    }

    /// Name of the extraction method reported with parsed documents
    pub fn method(&self) -> &'static str {
        match self {
            FileType::Pdf => "pdf_extract",
            FileType::Text => "plain_text",
            FileType::Markdown => "markdown",
            FileType::Unknown => "unknown",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detection_by_extension() {
        assert_eq!(FileType::from_extension("PDF"), FileType::Pdf);
        assert_eq!(FileType::from_extension("markdown"), FileType::Markdown);
        assert_eq!(FileType::from_extension("docx"), FileType::Unknown);

        assert_eq!(FileType::from_path(Path::new("cv/resume.md")).unwrap(), FileType::Markdown);
        assert!(FileType::from_path(Path::new("README")).is_err());
    }
}
