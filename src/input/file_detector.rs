//! File type detection

use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    Pdf,
    Docx,
    /// Anything else is decoded as UTF-8 text
    Other,
}

impl FileType {
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "pdf" => FileType::Pdf,
            "docx" => FileType::Docx,
            _ => FileType::Other,
        }
    }

    pub fn from_filename(filename: &str) -> Self {
        Path::new(filename)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(Self::from_extension)
            .unwrap_or(FileType::Other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detection() {
        assert_eq!(FileType::from_filename("cv.PDF"), FileType::Pdf);
        assert_eq!(FileType::from_filename("uploads/jane.docx"), FileType::Docx);
        assert_eq!(FileType::from_filename("notes.txt"), FileType::Other);
        assert_eq!(FileType::from_filename("README"), FileType::Other);
    }
}
