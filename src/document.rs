use std::path::Path;

use crate::error::AnalysisError;

/// File types the analysis service can extract text from.
pub const ACCEPTED_EXTENSIONS: [&str; 4] = ["pdf", "doc", "docx", "txt"];

/// Upload limit shown to the user. The service enforces it, not us.
pub const ADVERTISED_MAX_BYTES: u64 = 20 * 1024 * 1024;

/// A document the user picked and that passed type validation.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedFile {
    pub name: String,
    pub extension: String,
    pub content: Vec<u8>,
}

impl SelectedFile {
    pub fn size(&self) -> usize {
        self.content.len()
    }
}

/// Lower-cased text after the last `.` of a file name.
///
/// Names without a dot, and names whose only dot is the leading one
/// (`.pdf`), have no extension.
pub fn extension_of(name: &str) -> String {
    match name.rfind('.') {
        Some(0) | None => String::new(),
        Some(idx) => name[idx + 1..].to_lowercase(),
    }
}

pub fn is_accepted(extension: &str) -> bool {
    ACCEPTED_EXTENSIONS.contains(&extension)
}

fn accepted_extension(name: &str) -> Result<String, AnalysisError> {
    let extension = extension_of(name);
    if !is_accepted(&extension) {
        return Err(AnalysisError::InvalidFileType {
            name: name.to_string(),
            extension,
        });
    }
    Ok(extension)
}

pub fn select_file(name: impl Into<String>, content: Vec<u8>) -> Result<SelectedFile, AnalysisError> {
    let name = name.into();
    let extension = accepted_extension(&name)?;
    Ok(SelectedFile { name, extension, content })
}

/// Pick a document from disk. The type check runs before the file is opened.
pub async fn load(path: &Path) -> Result<SelectedFile, AnalysisError> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let extension = accepted_extension(&name)?;

    let content = tokio::fs::read(path)
        .await
        .map_err(|source| AnalysisError::Unreadable {
            path: path.to_path_buf(),
            source,
        })?;

    if content.len() as u64 > ADVERTISED_MAX_BYTES {
        tracing::warn!(
            "{} is {} bytes, above the advertised {} byte limit",
            name,
            content.len(),
            ADVERTISED_MAX_BYTES
        );
    }

    Ok(SelectedFile { name, extension, content })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_extension_after_last_dot() {
        assert_eq!(extension_of("thesis.pdf"), "pdf");
        assert_eq!(extension_of("chapter.final.DOCX"), "docx");
        assert_eq!(extension_of("notes."), "");
        assert_eq!(extension_of("archive.tar.gz"), "gz");
    }

    #[test]
    fn test_names_without_extension() {
        assert_eq!(extension_of("README"), "");
        assert_eq!(extension_of(""), "");
        assert_eq!(extension_of(".pdf"), "");
        assert!(matches!(
            select_file("README", vec![]),
            Err(AnalysisError::InvalidFileType { .. })
        ));
        assert!(select_file(".txt", vec![]).is_err());
    }

    #[test]
    fn test_accepted_types_any_case() {
        for name in ["a.pdf", "b.PDF", "c.doc", "d.DoC", "e.docx", "f.DOCX", "g.txt", "h.Txt"] {
            let file = select_file(name, b"x".to_vec()).unwrap();
            assert_eq!(file.name, name);
            assert_eq!(file.extension, name.rsplit('.').next().unwrap().to_lowercase());
        }
    }

    #[test]
    fn test_rejected_types() {
        for name in ["slides.pptx", "paper.pdf.exe", "data.csv", "image.png", "paper.rtf"] {
            let err = select_file(name, vec![]).unwrap_err();
            assert!(matches!(err, AnalysisError::InvalidFileType { .. }));
            assert_eq!(err.user_message(), "Please upload a PDF, DOC, DOCX, or TXT file.");
        }
    }

    #[tokio::test]
    async fn test_load_reads_document() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("Dissertation.TXT");
        std::fs::write(&path, "Holographic entanglement entropy").unwrap();

        let file = load(&path).await.unwrap();
        assert_eq!(file.name, "Dissertation.TXT");
        assert_eq!(file.extension, "txt");
        assert_eq!(file.content, b"Holographic entanglement entropy");
        assert_eq!(file.size(), 32);
    }

    #[tokio::test]
    async fn test_load_checks_type_before_reading() {
        let tmp = TempDir::new().unwrap();
        // Does not exist: an invalid type must be reported, not a read error.
        let err = load(&tmp.path().join("missing.exe")).await.unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidFileType { .. }));

        let err = load(&tmp.path().join("missing.pdf")).await.unwrap_err();
        assert!(matches!(err, AnalysisError::Unreadable { .. }));
    }
}
