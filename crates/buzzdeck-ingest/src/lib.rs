//! Turns user-supplied source files into plain text for question
//! generation. Plain text and markdown are read as UTF-8; PDFs go
//! through text extraction.

use std::path::Path;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to extract text from PDF {path}: {source}")]
    Pdf {
        path: String,
        #[source]
        source: pdf_extract::OutputError,
    },

    #[error("unsupported file type '{extension}' (supported: txt, md, pdf)")]
    UnsupportedType { extension: String },

    #[error("no usable text found in {path}")]
    Empty { path: String },
}

/// Read a source file into plain text by extension.
pub fn read_source(path: &Path) -> Result<String, IngestError> {
    let path_str = path.display().to_string();
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    let text = match extension.as_str() {
        "txt" | "md" => std::fs::read_to_string(path).map_err(|source| IngestError::Io {
            path: path_str.clone(),
            source,
        })?,
        "pdf" => {
            tracing::debug!(path = %path_str, "extracting text from PDF");
            pdf_extract::extract_text(path).map_err(|source| IngestError::Pdf {
                path: path_str.clone(),
                source,
            })?
        }
        _ => return Err(IngestError::UnsupportedType { extension }),
    };

    if text.trim().is_empty() {
        return Err(IngestError::Empty { path: path_str });
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn reads_text_and_markdown() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["notes.txt", "notes.md"] {
            let path = dir.path().join(name);
            let mut file = std::fs::File::create(&path).unwrap();
            writeln!(file, "The mitochondria is the powerhouse of the cell.").unwrap();
            let text = read_source(&path).unwrap();
            assert!(text.contains("mitochondria"));
        }
    }

    #[test]
    fn rejects_unsupported_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.docx");
        std::fs::write(&path, "hello").unwrap();
        assert!(matches!(
            read_source(&path),
            Err(IngestError::UnsupportedType { .. })
        ));
    }

    #[test]
    fn rejects_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.txt");
        std::fs::write(&path, "   \n").unwrap();
        assert!(matches!(read_source(&path), Err(IngestError::Empty { .. })));
    }

    #[test]
    fn missing_file_is_io_error() {
        let path = Path::new("/nonexistent/notes.txt");
        assert!(matches!(read_source(path), Err(IngestError::Io { .. })));
    }
}
