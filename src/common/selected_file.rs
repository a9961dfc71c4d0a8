use crate::common::image_utils::guess_mime;
use mime::Mime;
use std::path::Path;

/// A file the user picked or dropped, held in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub file_name: String,
    /// MIME type as reported by whoever handed us the file, if any.
    pub mime: Option<Mime>,
    pub bytes: Vec<u8>,
}

impl SelectedFile {
    #[must_use]
    pub fn new(file_name: impl Into<String>, mime: Option<Mime>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            mime,
            bytes,
        }
    }

    /// Read a file from disk, guessing its MIME type from the extension.
    ///
    /// # Errors
    /// If the file can't be read.
    pub async fn from_path(path: &Path) -> std::io::Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map_or_else(|| path.to_string_lossy().to_string(), |n| n.to_string_lossy().to_string());
        let mime = guess_mime(&file_name);
        Ok(Self::new(file_name, mime, bytes))
    }

    /// MIME type to send with the upload.
    #[must_use]
    pub fn content_type(&self) -> Mime {
        self.mime
            .clone()
            .or_else(|| guess_mime(&self.file_name))
            .unwrap_or(mime::APPLICATION_OCTET_STREAM)
    }
}
