use crate::common::image_utils::{is_accepted_image, to_data_url};
use crate::common::selected_file::SelectedFile;
use mime::Mime;
use std::fmt;
use tracing::{debug, warn};

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("{file_name} is not an image file")]
    NotAnImage {
        file_name: String,
        mime: Option<Mime>,
    },
}

type FileHandler = Box<dyn Fn(SelectedFile) + Send + Sync>;

/// Accepts a single image from a file picker or a drop, keeps it with a local
/// preview, and hands the raw file to the handler given at construction.
pub struct UploadCapture {
    on_file: FileHandler,
    file: Option<SelectedFile>,
    preview: Option<String>,
}

impl fmt::Debug for UploadCapture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploadCapture")
            .field("file", &self.file.as_ref().map(|file| &file.file_name))
            .field("has_preview", &self.preview.is_some())
            .finish_non_exhaustive()
    }
}

impl UploadCapture {
    pub fn new(on_file: impl Fn(SelectedFile) + Send + Sync + 'static) -> Self {
        Self {
            on_file: Box::new(on_file),
            file: None,
            preview: None,
        }
    }

    /// Take a file from the file picker.
    ///
    /// # Errors
    /// If the file is neither `image/*` nor has a known image extension. Nothing
    /// is stored or emitted in that case.
    pub fn accept(&mut self, file: SelectedFile) -> Result<(), UploadError> {
        if !is_accepted_image(&file.file_name, file.mime.as_ref()) {
            warn!("Rejected upload {}: not an image", file.file_name);
            return Err(UploadError::NotAnImage {
                file_name: file.file_name,
                mime: file.mime,
            });
        }

        debug!("Accepted upload {} ({} bytes)", file.file_name, file.bytes.len());
        self.preview = Some(to_data_url(Some(&file.content_type()), &file.bytes));
        self.file = Some(file.clone());
        (self.on_file)(file);
        Ok(())
    }

    /// Take the first file of a drop. An empty drop does nothing.
    ///
    /// # Errors
    /// See [`UploadCapture::accept`].
    pub fn accept_dropped(&mut self, files: Vec<SelectedFile>) -> Result<(), UploadError> {
        match files.into_iter().next() {
            Some(file) => self.accept(file),
            None => Ok(()),
        }
    }

    /// Forget the file and its preview. The server is not told.
    pub fn clear(&mut self) {
        self.file = None;
        self.preview = None;
    }

    #[must_use]
    pub const fn file(&self) -> Option<&SelectedFile> {
        self.file.as_ref()
    }

    #[must_use]
    pub fn preview(&self) -> Option<&str> {
        self.preview.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn recording_capture() -> (UploadCapture, Arc<Mutex<Vec<String>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let capture = UploadCapture::new(move |file| {
            sink.lock().expect("lock").push(file.file_name);
        });
        (capture, seen)
    }

    #[test]
    fn accepted_file_is_stored_previewed_and_emitted() {
        let (mut capture, seen) = recording_capture();

        capture
            .accept(SelectedFile::new("chair.png", Some(mime::IMAGE_PNG), b"png".to_vec()))
            .expect("png accepted");

        assert_eq!(capture.file().map(|f| f.file_name.as_str()), Some("chair.png"));
        assert_eq!(capture.preview(), Some("data:image/png;base64,cG5n"));
        assert_eq!(*seen.lock().expect("lock"), vec!["chair.png".to_string()]);
    }

    #[test]
    fn rejected_file_changes_nothing() {
        let (mut capture, seen) = recording_capture();

        let err = capture
            .accept(SelectedFile::new("notes.txt", Some(mime::TEXT_PLAIN), b"hi".to_vec()))
            .expect_err("text rejected");

        assert!(matches!(err, UploadError::NotAnImage { ref file_name, .. } if file_name == "notes.txt"));
        assert!(capture.file().is_none());
        assert!(capture.preview().is_none());
        assert!(seen.lock().expect("lock").is_empty());
    }

    #[test]
    fn drop_takes_first_file_and_empty_drop_is_ignored() {
        let (mut capture, seen) = recording_capture();

        capture.accept_dropped(vec![]).expect("empty drop is fine");
        assert!(capture.file().is_none());

        capture
            .accept_dropped(vec![
                SelectedFile::new("first.TIF", None, vec![1]),
                SelectedFile::new("second.png", None, vec![2]),
            ])
            .expect("tif accepted by extension");
        assert_eq!(*seen.lock().expect("lock"), vec!["first.TIF".to_string()]);
    }

    #[test]
    fn clear_removes_file_and_preview() {
        let (mut capture, _) = recording_capture();
        capture
            .accept(SelectedFile::new("a.jpg", None, vec![0xff, 0xd8]))
            .expect("jpg accepted");

        capture.clear();

        assert!(capture.file().is_none());
        assert!(capture.preview().is_none());
    }
}
