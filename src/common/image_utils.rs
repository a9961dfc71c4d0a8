use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use mime::Mime;
use std::path::Path;

/// Extensions recognised as images even when no MIME type is known.
pub const IMAGE_EXTENSIONS: &[&str] = &[
    "jpg", "jpeg", "png", "gif", "bmp", "webp", "tif", "tiff", "heif", "avif",
];

#[must_use]
pub fn is_image_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            let ext_lower = ext.to_ascii_lowercase();
            IMAGE_EXTENSIONS.contains(&ext_lower.as_str())
        })
}

#[must_use]
pub fn is_image_mime(mime: Option<&Mime>) -> bool {
    mime.is_some_and(|m| m.type_() == mime::IMAGE)
}

/// An upload is accepted when either its MIME type is `image/*` or its
/// extension is on the allow-list.
#[must_use]
pub fn is_accepted_image(file_name: &str, mime: Option<&Mime>) -> bool {
    is_image_mime(mime) || is_image_file(Path::new(file_name))
}

#[must_use]
pub fn guess_mime(file_name: &str) -> Option<Mime> {
    mime_guess::from_path(file_name).first()
}

/// Inline `data:` url for showing a local preview of the upload.
#[must_use]
pub fn to_data_url(mime: Option<&Mime>, bytes: &[u8]) -> String {
    let mime = mime.map_or_else(|| mime::APPLICATION_OCTET_STREAM.to_string(), ToString::to_string);
    format!("data:{mime};base64,{}", STANDARD.encode(bytes))
}
