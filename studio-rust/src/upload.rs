use crate::{StudioError, StudioResult};
use pixel_sprite_sdk::ImagePart;
use std::{fs, path::Path};

/// Image types accepted as a reference upload.
pub const ACCEPTED_IMAGE_TYPES: [&str; 3] = ["image/png", "image/jpeg", "image/webp"];

#[must_use]
pub fn mime_type_for_path(path: &Path) -> Option<&'static str> {
    let extension = path.extension()?.to_str()?.to_ascii_lowercase();
    match extension.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "webp" => Some("image/webp"),
        _ => None,
    }
}

/// Read a reference image from disk.
pub fn load_upload(path: &Path) -> StudioResult<ImagePart> {
    let mime_type = mime_type_for_path(path).ok_or_else(|| {
        StudioError::InvalidInput(format!(
            "Unsupported image file '{}'. Use PNG, JPEG or WebP.",
            path.display()
        ))
    })?;
    let bytes = fs::read(path)?;
    Ok(ImagePart::from_bytes(mime_type, &bytes))
}

/// Accept an already-encoded upload, such as a data URI sent by a browser.
pub fn validate_upload(image: ImagePart) -> StudioResult<ImagePart> {
    if ACCEPTED_IMAGE_TYPES.contains(&image.mime_type.as_str()) {
        Ok(image)
    } else {
        Err(StudioError::InvalidInput(format!(
            "Unsupported image type '{}'. Use PNG, JPEG or WebP.",
            image.mime_type
        )))
    }
}
