use std::path::Path;

use bytes::Bytes;

use crate::error::VisionError;

/// Reads the raw image bytes sent to the service. The service decodes the
/// image itself, so nothing is resized or re-encoded here.
pub fn load_image_from_path(path: impl AsRef<Path>) -> Result<Bytes, VisionError> {
    let path = path.as_ref();
    let data = std::fs::read(path).map_err(|source| VisionError::ImageRead {
        path: path.to_path_buf(),
        source,
    })?;

    match sniff_mime_type(&data) {
        Some(mime) => log::debug!("loaded {} bytes of {mime}", data.len()),
        None => log::warn!("could not identify image format of {}, sending as-is", path.display()),
    }

    Ok(Bytes::from(data))
}

fn sniff_mime_type(data: &[u8]) -> Option<&'static str> {
    image::guess_format(data)
        .ok()
        .map(|format| format.to_mime_type())
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_MAGIC: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR";

    #[test]
    fn sniffs_png() {
        assert_eq!(sniff_mime_type(PNG_MAGIC), Some("image/png"));
    }

    #[test]
    fn unknown_format_is_not_identified() {
        assert_eq!(sniff_mime_type(b"not an image"), None);
    }

    #[test]
    fn file_bytes_are_sent_unchanged() {
        let path = std::env::temp_dir().join(format!("vision-source-{}.png", std::process::id()));
        std::fs::write(&path, PNG_MAGIC).unwrap();

        let bytes = load_image_from_path(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(bytes.as_ref(), PNG_MAGIC);
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = load_image_from_path("/definitely/not/here.png").unwrap_err();
        assert!(matches!(err, VisionError::ImageRead { .. }));
    }
}
