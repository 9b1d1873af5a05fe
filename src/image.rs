//! Client-side image checks for the image analysis tool
//!
//! Size is checked before anything is read or encoded, so an oversized file never reaches the
//! encoder or the network.

use std::fs;
use std::path::Path;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};

use crate::error::ValidationError;

pub const MAX_IMAGE_BYTES: u64 = 4 * 1024 * 1024;

pub const ACCEPTED_MIME_TYPES: &[&str] = &["image/png", "image/jpeg", "image/webp"];

/// A validated, base64-encoded image ready to be sent inline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub file_name: String,
    pub mime_type: String,
    pub size: u64,
    pub data_base64: String,
}

impl ImageUpload {
    /// Validate and encode a file from disk. MIME type comes from the extension.
    pub fn load(path: &Path) -> Result<Self, ValidationError> {
        let mime = mime_guess::from_path(path)
            .first()
            .map(|m| m.essence_str().to_string())
            .unwrap_or_else(|| "application/octet-stream".to_string());
        check_mime(&mime)?;

        let metadata = fs::metadata(path).map_err(|e| ValidationError::Unreadable(e.to_string()))?;
        check_size(metadata.len())?;

        let bytes = fs::read(path).map_err(|e| ValidationError::Unreadable(e.to_string()))?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        Self::from_bytes(file_name, &mime, &bytes)
    }

    pub fn from_bytes(
        file_name: impl Into<String>,
        mime_type: &str,
        bytes: &[u8],
    ) -> Result<Self, ValidationError> {
        check_mime(mime_type)?;
        check_size(bytes.len() as u64)?;

        Ok(Self {
            file_name: file_name.into(),
            mime_type: mime_type.to_string(),
            size: bytes.len() as u64,
            data_base64: BASE64.encode(bytes),
        })
    }
}

fn check_size(size: u64) -> Result<(), ValidationError> {
    if size > MAX_IMAGE_BYTES {
        return Err(ValidationError::ImageTooLarge { size });
    }
    Ok(())
}

fn check_mime(mime: &str) -> Result<(), ValidationError> {
    if !ACCEPTED_MIME_TYPES.contains(&mime) {
        return Err(ValidationError::UnsupportedType { mime: mime.to_string() });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_small_png_is_encoded() {
        let upload = ImageUpload::from_bytes("dot.png", "image/png", b"\x89PNG").unwrap();
        assert_eq!(upload.mime_type, "image/png");
        assert_eq!(upload.size, 4);
        assert_eq!(upload.data_base64, "iVBORw==");
    }

    #[test]
    fn test_exactly_four_mib_is_accepted() {
        let bytes = vec![0u8; MAX_IMAGE_BYTES as usize];
        assert!(ImageUpload::from_bytes("big.jpg", "image/jpeg", &bytes).is_ok());
    }

    #[test]
    fn test_over_four_mib_is_rejected() {
        let bytes = vec![0u8; MAX_IMAGE_BYTES as usize + 1];
        let err = ImageUpload::from_bytes("huge.webp", "image/webp", &bytes).unwrap_err();
        assert_eq!(err, ValidationError::ImageTooLarge { size: MAX_IMAGE_BYTES + 1 });
        assert_eq!(err.to_string(), "Image size should be less than 4MB.");
    }

    #[test]
    fn test_unsupported_type_is_rejected() {
        let err = ImageUpload::from_bytes("anim.gif", "image/gif", b"GIF89a").unwrap_err();
        assert!(matches!(err, ValidationError::UnsupportedType { .. }));
    }

    #[test]
    fn test_load_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("diagram.jpg");
        fs::File::create(&path).unwrap().write_all(b"jpeg-bytes").unwrap();

        let upload = ImageUpload::load(&path).unwrap();
        assert_eq!(upload.file_name, "diagram.jpg");
        assert_eq!(upload.mime_type, "image/jpeg");
        assert_eq!(upload.data_base64, BASE64.encode(b"jpeg-bytes"));
    }

    #[test]
    fn test_load_rejects_oversized_file_by_metadata() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("poster.png");
        let file = fs::File::create(&path).unwrap();
        file.set_len(MAX_IMAGE_BYTES + 1).unwrap();

        let err = ImageUpload::load(&path).unwrap_err();
        assert!(matches!(err, ValidationError::ImageTooLarge { .. }));
    }

    #[test]
    fn test_load_missing_file() {
        let err = ImageUpload::load(Path::new("/nonexistent/shot.png")).unwrap_err();
        assert!(matches!(err, ValidationError::Unreadable(_)));
    }
}
