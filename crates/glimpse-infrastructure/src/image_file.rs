//! Reading images from disk for upload.

use glimpse_core::session::is_supported_image;
use glimpse_core::{GlimpseError, Result};
use std::path::Path;

/// An image file read from disk, ready for `Session::add_image`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageFile {
    /// File name without directories; used as the image name in the session.
    pub name: String,
    pub bytes: Vec<u8>,
}

/// Reads an image file, accepting only png, jpg, jpeg and webp.
///
/// # Errors
///
/// - [`GlimpseError::UnsupportedImageType`] for other extensions (checked before reading)
/// - [`GlimpseError::Io`] if the file cannot be read
pub async fn read_image_file(path: &Path) -> Result<ImageFile> {
    let name = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| GlimpseError::io(format!("Invalid image path: {}", path.display())))?
        .to_string();

    if !is_supported_image(&name) {
        return Err(GlimpseError::UnsupportedImageType { name });
    }

    let bytes = tokio::fs::read(path).await?;
    tracing::debug!(name = %name, size = bytes.len(), "Read image file");
    Ok(ImageFile { name, bytes })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_reads_supported_image() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("cat.jpg");
        std::fs::write(&path, [0xFF, 0xD8, 0xFF]).unwrap();

        let file = read_image_file(&path).await.unwrap();
        assert_eq!(file.name, "cat.jpg");
        assert_eq!(file.bytes, vec![0xFF, 0xD8, 0xFF]);
    }

    #[tokio::test]
    async fn test_rejects_unsupported_extension() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("notes.txt");
        std::fs::write(&path, "hello").unwrap();

        let err = read_image_file(&path).await.unwrap_err();
        assert_eq!(
            err,
            GlimpseError::UnsupportedImageType {
                name: "notes.txt".into()
            }
        );
    }

    #[tokio::test]
    async fn test_missing_file_is_io_error() {
        let temp_dir = TempDir::new().unwrap();
        let err = read_image_file(&temp_dir.path().join("ghost.png"))
            .await
            .unwrap_err();
        assert!(matches!(err, GlimpseError::Io { .. }));
    }
}
