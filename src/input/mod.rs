//! 画像の取り込み
//!
//! ファイル選択の結果（ImageFile）を検証し、表示用プレビュー付きの
//! SelectedImage を作る。ネットワークには触れない。

mod preview;

pub use preview::{probe, to_data_url, ImageProbe};

use std::path::Path;
use thiserror::Error;

/// 選択できる画像の上限（5 MiB、ちょうどは許可）
pub const MAX_IMAGE_BYTES: u64 = 5 * 1024 * 1024;

/// ローカルで同期的に検出されるエラー（ネットワークには到達しない）
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("File size too large. Please upload an image under 5MB.")]
    TooLarge { size: u64 },

    #[error("Failed to read the image file. Please try another image.")]
    UnreadableFile { reason: String },

    #[error("Please upload an image, select crop type, and season first.")]
    IncompleteInput,
}

impl ValidationError {
    fn unreadable(reason: impl ToString) -> Self {
        ValidationError::UnreadableFile {
            reason: reason.to_string(),
        }
    }
}

/// ファイルピッカーから渡されるファイル
#[derive(Debug, Clone)]
pub struct ImageFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl ImageFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }

    /// ディスクから読み込む
    ///
    /// サイズ超過はメタデータの時点で弾き、本体は読まない
    pub fn open(path: &Path) -> Result<Self, ValidationError> {
        let meta = std::fs::metadata(path).map_err(ValidationError::unreadable)?;
        if !meta.is_file() {
            return Err(ValidationError::unreadable(format!(
                "not a file: {}",
                path.display()
            )));
        }
        if meta.len() > MAX_IMAGE_BYTES {
            return Err(ValidationError::TooLarge { size: meta.len() });
        }

        let bytes = std::fs::read(path).map_err(ValidationError::unreadable)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        Ok(Self { name, bytes })
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

/// 検証済みの画像（丸ごと置き換えるだけで部分更新はしない）
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedImage {
    pub file_name: String,
    pub mime_type: &'static str,
    pub width: u32,
    pub height: u32,
    pub bytes: Vec<u8>,
    /// そのまま表示できる Data URL
    pub preview: String,
}

impl SelectedImage {
    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

/// ファイルを検証して SelectedImage を作る
pub fn select_image(file: ImageFile) -> Result<SelectedImage, ValidationError> {
    let size = file.size();
    if size > MAX_IMAGE_BYTES {
        return Err(ValidationError::TooLarge { size });
    }

    let probe = probe(&file.bytes).map_err(ValidationError::unreadable)?;
    let preview = to_data_url(probe.mime_type, &file.bytes);

    log::debug!(
        "画像選択: {} ({} bytes, {}x{}, {})",
        file.name,
        size,
        probe.width,
        probe.height,
        probe.mime_type
    );

    Ok(SelectedImage {
        file_name: file.name,
        mime_type: probe.mime_type,
        width: probe.width,
        height: probe.height,
        bytes: file.bytes,
        preview,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, ImageFormat, RgbImage};
    use std::io::Cursor;

    fn jpeg_bytes() -> Vec<u8> {
        let mut buf = Vec::new();
        DynamicImage::ImageRgb8(RgbImage::new(8, 8))
            .write_to(&mut Cursor::new(&mut buf), ImageFormat::Jpeg)
            .unwrap();
        buf
    }

    #[test]
    fn test_select_image_jpeg() {
        let image = select_image(ImageFile::new("leaf.jpg", jpeg_bytes())).unwrap();
        assert_eq!(image.file_name, "leaf.jpg");
        assert_eq!(image.mime_type, "image/jpeg");
        assert_eq!((image.width, image.height), (8, 8));
        assert!(image.preview.starts_with("data:image/jpeg;base64,"));
    }

    #[test]
    fn test_select_image_too_large() {
        let bytes = vec![0u8; MAX_IMAGE_BYTES as usize + 1];
        let err = select_image(ImageFile::new("huge.jpg", bytes)).unwrap_err();
        assert_eq!(
            err,
            ValidationError::TooLarge {
                size: MAX_IMAGE_BYTES + 1
            }
        );
    }

    #[test]
    fn test_select_image_exactly_limit_is_not_too_large() {
        // 上限ちょうどはサイズ検査を通り、形式判定で落ちる
        let bytes = vec![0u8; MAX_IMAGE_BYTES as usize];
        let err = select_image(ImageFile::new("zeros.bin", bytes)).unwrap_err();
        assert!(matches!(err, ValidationError::UnreadableFile { .. }));
    }

    #[test]
    fn test_select_image_not_an_image() {
        let err = select_image(ImageFile::new("notes.txt", b"just text".to_vec())).unwrap_err();
        assert!(matches!(err, ValidationError::UnreadableFile { .. }));
    }

    #[test]
    fn test_validation_messages() {
        assert_eq!(
            ValidationError::TooLarge { size: 1 }.to_string(),
            "File size too large. Please upload an image under 5MB."
        );
        assert_eq!(
            ValidationError::unreadable("x").to_string(),
            "Failed to read the image file. Please try another image."
        );
        assert_eq!(
            ValidationError::IncompleteInput.to_string(),
            "Please upload an image, select crop type, and season first."
        );
    }
}
