use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::ImageReader;
use std::io::Cursor;

/// 画像ヘッダから判定した形式とサイズ
#[derive(Debug, Clone, PartialEq)]
pub struct ImageProbe {
    pub mime_type: &'static str,
    pub width: u32,
    pub height: u32,
}

/// 中身から形式を推定し、ヘッダからサイズを読む（全体のデコードはしない）
pub fn probe(bytes: &[u8]) -> Result<ImageProbe, String> {
    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| e.to_string())?;

    let format = reader
        .format()
        .ok_or_else(|| "unrecognized image format".to_string())?;

    let (width, height) = reader.into_dimensions().map_err(|e| e.to_string())?;

    Ok(ImageProbe {
        mime_type: format.to_mime_type(),
        width,
        height,
    })
}

/// "data:image/png;base64,iVBOR..." 形式のData URLを作る
pub fn to_data_url(mime_type: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime_type, STANDARD.encode(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, ImageFormat, RgbImage};

    fn png_bytes(w: u32, h: u32) -> Vec<u8> {
        let mut buf = Vec::new();
        DynamicImage::ImageRgb8(RgbImage::new(w, h))
            .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
            .unwrap();
        buf
    }

    #[test]
    fn test_probe_png() {
        let probe = probe(&png_bytes(6, 3)).unwrap();
        assert_eq!(probe.mime_type, "image/png");
        assert_eq!((probe.width, probe.height), (6, 3));
    }

    #[test]
    fn test_probe_not_an_image() {
        assert!(probe(b"hello, this is plain text").is_err());
        assert!(probe(&[]).is_err());
    }

    #[test]
    fn test_probe_truncated_header() {
        let bytes = png_bytes(4, 4);
        assert!(probe(&bytes[..12]).is_err());
    }

    #[test]
    fn test_to_data_url() {
        assert_eq!(to_data_url("image/png", b"abc"), "data:image/png;base64,YWJj");
    }
}
