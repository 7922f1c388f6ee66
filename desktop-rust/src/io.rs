use anyhow::{bail, Context, Result};
use image::ImageReader;
use std::fs;
use std::path::Path;

use card_centering_common::{sidecar_path, Measurement};

use crate::model::{DecodedImage, ImageSource};

pub fn decode_image(path: &Path) -> Result<DecodedImage> {
    let image = ImageReader::open(path)
        .with_context(|| format!("open {}", path.display()))?
        .with_guessed_format()
        .with_context(|| format!("detect format {}", path.display()))?
        .decode()
        .with_context(|| format!("decode {}", path.display()))?;
    let rgba = image.to_rgba8();
    Ok(DecodedImage {
        source: ImageSource::File(path.to_path_buf()),
        size: [rgba.width() as usize, rgba.height() as usize],
        pixels: rgba.into_raw(),
    })
}

/// クリップボードの画像を RGBA で取得する
pub fn read_clipboard_image() -> Result<DecodedImage> {
    let mut clipboard = arboard::Clipboard::new().context("open clipboard")?;
    let data = clipboard.get_image().context("no image in clipboard")?;
    decoded_from_rgba(ImageSource::Clipboard, data.width, data.height, data.bytes.into_owned())
}

pub fn decoded_from_rgba(
    source: ImageSource,
    width: usize,
    height: usize,
    pixels: Vec<u8>,
) -> Result<DecodedImage> {
    if width == 0 || height == 0 {
        bail!("{source}: empty image ({width}x{height})");
    }
    let expected = width.checked_mul(height).and_then(|n| n.checked_mul(4));
    if expected != Some(pixels.len()) {
        bail!(
            "{source}: RGBA buffer is {} bytes, expected {width}x{height}x4",
            pixels.len()
        );
    }
    Ok(DecodedImage {
        source,
        size: [width, height],
        pixels,
    })
}

/// 画像に対応するサイドカーがあれば読み込む
pub fn load_sidecar(image: &Path) -> Result<Option<Measurement>> {
    let path = sidecar_path(image);
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&path).with_context(|| format!("read {}", path.display()))?;
    let measurement =
        Measurement::from_json(&content).with_context(|| format!("parse {}", path.display()))?;
    Ok(Some(measurement))
}

pub fn save_sidecar(image: &Path, measurement: &Measurement) -> Result<std::path::PathBuf> {
    let path = sidecar_path(image);
    let content = serde_json::to_string_pretty(measurement)?;
    fs::write(&path, content).with_context(|| format!("write {}", path.display()))?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use card_centering_common::BorderName;
    use tempfile::tempdir;

    #[test]
    fn test_sidecar_roundtrip() {
        let dir = tempdir().expect("Failed to create temp dir");
        let image = dir.path().join("card.png");
        assert!(load_sidecar(&image).unwrap().is_none());

        let mut measurement = Measurement::new("card.png", 300, 420);
        measurement.borders = measurement.borders.apply_drag(BorderName::OuterRight, 290.0);
        measurement.rotation_degrees = 1.5;

        let saved = save_sidecar(&image, &measurement).unwrap();
        assert_eq!(saved, dir.path().join("card.borders.json"));
        assert_eq!(load_sidecar(&image).unwrap(), Some(measurement));
    }

    #[test]
    fn test_decode_missing_file() {
        let err = decode_image(Path::new("/nonexistent/card.png")).unwrap_err();
        assert!(err.to_string().contains("card.png"));
    }

    #[test]
    fn test_decode_png() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("card.png");
        image::RgbaImage::new(4, 6).save(&path).unwrap();

        let decoded = decode_image(&path).unwrap();
        assert_eq!(decoded.source, ImageSource::File(path));
        assert_eq!(decoded.size, [4, 6]);
        assert_eq!(decoded.pixels.len(), 4 * 6 * 4);
    }

    #[test]
    fn test_clipboard_pixels_become_decoded_image() {
        let decoded = decoded_from_rgba(ImageSource::Clipboard, 3, 2, vec![255; 3 * 2 * 4]).unwrap();
        assert_eq!(decoded.source, ImageSource::Clipboard);
        assert_eq!(decoded.size, [3, 2]);
    }

    #[test]
    fn test_clipboard_pixels_with_wrong_length_are_rejected() {
        let err = decoded_from_rgba(ImageSource::Clipboard, 3, 2, vec![0; 10]).unwrap_err();
        assert!(err.to_string().contains("clipboard"));

        let err = decoded_from_rgba(ImageSource::Clipboard, 0, 2, Vec::new()).unwrap_err();
        assert!(err.to_string().contains("empty image"));

        assert!(decoded_from_rgba(ImageSource::Clipboard, usize::MAX, 2, Vec::new()).is_err());
    }
}
