use std::fmt;
use std::path::{Path, PathBuf};

use card_centering_common::Severity;
use eframe::egui::Color32;

/// 画像の取得元。クリップボード画像にはサイドカーを持たせない
#[derive(Debug, Clone, PartialEq)]
pub enum ImageSource {
    File(PathBuf),
    Clipboard,
}

impl ImageSource {
    pub fn path(&self) -> Option<&Path> {
        match self {
            ImageSource::File(path) => Some(path),
            ImageSource::Clipboard => None,
        }
    }

    pub fn file_name(&self) -> String {
        match self {
            ImageSource::File(path) => path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default(),
            ImageSource::Clipboard => "(clipboard)".to_string(),
        }
    }
}

impl fmt::Display for ImageSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageSource::File(path) => write!(f, "{}", path.display()),
            ImageSource::Clipboard => f.write_str("clipboard"),
        }
    }
}

/// 別スレッドでデコードした画像
pub struct DecodedImage {
    pub source: ImageSource,
    pub size: [usize; 2],
    pub pixels: Vec<u8>,
}

pub enum LoadMessage {
    Loaded(DecodedImage),
    Failed { source: ImageSource, message: String },
}

#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub image: Option<ImageSource>,
    pub dirty: bool,
}

impl AppState {
    pub fn image_path(&self) -> Option<&Path> {
        self.image.as_ref().and_then(ImageSource::path)
    }

    pub fn file_name(&self) -> String {
        self.image.as_ref().map(ImageSource::file_name).unwrap_or_default()
    }
}

pub const OUTER_LINE: Color32 = Color32::from_rgb(0x31, 0x82, 0xce);
pub const INNER_LINE: Color32 = Color32::from_rgb(0xec, 0xc9, 0x4b);
pub const TAB_OUTLINE: Color32 = Color32::from_rgb(0x2c, 0x52, 0x82);

pub fn severity_color(severity: Severity) -> Color32 {
    match severity {
        Severity::Excellent => Color32::from_rgb(0x38, 0xa1, 0x69),
        Severity::Good => Color32::from_rgb(0x31, 0x82, 0xce),
        Severity::Fair => Color32::from_rgb(0xd6, 0x9e, 0x2e),
        Severity::Poor => Color32::from_rgb(0xe5, 0x3e, 0x3e),
    }
}
