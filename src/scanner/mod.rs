mod exif;

use crate::error::{CenteringError, Result};
use card_centering_common::SIDECAR_SUFFIX;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Debug, Clone)]
pub struct ImageInfo {
    pub path: PathBuf,
    pub file_name: String,
    pub date: Option<String>,
}

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp", "bmp", "gif", "tif", "tiff"];

/// Check if a file extension is a supported image format
fn is_image_extension(ext: &str) -> bool {
    IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str())
}

/// 注釈付き出力（*.annotated.png）は入力画像として扱わない
fn is_generated(file_name: &str) -> bool {
    file_name.contains(".annotated.") || file_name.ends_with(SIDECAR_SUFFIX)
}

pub fn scan_folder(folder: &Path, recursive: bool) -> Result<Vec<ImageInfo>> {
    if !folder.is_dir() {
        return Err(CenteringError::FolderNotFound(folder.display().to_string()));
    }

    let max_depth = if recursive { usize::MAX } else { 1 };
    let mut images = Vec::new();

    for entry in WalkDir::new(folder)
        .max_depth(max_depth)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }

        let is_image = path
            .extension()
            .map(|ext| is_image_extension(&ext.to_string_lossy()))
            .unwrap_or(false);
        if !is_image {
            continue;
        }

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        if is_generated(&file_name) {
            continue;
        }

        images.push(ImageInfo {
            path: path.to_path_buf(),
            date: exif::extract_date(path),
            file_name,
        });
    }

    // パスでソート
    images.sort_by(|a, b| a.path.cmp(&b.path));
    log::debug!("found {} images in {}", images.len(), folder.display());

    Ok(images)
}
