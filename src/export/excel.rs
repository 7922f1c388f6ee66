//! Excel出力（CLI版）
//!
//! 生成は共通ライブラリの excel_core に任せ、ここではファイルへ書き出すだけ

use super::GradedCard;
use crate::error::{CenteringError, Result};
use card_centering_common::export::excel_core::generate_excel_buffer;
use std::path::Path;

pub fn generate_excel(cards: &[GradedCard], output_path: &Path, title: &str) -> Result<()> {
    let buffer = generate_excel_buffer(cards, title).map_err(CenteringError::ExcelGeneration)?;

    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(output_path, buffer)?;
    Ok(())
}
