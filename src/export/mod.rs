pub mod excel;
pub mod json;

use crate::cli::ExportFormat;
use crate::error::Result;
use crate::scanner::ImageInfo;
use card_centering_common::export::excel_core::CenteringRow;
use card_centering_common::{sidecar_path, CenteringReport, GradeTables, Measurement};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// 一覧に載せる1枚分の判定結果
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GradedCard {
    pub file_name: String,
    pub file_path: String,
    pub date: Option<String>,
    pub image_width: u32,
    pub image_height: u32,
    pub report: CenteringReport,
}

impl CenteringRow for GradedCard {
    fn file_name(&self) -> &str {
        &self.file_name
    }

    fn date(&self) -> &str {
        self.date.as_deref().unwrap_or("")
    }

    fn image_size(&self) -> (u32, u32) {
        (self.image_width, self.image_height)
    }

    fn report(&self) -> &CenteringReport {
        &self.report
    }
}

/// 判定できなかった画像と理由
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkippedImage {
    pub file_name: String,
    pub reason: String,
}

#[derive(Debug, Default)]
pub struct GradingOutcome {
    pub cards: Vec<GradedCard>,
    pub skipped: Vec<SkippedImage>,
}

fn grade_one(image: &ImageInfo, tables: &GradeTables) -> std::result::Result<GradedCard, SkippedImage> {
    let skip = |reason: String| SkippedImage {
        file_name: image.file_name.clone(),
        reason,
    };

    let path = sidecar_path(&image.path);
    if !path.exists() {
        return Err(skip("計測ファイルなし".into()));
    }
    let measurement = Measurement::load(&path).map_err(|e| skip(e.to_string()))?;

    Ok(GradedCard {
        file_name: image.file_name.clone(),
        file_path: image.path.to_string_lossy().to_string(),
        date: image.date.clone(),
        image_width: measurement.image_width,
        image_height: measurement.image_height,
        report: measurement.report(tables),
    })
}

/// サイドカーを持つ画像を並列に判定する（結果は入力順）
pub fn grade_images(images: &[ImageInfo], tables: &GradeTables, show_progress: bool) -> GradingOutcome {
    let progress = if show_progress {
        let pb = ProgressBar::new(images.len() as u64);
        if let Ok(style) = ProgressStyle::with_template("{bar:40} {pos}/{len} {msg}") {
            pb.set_style(style);
        }
        pb
    } else {
        ProgressBar::hidden()
    };

    let results: Vec<_> = images
        .par_iter()
        .map(|image| {
            let result = grade_one(image, tables);
            progress.inc(1);
            result
        })
        .collect();
    progress.finish_and_clear();

    let mut outcome = GradingOutcome::default();
    for result in results {
        match result {
            Ok(card) => outcome.cards.push(card),
            Err(skipped) => {
                log::info!("skip {}: {}", skipped.file_name, skipped.reason);
                outcome.skipped.push(skipped);
            }
        }
    }
    outcome
}

fn output_path_for_format(output: &Path, title: &str, extension: &str) -> PathBuf {
    if output.is_dir() || output.extension().is_none() {
        output.join(format!("{}.{}", title, extension))
    } else {
        output.to_path_buf()
    }
}

fn output_paths_for_both(output: &Path, title: &str) -> (PathBuf, PathBuf) {
    if output.is_dir() || output.extension().is_none() {
        (
            output.join(format!("{}.json", title)),
            output.join(format!("{}.xlsx", title)),
        )
    } else {
        let parent = output.parent().unwrap_or_else(|| Path::new("."));
        let stem = output.file_stem().and_then(|s| s.to_str()).unwrap_or(title);
        (
            parent.join(format!("{}.json", stem)),
            parent.join(format!("{}.xlsx", stem)),
        )
    }
}

/// 形式に応じて書き出し、書き出したパスを返す
pub fn export_results(
    outcome: &GradingOutcome,
    format: &ExportFormat,
    output: &Path,
    title: &str,
) -> Result<Vec<PathBuf>> {
    let (json_path, excel_path) = match format {
        ExportFormat::Json => (Some(output_path_for_format(output, title, "json")), None),
        ExportFormat::Excel => (None, Some(output_path_for_format(output, title, "xlsx"))),
        ExportFormat::Both => {
            let (json, excel) = output_paths_for_both(output, title);
            (Some(json), Some(excel))
        }
    };

    let mut written = Vec::new();
    if let Some(path) = json_path {
        println!("- JSONを生成中...");
        json::write_report(outcome, &path, title)?;
        println!("✔ JSON出力: {}", path.display());
        written.push(path);
    }
    if let Some(path) = excel_path {
        println!("- Excelを生成中...");
        excel::generate_excel(&outcome.cards, &path, title)?;
        println!("✔ Excel出力: {}", path.display());
        written.push(path);
    }
    Ok(written)
}
