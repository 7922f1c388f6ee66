//! 計測結果の型定義
//!
//! CLIとデスクトップで共有される型:
//! - CenteringReport: センタリング率と2社分のグレード
//! - Measurement: 画像ごとの境界線（サイドカーJSONとして保存）

use crate::borders::Borders;
use crate::centering::Centering;
use crate::error::{Error, Result};
use crate::grade::{Grade, GradeTables};
use serde::{Deserialize, Serialize};

/// サイドカーファイルの拡張子部分
pub const SIDECAR_SUFFIX: &str = ".borders.json";

/// 表示用の判定結果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CenteringReport {
    pub vertical_percent: f64,
    pub horizontal_percent: f64,
    pub worst_deviation: f64,
    pub psa_grade: Grade,
    pub bgs_grade: Grade,
}

impl CenteringReport {
    /// 境界線から判定（2社のグレードは独立に求め、合成しない）
    pub fn from_borders(borders: &Borders, tables: &GradeTables) -> Self {
        let centering = Centering::from_borders(borders);
        let worst = centering.worst_deviation();
        Self {
            vertical_percent: centering.vertical_percent,
            horizontal_percent: centering.horizontal_percent,
            worst_deviation: worst,
            psa_grade: tables.psa.map_grade(worst),
            bgs_grade: tables.bgs.map_grade(worst),
        }
    }

    pub fn centering(&self) -> Centering {
        Centering {
            vertical_percent: self.vertical_percent,
            horizontal_percent: self.horizontal_percent,
        }
    }
}

/// 1画像分の計測データ
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Measurement {
    pub file_name: String,
    pub image_width: u32,
    pub image_height: u32,

    /// 表示回転角（度）。判定には使わない
    #[serde(default)]
    pub rotation_degrees: f64,

    pub borders: Borders,
}

impl Measurement {
    /// 既定の境界線で新規作成
    pub fn new(file_name: impl Into<String>, image_width: u32, image_height: u32) -> Self {
        Self {
            file_name: file_name.into(),
            image_width,
            image_height,
            rotation_degrees: 0.0,
            borders: Borders::initialize(image_width as f64, image_height as f64),
        }
    }

    /// 画像サイズと境界線の順序を検査
    pub fn validate(&self) -> Result<()> {
        if self.image_width == 0 || self.image_height == 0 {
            return Err(Error::InvalidDimensions {
                width: self.image_width as f64,
                height: self.image_height as f64,
            });
        }
        if !self.borders.is_finite() {
            return Err(Error::Config(format!("{}: 境界値が数値ではありません", self.file_name)));
        }
        self.borders.validate()
    }

    pub fn report(&self, tables: &GradeTables) -> CenteringReport {
        CenteringReport::from_borders(&self.borders, tables)
    }

    /// JSON文字列から読み込み
    pub fn from_json(json: &str) -> Result<Self> {
        let measurement: Self = serde_json::from_str(json)?;
        measurement.validate()?;
        Ok(measurement)
    }

    /// JSONファイルから読み込み
    pub fn load(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// JSONファイルへ保存
    pub fn save(&self, path: &std::path::Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        log::debug!("saved measurement to {}", path.display());
        Ok(())
    }
}

/// 画像パスに対応するサイドカーのパス（`card.jpg` → `card.borders.json`）
pub fn sidecar_path(image: &std::path::Path) -> std::path::PathBuf {
    let stem = image
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("card");
    image.with_file_name(format!("{stem}{SIDECAR_SUFFIX}"))
}
