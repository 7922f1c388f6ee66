use crate::error::{CenteringError, Result};
use card_centering_common::{GradeTable, GradeTables, HitConfig, DEFAULT_FIT_FACTOR};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// 設定ファイルの場所を上書きする環境変数
pub const CONFIG_ENV: &str = "CARD_CENTERING_CONFIG";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    pub hit_tolerance: f64,
    pub tab_size: f64,
    pub tab_offset: f64,
    pub fit_factor: f64,
    /// PSA閾値テーブルの差し替え（省略時は組み込み）
    pub psa_table: Option<GradeTable>,
    /// BGS閾値テーブルの差し替え（省略時は組み込み）
    pub bgs_table: Option<GradeTable>,
}

impl Default for Config {
    fn default() -> Self {
        let hit = HitConfig::default();
        Self {
            hit_tolerance: hit.tolerance,
            tab_size: hit.tab_size,
            tab_offset: hit.tab_offset,
            fit_factor: DEFAULT_FIT_FACTOR,
            psa_table: None,
            bgs_table: None,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        Self::load_from(&config_path)
    }

    /// 指定パスから読み込み（存在しなければ既定値）
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            let content = std::fs::read_to_string(config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            config.validate()?;
            log::debug!("loaded config from {}", config_path.display());
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;
        self.save_to(&config_path)
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        self.validate()?;
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        // 環境変数を優先
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            if !path.is_empty() {
                return Ok(PathBuf::from(path));
            }
        }

        let home = dirs::home_dir()
            .ok_or_else(|| CenteringError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("card-centering").join("config.json"))
    }

    pub fn validate(&self) -> Result<()> {
        if !self.hit_tolerance.is_finite() || self.hit_tolerance < 0.0 {
            return Err(CenteringError::Config(format!(
                "hitTolerance は0以上の数値で指定してください: {}",
                self.hit_tolerance
            )));
        }
        if !self.tab_size.is_finite() || self.tab_size <= 0.0 {
            return Err(CenteringError::Config(format!(
                "tabSize は正の数値で指定してください: {}",
                self.tab_size
            )));
        }
        if !self.tab_offset.is_finite() {
            return Err(CenteringError::Config("tabOffset が数値ではありません".into()));
        }
        if !(self.fit_factor > 0.0 && self.fit_factor <= 1.0) {
            return Err(CenteringError::Config(format!(
                "fitFactor は 0 より大きく 1 以下で指定してください: {}",
                self.fit_factor
            )));
        }
        self.grade_tables().validate()?;
        Ok(())
    }

    pub fn hit_config(&self) -> HitConfig {
        HitConfig {
            tolerance: self.hit_tolerance,
            tab_size: self.tab_size,
            tab_offset: self.tab_offset,
        }
    }

    pub fn grade_tables(&self) -> GradeTables {
        GradeTables {
            psa: self.psa_table.clone().unwrap_or_else(GradeTable::psa),
            bgs: self.bgs_table.clone().unwrap_or_else(GradeTable::bgs),
        }
    }

    pub fn set_tolerance(&mut self, tolerance: f64) -> Result<()> {
        self.hit_tolerance = tolerance;
        self.validate()?;
        self.save()
    }
}
