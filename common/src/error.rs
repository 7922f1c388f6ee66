//! エラー型定義

use thiserror::Error;

/// 共通エラー型
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Invalid image dimensions: {width}x{height}")]
    InvalidDimensions { width: f64, height: f64 },

    #[error("Invalid grade table '{name}': {reason}")]
    InvalidTable { name: String, reason: String },

    #[error("Border order violated on {0} axis")]
    BorderOrder(String),

    #[error("Unknown border: {0}")]
    UnknownBorder(String),
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;
