use thiserror::Error;

#[derive(Error, Debug)]
pub enum CenteringError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("フォルダが見つかりません: {0}")]
    FolderNotFound(String),

    #[error("画像読み込みエラー: {0}")]
    ImageLoad(String),

    #[error("画像が見つかりません: {0}")]
    NoImagesFound(String),

    #[error("画像保存エラー: {0}")]
    ImageSave(String),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error("Excel生成エラー: {0}")]
    ExcelGeneration(String),

    #[error("計測データが見つかりません: {0}。`card-centering init` で作成してください")]
    NoMeasurements(String),

    #[error(transparent)]
    Common(#[from] card_centering_common::Error),
}

pub type Result<T> = std::result::Result<T, CenteringError>;
