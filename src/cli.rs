use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "card-centering")]
#[command(about = "トレカのセンタリング計測・グレード判定ツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 画像から既定の境界線で計測ファイルを作成
    Init {
        /// カード画像
        #[arg(required = true)]
        image: PathBuf,

        /// 出力先（デフォルト: 画像名.borders.json）
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// 既存の計測ファイルを上書き
        #[arg(short, long)]
        force: bool,
    },

    /// 境界線を1本ドラッグする（順序は自動でクランプ）
    Drag {
        /// 計測ファイル（.borders.json）または画像
        #[arg(required = true)]
        target: PathBuf,

        /// 境界線名 (outer-top/inner-top/inner-bottom/outer-bottom/outer-left/inner-left/inner-right/outer-right)
        #[arg(short, long)]
        border: String,

        /// 移動先の座標（画像ピクセル）
        #[arg(short, long, allow_negative_numbers = true)]
        to: f64,
    },

    /// センタリング率とグレードを表示
    Grade {
        /// 計測ファイルまたは画像（画像の場合はサイドカーを探す）
        #[arg(required = true)]
        target: PathBuf,

        /// JSONで出力
        #[arg(long)]
        json: bool,
    },

    /// 境界線を画像に描き込んで保存
    Annotate {
        /// カード画像
        #[arg(required = true)]
        image: PathBuf,

        /// 計測ファイル（デフォルト: 画像名.borders.json、無ければ既定位置）
        #[arg(short, long)]
        borders: Option<PathBuf>,

        /// 出力PNG（デフォルト: 画像名.annotated.png）
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// フォルダ内の計測結果を一覧出力
    Export {
        /// 画像フォルダ
        #[arg(required = true)]
        folder: PathBuf,

        /// 出力形式 (json/excel/both)
        #[arg(short, long, default_value = "both")]
        format: ExportFormat,

        /// 出力ファイル/ディレクトリ
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// ドキュメントタイトル
        #[arg(short, long, default_value = "centering")]
        title: String,

        /// サブフォルダも再帰的にスキャン
        #[arg(short = 'r', long)]
        recursive: bool,
    },

    /// 設定を表示/編集
    Config {
        /// 当たり判定の許容距離（画像ピクセル）を設定
        #[arg(long)]
        set_tolerance: Option<f64>,

        /// 設定を既定値に戻す
        #[arg(long)]
        reset: bool,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Excel,
    #[default]
    Both,
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "excel" | "xlsx" => Ok(ExportFormat::Excel),
            "both" => Ok(ExportFormat::Both),
            _ => Err(format!("Unknown format: {}. Use json, excel, or both", s)),
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportFormat::Json => write!(f, "json"),
            ExportFormat::Excel => write!(f, "excel"),
            ExportFormat::Both => write!(f, "both"),
        }
    }
}
