//! Card Centering Common Library
//!
//! CLIとデスクトップで共有される境界線エディタ・センタリング計算・グレード判定

pub mod borders;
pub mod centering;
pub mod editor;
pub mod error;
pub mod export;
pub mod geometry;
pub mod grade;
pub mod hit_test;
pub mod types;

pub use borders::{apply_drag, initialize_borders, Axis, BorderName, Borders};
pub use centering::{compute_centering, worst_deviation, Centering};
pub use editor::{BorderEditor, DragSession, LoadedImage, PointerEvent, ViewState};
pub use error::{Error, Result};
pub use geometry::{Point, Rect, Size, ViewTransform, DEFAULT_FIT_FACTOR};
pub use grade::{map_grade, Grade, GradeTable, GradeTables, GradeThreshold, Severity};
pub use hit_test::{hit_test, tab_rect, HitConfig};
pub use types::{sidecar_path, CenteringReport, Measurement, SIDECAR_SUFFIX};
