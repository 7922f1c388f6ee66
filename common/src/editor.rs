//! 境界線エディタ
//!
//! 読み込んだ画像の境界線・表示状態・ドラッグ状態を1つのコントローラで保持する。
//! マウスとタッチはどちらも `PointerEvent`（キャンバス座標）に正規化してから渡す。
//!
//! 状態遷移:
//! - `Idle` → `Dragging(b)`: ポインタ押下位置のヒットテストが `b` を返したとき
//! - `Dragging(b)` 中の移動: `b` を隣接線でクランプして更新
//! - `Dragging(b)` → `Idle`: ポインタ解放、または描画面から外れたとき（最後の位置は再適用しない）

use crate::borders::{Axis, BorderName, Borders};
use crate::error::{Error, Result};
use crate::geometry::{Point, Size, ViewTransform};
use crate::grade::GradeTables;
use crate::hit_test::{hit_test, HitConfig};
use crate::types::{CenteringReport, Measurement};

/// ドラッグセッション
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DragSession {
    #[default]
    Idle,
    Dragging(BorderName),
}

impl DragSession {
    pub fn active(&self) -> Option<BorderName> {
        match self {
            DragSession::Idle => None,
            DragSession::Dragging(name) => Some(*name),
        }
    }
}

/// 表示状態（一時的）
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ViewState {
    pub transform: ViewTransform,
    /// 表示用の回転角（度）。ヒットテストと判定には影響しない
    pub rotation_degrees: f64,
    pub session: DragSession,
}

impl ViewState {
    pub fn rotation_radians(&self) -> f64 {
        self.rotation_degrees.to_radians()
    }
}

/// 入力デバイスに依存しないポインタイベント（キャンバス座標）
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down(Point),
    Move(Point),
    Up,
    Leave,
}

/// 読み込み済み画像とその境界線
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoadedImage {
    pub size: Size,
    pub borders: Borders,
}

type RedrawCallback = Box<dyn FnMut(&Borders)>;

/// 境界線エディタ本体
pub struct BorderEditor {
    image: Option<LoadedImage>,
    view: ViewState,
    hit_config: HitConfig,
    on_redraw: Option<RedrawCallback>,
}

impl Default for BorderEditor {
    fn default() -> Self {
        Self::new(HitConfig::default())
    }
}

impl std::fmt::Debug for BorderEditor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BorderEditor")
            .field("image", &self.image)
            .field("view", &self.view)
            .field("hit_config", &self.hit_config)
            .finish_non_exhaustive()
    }
}

impl BorderEditor {
    pub fn new(hit_config: HitConfig) -> Self {
        Self {
            image: None,
            view: ViewState::default(),
            hit_config,
            on_redraw: None,
        }
    }

    /// 境界線が確定するたびに呼ばれる描画コールバックを設定
    pub fn set_redraw_callback(&mut self, callback: impl FnMut(&Borders) + 'static) {
        self.on_redraw = Some(Box::new(callback));
    }

    pub fn image(&self) -> Option<&LoadedImage> {
        self.image.as_ref()
    }

    pub fn borders(&self) -> Option<&Borders> {
        self.image.as_ref().map(|img| &img.borders)
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn hit_config(&self) -> &HitConfig {
        &self.hit_config
    }

    pub fn session(&self) -> DragSession {
        self.view.session
    }

    /// 新しい画像を読み込み、境界線を既定位置に初期化する
    ///
    /// サイズが不正な場合は既存の状態を変更せずにエラーを返す。
    pub fn load_image(&mut self, width: f64, height: f64) -> Result<()> {
        let size = Size::new(width, height);
        if !size.is_valid() {
            return Err(Error::InvalidDimensions { width, height });
        }
        self.image = Some(LoadedImage {
            size,
            borders: Borders::initialize(width, height),
        });
        self.view.rotation_degrees = 0.0;
        self.view.session = DragSession::Idle;
        log::debug!("loaded image {width}x{height}");
        self.redraw();
        Ok(())
    }

    /// 保存済みの計測データを読み込む
    pub fn restore(&mut self, measurement: &Measurement) -> Result<()> {
        measurement.validate()?;
        self.image = Some(LoadedImage {
            size: Size::new(measurement.image_width as f64, measurement.image_height as f64),
            borders: measurement.borders,
        });
        self.view.rotation_degrees = measurement.rotation_degrees;
        self.view.session = DragSession::Idle;
        self.redraw();
        Ok(())
    }

    /// 回転を0に戻し、境界線を既定位置に戻す
    pub fn reset(&mut self) {
        self.view.rotation_degrees = 0.0;
        self.view.session = DragSession::Idle;
        if let Some(img) = self.image.as_mut() {
            img.borders = Borders::initialize(img.size.width, img.size.height);
            self.redraw();
        }
    }

    pub fn set_rotation(&mut self, degrees: f64) {
        if degrees.is_finite() {
            self.view.rotation_degrees = degrees;
        }
    }

    /// キャンバスサイズに合わせて表示変換を更新
    pub fn fit_to_canvas(&mut self, canvas: Size, fit_factor: f64) {
        if let Some(img) = &self.image {
            self.view.transform = ViewTransform::fit_to_canvas(canvas, img.size, fit_factor);
        }
    }

    pub fn set_transform(&mut self, transform: ViewTransform) {
        self.view.transform = transform;
    }

    /// ポインタイベントを処理し、境界線が変化したら true
    pub fn handle(&mut self, event: PointerEvent) -> bool {
        match event {
            PointerEvent::Down(canvas) => {
                self.pointer_down(canvas);
                false
            }
            PointerEvent::Move(canvas) => self.pointer_move(canvas),
            PointerEvent::Up | PointerEvent::Leave => {
                self.release();
                false
            }
        }
    }

    /// 押下位置の境界線があればドラッグを開始
    pub fn pointer_down(&mut self, canvas: Point) -> Option<BorderName> {
        let img = self.image.as_ref()?;
        let pos = self.view.transform.to_image(canvas);
        let hit = hit_test(pos, &img.borders, img.size, &self.hit_config);
        if let Some(name) = hit {
            log::debug!("drag start: {name} at ({:.1}, {:.1})", pos.x, pos.y);
            self.view.session = DragSession::Dragging(name);
        }
        hit
    }

    /// ドラッグ中なら対象の境界線を更新
    pub fn pointer_move(&mut self, canvas: Point) -> bool {
        let DragSession::Dragging(name) = self.view.session else {
            return false;
        };
        let pos = self.view.transform.to_image(canvas);
        let Some(img) = self.image.as_mut() else {
            self.view.session = DragSession::Idle;
            return false;
        };

        let coord = match name.axis() {
            Axis::Vertical => pos.y,
            Axis::Horizontal => pos.x,
        };
        let next = img.borders.apply_drag(name, coord);
        if next == img.borders {
            return false;
        }
        img.borders = next;
        self.redraw();
        true
    }

    /// ドラッグ終了（境界線は最後に確定した値のまま）
    pub fn release(&mut self) {
        if let DragSession::Dragging(name) = self.view.session {
            log::debug!("drag end: {name}");
        }
        self.view.session = DragSession::Idle;
    }

    /// 現在の境界線から判定を作成
    pub fn report(&self, tables: &GradeTables) -> Option<CenteringReport> {
        self.borders()
            .map(|borders| CenteringReport::from_borders(borders, tables))
    }

    /// 現在の状態を計測データとして取り出す
    pub fn to_measurement(&self, file_name: &str) -> Option<Measurement> {
        let img = self.image.as_ref()?;
        Some(Measurement {
            file_name: file_name.to_string(),
            image_width: img.size.width.round() as u32,
            image_height: img.size.height.round() as u32,
            rotation_degrees: self.view.rotation_degrees,
            borders: img.borders,
        })
    }

    fn redraw(&mut self) {
        if let (Some(img), Some(callback)) = (self.image.as_ref(), self.on_redraw.as_mut()) {
            callback(&img.borders);
        }
    }
}
