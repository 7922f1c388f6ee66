//! 座標・矩形・表示変換
//!
//! 画像座標（画像の実ピクセル）とキャンバス座標（表示ピクセル）の相互変換。

use serde::{Deserialize, Serialize};

/// 既定の表示倍率係数（キャンバスに対して画像を95%で収める）
pub const DEFAULT_FIT_FACTOR: f64 = 0.95;

/// 2次元座標
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// 幅と高さ
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// 幅・高さとも正の有限値か
    pub fn is_valid(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

/// 軸平行な矩形（左上 + サイズ）
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    /// 原点にあるサイズ0の矩形
    pub const ZERO: Rect = Rect { x: 0.0, y: 0.0, width: 0.0, height: 0.0 };

    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// 点が矩形内にあるか（境界上も含む）
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.x + self.width && p.y >= self.y && p.y <= self.y + self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// 画像座標 → キャンバス座標の変換（一様スケール + 平行移動）
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewTransform {
    pub scale: f64,
    pub offset: Point,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self {
            scale: 1.0,
            offset: Point::default(),
        }
    }
}

impl ViewTransform {
    pub fn new(scale: f64, offset: Point) -> Self {
        Self { scale, offset }
    }

    /// キャンバス座標を画像座標へ: `(canvas - offset) / scale`
    pub fn to_image(&self, canvas: Point) -> Point {
        Point::new(
            (canvas.x - self.offset.x) / self.scale,
            (canvas.y - self.offset.y) / self.scale,
        )
    }

    /// 画像座標をキャンバス座標へ
    pub fn to_canvas(&self, image: Point) -> Point {
        Point::new(
            image.x * self.scale + self.offset.x,
            image.y * self.scale + self.offset.y,
        )
    }

    /// 画像をキャンバス中央に `fit_factor` の比率で収める変換
    pub fn fit_to_canvas(canvas: Size, image: Size, fit_factor: f64) -> Self {
        if !canvas.is_valid() || !image.is_valid() {
            return Self::default();
        }
        let scale = (canvas.width / image.width).min(canvas.height / image.height) * fit_factor;
        if !scale.is_finite() || scale <= 0.0 {
            return Self::default();
        }
        let offset = Point::new(
            (canvas.width - image.width * scale) / 2.0,
            (canvas.height - image.height * scale) / 2.0,
        );
        Self { scale, offset }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_contains_edges() {
        let rect = Rect::new(10.0, 10.0, 15.0, 15.0);
        assert!(rect.contains(Point::new(10.0, 10.0)));
        assert!(rect.contains(Point::new(25.0, 25.0)));
        assert!(rect.contains(Point::new(17.0, 12.0)));
        assert!(!rect.contains(Point::new(25.1, 12.0)));
        assert!(!rect.contains(Point::new(9.9, 12.0)));
    }

    #[test]
    fn test_zero_rect_is_empty() {
        assert!(Rect::ZERO.is_empty());
        assert!(!Rect::new(0.0, 0.0, 1.0, 1.0).is_empty());
    }

    #[test]
    fn test_transform_roundtrip_point() {
        let t = ViewTransform::new(0.5, Point::new(100.0, 20.0));
        let canvas = t.to_canvas(Point::new(400.0, 600.0));
        assert_eq!(canvas, Point::new(300.0, 320.0));
        assert_eq!(t.to_image(canvas), Point::new(400.0, 600.0));
    }

    #[test]
    fn test_fit_to_canvas_centers_image() {
        // 横長キャンバスに正方形画像: 高さ基準
        let t = ViewTransform::fit_to_canvas(
            Size::new(1000.0, 500.0),
            Size::new(1000.0, 1000.0),
            DEFAULT_FIT_FACTOR,
        );
        assert!((t.scale - 0.475).abs() < 1e-9);
        assert!((t.offset.x - 262.5).abs() < 1e-9);
        assert!((t.offset.y - 12.5).abs() < 1e-9);
    }

    #[test]
    fn test_fit_to_canvas_invalid_falls_back() {
        let t = ViewTransform::fit_to_canvas(Size::new(0.0, 500.0), Size::new(100.0, 100.0), 0.95);
        assert_eq!(t, ViewTransform::default());
    }
}
