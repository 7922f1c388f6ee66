//! 境界線のヒットテスト
//!
//! ポインタ位置（画像座標）が境界線の許容範囲内か、
//! 境界線ごとのドラッグタブ内にあるかを判定する。

use crate::borders::{Axis, BorderName, Borders};
use crate::geometry::{Point, Rect, Size};
use serde::{Deserialize, Serialize};

pub const DEFAULT_HIT_TOLERANCE: f64 = 20.0;
pub const DEFAULT_TAB_SIZE: f64 = 15.0;
pub const DEFAULT_TAB_OFFSET: f64 = 10.0;

/// ヒットテストの設定（画像ピクセル単位）
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HitConfig {
    /// 線からの許容距離
    pub tolerance: f64,
    /// タブの一辺
    pub tab_size: f64,
    /// 外枠タブと内枠タブを左右（上下）にずらす量
    pub tab_offset: f64,
}

impl Default for HitConfig {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_HIT_TOLERANCE,
            tab_size: DEFAULT_TAB_SIZE,
            tab_offset: DEFAULT_TAB_OFFSET,
        }
    }
}

/// 境界値がすべて有限ならタブ矩形、そうでなければ None
fn finite_tab_rect(name: BorderName, borders: &Borders, image: Size, config: &HitConfig) -> Option<Rect> {
    if !borders.is_finite() || !image.width.is_finite() || !image.height.is_finite() {
        return None;
    }

    let half = config.tab_size / 2.0;
    // 外枠タブは中心線の手前、内枠タブは先にずらして重ならないようにする
    let shift = if name.is_outer() { -config.tab_offset } else { config.tab_offset };
    let value = borders.get(name);

    Some(match name.axis() {
        Axis::Vertical => Rect::new(
            image.width / 2.0 - half + shift,
            value - half,
            config.tab_size,
            config.tab_size,
        ),
        Axis::Horizontal => Rect::new(
            value - half,
            image.height / 2.0 - half + shift,
            config.tab_size,
            config.tab_size,
        ),
    })
}

/// ドラッグタブの矩形
///
/// 境界値に非有限値が含まれる場合はサイズ0の矩形を返す。
pub fn tab_rect(name: BorderName, borders: &Borders, image: Size, config: &HitConfig) -> Rect {
    finite_tab_rect(name, borders, image, config).unwrap_or_else(|| {
        log::debug!("border values are not finite; using empty tab for {name}");
        Rect::ZERO
    })
}

/// ポインタ位置に対応する境界線を優先順に探す
///
/// 境界値に非有限値があるとタブ判定は全体で無効になり、線判定だけが残る。
pub fn hit_test(pos: Point, borders: &Borders, image: Size, config: &HitConfig) -> Option<BorderName> {
    let tabs_usable = borders.is_finite() && image.width.is_finite() && image.height.is_finite();
    if !tabs_usable {
        log::warn!("border values are not finite; tab hit areas are disabled");
    }

    BorderName::HIT_PRIORITY.into_iter().find(|&name| {
        let coord = match name.axis() {
            Axis::Vertical => pos.y,
            Axis::Horizontal => pos.x,
        };
        (coord - borders.get(name)).abs() < config.tolerance
            || (tabs_usable
                && finite_tab_rect(name, borders, image, config).is_some_and(|tab| tab.contains(pos)))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (Borders, Size, HitConfig) {
        (
            Borders::initialize(1000.0, 1000.0),
            Size::new(1000.0, 1000.0),
            HitConfig::default(),
        )
    }

    #[test]
    fn test_hit_on_line() {
        let (b, size, cfg) = setup();
        assert_eq!(hit_test(Point::new(300.0, 55.0), &b, size, &cfg), Some(BorderName::OuterTop));
        assert_eq!(hit_test(Point::new(300.0, 860.0), &b, size, &cfg), Some(BorderName::InnerBottom));
        assert_eq!(hit_test(Point::new(940.0, 400.0), &b, size, &cfg), Some(BorderName::OuterRight));
        assert_eq!(hit_test(Point::new(160.0, 400.0), &b, size, &cfg), Some(BorderName::InnerLeft));
    }

    #[test]
    fn test_tolerance_is_strict() {
        let (b, size, cfg) = setup();
        // outerTop=50 から距離ちょうど20は対象外
        assert_eq!(hit_test(Point::new(300.0, 70.0), &b, size, &cfg), None);
        assert_eq!(hit_test(Point::new(300.0, 69.9), &b, size, &cfg), Some(BorderName::OuterTop));
    }

    #[test]
    fn test_miss_in_open_area() {
        let (b, size, cfg) = setup();
        assert_eq!(hit_test(Point::new(500.0, 500.0), &b, size, &cfg), None);
    }

    #[test]
    fn test_outer_before_inner_priority() {
        // 外枠と内枠が近接している場合は外枠を優先
        let (mut b, size, cfg) = setup();
        b.inner_top = 60.0;
        assert_eq!(hit_test(Point::new(300.0, 58.0), &b, size, &cfg), Some(BorderName::OuterTop));
    }

    #[test]
    fn test_vertical_before_horizontal_priority() {
        let (b, size, cfg) = setup();
        // outerTop(y=50) と outerLeft(x=50) の交点
        assert_eq!(hit_test(Point::new(50.0, 50.0), &b, size, &cfg), Some(BorderName::OuterTop));
    }

    #[test]
    fn test_tab_rect_positions() {
        let (b, size, cfg) = setup();
        let outer = tab_rect(BorderName::OuterTop, &b, size, &cfg);
        assert_eq!(outer, Rect::new(482.5, 42.5, 15.0, 15.0));
        let inner = tab_rect(BorderName::InnerTop, &b, size, &cfg);
        assert_eq!(inner, Rect::new(502.5, 142.5, 15.0, 15.0));
        let left = tab_rect(BorderName::InnerLeft, &b, size, &cfg);
        assert_eq!(left, Rect::new(142.5, 502.5, 15.0, 15.0));
    }

    #[test]
    fn test_hit_via_tab_only() {
        // 許容距離0ではタブだけが当たり判定になる
        let (b, size, _) = setup();
        let cfg = HitConfig { tolerance: 0.0, ..HitConfig::default() };
        assert_eq!(hit_test(Point::new(490.0, 45.0), &b, size, &cfg), Some(BorderName::OuterTop));
        assert_eq!(hit_test(Point::new(510.0, 145.0), &b, size, &cfg), Some(BorderName::InnerTop));
        assert_eq!(hit_test(Point::new(600.0, 145.0), &b, size, &cfg), None);
    }

    #[test]
    fn test_non_finite_borders_give_zero_rect() {
        let (mut b, size, cfg) = setup();
        b.inner_right = f64::NAN;
        assert_eq!(tab_rect(BorderName::OuterTop, &b, size, &cfg), Rect::ZERO);
        // 線判定は他の線について引き続き機能する
        assert_eq!(hit_test(Point::new(300.0, 52.0), &b, size, &cfg), Some(BorderName::OuterTop));
    }

    #[test]
    fn test_non_finite_border_disables_every_tab() {
        let (mut b, size, _) = setup();
        b.outer_right = f64::INFINITY;
        let cfg = HitConfig { tolerance: 0.0, ..HitConfig::default() };
        // 有限な outerTop のタブ位置でも当たらない
        assert_eq!(hit_test(Point::new(490.0, 45.0), &b, size, &cfg), None);
        assert!(finite_tab_rect(BorderName::OuterTop, &b, size, &cfg).is_none());

        b.outer_right = 950.0;
        assert_eq!(hit_test(Point::new(490.0, 45.0), &b, size, &cfg), Some(BorderName::OuterTop));
    }
}
