//! 境界線モデル
//!
//! 外枠4本・内枠4本の計8本の境界線を画像座標で保持する。
//! 各軸で `outer ≤ inner ≤ inner ≤ outer` の順序を常に保つ。

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 外枠の既定位置（軸長に対する比率）
pub const DEFAULT_OUTER_RATIOS: (f64, f64) = (0.05, 0.95);
/// 内枠の既定位置（軸長に対する比率）
pub const DEFAULT_INNER_RATIOS: (f64, f64) = (0.15, 0.85);

/// 境界線の軸
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    /// 上下（y座標）
    Vertical,
    /// 左右（x座標）
    Horizontal,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::Vertical => write!(f, "vertical"),
            Axis::Horizontal => write!(f, "horizontal"),
        }
    }
}

/// 境界線の名前
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BorderName {
    OuterTop,
    InnerTop,
    InnerBottom,
    OuterBottom,
    OuterLeft,
    InnerLeft,
    InnerRight,
    OuterRight,
}

/// 軸とクランプ対象の隣接線
#[derive(Debug, Clone, Copy)]
struct BorderSpec {
    axis: Axis,
    lower: Option<BorderName>,
    upper: Option<BorderName>,
    outer: bool,
}

// 列挙子の宣言順に並べる
const BORDER_SPECS: [BorderSpec; 8] = [
    BorderSpec { axis: Axis::Vertical, lower: None, upper: Some(BorderName::InnerTop), outer: true },
    BorderSpec { axis: Axis::Vertical, lower: Some(BorderName::OuterTop), upper: Some(BorderName::InnerBottom), outer: false },
    BorderSpec { axis: Axis::Vertical, lower: Some(BorderName::InnerTop), upper: Some(BorderName::OuterBottom), outer: false },
    BorderSpec { axis: Axis::Vertical, lower: Some(BorderName::InnerBottom), upper: None, outer: true },
    BorderSpec { axis: Axis::Horizontal, lower: None, upper: Some(BorderName::InnerLeft), outer: true },
    BorderSpec { axis: Axis::Horizontal, lower: Some(BorderName::OuterLeft), upper: Some(BorderName::InnerRight), outer: false },
    BorderSpec { axis: Axis::Horizontal, lower: Some(BorderName::InnerLeft), upper: Some(BorderName::OuterRight), outer: false },
    BorderSpec { axis: Axis::Horizontal, lower: Some(BorderName::InnerRight), upper: None, outer: true },
];

impl BorderName {
    /// 全境界線（軸ごとに小さい座標から順）
    pub const ALL: [BorderName; 8] = [
        BorderName::OuterTop,
        BorderName::InnerTop,
        BorderName::InnerBottom,
        BorderName::OuterBottom,
        BorderName::OuterLeft,
        BorderName::InnerLeft,
        BorderName::InnerRight,
        BorderName::OuterRight,
    ];

    /// ヒットテストの優先順（外枠→内枠、上下→左右）
    pub const HIT_PRIORITY: [BorderName; 8] = [
        BorderName::OuterTop,
        BorderName::OuterBottom,
        BorderName::OuterLeft,
        BorderName::OuterRight,
        BorderName::InnerTop,
        BorderName::InnerBottom,
        BorderName::InnerLeft,
        BorderName::InnerRight,
    ];

    fn spec(self) -> BorderSpec {
        BORDER_SPECS[self as usize]
    }

    pub fn axis(self) -> Axis {
        self.spec().axis
    }

    pub fn is_outer(self) -> bool {
        self.spec().outer
    }

    /// CLI・表示用の名前
    pub fn as_str(self) -> &'static str {
        match self {
            BorderName::OuterTop => "outer-top",
            BorderName::InnerTop => "inner-top",
            BorderName::InnerBottom => "inner-bottom",
            BorderName::OuterBottom => "outer-bottom",
            BorderName::OuterLeft => "outer-left",
            BorderName::InnerLeft => "inner-left",
            BorderName::InnerRight => "inner-right",
            BorderName::OuterRight => "outer-right",
        }
    }
}

impl fmt::Display for BorderName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BorderName {
    type Err = Error;

    /// `outer-top` / `outerTop` / `outer_top` のいずれも受け付ける
    fn from_str(s: &str) -> Result<Self> {
        let key: String = s
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .collect::<String>()
            .to_lowercase();
        BorderName::ALL
            .iter()
            .copied()
            .find(|name| name.as_str().replace('-', "") == key)
            .ok_or_else(|| Error::UnknownBorder(s.to_string()))
    }
}

/// 8本の境界線座標（画像ピクセル単位）
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Borders {
    pub outer_top: f64,
    pub inner_top: f64,
    pub inner_bottom: f64,
    pub outer_bottom: f64,
    pub outer_left: f64,
    pub inner_left: f64,
    pub inner_right: f64,
    pub outer_right: f64,
}

impl Borders {
    /// 画像サイズから既定位置を計算（外枠5%/95%、内枠15%/85%）
    pub fn initialize(image_width: f64, image_height: f64) -> Self {
        let (outer_lo, outer_hi) = DEFAULT_OUTER_RATIOS;
        let (inner_lo, inner_hi) = DEFAULT_INNER_RATIOS;
        Self {
            outer_top: image_height * outer_lo,
            inner_top: image_height * inner_lo,
            inner_bottom: image_height * inner_hi,
            outer_bottom: image_height * outer_hi,
            outer_left: image_width * outer_lo,
            inner_left: image_width * inner_lo,
            inner_right: image_width * inner_hi,
            outer_right: image_width * outer_hi,
        }
    }

    pub fn get(&self, name: BorderName) -> f64 {
        match name {
            BorderName::OuterTop => self.outer_top,
            BorderName::InnerTop => self.inner_top,
            BorderName::InnerBottom => self.inner_bottom,
            BorderName::OuterBottom => self.outer_bottom,
            BorderName::OuterLeft => self.outer_left,
            BorderName::InnerLeft => self.inner_left,
            BorderName::InnerRight => self.inner_right,
            BorderName::OuterRight => self.outer_right,
        }
    }

    /// 1本をそのまま書き換える（順序は検査しない）
    pub fn set(&mut self, name: BorderName, value: f64) {
        *self.slot(name) = value;
    }

    fn slot(&mut self, name: BorderName) -> &mut f64 {
        match name {
            BorderName::OuterTop => &mut self.outer_top,
            BorderName::InnerTop => &mut self.inner_top,
            BorderName::InnerBottom => &mut self.inner_bottom,
            BorderName::OuterBottom => &mut self.outer_bottom,
            BorderName::OuterLeft => &mut self.outer_left,
            BorderName::InnerLeft => &mut self.inner_left,
            BorderName::InnerRight => &mut self.inner_right,
            BorderName::OuterRight => &mut self.outer_right,
        }
    }

    /// 1軸分の4座標（小さい順）
    pub fn axis_chain(&self, axis: Axis) -> [f64; 4] {
        match axis {
            Axis::Vertical => [self.outer_top, self.inner_top, self.inner_bottom, self.outer_bottom],
            Axis::Horizontal => [self.outer_left, self.inner_left, self.inner_right, self.outer_right],
        }
    }

    /// 両軸で非減少順が保たれているか
    pub fn is_ordered(&self) -> bool {
        [Axis::Vertical, Axis::Horizontal].into_iter().all(|axis| {
            let chain = self.axis_chain(axis);
            chain.windows(2).all(|w| w[0] <= w[1])
        })
    }

    /// 順序を検査し、崩れていればエラー
    pub fn validate(&self) -> Result<()> {
        for axis in [Axis::Vertical, Axis::Horizontal] {
            let chain = self.axis_chain(axis);
            if !chain.windows(2).all(|w| w[0] <= w[1]) {
                return Err(Error::BorderOrder(axis.to_string()));
            }
        }
        Ok(())
    }

    /// 全座標が有限値か
    pub fn is_finite(&self) -> bool {
        BorderName::ALL.iter().all(|name| self.get(*name).is_finite())
    }

    /// ドラッグ中の1本を更新した新しい境界線を返す
    ///
    /// 隣接線だけを参照してクランプするので、更新後も順序は崩れない。
    /// 外枠は内側の隣接線まで、内枠は両隣の線の間に収める。
    pub fn apply_drag(&self, name: BorderName, pointer: f64) -> Borders {
        let mut next = *self;
        if !pointer.is_finite() {
            return next;
        }
        let spec = name.spec();
        let mut value = pointer;
        if let Some(lower) = spec.lower {
            value = value.max(self.get(lower));
        }
        if let Some(upper) = spec.upper {
            value = value.min(self.get(upper));
        }
        next.set(name, value);
        next
    }
}

/// `Borders::initialize` の関数版
pub fn initialize_borders(image_width: f64, image_height: f64) -> Borders {
    Borders::initialize(image_width, image_height)
}

/// `Borders::apply_drag` の関数版
pub fn apply_drag(name: BorderName, pointer: f64, borders: &Borders) -> Borders {
    borders.apply_drag(name, pointer)
}
