//! センタリング計算
//!
//! 外枠と内枠の余白比からカードのセンタリング率を求める。
//! 50% が完全なセンタリング。

use crate::borders::{Axis, Borders};
use serde::{Deserialize, Serialize};

/// 上下・左右のセンタリング率（上側／左側の余白が占める割合, %）
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Centering {
    pub vertical_percent: f64,
    pub horizontal_percent: f64,
}

/// 1軸の4座標（小さい順）から手前側余白の比率を求める（余白合計0なら50）
///
/// 座標を 1/4 にしてから差と和を取るので、順序が保たれた有限値なら
/// どれだけ大きくても途中で無限大にならない。非有限値が混ざると NaN。
fn chain_percent([outer_lo, inner_lo, inner_hi, outer_hi]: [f64; 4]) -> f64 {
    let first = inner_lo * 0.25 - outer_lo * 0.25;
    let second = outer_hi * 0.25 - inner_hi * 0.25;
    let total = first + second;
    if !total.is_finite() {
        return f64::NAN;
    }
    if total == 0.0 {
        50.0
    } else {
        first / total * 100.0
    }
}

impl Centering {
    pub fn from_borders(borders: &Borders) -> Self {
        Self {
            vertical_percent: chain_percent(borders.axis_chain(Axis::Vertical)),
            horizontal_percent: chain_percent(borders.axis_chain(Axis::Horizontal)),
        }
    }

    /// 50% からの最大ずれ
    pub fn worst_deviation(&self) -> f64 {
        worst_deviation(self.vertical_percent, self.horizontal_percent)
    }

    /// 例: `52.3% top / 47.7% bottom`
    pub fn vertical_label(&self) -> String {
        format!(
            "{:.1}% top / {:.1}% bottom",
            self.vertical_percent,
            100.0 - self.vertical_percent
        )
    }

    /// 例: `50.0% left / 50.0% right`
    pub fn horizontal_label(&self) -> String {
        format!(
            "{:.1}% left / {:.1}% right",
            self.horizontal_percent,
            100.0 - self.horizontal_percent
        )
    }
}

/// `Centering::from_borders` の関数版
pub fn compute_centering(borders: &Borders) -> Centering {
    Centering::from_borders(borders)
}

/// `max(|v - 50|, |h - 50|)`。どちらかが NaN なら NaN（グレードは最下位になる）
pub fn worst_deviation(vertical_percent: f64, horizontal_percent: f64) -> f64 {
    if vertical_percent.is_nan() || horizontal_percent.is_nan() {
        return f64::NAN;
    }
    (vertical_percent - 50.0).abs().max((horizontal_percent - 50.0).abs())
}
