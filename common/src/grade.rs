//! グレード判定
//!
//! センタリングの最大ずれを鑑定会社ごとの閾値テーブルでグレードに変換する。
//! テーブルは上限値の昇順で、最後の上限は無限大（それ以外すべて）。

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// グレードの良し悪し（表示色の分類）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl Severity {
    /// 0 が最良
    pub fn rank(self) -> u8 {
        self as u8
    }

    /// 表示用クラス名
    pub fn css_class(self) -> &'static str {
        match self {
            Severity::Excellent => "grade-excellent",
            Severity::Good => "grade-good",
            Severity::Fair => "grade-fair",
            Severity::Poor => "grade-poor",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Excellent => write!(f, "excellent"),
            Severity::Good => write!(f, "good"),
            Severity::Fair => write!(f, "fair"),
            Severity::Poor => write!(f, "poor"),
        }
    }
}

/// JSONでは無限大を `null` で表す
mod bound {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if value.is_infinite() {
            serializer.serialize_none()
        } else {
            serializer.serialize_some(value)
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::INFINITY))
    }
}

/// 閾値テーブルの1行
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GradeThreshold {
    /// この値以下のずれならこのグレード（%）
    #[serde(with = "bound", default = "unbounded")]
    pub max_deviation: f64,
    pub label: String,
    pub severity: Severity,
}

fn unbounded() -> f64 {
    f64::INFINITY
}

impl GradeThreshold {
    pub fn new(max_deviation: f64, label: impl Into<String>, severity: Severity) -> Self {
        Self {
            max_deviation,
            label: label.into(),
            severity,
        }
    }
}

/// 判定結果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Grade {
    pub label: String,
    pub severity: Severity,
}

impl Grade {
    pub fn css_class(&self) -> &'static str {
        self.severity.css_class()
    }
}

/// 鑑定会社ごとの閾値テーブル
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeTable {
    pub name: String,
    pub thresholds: Vec<GradeThreshold>,
}

impl GradeTable {
    /// PSA基準
    pub fn psa() -> Self {
        Self {
            name: "PSA".into(),
            thresholds: vec![
                GradeThreshold::new(5.0, "Gem Mint (PSA 10)", Severity::Excellent),
                GradeThreshold::new(10.0, "Mint (PSA 9)", Severity::Good),
                GradeThreshold::new(15.0, "NM-MT (PSA 8)", Severity::Good),
                GradeThreshold::new(20.0, "Near Mint (PSA 7)", Severity::Fair),
                GradeThreshold::new(f64::INFINITY, "EX-NM or Lower", Severity::Poor),
            ],
        }
    }

    /// BGS基準
    pub fn bgs() -> Self {
        Self {
            name: "BGS".into(),
            thresholds: vec![
                GradeThreshold::new(2.5, "Pristine (10)", Severity::Excellent),
                GradeThreshold::new(5.0, "Gem Mint (9.5)", Severity::Excellent),
                GradeThreshold::new(10.0, "Mint (9.0)", Severity::Good),
                GradeThreshold::new(15.0, "NM-MT+ (8.5)", Severity::Good),
                GradeThreshold::new(20.0, "NM-MT (8.0)", Severity::Fair),
                GradeThreshold::new(f64::INFINITY, "NM or Lower", Severity::Poor),
            ],
        }
    }

    /// 空でない・上限が狭義単調増加・最後が無限大、を検査
    pub fn validate(&self) -> Result<()> {
        let invalid = |reason: &str| Error::InvalidTable {
            name: self.name.clone(),
            reason: reason.to_string(),
        };

        let last = self.thresholds.last().ok_or_else(|| invalid("テーブルが空です"))?;
        if last.max_deviation != f64::INFINITY {
            return Err(invalid("最後の上限は無限大（null）である必要があります"));
        }
        if self.thresholds.iter().any(|t| t.max_deviation.is_nan()) {
            return Err(invalid("上限にNaNが含まれています"));
        }
        if !self
            .thresholds
            .windows(2)
            .all(|w| w[0].max_deviation < w[1].max_deviation)
        {
            return Err(invalid("上限は狭義単調増加である必要があります"));
        }
        Ok(())
    }

    /// ずれ以上の上限を持つ最初の行を返す（上限値ちょうどはその行）
    ///
    /// 検証済みテーブルなら必ず1行が該当する。NaN のずれは最後の行になる。
    pub fn map_grade(&self, deviation: f64) -> Grade {
        let entry = self
            .thresholds
            .iter()
            .find(|t| deviation <= t.max_deviation)
            .or_else(|| self.thresholds.last());

        match entry {
            Some(t) => Grade {
                label: t.label.clone(),
                severity: t.severity,
            },
            None => Grade {
                label: "-".to_string(),
                severity: Severity::Poor,
            },
        }
    }
}

/// `GradeTable::map_grade` の関数版
pub fn map_grade(deviation: f64, table: &GradeTable) -> Grade {
    table.map_grade(deviation)
}

/// 2社分のテーブル
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeTables {
    pub psa: GradeTable,
    pub bgs: GradeTable,
}

impl Default for GradeTables {
    fn default() -> Self {
        Self {
            psa: GradeTable::psa(),
            bgs: GradeTable::bgs(),
        }
    }
}

impl GradeTables {
    pub fn validate(&self) -> Result<()> {
        self.psa.validate()?;
        self.bgs.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_tables_are_valid() {
        GradeTable::psa().validate().unwrap();
        GradeTable::bgs().validate().unwrap();
    }

    #[test]
    fn test_psa_inclusive_upper_bound() {
        let psa = GradeTable::psa();
        assert_eq!(psa.map_grade(5.0).label, "Gem Mint (PSA 10)");
        assert_eq!(psa.map_grade(5.0001).label, "Mint (PSA 9)");
        assert_eq!(psa.map_grade(0.0).label, "Gem Mint (PSA 10)");
        assert_eq!(psa.map_grade(20.0).label, "Near Mint (PSA 7)");
        assert_eq!(psa.map_grade(36.67).label, "EX-NM or Lower");
    }

    #[test]
    fn test_bgs_thresholds() {
        let bgs = GradeTable::bgs();
        assert_eq!(bgs.map_grade(2.5).label, "Pristine (10)");
        assert_eq!(bgs.map_grade(3.0).label, "Gem Mint (9.5)");
        assert_eq!(bgs.map_grade(12.0).label, "NM-MT+ (8.5)");
        assert_eq!(bgs.map_grade(50.0).label, "NM or Lower");
        assert_eq!(bgs.map_grade(50.0).severity, Severity::Poor);
    }

    #[test]
    fn test_grade_monotonic() {
        for table in [GradeTable::psa(), GradeTable::bgs()] {
            let mut previous = table.map_grade(0.0).severity.rank();
            let mut d = 0.0;
            while d <= 50.0 {
                let rank = table.map_grade(d).severity.rank();
                assert!(rank >= previous, "{} at {d}", table.name);
                previous = rank;
                d += 0.25;
            }
        }
    }

    #[test]
    fn test_nan_deviation_falls_to_last_row() {
        assert_eq!(GradeTable::psa().map_grade(f64::NAN).label, "EX-NM or Lower");
    }

    #[test]
    fn test_validate_rejects_bad_tables() {
        let mut table = GradeTable::psa();
        table.thresholds.pop();
        assert!(table.validate().is_err());

        let mut table = GradeTable::bgs();
        table.thresholds.swap(0, 1);
        assert!(table.validate().is_err());

        let empty = GradeTable { name: "X".into(), thresholds: vec![] };
        assert!(matches!(empty.validate(), Err(Error::InvalidTable { .. })));
    }

    #[test]
    fn test_table_json_uses_null_for_infinity() {
        let json = serde_json::to_string(&GradeTable::psa()).expect("シリアライズ失敗");
        assert!(json.contains("\"maxDeviation\":null"));
        assert!(json.contains("\"severity\":\"excellent\""));

        let restored: GradeTable = serde_json::from_str(&json).expect("デシリアライズ失敗");
        assert_eq!(restored, GradeTable::psa());
    }

    #[test]
    fn test_threshold_missing_bound_is_unbounded() {
        let json = r#"{"label": "Any", "severity": "poor"}"#;
        let t: GradeThreshold = serde_json::from_str(json).expect("デシリアライズ失敗");
        assert!(t.max_deviation.is_infinite());
    }

    #[test]
    fn test_css_class() {
        assert_eq!(GradeTable::psa().map_grade(12.0).css_class(), "grade-good");
        assert_eq!(Severity::Fair.css_class(), "grade-fair");
    }
}
