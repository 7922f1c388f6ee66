//! JSONレポート出力

use super::{GradedCard, GradingOutcome, SkippedImage};
use crate::error::Result;
use serde::Serialize;
use std::path::Path;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Report<'a> {
    title: &'a str,
    generated_at: String,
    count: usize,
    cards: &'a [GradedCard],
    skipped: &'a [SkippedImage],
}

pub fn write_report(outcome: &GradingOutcome, output_path: &Path, title: &str) -> Result<()> {
    let report = Report {
        title,
        generated_at: chrono::Utc::now().to_rfc3339(),
        count: outcome.cards.len(),
        cards: &outcome.cards,
        skipped: &outcome.skipped,
    };

    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let json = serde_json::to_string_pretty(&report)?;
    std::fs::write(output_path, json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use card_centering_common::{Borders, CenteringReport, GradeTables};
    use tempfile::tempdir;

    #[test]
    fn test_write_report() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("out").join("report.json");

        let outcome = GradingOutcome {
            cards: vec![GradedCard {
                file_name: "a.jpg".into(),
                file_path: "/cards/a.jpg".into(),
                date: Some("2024-01-01 10:00:00".into()),
                image_width: 1000,
                image_height: 1000,
                report: CenteringReport::from_borders(
                    &Borders::initialize(1000.0, 1000.0),
                    &GradeTables::default(),
                ),
            }],
            skipped: vec![SkippedImage {
                file_name: "b.jpg".into(),
                reason: "計測ファイルなし".into(),
            }],
        };
        write_report(&outcome, &path, "centering").unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["title"], "centering");
        assert_eq!(value["count"], 1);
        assert_eq!(value["cards"][0]["fileName"], "a.jpg");
        assert_eq!(value["cards"][0]["report"]["psaGrade"]["label"], "Gem Mint (PSA 10)");
        assert_eq!(value["skipped"][0]["fileName"], "b.jpg");
        assert!(value["generatedAt"].as_str().is_some());
    }
}
