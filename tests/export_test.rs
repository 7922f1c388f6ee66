//! 計測〜判定〜一覧出力の統合テスト

use card_centering::cli::ExportFormat;
use card_centering::export::{self, GradedCard};
use card_centering::render;
use card_centering::scanner;
use card_centering_common::export::excel_core::CenteringRow;
use card_centering_common::{sidecar_path, BorderName, GradeTables, HitConfig, Measurement, Severity};
use image::{Rgba, RgbaImage};
use std::path::Path;
use tempfile::tempdir;

/// 無地のPNGと既定の計測ファイルを作る
fn create_card(dir: &Path, name: &str, width: u32, height: u32) -> Measurement {
    let path = dir.join(name);
    RgbaImage::from_pixel(width, height, Rgba([200, 200, 200, 255]))
        .save(&path)
        .expect("PNG保存失敗");

    let measurement = Measurement::new(name, width, height);
    measurement.save(&sidecar_path(&path)).unwrap();
    measurement
}

#[test]
fn test_grade_folder_end_to_end() {
    let dir = tempdir().expect("Failed to create temp dir");
    create_card(dir.path(), "centered.png", 400, 560);

    let mut off = create_card(dir.path(), "off.png", 1000, 1000);
    off.borders = off.borders.apply_drag(BorderName::InnerTop, 700.0);
    off.save(&dir.path().join("off.borders.json")).unwrap();

    // 計測なし
    RgbaImage::new(10, 10).save(dir.path().join("raw.png")).unwrap();

    let images = scanner::scan_folder(dir.path(), false).unwrap();
    assert_eq!(images.len(), 3);

    let outcome = export::grade_images(&images, &GradeTables::default(), false);
    assert_eq!(outcome.cards.len(), 2);
    assert_eq!(outcome.skipped.len(), 1);

    let centered: &GradedCard = &outcome.cards[0];
    assert_eq!(centered.file_name(), "centered.png");
    assert_eq!(centered.report.psa_grade.label, "Gem Mint (PSA 10)");

    let off = &outcome.cards[1];
    assert!((off.report.worst_deviation - 36.666_666).abs() < 1e-4);
    assert_eq!(off.report.psa_grade.severity, Severity::Poor);

    let written = export::export_results(&outcome, &ExportFormat::Both, dir.path(), "centering").unwrap();
    assert_eq!(written.len(), 2);
    assert!(dir.path().join("centering.json").exists());
    assert!(dir.path().join("centering.xlsx").exists());
}

#[test]
fn test_export_single_format_to_file() {
    let dir = tempdir().expect("Failed to create temp dir");
    create_card(dir.path(), "a.png", 100, 100);

    let images = scanner::scan_folder(dir.path(), false).unwrap();
    let outcome = export::grade_images(&images, &GradeTables::default(), false);

    let target = dir.path().join("out").join("list.xlsx");
    let written = export::export_results(&outcome, &ExportFormat::Excel, &target, "centering").unwrap();
    assert_eq!(written, vec![target.clone()]);
    assert!(std::fs::read(&target).unwrap().starts_with(b"PK"));
}

#[test]
fn test_annotate_keeps_image_size() {
    let dir = tempdir().expect("Failed to create temp dir");
    let measurement = create_card(dir.path(), "card.png", 120, 160);

    let mut canvas = image::open(dir.path().join("card.png")).unwrap().to_rgba8();
    render::draw_overlay(&mut canvas, &measurement.borders, &HitConfig::default());

    let output = dir.path().join("card.annotated.png");
    canvas.save(&output).unwrap();

    let reloaded = image::open(&output).unwrap().to_rgba8();
    assert_eq!(reloaded.dimensions(), (120, 160));
    // outer-top = 8px
    let pixel = reloaded.get_pixel(1, 8);
    let close = pixel
        .0
        .iter()
        .zip(render::OUTER_COLOR.0.iter())
        .all(|(a, e)| (*a as i16 - *e as i16).abs() <= 2);
    assert!(close, "{pixel:?}");

    // 注釈画像はスキャン対象外
    let images = scanner::scan_folder(dir.path(), false).unwrap();
    assert_eq!(images.len(), 1);
}
