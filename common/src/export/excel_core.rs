//! Excel生成（共通ライブラリ）
//!
//! センタリング判定の一覧表を1シートのExcelとして生成

use crate::grade::Severity;
use crate::types::CenteringReport;
use rust_xlsxwriter::*;

/// 列見出しと列幅
const COLUMNS: &[(&str, f64)] = &[
    ("File", 28.0),
    ("Date", 20.0),
    ("Size", 12.0),
    ("Top %", 9.0),
    ("Left %", 9.0),
    ("Worst Dev.", 10.0),
    ("PSA", 20.0),
    ("BGS", 18.0),
];

/// 一覧の1行分のデータ（呼び出し側の型に実装する）
pub trait CenteringRow {
    fn file_name(&self) -> &str;
    fn date(&self) -> &str;
    fn image_size(&self) -> (u32, u32);
    fn report(&self) -> &CenteringReport;
}

fn severity_color(severity: Severity) -> Color {
    match severity {
        Severity::Excellent => Color::RGB(0xC6EFCE),
        Severity::Good => Color::RGB(0xDDEBF7),
        Severity::Fair => Color::RGB(0xFFEB9C),
        Severity::Poor => Color::RGB(0xFFC7CE),
    }
}

/// Excelをバッファに生成
///
/// # Arguments
/// * `rows` - 判定結果（CenteringRowトレイトを実装した型）
/// * `title` - シート名
pub fn generate_excel_buffer<T: CenteringRow>(rows: &[T], title: &str) -> Result<Vec<u8>, String> {
    let mut workbook = Workbook::new();

    let header_format = Format::new()
        .set_bold()
        .set_font_size(10.0)
        .set_background_color(Color::RGB(0xF5F5F5))
        .set_align(FormatAlign::Center)
        .set_border(FormatBorder::Thin)
        .set_border_color(Color::RGB(0xAAAAAA));

    let text_format = Format::new()
        .set_border(FormatBorder::Hair)
        .set_border_color(Color::RGB(0xCCCCCC));

    let percent_format = Format::new()
        .set_num_format("0.0")
        .set_border(FormatBorder::Hair)
        .set_border_color(Color::RGB(0xCCCCCC));

    let worksheet = workbook.add_worksheet();
    worksheet.set_name(title)
        .map_err(|e| format!("シート名設定エラー: {}", e))?;

    for (col, (label, width)) in COLUMNS.iter().enumerate() {
        let col = col as u16;
        worksheet.set_column_width(col, *width)
            .map_err(|e| format!("列幅設定エラー: {}", e))?;
        worksheet.write_string_with_format(0, col, *label, &header_format)
            .map_err(|e| format!("見出し書き込みエラー: {}", e))?;
    }
    worksheet.set_freeze_panes(1, 0)
        .map_err(|e| format!("ウィンドウ枠固定エラー: {}", e))?;

    for (index, row) in rows.iter().enumerate() {
        let r = index as u32 + 1;
        let report = row.report();
        let (width, height) = row.image_size();
        let date = if row.date().is_empty() { "-" } else { row.date() };

        worksheet.write_string_with_format(r, 0, row.file_name(), &text_format)
            .map_err(|e| format!("値書き込みエラー: {}", e))?;
        worksheet.write_string_with_format(r, 1, date, &text_format)
            .map_err(|e| format!("値書き込みエラー: {}", e))?;
        worksheet.write_string_with_format(r, 2, format!("{}x{}", width, height), &text_format)
            .map_err(|e| format!("値書き込みエラー: {}", e))?;
        worksheet.write_number_with_format(r, 3, report.vertical_percent, &percent_format)
            .map_err(|e| format!("値書き込みエラー: {}", e))?;
        worksheet.write_number_with_format(r, 4, report.horizontal_percent, &percent_format)
            .map_err(|e| format!("値書き込みエラー: {}", e))?;
        worksheet.write_number_with_format(r, 5, report.worst_deviation, &percent_format)
            .map_err(|e| format!("値書き込みエラー: {}", e))?;

        for (col, grade) in [(6u16, &report.psa_grade), (7u16, &report.bgs_grade)] {
            let grade_format = text_format
                .clone()
                .set_background_color(severity_color(grade.severity));
            worksheet.write_string_with_format(r, col, &grade.label, &grade_format)
                .map_err(|e| format!("グレード書き込みエラー: {}", e))?;
        }
    }

    if !rows.is_empty() {
        worksheet.autofilter(0, 0, rows.len() as u32, COLUMNS.len() as u16 - 1)
            .map_err(|e| format!("フィルタ設定エラー: {}", e))?;
    }

    workbook.save_to_buffer()
        .map_err(|e| format!("Excel保存エラー: {}", e))
}
