use std::cell::Cell;
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::mpsc::{self, Receiver, Sender};

use anyhow::Result;
use eframe::egui::{self, Color32, RichText, Shape, Stroke};
use eframe::egui::{FontData, FontDefinitions, FontFamily};

use card_centering_common::{
    tab_rect, Axis, BorderEditor, BorderName, Borders, GradeTables, HitConfig, Point, PointerEvent,
    Size, DEFAULT_FIT_FACTOR,
};

use crate::io::{decode_image, load_sidecar, read_clipboard_image, save_sidecar};
use crate::model::{
    severity_color, AppState, DecodedImage, ImageSource, LoadMessage, INNER_LINE, OUTER_LINE, TAB_OUTLINE,
};

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp", "bmp", "gif", "tif", "tiff"];
const LINE_WIDTH: f32 = 3.0;
const ACTIVE_LINE_WIDTH: f32 = 5.0;
const CARD_OUTLINE_WIDTH: f32 = 3.0;
const ROTATION_RANGE: std::ops::RangeInclusive<f64> = -15.0..=15.0;

pub struct DesktopApp {
    state: AppState,
    editor: BorderEditor,
    tables: GradeTables,
    texture: Option<egui::TextureHandle>,
    /// 描画コールバックから立てられる変更フラグ
    changed: Rc<Cell<bool>>,
    status: String,
    loading: bool,
    load_rx: Receiver<LoadMessage>,
    load_tx: Sender<LoadMessage>,
}

impl Default for DesktopApp {
    fn default() -> Self {
        let (load_tx, load_rx) = mpsc::channel();
        let changed = Rc::new(Cell::new(false));

        let mut editor = BorderEditor::new(HitConfig::default());
        let flag = Rc::clone(&changed);
        editor.set_redraw_callback(move |_| flag.set(true));

        Self {
            state: AppState::default(),
            editor,
            tables: GradeTables::default(),
            texture: None,
            changed,
            status: String::new(),
            loading: false,
            load_rx,
            load_tx,
        }
    }
}

impl DesktopApp {
    fn open_image(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Images", IMAGE_EXTENSIONS)
            .pick_file()
        {
            self.request_load(path);
        }
    }

    fn request_load(&mut self, path: PathBuf) {
        self.spawn_load(ImageSource::File(path));
    }

    fn paste_image(&mut self) {
        self.spawn_load(ImageSource::Clipboard);
    }

    /// ファイルもクリップボードも同じ LoadMessage 経路で受け取る
    fn spawn_load(&mut self, source: ImageSource) {
        if self.loading {
            return;
        }
        self.loading = true;
        self.status = format!("Loading {source}...");
        let sender = self.load_tx.clone();

        std::thread::spawn(move || {
            let result = match &source {
                ImageSource::File(path) => decode_image(path),
                ImageSource::Clipboard => read_clipboard_image(),
            };
            let message = match result {
                Ok(image) => LoadMessage::Loaded(image),
                Err(err) => LoadMessage::Failed {
                    source,
                    message: format!("{err:#}"),
                },
            };
            let _ = sender.send(message);
        });
    }

    fn poll_messages(&mut self, ctx: &egui::Context) {
        while let Ok(msg) = self.load_rx.try_recv() {
            self.loading = false;
            match msg {
                LoadMessage::Loaded(image) => {
                    let source = image.source.clone();
                    match self.apply_loaded(ctx, image) {
                        Ok(message) => {
                            log::info!("{source}: {message}");
                            self.status = message;
                        }
                        Err(err) => self.alert_load_failed(&source, &format!("{err:#}")),
                    }
                }
                // 読み込み失敗時は表示中の画像と境界線をそのまま残す
                LoadMessage::Failed { source, message } => self.alert_load_failed(&source, &message),
            }
        }
    }

    fn alert_load_failed(&mut self, source: &ImageSource, message: &str) {
        let text = load_failure_text(source, message);
        log::warn!("{text}");
        self.status = text.clone();
        let _ = rfd::MessageDialog::new()
            .set_level(rfd::MessageLevel::Error)
            .set_title("Load failed")
            .set_description(text)
            .set_buttons(rfd::MessageButtons::Ok)
            .show();
    }

    fn apply_loaded(&mut self, ctx: &egui::Context, image: DecodedImage) -> Result<String> {
        let [width, height] = image.size;
        self.editor.load_image(width as f64, height as f64)?;

        let color_image = egui::ColorImage::from_rgba_unmultiplied(image.size, &image.pixels);
        self.texture = Some(ctx.load_texture("card", color_image, egui::TextureOptions::LINEAR));
        self.state.image = Some(image.source.clone());

        let source = &image.source;
        let Some(path) = source.path() else {
            return Ok(format!("Loaded {source} (not saved to a sidecar)"));
        };
        let message = match load_sidecar(path) {
            Ok(Some(measurement))
                if (measurement.image_width as usize, measurement.image_height as usize)
                    == (width, height) =>
            {
                self.editor.restore(&measurement)?;
                format!("Loaded {source} (saved borders)")
            }
            Ok(Some(_)) => format!("Loaded {source} (saved borders ignored: size mismatch)"),
            Ok(None) => format!("Loaded {source}"),
            Err(err) => format!("Loaded {source} (sidecar unreadable: {err:#})"),
        };

        self.changed.set(false);
        self.state.dirty = false;
        Ok(message)
    }

    fn save_measurement(&mut self) {
        let Some(path) = self.state.image_path().map(PathBuf::from) else {
            self.status = "No image loaded".to_string();
            return;
        };
        let Some(measurement) = self.editor.to_measurement(&self.state.file_name()) else {
            return;
        };
        match save_sidecar(&path, &measurement) {
            Ok(saved) => {
                self.status = format!("Saved {}", saved.display());
                self.state.dirty = false;
            }
            Err(err) => self.status = format!("Save failed: {err:#}"),
        }
    }

    fn reset(&mut self) {
        self.editor.reset();
    }

    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        let dropped = ctx.input(|i| i.raw.dropped_files.clone());
        if let Some(path) = dropped.into_iter().find_map(|f| f.path) {
            self.request_load(path);
        }
    }

    /// Ctrl/Cmd+V でクリップボード画像を読み込む
    fn handle_paste(&mut self, ctx: &egui::Context) {
        let pasted = ctx.input(|i| {
            i.events.iter().any(|e| matches!(e, egui::Event::Paste(_)))
                || (i.modifiers.command && i.key_pressed(egui::Key::V))
        });
        if pasted {
            self.paste_image();
        }
    }

    /// キャンバスへ画像・境界線・タブを描き、ポインタ入力をエディタへ渡す
    fn render_canvas(&mut self, ui: &mut egui::Ui) {
        let (response, painter) = ui.allocate_painter(ui.available_size(), egui::Sense::click_and_drag());
        let canvas = response.rect;
        painter.rect_filled(canvas, 0.0, Color32::from_gray(24));

        let Some(image) = self.editor.image().copied() else {
            painter.text(
                canvas.center(),
                egui::Align2::CENTER_CENTER,
                "Open or drop a card image",
                egui::FontId::proportional(16.0),
                Color32::from_gray(160),
            );
            return;
        };

        self.editor.fit_to_canvas(
            Size::new(canvas.width() as f64, canvas.height() as f64),
            DEFAULT_FIT_FACTOR,
        );

        let to_local = |pos: egui::Pos2| Point::new((pos.x - canvas.min.x) as f64, (pos.y - canvas.min.y) as f64);
        if response.drag_started() {
            let origin = ui.input(|i| i.pointer.press_origin()).or(response.interact_pointer_pos());
            if let Some(pos) = origin {
                self.editor.handle(PointerEvent::Down(to_local(pos)));
            }
        }
        if response.dragged() {
            if let Some(pos) = response.interact_pointer_pos() {
                if canvas.contains(pos) {
                    self.editor.handle(PointerEvent::Move(to_local(pos)));
                } else {
                    self.editor.handle(PointerEvent::Leave);
                }
            }
        }
        if response.drag_stopped() {
            self.editor.handle(PointerEvent::Up);
        }

        let borders = self.editor.borders().copied().unwrap_or(image.borders);
        let transform = self.editor.view().transform;
        let to_screen = |x: f64, y: f64| {
            let p = transform.to_canvas(Point::new(x, y));
            egui::pos2(canvas.min.x + p.x as f32, canvas.min.y + p.y as f32)
        };

        let image_rect = egui::Rect::from_min_max(to_screen(0.0, 0.0), to_screen(image.size.width, image.size.height));
        if let Some(texture) = &self.texture {
            egui::Image::new(texture)
                .rotate(self.editor.view().rotation_radians() as f32, egui::Vec2::splat(0.5))
                .paint_at(ui, image_rect);
        }

        let active = self.editor.session().active();
        let hit = *self.editor.hit_config();
        painter.extend(overlay_shapes(image.size, &borders, to_screen, &hit, active));

        if active.is_some() {
            ui.ctx().set_cursor_icon(egui::CursorIcon::Grabbing);
        }
    }

    fn render_report(&mut self, ui: &mut egui::Ui) {
        let Some(report) = self.editor.report(&self.tables) else {
            ui.label("No image loaded.");
            return;
        };
        let centering = report.centering();

        ui.group(|ui| {
            ui.label(RichText::new("Centering").strong());
            ui.label(centering.vertical_label());
            ui.label(centering.horizontal_label());
            ui.label(format!("Worst deviation: {:.1}%", report.worst_deviation));
        });

        for (name, grade) in [
            (&self.tables.psa.name, &report.psa_grade),
            (&self.tables.bgs.name, &report.bgs_grade),
        ] {
            ui.group(|ui| {
                ui.label(RichText::new(name.as_str()).strong());
                ui.label(RichText::new(&grade.label).color(severity_color(grade.severity)).size(16.0));
            });
        }

        ui.separator();
        let mut degrees = self.editor.view().rotation_degrees;
        ui.label("Rotation");
        if ui
            .add(egui::Slider::new(&mut degrees, ROTATION_RANGE).suffix("°"))
            .changed()
        {
            self.editor.set_rotation(degrees);
            self.state.dirty = true;
        }
        if ui.button("Reset").clicked() {
            self.reset();
        }
    }
}

pub fn configure_fonts(ctx: &egui::Context) {
    let mut fonts = FontDefinitions::default();
    let candidates = [
        r"C:\Windows\Fonts\meiryo.ttc",
        r"C:\Windows\Fonts\msgothic.ttc",
        "/System/Library/Fonts/Supplemental/Arial Unicode.ttf",
        "/usr/share/fonts/truetype/noto/NotoSansCJK-Regular.ttc",
        "/usr/share/fonts/opentype/noto/NotoSansCJK-Regular.ttc",
    ];

    for path in candidates {
        if let Ok(data) = std::fs::read(path) {
            fonts.font_data.insert("jp_fallback".to_string(), FontData::from_owned(data));
            fonts.families
                .entry(FontFamily::Proportional)
                .or_default()
                .insert(0, "jp_fallback".to_string());
            ctx.set_fonts(fonts);
            return;
        }
    }
}

/// カードの外周、境界線、タブの順に重ねる図形
fn overlay_shapes(
    image_size: Size,
    borders: &Borders,
    to_screen: impl Fn(f64, f64) -> egui::Pos2,
    hit: &HitConfig,
    active: Option<BorderName>,
) -> Vec<Shape> {
    let mut shapes = Vec::with_capacity(1 + BorderName::ALL.len() * 3);

    let card = egui::Rect::from_min_max(to_screen(0.0, 0.0), to_screen(image_size.width, image_size.height));
    shapes.push(Shape::rect_stroke(card, 0.0, Stroke::new(CARD_OUTLINE_WIDTH, TAB_OUTLINE)));

    for name in BorderName::ALL {
        let value = borders.get(name);
        let color = if name.is_outer() { OUTER_LINE } else { INNER_LINE };
        let width = if active == Some(name) { ACTIVE_LINE_WIDTH } else { LINE_WIDTH };
        let segment = match name.axis() {
            Axis::Vertical => [to_screen(0.0, value), to_screen(image_size.width, value)],
            Axis::Horizontal => [to_screen(value, 0.0), to_screen(value, image_size.height)],
        };
        shapes.push(Shape::line_segment(segment, Stroke::new(width, color)));
    }

    for name in BorderName::ALL {
        let tab = tab_rect(name, borders, image_size, hit);
        if tab.is_empty() {
            continue;
        }
        let rect = egui::Rect::from_min_max(
            to_screen(tab.x, tab.y),
            to_screen(tab.x + tab.width, tab.y + tab.height),
        );
        shapes.push(Shape::rect_filled(rect, 2.0, Color32::WHITE));
        shapes.push(Shape::rect_stroke(rect, 2.0, Stroke::new(1.0, TAB_OUTLINE)));
    }
    shapes
}

fn load_failure_text(source: &ImageSource, message: &str) -> String {
    format!("Load failed ({source}): {message}")
}

fn title_for(source: Option<&ImageSource>, dirty: bool) -> String {
    let name = source.map(ImageSource::file_name).unwrap_or_else(|| "-".to_string());
    if dirty { format!("{name} *") } else { name }
}

impl eframe::App for DesktopApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.loading {
            ctx.request_repaint();
        }
        self.poll_messages(ctx);
        self.handle_dropped_files(ctx);
        self.handle_paste(ctx);

        egui::TopBottomPanel::top("top").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.add_enabled(!self.loading, egui::Button::new("Open Image")).clicked() {
                        self.open_image();
                        ui.close_menu();
                    }
                    if ui.add_enabled(!self.loading, egui::Button::new("Paste Image")).clicked() {
                        self.paste_image();
                        ui.close_menu();
                    }
                    let has_file = self.state.image_path().is_some();
                    if ui.add_enabled(has_file, egui::Button::new("Save Borders")).clicked() {
                        self.save_measurement();
                        ui.close_menu();
                    }
                });

                ui.separator();
                ui.label(title_for(self.state.image.as_ref(), self.state.dirty));
                if !self.status.is_empty() {
                    ui.label(RichText::new(&self.status).color(Color32::from_gray(170)));
                }
            });
        });

        egui::SidePanel::right("report").resizable(true).show(ctx, |ui| {
            ui.heading("Grade");
            ui.separator();
            self.render_report(ui);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.render_canvas(ui);
        });

        if self.changed.take() {
            self.state.dirty = true;
            ctx.request_repaint();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_marks_dirty() {
        let source = ImageSource::File(PathBuf::from("/cards/charizard.png"));
        assert_eq!(title_for(Some(&source), false), "charizard.png");
        assert_eq!(title_for(Some(&source), true), "charizard.png *");
        assert_eq!(title_for(Some(&ImageSource::Clipboard), true), "(clipboard) *");
        assert_eq!(title_for(None, false), "-");
    }

    #[test]
    fn test_load_failure_text_names_source() {
        let source = ImageSource::File(PathBuf::from("/cards/broken.png"));
        assert_eq!(
            load_failure_text(&source, "decode error"),
            "Load failed (/cards/broken.png): decode error"
        );
        assert_eq!(
            load_failure_text(&ImageSource::Clipboard, "no image in clipboard"),
            "Load failed (clipboard): no image in clipboard"
        );
    }

    #[test]
    fn test_overlay_outlines_card_before_lines_and_tabs() {
        let size = Size::new(200.0, 300.0);
        let borders = Borders::initialize(size.width, size.height);
        let to_screen = |x: f64, y: f64| egui::pos2(10.0 + x as f32 * 0.5, 20.0 + y as f32 * 0.5);
        let shapes = overlay_shapes(size, &borders, to_screen, &HitConfig::default(), None);

        assert_eq!(shapes.len(), 1 + 8 + 16);
        match &shapes[0] {
            Shape::Rect(egui::epaint::RectShape { rect, stroke, .. }) => {
                assert_eq!(*rect, egui::Rect::from_min_max(egui::pos2(10.0, 20.0), egui::pos2(110.0, 170.0)));
                assert_eq!(stroke.color, TAB_OUTLINE);
                assert_eq!(stroke.width, CARD_OUTLINE_WIDTH);
            }
            other => panic!("expected card outline, got {other:?}"),
        }
        assert!(shapes[1..9].iter().all(|s| matches!(s, Shape::LineSegment { .. })));
    }

    #[test]
    fn test_overlay_widens_active_line() {
        let size = Size::new(200.0, 300.0);
        let borders = Borders::initialize(size.width, size.height);
        let to_screen = |x: f64, y: f64| egui::pos2(x as f32, y as f32);
        let shapes = overlay_shapes(size, &borders, to_screen, &HitConfig::default(), Some(BorderName::OuterTop));

        let index = 1 + BorderName::ALL.iter().position(|n| *n == BorderName::OuterTop).unwrap();
        match &shapes[index] {
            Shape::LineSegment { stroke, .. } => assert_eq!(stroke.width, ACTIVE_LINE_WIDTH),
            other => panic!("expected line segment, got {other:?}"),
        }
    }

    #[test]
    fn test_redraw_callback_sets_changed_flag() {
        let mut app = DesktopApp::default();
        app.editor.load_image(1000.0, 1000.0).unwrap();
        assert!(app.changed.take());

        app.editor.set_transform(Default::default());
        app.editor.handle(PointerEvent::Down(Point::new(500.0, 150.0)));
        assert_eq!(app.editor.session().active(), Some(BorderName::InnerTop));
        assert!(app.editor.handle(PointerEvent::Move(Point::new(500.0, 300.0))));
        assert!(app.changed.take());

        app.editor.handle(PointerEvent::Leave);
        assert!(!app.editor.handle(PointerEvent::Move(Point::new(500.0, 400.0))));
        assert!(!app.changed.get());
    }
}
