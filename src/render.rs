//! 境界線のオーバーレイ描画（tiny-skia）
//!
//! 外枠は青、内枠は黄の3px線。各線の中央付近に白いつまみ（濃紺の縁取り）を置く。

use card_centering_common::{tab_rect, Axis, BorderName, Borders, HitConfig, Size};
use image::{Rgba, RgbaImage};
use tiny_skia::{LineCap, Paint, PathBuilder, Pixmap, Stroke, Transform};

pub const OUTER_COLOR: Rgba<u8> = Rgba([0x31, 0x82, 0xce, 0xff]);
pub const INNER_COLOR: Rgba<u8> = Rgba([0xec, 0xc9, 0x4b, 0xff]);
pub const TAB_FILL: Rgba<u8> = Rgba([0xff, 0xff, 0xff, 0xff]);
pub const TAB_OUTLINE: Rgba<u8> = Rgba([0x2c, 0x52, 0x82, 0xff]);
pub const LINE_WIDTH: f32 = 3.0;
const TAB_OUTLINE_WIDTH: f32 = 1.0;

pub fn line_color(name: BorderName) -> Rgba<u8> {
    if name.is_outer() {
        OUTER_COLOR
    } else {
        INNER_COLOR
    }
}

/// RgbaImage を Pixmap に移して描画し、結果を書き戻す
fn with_pixmap(img: &mut RgbaImage, f: impl FnOnce(&mut Pixmap)) {
    let (w, h) = img.dimensions();
    let Some(size) = tiny_skia::IntSize::from_wh(w, h) else {
        return;
    };
    let Some(mut pixmap) = Pixmap::from_vec(img.as_raw().clone(), size) else {
        return;
    };

    f(&mut pixmap);

    img.copy_from_slice(pixmap.data());
}

fn paint_for(color: Rgba<u8>) -> Paint<'static> {
    let [r, g, b, a] = color.0;
    let mut paint = Paint::default();
    paint.set_color_rgba8(r, g, b, a);
    paint.anti_alias = true;
    paint
}

/// 8本の境界線とつまみを描き込む
pub fn draw_overlay(image: &mut RgbaImage, borders: &Borders, hit: &HitConfig) {
    let (w, h) = image.dimensions();
    let size = Size::new(w as f64, h as f64);
    if !borders.is_finite() {
        log::warn!("border values are not finite; skipping non-finite lines and all tabs");
    }

    with_pixmap(image, |pixmap| {
        let line_stroke = Stroke {
            width: LINE_WIDTH,
            line_cap: LineCap::Butt,
            ..Default::default()
        };

        for name in BorderName::ALL {
            let value = borders.get(name) as f32;
            if !value.is_finite() {
                continue;
            }
            let mut pb = PathBuilder::new();
            match name.axis() {
                Axis::Vertical => {
                    pb.move_to(0.0, value);
                    pb.line_to(w as f32, value);
                }
                Axis::Horizontal => {
                    pb.move_to(value, 0.0);
                    pb.line_to(value, h as f32);
                }
            }
            let Some(path) = pb.finish() else {
                continue;
            };
            pixmap.stroke_path(&path, &paint_for(line_color(name)), &line_stroke, Transform::identity(), None);
        }

        // つまみは線の上に重ねる
        let outline_stroke = Stroke {
            width: TAB_OUTLINE_WIDTH,
            ..Default::default()
        };
        for name in BorderName::ALL {
            let tab = tab_rect(name, borders, size, hit);
            if tab.is_empty() {
                continue;
            }
            let Some(rect) =
                tiny_skia::Rect::from_xywh(tab.x as f32, tab.y as f32, tab.width as f32, tab.height as f32)
            else {
                continue;
            };
            pixmap.fill_rect(rect, &paint_for(TAB_FILL), Transform::identity(), None);
            let path = PathBuilder::from_rect(rect);
            pixmap.stroke_path(&path, &paint_for(TAB_OUTLINE), &outline_stroke, Transform::identity(), None);
        }
    });
}
