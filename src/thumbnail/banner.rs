//! # 横幅渲染模块
//!
//! ## 设计思路
//!
//! 形状是封闭集合，几何与光栅化分开：
//! - `shape_parts` 只负责把 `LogoShape` 翻译成若干几何图元（矩形 / 圆角矩形 / 多边形）
//! - `render_shape_layer` 用 `tiny_skia` 把图元光栅化为覆盖率，再染成填充色得到透明图层
//! - `apply_banner` 将图层以 alpha 合成到画布，绝不直接覆盖
//!
//! ## 实现思路
//!
//! 覆盖率用不透明白色绘制到 `Pixmap`，只取 alpha 通道，多个图元重叠处不会重复叠色。
//! 斜边与圆角开启抗锯齿。
//! 图层像素 = 填充色 RGB + `填充 alpha × 覆盖率`，完全覆盖处与填充色逐像素一致。

use image::{Rgba as ImageRgba, RgbImage, RgbaImage};
use tiny_skia::{FillRule, Paint, PathBuilder, Pixmap, Rect, Transform};

use super::composite::alpha_composite;
use super::config::CANVAS_HEIGHT;
use super::{LogoShape, Rgba, ThumbnailConfig};

/// 几何图元，坐标为画布像素坐标。
#[derive(Debug, Clone, PartialEq)]
pub enum ShapePart {
    Rect { left: f32, top: f32, right: f32, bottom: f32 },
    RoundedRect { left: f32, top: f32, right: f32, bottom: f32, radius: f32 },
    Polygon(Vec<(f32, f32)>),
}

/// 将形状翻译为图元列表。
///
/// `canvas_width` / `canvas_height` 仅影响整宽矩形与回退矩形。
pub fn shape_parts(
    shape: LogoShape,
    canvas_width: u32,
    canvas_height: u32,
    config: &ThumbnailConfig,
) -> Vec<ShapePart> {
    let width = canvas_width as f32;
    let bottom = CANVAS_HEIGHT as f32;
    let top = bottom - config.banner_height as f32;
    let radius = config.corner_radius;
    let top_right = config.banner_top_right_x;

    let rounded_left_block = || {
        vec![
            ShapePart::RoundedRect { left: 0.0, top, right: top_right, bottom, radius },
            // 左侧两个角补成直角
            ShapePart::Rect { left: 0.0, top, right: radius, bottom },
            // 右下角补成直角
            ShapePart::Rect {
                left: top_right - radius,
                top: bottom - radius,
                right: top_right,
                bottom,
            },
        ]
    };

    match shape {
        LogoShape::Banner => vec![ShapePart::Rect { left: 0.0, top, right: width, bottom }],
        LogoShape::Trapezoid => vec![ShapePart::Polygon(vec![
            (0.0, top),
            (0.0, bottom),
            (config.banner_bottom_right_x, bottom),
            (top_right, top),
        ])],
        LogoShape::SoftTrapezoid => {
            let sqrt13 = 13f32.sqrt();
            let x = top_right - radius + 3.0 / sqrt13 * radius;
            let y = top + radius - 2.0 / sqrt13 * radius;

            let mut parts = rounded_left_block();
            parts.push(ShapePart::Polygon(vec![
                (x, bottom),
                (config.banner_bottom_right_x, bottom),
                (x, y),
            ]));
            parts
        }
        LogoShape::SoftRectangle => rounded_left_block(),
        LogoShape::Unrecognized => {
            let canvas_height = canvas_height as f32;
            vec![ShapePart::Rect {
                left: 0.0,
                top: canvas_height * 5.0 / 6.0,
                right: width,
                bottom: canvas_height,
            }]
        }
    }
}

fn build_path(part: &ShapePart) -> Option<tiny_skia::Path> {
    match part {
        ShapePart::Rect { left, top, right, bottom } => {
            Rect::from_ltrb(*left, *top, *right, *bottom).map(PathBuilder::from_rect)
        }
        ShapePart::RoundedRect { left, top, right, bottom, radius } => {
            let radius = radius.min((right - left) / 2.0).min((bottom - top) / 2.0).max(0.0);
            // 圆弧的三次贝塞尔近似常数
            let k = radius * 0.552_284_8;

            let mut builder = PathBuilder::new();
            builder.move_to(left + radius, *top);
            builder.line_to(right - radius, *top);
            builder.cubic_to(right - radius + k, *top, *right, top + radius - k, *right, top + radius);
            builder.line_to(*right, bottom - radius);
            builder.cubic_to(*right, bottom - radius + k, right - radius + k, *bottom, right - radius, *bottom);
            builder.line_to(left + radius, *bottom);
            builder.cubic_to(left + radius - k, *bottom, *left, bottom - radius + k, *left, bottom - radius);
            builder.line_to(*left, top + radius);
            builder.cubic_to(*left, top + radius - k, left + radius - k, *top, left + radius, *top);
            builder.close();
            builder.finish()
        }
        ShapePart::Polygon(points) => {
            let (first, rest) = points.split_first()?;
            let mut builder = PathBuilder::new();
            builder.move_to(first.0, first.1);
            for (x, y) in rest {
                builder.line_to(*x, *y);
            }
            builder.close();
            builder.finish()
        }
    }
}

/// 光栅化形状，得到与画布同尺寸的透明图层。
pub fn render_shape_layer(
    shape: LogoShape,
    color: Rgba,
    width: u32,
    height: u32,
    config: &ThumbnailConfig,
) -> RgbaImage {
    let mut layer = RgbaImage::new(width, height);

    let Some(mut pixmap) = Pixmap::new(width, height) else {
        log::warn!("⚠️ 无法创建 {}x{} 的横幅图层，跳过绘制", width, height);
        return layer;
    };

    let mut paint = Paint::default();
    paint.set_color_rgba8(255, 255, 255, 255);

    for part in shape_parts(shape, width, height, config) {
        // 轴对齐矩形落在整数像素边界上，关掉抗锯齿保证边缘精确
        paint.anti_alias = !matches!(part, ShapePart::Rect { .. });
        match build_path(&part) {
            Some(path) => {
                pixmap.fill_path(&path, &paint, FillRule::Winding, Transform::identity(), None);
            }
            None => log::debug!("跳过退化图元：{:?}", part),
        }
    }

    for (pixel, coverage) in layer.pixels_mut().zip(pixmap.data().chunks_exact(4)) {
        let coverage = u32::from(coverage[3]);
        if coverage == 0 {
            continue;
        }
        let alpha = (u32::from(color.a) * coverage + 127) / 255;
        *pixel = ImageRgba([color.r, color.g, color.b, alpha as u8]);
    }

    layer
}

/// 在 RGBA 画布上原地合成横幅。
pub fn apply_banner(canvas: &mut RgbaImage, color: Rgba, shape: LogoShape, config: &ThumbnailConfig) {
    if color.is_transparent() {
        log::debug!("🎨 横幅颜色完全透明，画布保持不变");
        return;
    }

    let layer = render_shape_layer(shape, color, canvas.width(), canvas.height(), config);
    alpha_composite(canvas, &layer, 0, 0);

    log::info!("🎨 横幅已合成 - 形状: {} 颜色: #{} alpha={}", shape.as_str(), color.to_hex(), color.a);
}

/// 将不透明画布转为 RGBA 并合成横幅。
pub fn render_banner(canvas: RgbImage, color: Rgba, shape: LogoShape, config: &ThumbnailConfig) -> RgbaImage {
    let mut rgba = image::DynamicImage::ImageRgb8(canvas).into_rgba8();
    apply_banner(&mut rgba, color, shape, config);
    rgba
}
