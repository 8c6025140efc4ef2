//! # 缩放裁剪模块
//!
//! ## 设计思路
//!
//! 采用 cover 语义：先按宽高比把较短边缩放到画布尺寸，较长边自然溢出，
//! 再按偏移量截取 1920x1080 窗口。画面内部永远不会出现 letterbox。
//!
//! ## 实现思路
//!
//! 1. 用整数交叉相乘比较宽高比，16:9 源图恰好映射到 1920x1080
//! 2. 缩放前后都做像素上限检查
//! 3. `fast_image_resize` 卷积缩放，失败时回退 `image::resize_exact`
//! 4. 窗口越界部分用画布底色填充，并记录填充行数

use fast_image_resize as fr;
use image::imageops::{self, FilterType};
use image::{DynamicImage, ImageBuffer, Rgb, RgbImage};

use super::config::{CANVAS_HEIGHT, CANVAS_WIDTH};
use super::loader::validate_pixel_limits;
use super::source::ResizedFrame;
use super::{ThumbnailConfig, ThumbnailError};

/// 计算 cover 缩放后的尺寸。
///
/// 源图比 16:9 更宽时高度对齐 1080，否则宽度对齐 1920。
///
/// 极端长条图的缩放边长超出 `u32` 时返回 `ResourceLimit`。
pub fn scaled_size(width: u32, height: u32) -> Result<(u32, u32), ThumbnailError> {
    if width == 0 || height == 0 {
        return Err(ThumbnailError::Decode(format!("图片尺寸无效：{}x{}", width, height)));
    }

    let (w, h) = (u64::from(width), u64::from(height));
    let (cw, ch) = (u64::from(CANVAS_WIDTH), u64::from(CANVAS_HEIGHT));

    let to_edge = |value: u64| {
        u32::try_from(value).map_err(|_| {
            ThumbnailError::ResourceLimit(format!(
                "缩放后边长溢出：源图 {}x{} 需要 {} 像素",
                width, height, value
            ))
        })
    };

    if w * ch > h * cw {
        Ok((to_edge(ch * w / h)?, CANVAS_HEIGHT))
    } else {
        Ok((CANVAS_WIDTH, to_edge(cw * h / w)?))
    }
}

/// 裁剪窗口在缩放图中的顶边 y 坐标。
///
/// 窗口中心为 `floor((1080 + offset) / 2)`，顶边 = 中心 − 540。
pub fn crop_window_top(offset_y: i32) -> i64 {
    let height = i64::from(CANVAS_HEIGHT);
    (height + i64::from(offset_y)).div_euclid(2) - height / 2
}

/// 窗口 `[top, top + 1080)` 与缩放图 `[0, scaled_height)` 不重叠的行数。
fn padded_rows(top: i64, scaled_height: u32) -> u32 {
    let window_end = top + i64::from(CANVAS_HEIGHT);
    let covered = window_end.min(i64::from(scaled_height)) - top.max(0);
    CANVAS_HEIGHT - covered.clamp(0, i64::from(CANVAS_HEIGHT)) as u32
}

/// 将源图缩放并裁剪为画布尺寸的不透明图像。
pub fn resize_cover(
    image: &DynamicImage,
    offset_y: i32,
    config: &ThumbnailConfig,
) -> Result<ResizedFrame, ThumbnailError> {
    let (width, height) = (image.width(), image.height());
    let (target_width, target_height) = scaled_size(width, height)?;
    validate_pixel_limits(config, width, height)?;
    validate_pixel_limits(config, target_width, target_height)?;

    log::info!(
        "🧩 cover 缩放：{}x{} -> {}x{}（offset={}, filter={:?}）",
        width,
        height,
        target_width,
        target_height,
        offset_y,
        config.resize_filter
    );

    let rgb = image.to_rgb8();
    let scaled = if (target_width, target_height) == (width, height) {
        rgb
    } else {
        match resize_with_fast_image_resize(&rgb, target_width, target_height, config.resize_filter) {
            Ok(resized) => resized,
            Err(err) => {
                log::warn!("⚠️ fast_image_resize 缩放失败，回退 image::resize_exact：{}", err);
                imageops::resize(&rgb, target_width, target_height, config.resize_filter)
            }
        }
    };

    let top = crop_window_top(offset_y);
    let padded_rows = padded_rows(top, scaled.height());
    if padded_rows > 0 {
        log::warn!(
            "⚠️ 裁剪窗口越界：top={} 缩放高度={}，{} 行以底色填充",
            top,
            scaled.height(),
            padded_rows
        );
    }

    let mut frame = RgbImage::from_pixel(CANVAS_WIDTH, CANVAS_HEIGHT, config.background);
    imageops::replace(&mut frame, &scaled, 0, -top);

    Ok(ResizedFrame {
        image: frame,
        padded_rows,
    })
}

fn resize_with_fast_image_resize(
    src: &RgbImage,
    target_width: u32,
    target_height: u32,
    filter: FilterType,
) -> Result<RgbImage, ThumbnailError> {
    let (src_width, src_height) = src.dimensions();

    // 借用源缓冲，失败回退时无需整图拷贝
    let src_image = fr::images::ImageRef::new(
        src_width,
        src_height,
        src.as_raw(),
        fr::PixelType::U8x3,
    )
    .map_err(|e| ThumbnailError::Decode(format!("构建源图像缓冲失败：{}", e)))?;

    let mut dst_image = fr::images::Image::new(target_width, target_height, fr::PixelType::U8x3);

    let mut resizer = fr::Resizer::new();
    let options = fr::ResizeOptions::new()
        .resize_alg(fr::ResizeAlg::Convolution(to_fast_filter(filter)));

    resizer
        .resize(&src_image, &mut dst_image, Some(&options))
        .map_err(|e| ThumbnailError::Decode(format!("fast_image_resize 执行失败：{}", e)))?;

    ImageBuffer::<Rgb<u8>, Vec<u8>>::from_raw(target_width, target_height, dst_image.into_vec())
        .ok_or_else(|| ThumbnailError::Decode("fast_image_resize 输出缓冲长度异常".to_string()))
}

pub(crate) fn to_fast_filter(filter: FilterType) -> fr::FilterType {
    match filter {
        FilterType::Nearest => fr::FilterType::Box,
        FilterType::Triangle => fr::FilterType::Bilinear,
        FilterType::CatmullRom => fr::FilterType::CatmullRom,
        FilterType::Gaussian => fr::FilterType::Mitchell,
        FilterType::Lanczos3 => fr::FilterType::Lanczos3,
    }
}
