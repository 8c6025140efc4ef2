//! # 加载与校验模块
//!
//! ## 设计思路
//!
//! 源图片与 Logo 资源都从本地文件加载，并在“尽可能早”的阶段执行输入校验。
//! 目标是尽快失败，减少不必要内存与 CPU 消耗，且失败时不产生任何输出文件。
//!
//! ## 实现思路
//!
//! 1. 存在性检查（不存在 → `InputNotFound`）
//! 2. metadata 体积限制
//! 3. 读取字节 + 文件签名校验（非图片 → `Decode`）
//! 4. 读取 header 尺寸并按像素上限快速拒绝
//! 5. 完整解码

use image::{DynamicImage, ImageReader};
use std::io::Cursor;
use std::path::Path;

use super::{ThumbnailConfig, ThumbnailError};

/// 从本地路径加载并解码图片。
///
/// `source_hint` 仅用于日志。
pub(crate) fn load_image_file(
    path: &Path,
    config: &ThumbnailConfig,
    source_hint: &'static str,
) -> Result<DynamicImage, ThumbnailError> {
    log::info!("📁 开始读取本地图片 - 来源: {} 路径: {}", source_hint, path.display());

    if !path.is_file() {
        return Err(ThumbnailError::InputNotFound(path.display().to_string()));
    }

    let metadata = std::fs::metadata(path)
        .map_err(|e| ThumbnailError::FileAccess(format!("无法读取文件信息：{}", e)))?;

    if metadata.len() > config.max_file_size {
        return Err(ThumbnailError::ResourceLimit(format!(
            "文件过大：{:.2} MB（限制：{:.2} MB）",
            metadata.len() as f64 / 1024.0 / 1024.0,
            config.max_file_size as f64 / 1024.0 / 1024.0
        )));
    }

    let bytes = std::fs::read(path)
        .map_err(|e| ThumbnailError::FileAccess(format!("无法读取图片文件：{}", e)))?;
    validate_image_signature(&bytes)?;

    let (header_width, header_height) = inspect_dimensions_from_memory(&bytes)?;
    validate_pixel_limits(config, header_width, header_height)?;

    let decoded = image::load_from_memory(&bytes)
        .map_err(|e| ThumbnailError::Decode(format!("图片解码失败：{}", e)))?;

    log::info!(
        "✅ 图片解码成功 - 来源: {} 尺寸: {}x{}",
        source_hint,
        decoded.width(),
        decoded.height()
    );

    Ok(decoded)
}

/// 通过文件签名（magic bytes）校验输入是否为图片。
fn validate_image_signature(bytes: &[u8]) -> Result<(), ThumbnailError> {
    if bytes.is_empty() {
        return Err(ThumbnailError::Decode("图片内容为空".to_string()));
    }

    let kind = infer::get(bytes)
        .ok_or_else(|| ThumbnailError::Decode("无法识别图片类型".to_string()))?;

    if kind.matcher_type() != infer::MatcherType::Image {
        return Err(ThumbnailError::Decode(format!(
            "文件签名不是图片类型：{}",
            kind.mime_type()
        )));
    }

    Ok(())
}

/// 仅通过内存中的图片头信息读取宽高。
fn inspect_dimensions_from_memory(bytes: &[u8]) -> Result<(u32, u32), ThumbnailError> {
    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| ThumbnailError::Decode(format!("无法识别图片格式：{}", e)))?;

    reader
        .into_dimensions()
        .map_err(|e| ThumbnailError::Decode(format!("无法读取图片尺寸：{}", e)))
}

/// 校验像素数量是否超过配置上限。
pub(crate) fn validate_pixel_limits(
    config: &ThumbnailConfig,
    width: u32,
    height: u32,
) -> Result<(), ThumbnailError> {
    let pixels = u64::from(width)
        .checked_mul(u64::from(height))
        .ok_or_else(|| ThumbnailError::ResourceLimit("图片像素数溢出".to_string()))?;

    if pixels > config.max_decoded_pixels {
        return Err(ThumbnailError::ResourceLimit(format!(
            "图片像素过大：{} 像素（限制：{} 像素）",
            pixels, config.max_decoded_pixels
        )));
    }

    Ok(())
}
