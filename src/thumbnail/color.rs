//! # 颜色工具
//!
//! HEX 与 RGBA 的互相转换，以及不透明度百分比与 alpha 的换算。
//! 通道值用 `u8` 存储，越界值只能在构造阶段出现，并在那里被拒绝。

use serde::{Deserialize, Serialize};

use super::ThumbnailError;

/// 横幅填充色（R, G, B, A）。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// 从任意整数通道构造，越界直接拒绝而不是截断。
    pub fn from_channels(r: i64, g: i64, b: i64, a: i64) -> Result<Self, ThumbnailError> {
        let channel = |name: &str, value: i64| {
            u8::try_from(value).map_err(|_| {
                ThumbnailError::InvalidArgument(format!(
                    "颜色通道 {} 超出范围：{}（应在 0~255 之间）",
                    name, value
                ))
            })
        };

        Ok(Self {
            r: channel("R", r)?,
            g: channel("G", g)?,
            b: channel("B", b)?,
            a: channel("A", a)?,
        })
    }

    /// 解析 `R,G,B,A` 形式的字符串。
    pub fn parse_csv(text: &str) -> Result<Self, ThumbnailError> {
        let parts = text
            .split(',')
            .map(|part| {
                part.trim().parse::<i64>().map_err(|_| {
                    ThumbnailError::InvalidArgument(format!("颜色通道不是整数：{}", part.trim()))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        match parts.as_slice() {
            [r, g, b, a] => Self::from_channels(*r, *g, *b, *a),
            _ => Err(ThumbnailError::InvalidArgument(format!(
                "颜色需要 4 个通道（R,G,B,A），实际：{}",
                parts.len()
            ))),
        }
    }

    /// 由 HEX（`RRGGBB`，可带 `#`）与不透明度百分比构造。
    ///
    /// 空字符串视为黑色；alpha 按 `floor(opacity / 100 * 255)` 计算。
    ///
    /// # 示例
    /// ```rust
    /// use thumbgen::thumbnail::Rgba;
    ///
    /// let color = Rgba::from_hex("006E4F", 100)?;
    /// assert_eq!(color, Rgba::new(0, 110, 79, 255));
    /// # Ok::<(), thumbgen::thumbnail::ThumbnailError>(())
    /// ```
    pub fn from_hex(hex: &str, opacity_percent: u8) -> Result<Self, ThumbnailError> {
        let (r, g, b) = hex_to_rgb(hex)?;
        Ok(Self::new(r, g, b, opacity_to_alpha(opacity_percent)?))
    }

    /// 输出大写 HEX（不含 `#`，不含 alpha）。
    pub fn to_hex(&self) -> String {
        format!("{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    pub fn is_transparent(&self) -> bool {
        self.a == 0
    }

    pub fn to_image_rgba(self) -> image::Rgba<u8> {
        image::Rgba([self.r, self.g, self.b, self.a])
    }
}

/// HEX 转 RGB。
pub fn hex_to_rgb(hex: &str) -> Result<(u8, u8, u8), ThumbnailError> {
    let hex = hex.trim().trim_start_matches('#');
    if hex.is_empty() {
        return Ok((0, 0, 0));
    }

    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(ThumbnailError::InvalidArgument(format!(
            "HEX 颜色格式错误：{}（应为 6 位十六进制）",
            hex
        )));
    }

    let channel = |range: std::ops::Range<usize>| {
        u8::from_str_radix(&hex[range], 16)
            .map_err(|e| ThumbnailError::InvalidArgument(format!("HEX 颜色解析失败：{}", e)))
    };

    Ok((channel(0..2)?, channel(2..4)?, channel(4..6)?))
}

/// 不透明度百分比（0~100）转 alpha。
pub fn opacity_to_alpha(opacity_percent: u8) -> Result<u8, ThumbnailError> {
    if opacity_percent > 100 {
        return Err(ThumbnailError::InvalidArgument(format!(
            "不透明度超出范围：{}（应在 0~100 之间）",
            opacity_percent
        )));
    }

    Ok((u32::from(opacity_percent) * 255 / 100) as u8)
}
