//! # 请求模型与中间模型
//!
//! ## 设计思路
//!
//! 将“外壳层输入”和“流水线中间结果”解耦：
//! - `ThumbnailRequest` 是外壳层（UI / CLI）传给编排器的唯一入参
//! - `ThumbnailResponse` 是成功后的唯一出参
//! - `ResizedFrame` 表示已裁剪到画布尺寸、尚未合成的照片
//! - `RenderedThumbnail` 表示合成完毕、尚未落盘的画布
//! - `Preview` 表示缩小后的预览图

use std::path::PathBuf;

use image::{RgbImage, RgbaImage};
use serde::{Deserialize, Serialize};

use super::{Rgba, ThumbnailError};

/// Logo 颜色变体。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogoColor {
    Black,
    #[default]
    White,
}

impl LogoColor {
    /// 解析名称；未知变体直接报错，不做任何画布操作。
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(name: &str) -> Result<Self, ThumbnailError> {
        match name.trim().to_lowercase().as_str() {
            "black" => Ok(Self::Black),
            "white" => Ok(Self::White),
            other => Err(ThumbnailError::InvalidArgument(format!(
                "未知 Logo 颜色：{}（可选：black / white）",
                other
            ))),
        }
    }

    /// 解析数字编码（0 = 黑，1 = 白）。
    pub fn from_code(code: u8) -> Result<Self, ThumbnailError> {
        match code {
            0 => Ok(Self::Black),
            1 => Ok(Self::White),
            other => Err(ThumbnailError::InvalidArgument(format!(
                "未知 Logo 颜色编码：{}",
                other
            ))),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Black => "black",
            Self::White => "white",
        }
    }

    /// 资源文件名。
    pub(crate) fn asset_file_name(self) -> &'static str {
        match self {
            Self::Black => "logo_black.png",
            Self::White => "logo_white.png",
        }
    }
}

/// 横幅形状。
///
/// `Unrecognized` 承接所有未知输入，渲染时回退为 5/6 高度起的整宽矩形。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogoShape {
    #[default]
    Banner,
    Trapezoid,
    SoftTrapezoid,
    SoftRectangle,
    #[serde(other)]
    Unrecognized,
}

impl LogoShape {
    /// 解析名称，永不失败。
    pub fn parse(name: &str) -> Self {
        match name.trim().to_lowercase().replace('-', "_").as_str() {
            "banner" => Self::Banner,
            "trapezoid" => Self::Trapezoid,
            "soft_trapezoid" => Self::SoftTrapezoid,
            "soft_rectangle" => Self::SoftRectangle,
            other => {
                log::warn!("⚠️ 未知横幅形状：{}，使用默认矩形", other);
                Self::Unrecognized
            }
        }
    }

    /// 解析数字编码（0~3），其余编码视为未识别。
    pub fn from_code(code: u8) -> Self {
        match code {
            0 => Self::Banner,
            1 => Self::Trapezoid,
            2 => Self::SoftTrapezoid,
            3 => Self::SoftRectangle,
            _ => Self::Unrecognized,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Banner => "banner",
            Self::Trapezoid => "trapezoid",
            Self::SoftTrapezoid => "soft_trapezoid",
            Self::SoftRectangle => "soft_rectangle",
            Self::Unrecognized => "unrecognized",
        }
    }
}

/// 生成请求。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThumbnailRequest {
    /// 源图片路径；输出写在同一目录下。
    pub source_path: PathBuf,
    /// 纵向偏移：正数让照片上移，负数让照片下移。
    #[serde(default)]
    pub offset: i32,
    /// 横幅填充色。
    pub color: Rgba,
    #[serde(default)]
    pub logo_color: LogoColor,
    #[serde(default)]
    pub logo_shape: LogoShape,
}

impl ThumbnailRequest {
    /// 以默认偏移、白色 Logo 与整宽横幅创建请求。
    pub fn new(source_path: impl Into<PathBuf>, color: Rgba) -> Self {
        Self {
            source_path: source_path.into(),
            offset: 0,
            color,
            logo_color: LogoColor::default(),
            logo_shape: LogoShape::default(),
        }
    }

    pub fn with_offset(mut self, offset: i32) -> Self {
        self.offset = offset;
        self
    }

    pub fn with_logo_color(mut self, logo_color: LogoColor) -> Self {
        self.logo_color = logo_color;
        self
    }

    pub fn with_logo_shape(mut self, logo_shape: LogoShape) -> Self {
        self.logo_shape = logo_shape;
        self
    }
}

/// 生成结果。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ThumbnailResponse {
    pub output_path: PathBuf,
    pub width: u32,
    pub height: u32,
    /// 画面中未被照片覆盖、以底色填充的行数。
    pub padded_rows: u32,
}

/// 缩放裁剪阶段输出。
pub struct ResizedFrame {
    /// 画布尺寸的不透明图像。
    pub image: RgbImage,
    /// 裁剪窗口越界而被底色填充的行数。
    pub padded_rows: u32,
}

/// 合成阶段输出：尚未落盘的最终画布。
pub struct RenderedThumbnail {
    pub image: RgbaImage,
    pub padded_rows: u32,
}

/// 预览图：PNG 字节与可直接嵌入 webview 的 Data URL。
#[derive(Debug, Clone)]
pub struct Preview {
    pub width: u32,
    pub height: u32,
    pub png: Vec<u8>,
    pub data_url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn logo_color_rejects_unknown_names() {
        assert_eq!(LogoColor::from_str("BLACK").ok(), Some(LogoColor::Black));
        assert!(matches!(
            LogoColor::from_str("gold"),
            Err(ThumbnailError::InvalidArgument(_))
        ));
        assert!(LogoColor::from_code(2).is_err());
    }

    #[test]
    fn logo_shape_falls_back_instead_of_failing() {
        assert_eq!(LogoShape::parse("soft-trapezoid"), LogoShape::SoftTrapezoid);
        assert_eq!(LogoShape::parse("hexagon"), LogoShape::Unrecognized);
        assert_eq!(LogoShape::from_code(9), LogoShape::Unrecognized);
        assert_eq!(LogoShape::from_code(1), LogoShape::Trapezoid);
    }

    #[test]
    fn request_deserializes_with_defaults() {
        let json = r#"{
            "source_path": "/photos/a.jpg",
            "color": { "r": 0, "g": 110, "b": 79, "a": 255 }
        }"#;
        let request: ThumbnailRequest = serde_json::from_str(json).expect("parse request");
        assert_eq!(request.offset, 0);
        assert_eq!(request.logo_color, LogoColor::White);
        assert_eq!(request.logo_shape, LogoShape::Banner);
    }

    #[test]
    fn unknown_shape_deserializes_to_fallback() {
        let json = r#"{
            "source_path": "/photos/a.jpg",
            "color": { "r": 0, "g": 0, "b": 0, "a": 255 },
            "logo_shape": "hexagon"
        }"#;
        let request: ThumbnailRequest = serde_json::from_str(json).expect("parse request");
        assert_eq!(request.logo_shape, LogoShape::Unrecognized);
    }

    #[test]
    fn out_of_range_color_fails_to_deserialize() {
        let json = r#"{
            "source_path": "/photos/a.jpg",
            "color": { "r": 300, "g": 0, "b": 0, "a": 255 }
        }"#;
        assert!(serde_json::from_str::<ThumbnailRequest>(json).is_err());
    }
}
