//! # 配置模块
//!
//! ## 设计思路
//!
//! 将画布尺寸、横幅几何、Logo 摆放、资源上限与重采样策略集中到 `ThumbnailConfig`。
//! 画布尺寸固定为 1920x1080，不提供修改入口；其余参数保持可观测、可测试。
//! 重采样质量档位（quality / balanced / speed）作为高层语义，映射到底层滤镜。
//!
//! ## 实现思路
//!
//! - `Default` 提供生产可用的平衡配置。
//! - `ResizeQuality` 负责档位字符串解析与反向输出。
//! - `apply_quality` 将档位转换为具体滤镜。
//! - `infer_quality` 用于从当前配置反推档位（给外壳层展示状态）。

use image::imageops::FilterType;
use image::Rgb;

use super::ThumbnailError;

/// 输出画布宽度（像素）。
pub const CANVAS_WIDTH: u32 = 1920;
/// 输出画布高度（像素）。
pub const CANVAS_HEIGHT: u32 = 1080;

/// 缩略图生成配置。
///
/// 画布尺寸是常量，不在此结构内；这里只放可调策略与版式常量。
#[derive(Debug, Clone)]
pub struct ThumbnailConfig {
    /// 画布底色，同时用作裁剪窗口越界时的填充色。
    pub background: Rgb<u8>,
    /// 横幅高度（自底部向上）。
    pub banner_height: u32,
    /// 梯形类横幅的上边右端 x 坐标。
    pub banner_top_right_x: f32,
    /// 梯形横幅的下边右端 x 坐标。
    pub banner_bottom_right_x: f32,
    /// 圆角半径。
    pub corner_radius: f32,
    /// Logo 缩放后的高度。
    pub logo_height: u32,
    /// Logo 左边距。
    pub logo_margin_left: u32,
    /// Logo 下边距。
    pub logo_margin_bottom: u32,
    /// 源文件允许的最大体积（字节）。
    pub max_file_size: u64,
    /// 解码后与缩放后的像素上限（`width * height`）。
    pub max_decoded_pixels: u64,
    /// 重采样滤镜策略。
    pub resize_filter: FilterType,
    /// 输出文件名，写在源图片所在目录。
    pub output_file_name: String,
    /// 预览图最大宽度。
    pub preview_max_width: u32,
    /// 预览图最大高度。
    pub preview_max_height: u32,
}

impl Default for ThumbnailConfig {
    fn default() -> Self {
        Self {
            background: Rgb([255, 255, 255]),
            banner_height: 180,
            banner_top_right_x: 720.0,
            banner_bottom_right_x: 840.0,
            corner_radius: 45.0,
            logo_height: 120,
            logo_margin_left: 75,
            logo_margin_bottom: 30,
            max_file_size: 50 * 1024 * 1024,
            max_decoded_pixels: 120_000_000,
            resize_filter: FilterType::Triangle,
            output_file_name: "thumbnail.png".to_string(),
            preview_max_width: 480,
            preview_max_height: 270,
        }
    }
}

/// 重采样质量档位（面向用户语义）。
///
/// - `Quality`：尽量保真
/// - `Balanced`：质量与速度平衡
/// - `Speed`：优先速度
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeQuality {
    Quality,
    Balanced,
    Speed,
}

impl ResizeQuality {
    /// 从外部字符串解析档位。
    ///
    /// # 示例
    /// ```rust
    /// use thumbgen::thumbnail::ResizeQuality;
    ///
    /// let q = ResizeQuality::from_str("balanced")?;
    /// assert_eq!(q.as_str(), "balanced");
    /// # Ok::<(), thumbgen::thumbnail::ThumbnailError>(())
    /// ```
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(quality: &str) -> Result<Self, ThumbnailError> {
        match quality.trim().to_lowercase().as_str() {
            "quality" => Ok(Self::Quality),
            "balanced" => Ok(Self::Balanced),
            "speed" => Ok(Self::Speed),
            other => Err(ThumbnailError::InvalidArgument(format!(
                "未知质量档位：{}（可选：quality / balanced / speed）",
                other
            ))),
        }
    }

    /// 将档位输出为稳定字符串。
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Quality => "quality",
            Self::Balanced => "balanced",
            Self::Speed => "speed",
        }
    }
}

impl ThumbnailConfig {
    /// Logo 左上角坐标：`(75, 1080 - 120 - 30)`。
    pub fn logo_origin(&self) -> (u32, u32) {
        (
            self.logo_margin_left,
            CANVAS_HEIGHT.saturating_sub(self.logo_height + self.logo_margin_bottom),
        )
    }

    /// 基于当前滤镜反推质量档位。
    pub fn infer_quality(&self) -> ResizeQuality {
        match self.resize_filter {
            FilterType::Lanczos3 | FilterType::CatmullRom => ResizeQuality::Quality,
            FilterType::Nearest => ResizeQuality::Speed,
            FilterType::Triangle | FilterType::Gaussian => ResizeQuality::Balanced,
        }
    }

    /// 应用指定质量档位到实际滤镜。
    pub fn apply_quality(&mut self, quality: ResizeQuality) {
        self.resize_filter = match quality {
            ResizeQuality::Quality => FilterType::Lanczos3,
            ResizeQuality::Balanced => FilterType::Triangle,
            ResizeQuality::Speed => FilterType::Nearest,
        };
    }
}
