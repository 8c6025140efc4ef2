//! # 缩略图生成模块（thumbnail）
//!
//! ## 设计思路
//!
//! 该模块将“源图加载 → cover 缩放裁剪 → 白底画布 → 横幅合成 → Logo 合成 → 落盘”
//! 按职责拆分为多个子模块，避免单文件膨胀与耦合。
//!
//! - `service`：外壳层入口（请求 / 响应模型）
//! - `handler`：编排整条处理流水线
//! - `loader`：本地文件加载与安全校验
//! - `resizer`：cover 缩放与偏移裁剪
//! - `banner`：横幅形状几何与光栅化
//! - `logo`：资源目录解析、Logo 缩放与缓存
//! - `composite`：alpha 合成原语
//! - `color/config/error/source`：颜色、配置、错误、中间数据模型
//!
//! ## 新同事快速上手
//!
//! ```text
//! 外壳层（CLI / UI）
//!    ↓ ThumbnailRequest
//! service.rs（持有生成器 + Logo 缓存）
//!    ↓
//! handler.rs（统一编排 + 阶段耗时日志）
//!    ├─ loader.rs（存在性 / 体积 / 签名 / 像素上限）
//!    ├─ resizer.rs（cover 缩放 + 偏移裁剪 + 越界填充）
//!    ├─ banner.rs（形状图层 → alpha 合成）
//!    └─ logo.rs（资源解析 → 缩放 → alpha 合成）
//!    ↓
//! <源目录>/thumbnail.png + ThumbnailResponse
//! ```
//!
//! ## 分层职责建议
//!
//! - 版式常量（横幅高度、圆角、Logo 位置）优先改 `config.rs`
//! - 新增横幅形状改 `source.rs` 的 `LogoShape` 与 `banner.rs` 的 `shape_parts`
//! - 流程顺序变更优先改 `handler.rs`

mod banner;
mod color;
mod composite;
mod config;
mod error;
mod handler;
mod loader;
mod logo;
mod resizer;
mod service;
mod source;

pub use banner::{ShapePart, apply_banner, render_banner, render_shape_layer, shape_parts};
pub use color::{Rgba, hex_to_rgb, opacity_to_alpha};
pub use composite::{alpha_composite, blend_pixel};
pub use config::{CANVAS_HEIGHT, CANVAS_WIDTH, ResizeQuality, ThumbnailConfig};
pub use error::ThumbnailError;
pub use handler::{ThumbnailGenerator, output_path_for};
pub use logo::{AssetResolver, LogoCache, apply_logo, load_logo, paste_logo, scale_to_height};
pub use resizer::{crop_window_top, resize_cover, scaled_size};
pub use service::{ThumbnailService, generate_thumbnail};
pub use source::{
    LogoColor, LogoShape, Preview, RenderedThumbnail, ResizedFrame, ThumbnailRequest,
    ThumbnailResponse,
};
