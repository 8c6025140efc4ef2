//! # 服务层
//!
//! ## 设计思路
//!
//! `ThumbnailService` 是外壳层（CLI、未来的桌面 UI）持有的唯一入口，
//! 替代“控件之间互相调用”的耦合方式：外壳层只组装 `ThumbnailRequest`，拿回 `ThumbnailResponse`。
//!
//! ## 实现思路
//!
//! 内部持有 `ThumbnailGenerator`（默认开启只读 Logo 缓存），对外暴露少量稳定 API：
//! - `process`：执行完整生成链路
//! - `preview`：生成预览，不落盘
//! - `set_quality` / `get_quality`：切换重采样档位

use std::path::Path;

use super::{
    AssetResolver, LogoColor, LogoShape, Preview, ResizeQuality, Rgba, ThumbnailConfig,
    ThumbnailError, ThumbnailGenerator, ThumbnailRequest, ThumbnailResponse,
};

/// 缩略图服务。
pub struct ThumbnailService {
    generator: ThumbnailGenerator,
}

impl ThumbnailService {
    /// 使用默认配置与自动发现的资源目录创建服务。
    ///
    /// # 示例
    /// ```rust,no_run
    /// use thumbgen::thumbnail::{Rgba, ThumbnailRequest, ThumbnailService};
    ///
    /// let service = ThumbnailService::new();
    /// let response = service.process(&ThumbnailRequest::new("/photos/a.jpg", Rgba::new(255, 0, 0, 200)))?;
    /// println!("{}", response.output_path.display());
    /// # Ok::<(), thumbgen::thumbnail::ThumbnailError>(())
    /// ```
    pub fn new() -> Self {
        Self::with_config(ThumbnailConfig::default(), AssetResolver::discover())
    }

    /// 使用自定义配置与资源目录创建服务。
    ///
    /// 主要用于测试或打包场景注入不同资源位置。
    pub fn with_config(config: ThumbnailConfig, assets: AssetResolver) -> Self {
        Self {
            generator: ThumbnailGenerator::new(config, assets).with_logo_cache(),
        }
    }

    pub fn process(&self, request: &ThumbnailRequest) -> Result<ThumbnailResponse, ThumbnailError> {
        self.generator.generate(request)
    }

    pub fn preview(&self, request: &ThumbnailRequest) -> Result<Preview, ThumbnailError> {
        self.generator.preview(request)
    }

    pub fn set_quality(&self, quality: ResizeQuality) -> Result<(), ThumbnailError> {
        self.generator.set_quality(quality)
    }

    pub fn get_quality(&self) -> Result<ResizeQuality, ThumbnailError> {
        self.generator.get_quality()
    }

    pub fn assets(&self) -> &AssetResolver {
        self.generator.assets()
    }
}

impl Default for ThumbnailService {
    fn default() -> Self {
        Self::new()
    }
}

/// 一次性生成缩略图，不复用任何状态。
pub fn generate_thumbnail(
    source_path: impl AsRef<Path>,
    offset: i32,
    color: Rgba,
    logo_color: LogoColor,
    logo_shape: LogoShape,
    assets: &AssetResolver,
) -> Result<ThumbnailResponse, ThumbnailError> {
    let request = ThumbnailRequest::new(source_path.as_ref(), color)
        .with_offset(offset)
        .with_logo_color(logo_color)
        .with_logo_shape(logo_shape);

    ThumbnailGenerator::new(ThumbnailConfig::default(), assets.clone()).generate(&request)
}
