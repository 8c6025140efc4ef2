//! # 核心编排模块
//!
//! ## 设计思路
//!
//! `ThumbnailGenerator` 只负责流程编排与配置管理，不依赖任何 UI。
//! 处理链路固定为：
//! 1. 读取配置快照
//! 2. 加载并解码源图片
//! 3. cover 缩放 + 偏移裁剪
//! 4. 贴到白色画布（直接覆盖）
//! 5. 合成横幅（alpha）
//! 6. 合成 Logo（alpha）
//! 7. 编码 PNG，经临时文件原子替换到 `<源目录>/thumbnail.png`
//!
//! ## 实现思路
//!
//! - 配置通过 `Arc<RwLock<ThumbnailConfig>>` 支持运行时切换质量档位。
//! - 单次请求内使用“同一配置快照”，避免处理中途配置漂移。
//! - 记录 `load/resize/banner/logo/save/total` 阶段耗时，便于性能诊断。
//! - 错误原样向上传播，编排器不吞错、不重试。

use std::io::{BufWriter, Cursor, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use std::time::Instant;

use base64::{Engine as _, engine::general_purpose};
use image::{DynamicImage, ImageFormat, RgbImage, RgbaImage, imageops};

use super::banner::render_banner;
use super::config::{CANVAS_HEIGHT, CANVAS_WIDTH};
use super::loader::load_image_file;
use super::logo::{AssetResolver, LogoCache, load_logo, paste_logo};
use super::resizer::resize_cover;
use super::source::{Preview, RenderedThumbnail};
use super::{
    ResizeQuality, ThumbnailConfig, ThumbnailError, ThumbnailRequest, ThumbnailResponse,
};

/// 缩略图生成器。
///
/// 持有配置、资源解析器与可选的 Logo 缓存，可跨线程共享。
pub struct ThumbnailGenerator {
    config: Arc<RwLock<ThumbnailConfig>>,
    assets: AssetResolver,
    logo_cache: Option<LogoCache>,
}

impl ThumbnailGenerator {
    /// 根据配置与资源目录创建生成器。每次请求都重新读取 Logo。
    ///
    /// # 示例
    /// ```rust,no_run
    /// use thumbgen::thumbnail::{AssetResolver, Rgba, ThumbnailConfig, ThumbnailGenerator, ThumbnailRequest};
    ///
    /// let generator = ThumbnailGenerator::new(ThumbnailConfig::default(), AssetResolver::new("assets"));
    /// let request = ThumbnailRequest::new("/photos/trip.jpg", Rgba::new(0, 110, 79, 255));
    /// let response = generator.generate(&request)?;
    /// assert_eq!((response.width, response.height), (1920, 1080));
    /// # Ok::<(), thumbgen::thumbnail::ThumbnailError>(())
    /// ```
    pub fn new(config: ThumbnailConfig, assets: AssetResolver) -> Self {
        Self {
            config: Arc::new(RwLock::new(config)),
            assets,
            logo_cache: None,
        }
    }

    /// 启用 Logo 只读缓存：每个颜色变体最多解码一次。
    pub fn with_logo_cache(mut self) -> Self {
        self.logo_cache = Some(LogoCache::new());
        self
    }

    pub fn assets(&self) -> &AssetResolver {
        &self.assets
    }

    /// 获取配置快照。
    ///
    /// 作用：保证单次请求链路使用一致参数。
    pub fn config_snapshot(&self) -> Result<ThumbnailConfig, ThumbnailError> {
        self.config
            .read()
            .map(|cfg| cfg.clone())
            .map_err(|_| ThumbnailError::ResourceLimit("配置读取锁已中毒".to_string()))
    }

    /// 切换重采样质量档位。
    pub fn set_quality(&self, quality: ResizeQuality) -> Result<(), ThumbnailError> {
        let mut config = self
            .config
            .write()
            .map_err(|_| ThumbnailError::ResourceLimit("配置写入锁已中毒".to_string()))?;
        config.apply_quality(quality);

        log::info!("⚙️ 已切换重采样档位：{:?}（filter={:?}）", quality, config.resize_filter);
        Ok(())
    }

    /// 获取当前生效档位。
    pub fn get_quality(&self) -> Result<ResizeQuality, ThumbnailError> {
        Ok(self.config_snapshot()?.infer_quality())
    }

    /// 执行加载到 Logo 合成的全部步骤，不写任何文件。
    pub fn render(&self, request: &ThumbnailRequest) -> Result<RenderedThumbnail, ThumbnailError> {
        let config = self.config_snapshot()?;
        let (rendered, _) = self.render_with_config(request, &config)?;
        Ok(rendered)
    }

    /// 完整流程：合成后写入 `<源目录>/thumbnail.png`。
    pub fn generate(&self, request: &ThumbnailRequest) -> Result<ThumbnailResponse, ThumbnailError> {
        let config = self.config_snapshot()?;
        let total_start = Instant::now();

        let (rendered, timings) = self.render_with_config(request, &config)?;

        let save_start = Instant::now();
        let output_path = output_path_for(&request.source_path, &config);
        save_png_atomically(&rendered.image, &output_path)?;
        let save_elapsed = save_start.elapsed();

        log::info!(
            "✅ 缩略图生成完成 - load={}ms resize={}ms banner={}ms logo={}ms save={}ms total={}ms 输出: {}",
            timings.load_ms,
            timings.resize_ms,
            timings.banner_ms,
            timings.logo_ms,
            save_elapsed.as_millis(),
            total_start.elapsed().as_millis(),
            output_path.display()
        );

        Ok(ThumbnailResponse {
            output_path,
            width: rendered.image.width(),
            height: rendered.image.height(),
            padded_rows: rendered.padded_rows,
        })
    }

    /// 合成后缩小到预览尺寸，返回 PNG 与 Data URL，不落盘。
    pub fn preview(&self, request: &ThumbnailRequest) -> Result<Preview, ThumbnailError> {
        let config = self.config_snapshot()?;
        let (rendered, _) = self.render_with_config(request, &config)?;

        let small = DynamicImage::ImageRgba8(rendered.image).resize(
            config.preview_max_width,
            config.preview_max_height,
            config.resize_filter,
        );

        let mut cursor = Cursor::new(Vec::new());
        small
            .write_to(&mut cursor, ImageFormat::Png)
            .map_err(|e| ThumbnailError::FileAccess(format!("预览编码失败：{}", e)))?;
        let png = cursor.into_inner();
        let data_url = format!("data:image/png;base64,{}", general_purpose::STANDARD.encode(&png));

        Ok(Preview {
            width: small.width(),
            height: small.height(),
            png,
            data_url,
        })
    }

    fn render_with_config(
        &self,
        request: &ThumbnailRequest,
        config: &ThumbnailConfig,
    ) -> Result<(RenderedThumbnail, StageTimings), ThumbnailError> {
        let load_start = Instant::now();
        let source = load_image_file(&request.source_path, config, "source")?;
        let load_ms = load_start.elapsed().as_millis();

        let resize_start = Instant::now();
        let frame = resize_cover(&source, request.offset, config)?;
        drop(source);
        let mut canvas = RgbImage::from_pixel(CANVAS_WIDTH, CANVAS_HEIGHT, config.background);
        imageops::replace(&mut canvas, &frame.image, 0, 0);
        let resize_ms = resize_start.elapsed().as_millis();

        let banner_start = Instant::now();
        let mut canvas = render_banner(canvas, request.color, request.logo_shape, config);
        let banner_ms = banner_start.elapsed().as_millis();

        let logo_start = Instant::now();
        self.composite_logo(&mut canvas, request, config)?;
        let logo_ms = logo_start.elapsed().as_millis();

        Ok((
            RenderedThumbnail {
                image: canvas,
                padded_rows: frame.padded_rows,
            },
            StageTimings {
                load_ms,
                resize_ms,
                banner_ms,
                logo_ms,
            },
        ))
    }

    fn composite_logo(
        &self,
        canvas: &mut RgbaImage,
        request: &ThumbnailRequest,
        config: &ThumbnailConfig,
    ) -> Result<(), ThumbnailError> {
        match &self.logo_cache {
            Some(cache) => {
                let logo = cache.get_or_load(&self.assets, request.logo_color, config)?;
                paste_logo(canvas, &logo, config);
            }
            None => {
                let logo = load_logo(&self.assets, request.logo_color, config)?;
                paste_logo(canvas, &logo, config);
            }
        }
        Ok(())
    }
}

struct StageTimings {
    load_ms: u128,
    resize_ms: u128,
    banner_ms: u128,
    logo_ms: u128,
}

/// 输出路径固定为源图片所在目录下的配置文件名。
pub fn output_path_for(source_path: &Path, config: &ThumbnailConfig) -> PathBuf {
    let parent = source_path
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    parent.join(&config.output_file_name)
}

/// 先写同目录临时文件，再原子替换目标文件。失败时不留下半成品。
fn save_png_atomically(image: &RgbaImage, output_path: &Path) -> Result<(), ThumbnailError> {
    let dir = output_path
        .parent()
        .ok_or_else(|| ThumbnailError::FileAccess(format!("输出路径无效：{}", output_path.display())))?;

    let mut temp = tempfile::Builder::new()
        .prefix(".thumbnail-")
        .suffix(".png.tmp")
        .tempfile_in(dir)
        .map_err(|e| ThumbnailError::FileAccess(format!("无法在 {} 创建临时文件：{}", dir.display(), e)))?;

    {
        let mut writer = BufWriter::new(temp.as_file_mut());
        image
            .write_to(&mut writer, ImageFormat::Png)
            .map_err(|e| ThumbnailError::FileAccess(format!("PNG 编码失败：{}", e)))?;
        writer
            .flush()
            .map_err(|e| ThumbnailError::FileAccess(format!("写入临时文件失败：{}", e)))?;
    }

    temp.persist(output_path).map_err(|e| {
        ThumbnailError::FileAccess(format!("保存 {} 失败：{}", output_path.display(), e.error))
    })?;

    log::info!("💾 已保存缩略图：{}", output_path.display());
    Ok(())
}
