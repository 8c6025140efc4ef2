//! # Logo 合成模块
//!
//! ## 设计思路
//!
//! Logo 资源的位置由外部注入的 `AssetResolver` 决定，合成流程本身不读取任何进程级状态。
//! 打包运行与源码运行的目录差异只在 `AssetResolver::discover` 里处理一次。
//!
//! ## 实现思路
//!
//! - 按颜色变体解析资源路径 → 加载为 RGBA → 等比缩放到固定高度
//! - 以 Logo 自身 alpha 作为蒙版合成到固定位置 `(75, 1080 - 120 - 30)`
//! - `LogoCache` 可选：每个变体最多解码一次，写入后只读，可跨线程共享；
//!   缓存的是解码结果，缩放按每次请求的配置进行，切换质量档位对 Logo 同样生效

use std::path::{Path, PathBuf};

use fast_image_resize as fr;
use image::imageops::{self, FilterType};
use image::{ImageBuffer, Rgba, RgbaImage};
use once_cell::sync::OnceCell;

use super::composite::alpha_composite;
use super::loader::load_image_file;
use super::resizer::to_fast_filter;
use super::{LogoColor, ThumbnailConfig, ThumbnailError};

const ASSET_DIR_NAME: &str = "assets";
const LOGO_DIR_NAME: &str = "img";

/// 静态资源目录解析器。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetResolver {
    base_dir: PathBuf,
}

impl AssetResolver {
    /// 使用显式的资源根目录（其下应有 `img/logo_black.png` 与 `img/logo_white.png`）。
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// 按部署形态查找资源根目录。
    ///
    /// 依次尝试：可执行文件旁的 `assets/`、编译时 crate 目录下的 `assets/`、当前目录下的 `assets/`。
    pub fn discover() -> Self {
        let candidates = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(|dir| dir.join(ASSET_DIR_NAME)))
            .into_iter()
            .chain(std::iter::once(
                Path::new(env!("CARGO_MANIFEST_DIR")).join(ASSET_DIR_NAME),
            ));

        for candidate in candidates {
            if candidate.join(LOGO_DIR_NAME).is_dir() {
                log::debug!("资源目录：{}", candidate.display());
                return Self::new(candidate);
            }
        }

        log::warn!("⚠️ 未找到打包资源目录，回退到当前目录下的 {}", ASSET_DIR_NAME);
        Self::new(ASSET_DIR_NAME)
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// 指定变体的 Logo 文件路径。
    pub fn logo_path(&self, color: LogoColor) -> PathBuf {
        self.base_dir.join(LOGO_DIR_NAME).join(color.asset_file_name())
    }
}

/// 已解码 Logo 的只读缓存。
#[derive(Debug, Default)]
pub struct LogoCache {
    black: OnceCell<RgbaImage>,
    white: OnceCell<RgbaImage>,
}

impl LogoCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// 取出缓存的解码结果（首次访问时读盘），再按当前配置缩放。
    pub fn get_or_load(
        &self,
        assets: &AssetResolver,
        color: LogoColor,
        config: &ThumbnailConfig,
    ) -> Result<RgbaImage, ThumbnailError> {
        let cell = match color {
            LogoColor::Black => &self.black,
            LogoColor::White => &self.white,
        };
        let decoded = cell.get_or_try_init(|| decode_logo(assets, color, config))?;
        Ok(scale_to_height(decoded, config.logo_height, config.resize_filter))
    }
}

/// 加载指定变体并缩放到配置高度。
pub fn load_logo(
    assets: &AssetResolver,
    color: LogoColor,
    config: &ThumbnailConfig,
) -> Result<RgbaImage, ThumbnailError> {
    let logo = decode_logo(assets, color, config)?;
    Ok(scale_to_height(&logo, config.logo_height, config.resize_filter))
}

fn decode_logo(
    assets: &AssetResolver,
    color: LogoColor,
    config: &ThumbnailConfig,
) -> Result<RgbaImage, ThumbnailError> {
    let path = assets.logo_path(color);
    Ok(load_image_file(&path, config, "logo")?.into_rgba8())
}

/// 等比缩放到指定高度，宽度向下取整且至少为 1。
pub fn scale_to_height(logo: &RgbaImage, target_height: u32, filter: FilterType) -> RgbaImage {
    let (width, height) = logo.dimensions();
    if height == target_height || width == 0 || height == 0 {
        return logo.clone();
    }

    let target_width = ((u64::from(width) * u64::from(target_height) / u64::from(height)) as u32).max(1);

    match resize_rgba_with_fast_image_resize(logo, target_width, target_height, filter) {
        Ok(resized) => resized,
        Err(err) => {
            log::warn!("⚠️ Logo 缩放失败，回退 image::resize：{}", err);
            imageops::resize(logo, target_width, target_height, filter)
        }
    }
}

fn resize_rgba_with_fast_image_resize(
    src: &RgbaImage,
    target_width: u32,
    target_height: u32,
    filter: FilterType,
) -> Result<RgbaImage, ThumbnailError> {
    let (src_width, src_height) = src.dimensions();

    let src_image = fr::images::ImageRef::new(
        src_width,
        src_height,
        src.as_raw(),
        fr::PixelType::U8x4,
    )
    .map_err(|e| ThumbnailError::Decode(format!("构建 Logo 缓冲失败：{}", e)))?;

    let mut dst_image = fr::images::Image::new(target_width, target_height, fr::PixelType::U8x4);

    // 默认开启 alpha 预乘，透明边缘不会渗色
    let options = fr::ResizeOptions::new()
        .resize_alg(fr::ResizeAlg::Convolution(to_fast_filter(filter)));

    fr::Resizer::new()
        .resize(&src_image, &mut dst_image, Some(&options))
        .map_err(|e| ThumbnailError::Decode(format!("Logo 缩放执行失败：{}", e)))?;

    ImageBuffer::<Rgba<u8>, Vec<u8>>::from_raw(target_width, target_height, dst_image.into_vec())
        .ok_or_else(|| ThumbnailError::Decode("Logo 缩放输出缓冲长度异常".to_string()))
}

/// 将已缩放的 Logo 合成到固定位置。
pub fn paste_logo(canvas: &mut RgbaImage, logo: &RgbaImage, config: &ThumbnailConfig) {
    let (x, y) = config.logo_origin();
    alpha_composite(canvas, logo, i64::from(x), i64::from(y));
    log::info!("🏷️ Logo 已合成 - 位置: ({}, {}) 尺寸: {}x{}", x, y, logo.width(), logo.height());
}

/// 加载指定变体并合成到画布。
pub fn apply_logo(
    canvas: &mut RgbaImage,
    color: LogoColor,
    assets: &AssetResolver,
    config: &ThumbnailConfig,
) -> Result<(), ThumbnailError> {
    let logo = load_logo(assets, color, config)?;
    paste_logo(canvas, &logo, config);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::thumbnail::ResizeQuality;
    use image::ImageFormat;

    /// 写入一对测试 Logo：不透明方块外围一圈全透明。
    fn write_assets(dir: &Path, width: u32, height: u32) -> AssetResolver {
        let img_dir = dir.join(LOGO_DIR_NAME);
        std::fs::create_dir_all(&img_dir).expect("create img dir");
        for (name, value) in [("logo_black.png", 0u8), ("logo_white.png", 255u8)] {
            let logo = RgbaImage::from_fn(width, height, |x, y| {
                let border = x < 2 || y < 2 || x >= width - 2 || y >= height - 2;
                if border {
                    Rgba([value, value, value, 0])
                } else {
                    Rgba([value, value, value, 255])
                }
            });
            logo.save_with_format(img_dir.join(name), ImageFormat::Png)
                .expect("write logo");
        }
        AssetResolver::new(dir)
    }

    #[test]
    fn logo_path_follows_variant() {
        let assets = AssetResolver::new("/opt/app/assets");
        assert_eq!(
            assets.logo_path(LogoColor::Black),
            PathBuf::from("/opt/app/assets/img/logo_black.png")
        );
        assert_eq!(
            assets.logo_path(LogoColor::White),
            PathBuf::from("/opt/app/assets/img/logo_white.png")
        );
    }

    #[test]
    fn scale_keeps_aspect_ratio() {
        let logo = RgbaImage::from_pixel(570, 60, Rgba([0, 0, 0, 255]));
        let scaled = scale_to_height(&logo, 120, FilterType::Triangle);
        assert_eq!(scaled.dimensions(), (1140, 120));

        let odd = RgbaImage::from_pixel(100, 70, Rgba([0, 0, 0, 255]));
        assert_eq!(scale_to_height(&odd, 120, FilterType::Triangle).dimensions(), (171, 120));
    }

    #[test]
    fn missing_asset_is_input_not_found() {
        let dir = tempfile::tempdir().expect("tempdir");
        let assets = AssetResolver::new(dir.path());
        let result = load_logo(&assets, LogoColor::Black, &ThumbnailConfig::default());
        assert!(matches!(result, Err(ThumbnailError::InputNotFound(_))));
    }

    #[test]
    fn logo_lands_at_fixed_origin_with_alpha_mask() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = ThumbnailConfig::default();
        // 高度已是 120，不触发缩放，透明边框保持 2px
        let assets = write_assets(dir.path(), 300, 120);

        let mut canvas = RgbaImage::from_pixel(1920, 1080, Rgba([10, 200, 10, 255]));
        apply_logo(&mut canvas, LogoColor::Black, &assets, &config).expect("apply logo");

        // 透明边框不覆盖底图
        assert_eq!(*canvas.get_pixel(75, 930), Rgba([10, 200, 10, 255]));
        assert_eq!(*canvas.get_pixel(74, 935), Rgba([10, 200, 10, 255]));
        // 不透明区域从 (77, 932) 开始
        assert_eq!(*canvas.get_pixel(77, 932), Rgba([0, 0, 0, 255]));
        assert_eq!(*canvas.get_pixel(372, 1047), Rgba([0, 0, 0, 255]));
        assert_eq!(*canvas.get_pixel(374, 1047), Rgba([10, 200, 10, 255]));
        assert_eq!(*canvas.get_pixel(200, 1050), Rgba([10, 200, 10, 255]));
    }

    #[test]
    fn cache_loads_each_variant_once() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = ThumbnailConfig::default();
        let assets = write_assets(dir.path(), 60, 30);
        let cache = LogoCache::new();

        let first = cache
            .get_or_load(&assets, LogoColor::White, &config)
            .expect("load white")
            .clone();
        assert_eq!(first.dimensions(), (240, 120));

        // 删除资源后仍能命中缓存
        std::fs::remove_dir_all(dir.path().join(LOGO_DIR_NAME)).expect("remove assets");
        let second = cache
            .get_or_load(&assets, LogoColor::White, &config)
            .expect("cached white");
        assert_eq!(first, second);
        assert!(cache.get_or_load(&assets, LogoColor::Black, &config).is_err());
    }

    #[test]
    fn cached_logo_follows_quality_switch() {
        let dir = tempfile::tempdir().expect("tempdir");
        let img_dir = dir.path().join(LOGO_DIR_NAME);
        std::fs::create_dir_all(&img_dir).expect("create img dir");
        let checker = RgbaImage::from_fn(60, 30, |x, y| {
            if (x + y) % 2 == 0 {
                Rgba([0, 0, 0, 255])
            } else {
                Rgba([255, 255, 255, 255])
            }
        });
        checker
            .save_with_format(img_dir.join("logo_black.png"), ImageFormat::Png)
            .expect("write logo");
        let assets = AssetResolver::new(dir.path());
        let cache = LogoCache::new();

        let mut config = ThumbnailConfig::default();
        config.apply_quality(ResizeQuality::Speed);
        let fast = cache
            .get_or_load(&assets, LogoColor::Black, &config)
            .expect("speed logo");
        assert_eq!(fast, scale_to_height(&checker, 120, FilterType::Nearest));

        config.apply_quality(ResizeQuality::Quality);
        let fine = cache
            .get_or_load(&assets, LogoColor::Black, &config)
            .expect("quality logo");
        assert_eq!(fine, scale_to_height(&checker, 120, FilterType::Lanczos3));
        assert_ne!(fast, fine);
    }
}
