//! # thumbGen — 命令行入口
//!
//! 本文件只负责参数解析、日志初始化与结果输出，
//! 扮演“外壳层”的角色：组装 `ThumbnailRequest` 交给服务层，打印 `ThumbnailResponse`。
//! 业务逻辑全部在 `thumbnail` 模块中，详见 `lib.rs` 架构文档。

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use thumbgen::error::AppError;
use thumbgen::thumbnail::{
    AssetResolver, LogoColor, LogoShape, ResizeQuality, Rgba, ThumbnailConfig, ThumbnailRequest,
    ThumbnailService,
};

#[derive(Parser)]
#[command(name = "thumbgen")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Generate a 1920x1080 thumbnail with banner and logo", long_about = None)]
struct Cli {
    /// Source image (PNG / JPEG / BMP). Output goes to <dir>/thumbnail.png
    #[arg(required_unless_present = "request")]
    source: Option<PathBuf>,

    /// Read the whole request from a JSON file instead of flags
    #[arg(long, conflicts_with_all = ["source", "offset", "color", "rgba", "logo", "shape"])]
    request: Option<PathBuf>,

    /// Vertical offset; positive moves the photo up, negative moves it down
    #[arg(short, long, allow_negative_numbers = true)]
    offset: Option<i32>,

    /// Banner color as 6 hex digits, e.g. 006E4F
    #[arg(short, long, conflicts_with = "rgba")]
    color: Option<String>,

    /// Banner opacity in percent, used with --color
    #[arg(long, default_value_t = 100)]
    opacity: u8,

    /// Banner color as R,G,B,A (each 0-255)
    #[arg(long)]
    rgba: Option<String>,

    /// Logo color: black | white
    #[arg(short, long)]
    logo: Option<String>,

    /// Banner shape: banner | trapezoid | soft-trapezoid | soft-rectangle
    #[arg(short, long)]
    shape: Option<String>,

    /// Asset directory containing img/logo_black.png and img/logo_white.png
    #[arg(long)]
    assets: Option<PathBuf>,

    /// Resampling quality: quality | balanced | speed
    #[arg(short, long)]
    quality: Option<String>,

    /// Print a base64 PNG preview data URL instead of writing the thumbnail
    #[arg(long)]
    preview: bool,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,
}

fn build_request(cli: &Cli) -> Result<ThumbnailRequest, AppError> {
    if let Some(path) = &cli.request {
        let content = std::fs::read_to_string(path)?;
        return serde_json::from_str(&content)
            .map_err(|e| AppError::Request(format!("解析请求文件 {} 失败: {}", path.display(), e)));
    }

    let source = cli
        .source
        .clone()
        .ok_or_else(|| AppError::Request("缺少源图片路径".to_string()))?;

    let color = match (&cli.color, &cli.rgba) {
        (Some(hex), _) => Rgba::from_hex(hex, cli.opacity)?,
        (None, Some(csv)) => Rgba::parse_csv(csv)?,
        (None, None) => {
            log::warn!("⚠️ 未指定横幅颜色，使用不透明黑色");
            Rgba::new(0, 0, 0, 255)
        }
    };

    let logo_color = match &cli.logo {
        Some(name) => LogoColor::from_str(name)?,
        None => LogoColor::default(),
    };
    let logo_shape = cli.shape.as_deref().map(LogoShape::parse).unwrap_or_default();

    Ok(ThumbnailRequest::new(source, color)
        .with_offset(cli.offset.unwrap_or(0))
        .with_logo_color(logo_color)
        .with_logo_shape(logo_shape))
}

fn run(cli: Cli) -> Result<(), AppError> {
    let request = build_request(&cli)?;

    let assets = match &cli.assets {
        Some(dir) => AssetResolver::new(dir),
        None => AssetResolver::discover(),
    };
    let service = ThumbnailService::with_config(ThumbnailConfig::default(), assets);
    if let Some(quality) = &cli.quality {
        service.set_quality(ResizeQuality::from_str(quality)?)?;
    }

    log::info!(
        "开始生成 - 源: {} offset={} 颜色: #{}/{} Logo: {} 形状: {}",
        request.source_path.display(),
        request.offset,
        request.color.to_hex(),
        request.color.a,
        request.logo_color.as_str(),
        request.logo_shape.as_str()
    );

    if cli.preview {
        let preview = service.preview(&request)?;
        if cli.json {
            let payload = serde_json::json!({
                "width": preview.width,
                "height": preview.height,
                "data_url": preview.data_url,
            });
            println!("{}", payload);
        } else {
            println!("{}", preview.data_url);
        }
        return Ok(());
    }

    let response = service.process(&request)?;
    if cli.json {
        let payload = serde_json::to_string_pretty(&response)
            .map_err(|e| AppError::Request(format!("序列化结果失败: {}", e)))?;
        println!("{}", payload);
    } else {
        println!(
            "{} ({}x{})",
            response.output_path.display(),
            response.width,
            response.height
        );
        if response.padded_rows > 0 {
            eprintln!(
                "注意：有 {} 行未被照片覆盖，已用白色填充，请调整偏移量",
                response.padded_rows
            );
        }
    }

    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("生成失败 [{}]: {err}", err.code());
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}
