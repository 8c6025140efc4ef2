use std::path::{Path, PathBuf};

use image::{ImageFormat, Rgb, RgbImage, Rgba as ImageRgba, RgbaImage};
use proptest::prelude::*;
use thumbgen::thumbnail::{
    AssetResolver, LogoColor, LogoShape, Rgba, ThumbnailConfig, ThumbnailError, ThumbnailRequest,
    ThumbnailService, crop_window_top, generate_thumbnail, scaled_size,
};

fn write_assets(dir: &Path) -> AssetResolver {
    let img_dir = dir.join("img");
    std::fs::create_dir_all(&img_dir).expect("create img dir");
    for (name, value) in [("logo_black.png", 0u8), ("logo_white.png", 255u8)] {
        RgbaImage::from_pixel(480, 120, ImageRgba([value, value, value, 255]))
            .save_with_format(img_dir.join(name), ImageFormat::Png)
            .expect("write logo");
    }
    AssetResolver::new(dir)
}

fn write_solid_jpeg(dir: &Path, width: u32, height: u32, color: [u8; 3]) -> PathBuf {
    let path = dir.join("photo.jpg");
    RgbImage::from_pixel(width, height, Rgb(color))
        .save_with_format(&path, ImageFormat::Jpeg)
        .expect("write jpeg source");
    path
}

fn assert_close(actual: ImageRgba<u8>, expected: [u8; 3], tolerance: u8, at: (u32, u32)) {
    for channel in 0..3 {
        let diff = actual.0[channel].abs_diff(expected[channel]);
        assert!(
            diff <= tolerance,
            "pixel {:?} = {:?}, expected ~{:?}",
            at,
            actual,
            expected
        );
    }
    assert_eq!(actual.0[3], 255, "output must be opaque at {:?}", at);
}

#[test]
fn jpeg_source_with_trapezoid_banner_end_to_end() {
    let dir = tempfile::tempdir().expect("tempdir");
    let assets = write_assets(&dir.path().join("assets"));
    let source = write_solid_jpeg(dir.path(), 3000, 2000, [0, 0, 255]);

    let service = ThumbnailService::with_config(ThumbnailConfig::default(), assets);
    let request = ThumbnailRequest::new(&source, Rgba::new(255, 0, 0, 200))
        .with_logo_color(LogoColor::Black)
        .with_logo_shape(LogoShape::Trapezoid);
    let response = service.process(&request).expect("process");

    assert_eq!(response.output_path, dir.path().join("thumbnail.png"));
    assert_eq!(response.padded_rows, 0);

    let output = image::open(&response.output_path).expect("decode output").to_rgba8();
    assert_eq!(output.dimensions(), (1920, 1080));

    // 横幅外：原图颜色
    assert_close(*output.get_pixel(960, 500), [0, 0, 255], 4, (960, 500));
    assert_close(*output.get_pixel(1000, 1000), [0, 0, 255], 4, (1000, 1000));
    // 横幅内、Logo 外：红色 alpha=200 叠在蓝色上
    assert_close(*output.get_pixel(650, 1000), [200, 0, 55], 4, (650, 1000));
    // Logo 左上角
    assert_eq!(*output.get_pixel(75, 930), ImageRgba([0, 0, 0, 255]));
}

#[test]
fn repeated_generation_is_byte_identical() {
    let dir = tempfile::tempdir().expect("tempdir");
    let assets = write_assets(&dir.path().join("assets"));
    let source = write_solid_jpeg(dir.path(), 1200, 1600, [30, 120, 60]);

    let run = || {
        let response = generate_thumbnail(
            &source,
            -200,
            Rgba::new(0, 110, 79, 180),
            LogoColor::White,
            LogoShape::SoftTrapezoid,
            &assets,
        )
        .expect("generate");
        std::fs::read(response.output_path).expect("read output")
    };

    let first = run();
    let second = run();
    assert!(first == second, "same inputs must produce the same file");
}

#[test]
fn transparent_banner_leaves_photo_untouched() {
    let dir = tempfile::tempdir().expect("tempdir");
    let assets = write_assets(&dir.path().join("assets"));
    let source = write_solid_jpeg(dir.path(), 1920, 1080, [10, 200, 10]);

    let service = ThumbnailService::with_config(ThumbnailConfig::default(), assets);
    for shape in [
        LogoShape::Banner,
        LogoShape::Trapezoid,
        LogoShape::SoftTrapezoid,
        LogoShape::SoftRectangle,
    ] {
        let request = ThumbnailRequest::new(&source, Rgba::new(255, 0, 0, 0)).with_logo_shape(shape);
        let response = service.process(&request).expect("process");
        let output = image::open(&response.output_path).expect("decode").to_rgba8();
        assert_close(*output.get_pixel(1500, 1000), [10, 200, 10], 4, (1500, 1000));
        assert_close(*output.get_pixel(10, 1070), [10, 200, 10], 4, (10, 1070));
    }
}

#[test]
fn unsupported_source_reports_decode_failure() {
    let dir = tempfile::tempdir().expect("tempdir");
    let assets = write_assets(&dir.path().join("assets"));
    let source = dir.path().join("notes.jpg");
    std::fs::write(&source, b"definitely not an image").expect("write garbage");

    let result = generate_thumbnail(
        &source,
        0,
        Rgba::new(0, 0, 0, 255),
        LogoColor::Black,
        LogoShape::Banner,
        &assets,
    );

    assert!(matches!(result, Err(ThumbnailError::Decode(_))));
    assert!(!dir.path().join("thumbnail.png").exists());
}

#[test]
fn request_json_uses_defaults() {
    let request: ThumbnailRequest = serde_json::from_str(
        r#"{ "source_path": "/photos/a.jpg", "color": { "r": 0, "g": 110, "b": 79, "a": 255 } }"#,
    )
    .expect("parse request");

    assert_eq!(request.offset, 0);
    assert_eq!(request.logo_color, LogoColor::White);
    assert_eq!(request.logo_shape, LogoShape::Banner);
}

proptest! {
    #[test]
    fn scaled_size_always_covers_canvas(width in 1u32..8000, height in 1u32..8000) {
        let (w, h) = scaled_size(width, height).expect("scaled size");
        prop_assert!(w >= 1920 && h >= 1080);
        prop_assert!(w == 1920 || h == 1080);
    }

    #[test]
    fn scaled_size_never_wraps(width in 1u32..=u32::MAX, height in 1u32..=u32::MAX) {
        match scaled_size(width, height) {
            Ok((w, h)) => prop_assert!(w >= 1920 && h >= 1080),
            Err(err) => prop_assert!(matches!(err, ThumbnailError::ResourceLimit(_))),
        }
    }

    #[test]
    fn crop_window_moves_by_half_offset(a in -5000i32..5000, b in -5000i32..5000) {
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        let delta = crop_window_top(high) - crop_window_top(low);
        prop_assert!(delta >= 0);
        prop_assert!(delta <= (i64::from(high) - i64::from(low) + 1) / 2);
    }

    #[test]
    fn hex_round_trip_keeps_channels(r in any::<u8>(), g in any::<u8>(), b in any::<u8>()) {
        let color = Rgba::new(r, g, b, 255);
        let parsed = Rgba::from_hex(&color.to_hex(), 100).expect("parse hex");
        prop_assert_eq!(parsed, color);
    }

    #[test]
    fn out_of_range_channels_are_rejected(value in 256i64..100_000) {
        prop_assert!(Rgba::from_channels(value, 0, 0, 255).is_err());
        prop_assert!(Rgba::from_channels(0, 0, 0, -value).is_err());
    }
}
