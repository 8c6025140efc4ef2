//! # Alpha 合成
//!
//! 标准 source-over 合成：`out_a = sa + da·(1 − sa)`，
//! `out_c = (sc·sa + dc·da·(1 − sa)) / out_a`。
//! 全程整数运算；`sa == 0` 不改动底图，`sa == 255` 直接覆盖，保证这两种情况逐像素精确。

use image::{Rgba, RgbaImage};

/// 将单个前景像素合成到底图像素上。
pub fn blend_pixel(dst: &mut Rgba<u8>, src: Rgba<u8>) {
    let sa = u32::from(src[3]);
    if sa == 0 {
        return;
    }
    if sa == 255 {
        *dst = src;
        return;
    }

    let da = u32::from(dst[3]);
    // 放大 255 倍的 alpha，避免中途取整
    let src_weight = sa * 255;
    let dst_weight = da * (255 - sa);
    let out_weight = src_weight + dst_weight;

    let mix = |s: u8, d: u8| {
        let value = u32::from(s) * src_weight + u32::from(d) * dst_weight;
        ((value + out_weight / 2) / out_weight) as u8
    };

    *dst = Rgba([
        mix(src[0], dst[0]),
        mix(src[1], dst[1]),
        mix(src[2], dst[2]),
        ((out_weight + 127) / 255) as u8,
    ]);
}

/// 将 `layer` 以左上角 `(x, y)` 合成到 `base`，超出底图的部分被裁掉。
pub fn alpha_composite(base: &mut RgbaImage, layer: &RgbaImage, x: i64, y: i64) {
    let (base_width, base_height) = (i64::from(base.width()), i64::from(base.height()));

    for (lx, ly, pixel) in layer.enumerate_pixels() {
        let bx = x + i64::from(lx);
        let by = y + i64::from(ly);
        if bx < 0 || by < 0 || bx >= base_width || by >= base_height {
            continue;
        }
        blend_pixel(base.get_pixel_mut(bx as u32, by as u32), *pixel);
    }
}
