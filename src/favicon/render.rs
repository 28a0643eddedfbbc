//! # 光栅化模块
//!
//! ## 设计思路
//!
//! 场景只读，适配变换作为参数传入，因此一份场景可以安全地渲染到任意多个尺寸。
//! 抗锯齿由 `resvg` 按覆盖率混合完成，不开放为可调参数：favicon 在极小尺寸下观看，
//! 锯齿会直接破坏可读性。
//!
//! ## 实现思路
//!
//! 1. 创建全透明的 `S×S` pixmap
//! 2. `resvg::render` 按 `FitTransform` 绘制（不支持的特性由 resvg 静默跳过）
//! 3. 将预乘 alpha 像素还原为直通 RGBA，交给编码阶段

use image::RgbaImage;

use super::fit::FitTransform;
use super::source::{RasterImage, VectorScene};
use super::{FaviconError, FaviconHandler};

impl FaviconHandler {
    /// 将场景渲染为 `size×size` 的 RGBA 图像。
    pub(crate) fn rasterize(
        scene: &VectorScene,
        fit: FitTransform,
        size: u32,
    ) -> Result<RasterImage, FaviconError> {
        let mut pixmap = tiny_skia::Pixmap::new(size, size).ok_or_else(|| {
            FaviconError::Encode(format!("无法创建 {}x{} 渲染缓冲", size, size))
        })?;

        resvg::render(&scene.tree, fit.to_skia(), &mut pixmap.as_mut());

        let bytes: Vec<u8> = pixmap
            .pixels()
            .iter()
            .flat_map(|pixel| {
                let color = pixel.demultiply();
                [color.red(), color.green(), color.blue(), color.alpha()]
            })
            .collect();

        let pixels = RgbaImage::from_raw(size, size, bytes)
            .ok_or_else(|| FaviconError::Encode("渲染输出缓冲长度异常".to_string()))?;

        Ok(RasterImage::from_rgba(pixels))
    }
}
