//! # 等比适配计算
//!
//! 给定固有尺寸与目标正方形边长，计算统一缩放与居中偏移：
//!
//! ```text
//! scale    = min(S / W, S / H)
//! offset_x = (S - W * scale) / 2
//! offset_y = (S - H * scale) / 2
//! ```
//!
//! 计算使用 `f64`，只在交给 `tiny-skia` 时收窄为 `f32`。

use super::source::IntrinsicSize;

/// 单个目标尺寸的缩放与平移。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitTransform {
    pub scale: f64,
    pub offset_x: f64,
    pub offset_y: f64,
}

impl FitTransform {
    /// 计算等比、居中、不裁剪的适配变换。
    ///
    /// 调用方保证 `intrinsic` 宽高为正、`target` 大于 0。
    ///
    /// # 示例
    /// ```rust
    /// use favicon_mcp_server::favicon::{FitTransform, IntrinsicSize};
    ///
    /// let fit = FitTransform::compute(IntrinsicSize { width: 24.0, height: 12.0 }, 48);
    /// assert_eq!(fit.scale, 2.0);
    /// assert_eq!((fit.offset_x, fit.offset_y), (0.0, 12.0));
    /// ```
    pub fn compute(intrinsic: IntrinsicSize, target: u32) -> Self {
        let target = target as f64;
        let scale = (target / intrinsic.width).min(target / intrinsic.height);

        // 浮点误差可能产生 -0.0000001 之类的结果，偏移不允许为负
        let offset_x = ((target - intrinsic.width * scale) / 2.0).max(0.0);
        let offset_y = ((target - intrinsic.height * scale) / 2.0).max(0.0);

        Self {
            scale,
            offset_x,
            offset_y,
        }
    }

    /// 先缩放再平移：`p' = translate(scale(p))`。
    pub fn to_skia(self) -> tiny_skia::Transform {
        tiny_skia::Transform::from_translate(self.offset_x as f32, self.offset_y as f32)
            .pre_scale(self.scale as f32, self.scale as f32)
    }
}
