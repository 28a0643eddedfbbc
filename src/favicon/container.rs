//! # ICO 容器打包
//!
//! ## 设计思路
//!
//! 把若干张正方形 RGBA 图像打包成一个多分辨率 ICO，每帧以 PNG 形式内嵌。
//! 输入必须非空、每帧为正方形且边长在 1~256 之间、尺寸严格递增（小尺寸在前）。
//!
//! 失败返回 `ContainerEncode`，由编排层降级为 `ico_error`，不影响 PNG 交付。

use image::codecs::ico::{IcoEncoder, IcoFrame};
use image::ExtendedColorType;

use super::source::RasterImage;
use super::FaviconError;

const ICO_MAX_DIMENSION: u32 = 256;

/// 将有序帧列表打包为 ICO 字节。
pub fn encode_ico(frames: &[RasterImage]) -> Result<Vec<u8>, FaviconError> {
    validate_frames(frames)?;

    let ico_frames = frames
        .iter()
        .map(|frame| {
            IcoFrame::as_png(
                frame.as_rgba().as_raw(),
                frame.width(),
                frame.height(),
                ExtendedColorType::Rgba8,
            )
            .map_err(|e| {
                FaviconError::ContainerEncode(format!(
                    "{}x{} 帧编码失败：{}",
                    frame.width(),
                    frame.height(),
                    e
                ))
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut buffer = Vec::new();
    IcoEncoder::new(&mut buffer)
        .encode_images(&ico_frames)
        .map_err(|e| FaviconError::ContainerEncode(format!("ICO 写入失败：{}", e)))?;

    Ok(buffer)
}

fn validate_frames(frames: &[RasterImage]) -> Result<(), FaviconError> {
    if frames.is_empty() {
        return Err(FaviconError::ContainerEncode("没有可打包的图像".to_string()));
    }

    let mut previous: Option<u32> = None;
    for frame in frames {
        if !frame.is_square() {
            return Err(FaviconError::ContainerEncode(format!(
                "帧尺寸不一致：{}x{}",
                frame.width(),
                frame.height()
            )));
        }

        let size = frame.width();
        if size == 0 || size > ICO_MAX_DIMENSION {
            return Err(FaviconError::ContainerEncode(format!(
                "帧尺寸超出 ICO 范围：{}（允许 1~{}）",
                size, ICO_MAX_DIMENSION
            )));
        }

        if previous.is_some_and(|prev| prev >= size) {
            return Err(FaviconError::ContainerEncode(format!(
                "帧必须按尺寸严格递增排列：{} 出现在 {} 之后",
                size,
                previous.unwrap_or_default()
            )));
        }
        previous = Some(size);
    }

    Ok(())
}
