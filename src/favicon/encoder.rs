//! # PNG 编码
//!
//! 无损编码 RGBA 四通道，不做调色板量化。压缩档位只影响体积与耗时。

use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder};

use super::source::RasterImage;
use super::{FaviconError, PngCompressionProfile};

/// 将 RGBA 图像编码为 PNG 字节。
pub fn encode_png(
    image: &RasterImage,
    profile: PngCompressionProfile,
) -> Result<Vec<u8>, FaviconError> {
    let (compression, filter) = profile.png_params();
    let mut buffer = Vec::new();

    PngEncoder::new_with_quality(&mut buffer, compression, filter)
        .write_image(
            image.as_rgba().as_raw(),
            image.width(),
            image.height(),
            ExtendedColorType::Rgba8,
        )
        .map_err(|e| {
            FaviconError::Encode(format!(
                "{}x{} PNG 编码失败：{}",
                image.width(),
                image.height(),
                e
            ))
        })?;

    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, ImageFormat, Rgba};

    fn gradient_image(size: u32) -> RasterImage {
        RasterImage::from_rgba(ImageBuffer::from_fn(size, size, |x, y| {
            Rgba([(x * 7 % 256) as u8, (y * 13 % 256) as u8, ((x + y) % 256) as u8, (x * y % 256) as u8])
        }))
    }

    #[test]
    fn png_decodes_back_to_identical_pixels() {
        let original = gradient_image(32);

        for profile in [
            PngCompressionProfile::Best,
            PngCompressionProfile::Balanced,
            PngCompressionProfile::Fast,
        ] {
            let bytes = encode_png(&original, profile).expect("encode should succeed");
            let decoded = image::load_from_memory_with_format(&bytes, ImageFormat::Png)
                .expect("png should decode")
                .into_rgba8();

            assert_eq!(decoded.dimensions(), (32, 32));
            assert_eq!(decoded.as_raw(), original.as_rgba().as_raw(), "profile {:?}", profile);
        }
    }
}
