//! # 配置模块
//!
//! ## 设计思路
//!
//! 分为两部分：
//! - `FAVICON_CATALOGUE`：固定的输出目录表（名称 + 像素尺寸），进程级常量，不可运行时修改。
//! - `FaviconConfig`：可调策略（输入体积上限、ICO 帧尺寸、字体加载、PNG 压缩档位）。
//!
//! ## 实现思路
//!
//! - `Default` 提供生产可用配置。
//! - `PngCompressionProfile` 负责档位字符串解析与反向输出，并映射到底层 PNG 参数。
//!   所有档位均为无损压缩，只影响体积与耗时。

use image::codecs::png::{CompressionType, FilterType};

use super::FaviconError;

const APPLE_TOUCH_ICON: &str = "apple-touch-icon";

/// ICO 容器的固定输出文件名。
pub const ICO_FILE_NAME: &str = "favicon.ico";

/// 单个输出条目：类别 + 正方形像素尺寸。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FaviconSpec {
    pub category: &'static str,
    pub size: u32,
}

impl FaviconSpec {
    /// 输出文件名。
    ///
    /// `apple-touch-icon` 固定为 `apple-touch-icon.png`，不带尺寸；
    /// 其余类别为 `{category}-{size}x{size}.png`。
    pub fn file_name(&self) -> String {
        if self.category == APPLE_TOUCH_ICON {
            return format!("{}.png", APPLE_TOUCH_ICON);
        }
        format!("{}-{}x{}.png", self.category, self.size, self.size)
    }
}

/// 标准 favicon 输出表（顺序即渲染顺序）。
pub const FAVICON_CATALOGUE: [FaviconSpec; 5] = [
    FaviconSpec { category: "android-chrome", size: 192 },
    FaviconSpec { category: "android-chrome", size: 512 },
    FaviconSpec { category: APPLE_TOUCH_ICON, size: 180 },
    FaviconSpec { category: "favicon", size: 16 },
    FaviconSpec { category: "favicon", size: 32 },
];

/// 判断某尺寸是否存在于输出表中。
pub fn catalogue_has_size(size: u32) -> bool {
    FAVICON_CATALOGUE.iter().any(|spec| spec.size == size)
}

/// 转换配置。
#[derive(Debug, Clone)]
pub struct FaviconConfig {
    /// SVG 源文本允许的最大体积（字节）。
    pub max_source_bytes: u64,
    /// 打包进 ICO 的尺寸（取自输出表的渲染结果）。
    pub ico_sizes: Vec<u32>,
    /// 是否加载系统字体（`<text>` 渲染为尽力而为）。
    pub load_system_fonts: bool,
    /// PNG 压缩档位。
    pub png_compression: PngCompressionProfile,
}

impl Default for FaviconConfig {
    fn default() -> Self {
        Self {
            max_source_bytes: 10 * 1024 * 1024,
            ico_sizes: vec![16, 32],
            load_system_fonts: true,
            png_compression: PngCompressionProfile::Balanced,
        }
    }
}

/// PNG 压缩档位。
///
/// - `Best`：体积最小
/// - `Balanced`：体积与耗时平衡
/// - `Fast`：优先编码速度
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PngCompressionProfile {
    Best,
    Balanced,
    Fast,
}

impl PngCompressionProfile {
    /// 从外部字符串解析档位。
    ///
    /// # 示例
    /// ```rust
    /// use favicon_mcp_server::favicon::PngCompressionProfile;
    ///
    /// let p = PngCompressionProfile::from_str("best")?;
    /// assert_eq!(p.as_str(), "best");
    /// # Ok::<(), favicon_mcp_server::favicon::FaviconError>(())
    /// ```
    pub fn from_str(profile: &str) -> Result<Self, FaviconError> {
        match profile.trim().to_lowercase().as_str() {
            "best" => Ok(Self::Best),
            "balanced" => Ok(Self::Balanced),
            "fast" => Ok(Self::Fast),
            other => Err(FaviconError::InvalidArgument(format!(
                "未知压缩档位：{}（可选：best / balanced / fast）",
                other
            ))),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Best => "best",
            Self::Balanced => "balanced",
            Self::Fast => "fast",
        }
    }

    pub(crate) fn png_params(self) -> (CompressionType, FilterType) {
        match self {
            Self::Best => (CompressionType::Best, FilterType::Adaptive),
            Self::Balanced => (CompressionType::Default, FilterType::Adaptive),
            Self::Fast => (CompressionType::Fast, FilterType::Sub),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalogue_file_names_follow_naming_scheme() {
        let names: Vec<String> = FAVICON_CATALOGUE.iter().map(FaviconSpec::file_name).collect();
        assert_eq!(
            names,
            vec![
                "android-chrome-192x192.png",
                "android-chrome-512x512.png",
                "apple-touch-icon.png",
                "favicon-16x16.png",
                "favicon-32x32.png",
            ]
        );
    }

    #[test]
    fn default_ico_sizes_exist_in_catalogue() {
        let config = FaviconConfig::default();
        assert!(config.ico_sizes.iter().all(|size| catalogue_has_size(*size)));
        assert!(!catalogue_has_size(48));
    }

    #[test]
    fn compression_profile_rejects_unknown_name() {
        assert!(matches!(
            PngCompressionProfile::from_str("ultra"),
            Err(FaviconError::InvalidArgument(_))
        ));
        assert_eq!(
            PngCompressionProfile::from_str(" FAST ").map(PngCompressionProfile::as_str).ok(),
            Some("fast")
        );
    }
}
