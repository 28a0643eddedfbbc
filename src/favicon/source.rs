//! # 数据源与中间模型
//!
//! ## 设计思路
//!
//! 将“外部输入类型”和“流水线中间结果”解耦：
//! - `SvgSource` 表示外部来源语义
//! - `RawSvgText` 表示已读取但未解析的文本
//! - `VectorScene` 表示解析后的只读场景，一次解析可复用于所有尺寸
//! - `RasterImage` 表示单个尺寸的 RGBA 像素缓冲
//! - `ResultSet` 表示整次转换的输出集合

use std::collections::BTreeMap;

use image::RgbaImage;

use super::FaviconError;

/// SVG 输入来源。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SvgSource {
    /// 直接传入的 SVG 文本。
    Inline(String),
    /// 本地文件路径来源。
    FilePath(String),
}

impl SvgSource {
    /// 按工具参数挑选来源：非空 `svg_file` 优先，其次非空 `svg_data`。
    ///
    /// 两者都缺失时返回 `MissingInput`。
    pub fn from_arguments(
        svg_data: Option<String>,
        svg_file: Option<String>,
    ) -> Result<Self, FaviconError> {
        if let Some(path) = svg_file.filter(|path| !path.trim().is_empty()) {
            return Ok(Self::FilePath(path));
        }
        if let Some(data) = svg_data.filter(|data| !data.trim().is_empty()) {
            return Ok(Self::Inline(data));
        }
        Err(FaviconError::MissingInput(
            "需要提供 svg_data 或 svg_file 参数".to_string(),
        ))
    }
}

/// 读取阶段输出：SVG 文本与来源标识。
pub(crate) struct RawSvgText {
    pub(crate) text: String,
    /// 来源提示（用于日志与诊断）。
    pub(crate) source_hint: &'static str,
}

/// 固有尺寸（SVG 自身声明的宽高，与目标渲染尺寸无关）。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntrinsicSize {
    pub width: f64,
    pub height: f64,
}

impl IntrinsicSize {
    pub fn is_usable(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

/// 解析后的矢量场景。
///
/// 创建后只读；目标尺寸与位置通过 `FitTransform` 在渲染时传入，不写回场景。
pub struct VectorScene {
    pub(crate) tree: usvg::Tree,
    pub(crate) intrinsic: IntrinsicSize,
}

impl VectorScene {
    pub fn intrinsic(&self) -> IntrinsicSize {
        self.intrinsic
    }
}

/// 单个尺寸的 RGBA 像素缓冲（非预乘 alpha）。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterImage {
    pixels: RgbaImage,
}

impl RasterImage {
    pub fn from_rgba(pixels: RgbaImage) -> Self {
        Self { pixels }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn is_square(&self) -> bool {
        self.width() == self.height()
    }

    pub fn as_rgba(&self) -> &RgbaImage {
        &self.pixels
    }
}

/// 期望输出的格式集合。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputFormats {
    pub png: bool,
    pub ico: bool,
}

impl Default for OutputFormats {
    fn default() -> Self {
        Self { png: true, ico: true }
    }
}

impl OutputFormats {
    /// 从格式标签解析（大小写不敏感）。
    ///
    /// 只识别 `png` 与 `ico`，其余标签忽略；没有任何可识别标签时视为全部输出。
    pub fn from_tags<S: AsRef<str>>(tags: &[S]) -> Self {
        let mut formats = Self { png: false, ico: false };

        for tag in tags {
            match tag.as_ref().trim().to_lowercase().as_str() {
                "png" => formats.png = true,
                "ico" => formats.ico = true,
                other => log::debug!("忽略未识别的输出格式：{}", other),
            }
        }

        if !formats.png && !formats.ico {
            return Self::default();
        }
        formats
    }
}

/// 一次转换的输出集合。
///
/// `png` 以文件名为键；`ico` 与 `ico_error` 至多其一有值。
#[derive(Debug, Clone, Default)]
pub struct ResultSet {
    pub png: BTreeMap<String, Vec<u8>>,
    pub ico: Option<Vec<u8>>,
    pub ico_error: Option<String>,
}
