//! # 加载与校验模块
//!
//! ## 设计思路
//!
//! 统一处理 SVG 文本的读取、尺寸校验与场景解析，并在“尽可能早”的阶段执行输入校验。
//! 目标是尽快失败，减少不必要的解析与渲染开销。
//!
//! ## 实现思路
//!
//! - 读取：文件存在性 + metadata 体积限制 + UTF-8 读取（内联文本只做体积限制）。
//! - 预检：用 `roxmltree` 检查根元素是否为 `<svg>`，并按 `viewBox` 优先、
//!   `width/height` 兜底的顺序解析声明尺寸；为零、负数或缺失一律拒绝，不做默认值回填。
//! - 命名空间：根元素只按本地名识别，缺少 `xmlns` 时补上 SVG 命名空间再交给 `usvg`。
//! - 解析：交给 `usvg` 构建场景树，错误统一映射到 `FaviconError`。

use std::borrow::Cow;
use std::path::Path;
use std::sync::Arc;

use once_cell::sync::Lazy;
use usvg::fontdb;

use super::source::{IntrinsicSize, RawSvgText, SvgSource, VectorScene};
use super::{FaviconConfig, FaviconError, FaviconHandler};

const SOURCE_PREVIEW_CHARS: usize = 200;
const SVG_NAMESPACE: &str = "http://www.w3.org/2000/svg";
const LENGTH_UNITS: [&str; 8] = ["px", "pt", "pc", "mm", "cm", "in", "em", "ex"];

/// 系统字体库只加载一次，所有请求共享。
static SYSTEM_FONTS: Lazy<Arc<fontdb::Database>> = Lazy::new(|| {
    let mut db = fontdb::Database::new();
    db.load_system_fonts();
    log::info!("🔤 已加载系统字体：{} 个", db.len());
    Arc::new(db)
});

/// 按来源读取 SVG 文本。
///
/// 属于 I/O 适配层，由服务层调用；核心转换只接收文本。
pub(crate) fn read_svg_source(
    source: SvgSource,
    config: &FaviconConfig,
) -> Result<RawSvgText, FaviconError> {
    match source {
        SvgSource::Inline(text) => {
            log::info!("📝 使用内联 SVG 输入，长度：{}", text.len());
            ensure_within_limit(text.len() as u64, config)?;
            Ok(RawSvgText {
                text,
                source_hint: "inline",
            })
        }
        SvgSource::FilePath(path) => {
            log::info!("📁 开始读取 SVG 文件 - 路径: {}", path);

            let file_path = Path::new(&path);
            if !file_path.exists() {
                return Err(FaviconError::Io(format!("文件不存在：{}", path)));
            }

            let metadata = std::fs::metadata(file_path)
                .map_err(|e| FaviconError::Io(format!("无法读取文件信息：{}", e)))?;
            ensure_within_limit(metadata.len(), config)?;

            let text = std::fs::read_to_string(file_path)
                .map_err(|e| FaviconError::Io(format!("无法读取 SVG 文件：{}", e)))?;

            log::info!("✅ SVG 文件读取成功，长度：{}", text.len());
            Ok(RawSvgText {
                text,
                source_hint: "file",
            })
        }
    }
}

fn ensure_within_limit(len: u64, config: &FaviconConfig) -> Result<(), FaviconError> {
    if len > config.max_source_bytes {
        return Err(FaviconError::ResourceLimit(format!(
            "SVG 体积过大：{:.2} MB（限制：{:.2} MB）",
            len as f64 / 1024.0 / 1024.0,
            config.max_source_bytes as f64 / 1024.0 / 1024.0
        )));
    }
    Ok(())
}

impl FaviconHandler {
    /// 将 SVG 文本解析为只读场景。
    ///
    /// 同一份场景会被所有目标尺寸复用。
    pub(crate) fn load_scene(
        text: &str,
        config: &FaviconConfig,
    ) -> Result<VectorScene, FaviconError> {
        let preview: String = text.chars().take(SOURCE_PREVIEW_CHARS).collect();
        log::debug!("SVG 内容预览（前 {} 字符）：{}", SOURCE_PREVIEW_CHARS, preview);

        let precheck = precheck_svg(text)?;
        let declared = precheck.declared;
        let text = with_svg_namespace(text, precheck.missing_namespace_at);

        let mut options = usvg::Options::default();
        options.fontdb = if config.load_system_fonts {
            Arc::clone(&SYSTEM_FONTS)
        } else {
            Arc::new(fontdb::Database::new())
        };

        let tree = usvg::Tree::from_str(&text, &options).map_err(map_usvg_error)?;

        let size = tree.size();
        let intrinsic = IntrinsicSize {
            width: size.width() as f64,
            height: size.height() as f64,
        };
        if !intrinsic.is_usable() {
            return Err(FaviconError::InvalidDimensions(format!(
                "宽或高为 0：{}x{}",
                intrinsic.width, intrinsic.height
            )));
        }

        log::info!(
            "📐 SVG 尺寸 - 声明: {:.2}x{:.2} 画布: {:.2}x{:.2}",
            declared.width,
            declared.height,
            intrinsic.width,
            intrinsic.height
        );

        Ok(VectorScene { tree, intrinsic })
    }
}

/// 根元素预检结果。
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct SvgPrecheck {
    pub declared: IntrinsicSize,
    /// 根元素未声明命名空间时，`xmlns` 的插入位置（紧跟 `<svg` 之后）。
    pub missing_namespace_at: Option<usize>,
}

/// 预检根元素并读取声明尺寸。
///
/// `viewBox` 优先；缺失时使用 `width/height`。百分比长度无法解析为固有尺寸，按缺失处理。
pub(crate) fn precheck_svg(text: &str) -> Result<SvgPrecheck, FaviconError> {
    let doc = roxmltree::Document::parse(text)
        .map_err(|e| FaviconError::Parse(format!("不是合法的 XML 文档：{}", e)))?;

    let root = doc.root_element();
    if root.tag_name().name() != "svg" {
        return Err(FaviconError::Parse(format!(
            "根元素不是 <svg>：<{}>",
            root.tag_name().name()
        )));
    }

    let missing_namespace_at = match root.tag_name().namespace() {
        None => Some(root.range().start + "<svg".len()),
        Some(_) => None,
    };

    warn_best_effort_features(&doc);

    let declared = match root.attribute("viewBox") {
        Some(view_box) => parse_view_box(view_box).ok_or_else(|| {
            FaviconError::InvalidDimensions(format!("无法解析 viewBox：{}", view_box))
        })?,
        None => IntrinsicSize {
            width: root.attribute("width").and_then(parse_length).unwrap_or(0.0),
            height: root.attribute("height").and_then(parse_length).unwrap_or(0.0),
        },
    };

    if !declared.is_usable() {
        log::warn!(
            "❌ SVG 尺寸无效：{}x{}",
            declared.width,
            declared.height
        );
        return Err(FaviconError::InvalidDimensions(format!(
            "宽或高为 0 或缺失：{}x{}",
            declared.width, declared.height
        )));
    }

    Ok(SvgPrecheck {
        declared,
        missing_namespace_at,
    })
}

fn with_svg_namespace(text: &str, insert_at: Option<usize>) -> Cow<'_, str> {
    match insert_at {
        Some(at) if text.is_char_boundary(at) => {
            log::debug!("根元素缺少 xmlns，补充 SVG 命名空间");
            let mut patched = String::with_capacity(text.len() + SVG_NAMESPACE.len() + 9);
            patched.push_str(&text[..at]);
            patched.push_str(" xmlns=\"");
            patched.push_str(SVG_NAMESPACE);
            patched.push('"');
            patched.push_str(&text[at..]);
            Cow::Owned(patched)
        }
        _ => Cow::Borrowed(text),
    }
}

/// 文本与渐变在小尺寸下只能尽力渲染，这里仅做告警。
fn warn_best_effort_features(doc: &roxmltree::Document<'_>) {
    let mut has_text = false;
    let mut has_gradient = false;

    for node in doc.descendants().filter(|node| node.is_element()) {
        match node.tag_name().name() {
            "text" => has_text = true,
            "linearGradient" | "radialGradient" => has_gradient = true,
            _ => {}
        }
    }

    if has_text {
        log::warn!("⚠️ SVG 含有 <text>，小尺寸下可能无法正确渲染");
    }
    if has_gradient {
        log::warn!("⚠️ SVG 含有渐变，渲染效果不保证与浏览器一致");
    }
}

fn parse_view_box(value: &str) -> Option<IntrinsicSize> {
    let numbers = value
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|part| !part.is_empty())
        .map(|part| part.parse::<f64>().ok())
        .collect::<Option<Vec<f64>>>()?;

    match numbers.as_slice() {
        [_, _, width, height] => Some(IntrinsicSize {
            width: *width,
            height: *height,
        }),
        _ => None,
    }
}

fn parse_length(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.ends_with('%') {
        return None;
    }

    let number = LENGTH_UNITS
        .iter()
        .find_map(|unit| trimmed.strip_suffix(unit))
        .unwrap_or(trimmed);

    number.trim().parse::<f64>().ok()
}

fn map_usvg_error(error: usvg::Error) -> FaviconError {
    match error {
        usvg::Error::InvalidSize => {
            FaviconError::InvalidDimensions("SVG 宽高无效".to_string())
        }
        other => FaviconError::Parse(format!("SVG 解析失败：{}", other)),
    }
}
