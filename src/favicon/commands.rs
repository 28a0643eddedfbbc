//! # 工具命令层
//!
//! ## 设计思路
//!
//! 命令层仅做参数接收与结果返回，不承载业务逻辑。
//! 所有实际处理交由 `FaviconServiceState`，保持命令函数薄、稳定、易测试。

use std::path::PathBuf;

use serde_json::Value;

use super::delivery::DeliveryReport;
use super::service::{CancelRegistration, FaviconRequest, FaviconServiceState};
use super::source::{OutputFormats, SvgSource};
use super::FaviconError;

/// 工具名称。
pub const SVG_TO_FAVICON_TOOL: &str = "svg_to_favicon";

#[derive(Debug, Clone, serde::Serialize)]
pub struct FaviconCommandError {
    pub code: &'static str,
    pub stage: &'static str,
    pub message: String,
}

impl From<FaviconError> for FaviconCommandError {
    fn from(error: FaviconError) -> Self {
        Self {
            code: error.code(),
            stage: error.stage(),
            message: error.to_string(),
        }
    }
}

/// `svg_to_favicon` 的入参。
///
/// `output_formats` 中的非字符串元素直接忽略。
#[derive(Debug, Default, serde::Deserialize)]
pub struct SvgToFaviconArgs {
    #[serde(default)]
    pub svg_data: Option<String>,
    #[serde(default)]
    pub svg_file: Option<String>,
    #[serde(default)]
    pub output_dir: Option<String>,
    #[serde(default)]
    pub output_formats: Option<Vec<Value>>,
}

impl SvgToFaviconArgs {
    pub fn into_request(self) -> Result<FaviconRequest, FaviconError> {
        let source = SvgSource::from_arguments(self.svg_data, self.svg_file)?;

        let tags: Vec<&str> = self
            .output_formats
            .as_deref()
            .unwrap_or_default()
            .iter()
            .filter_map(Value::as_str)
            .collect();

        Ok(FaviconRequest {
            source,
            output_dir: self
                .output_dir
                .filter(|dir| !dir.trim().is_empty())
                .map(PathBuf::from),
            formats: OutputFormats::from_tags(&tags),
        })
    }
}

/// 将 SVG 转换为 favicon 集合。
pub fn svg_to_favicon(
    state: &FaviconServiceState,
    arguments: Value,
    cancel: Option<&CancelRegistration>,
) -> Result<DeliveryReport, FaviconCommandError> {
    let args: SvgToFaviconArgs = match arguments {
        Value::Null => SvgToFaviconArgs::default(),
        other => serde_json::from_value(other).map_err(|e| {
            FaviconError::InvalidArgument(format!("工具参数格式错误：{}", e))
        })?,
    };

    let request = args.into_request()?;
    state
        .process_request(request, cancel)
        .map_err(FaviconCommandError::from)
}
