//! # 错误模型模块
//!
//! ## 设计思路
//!
//! 使用单一错误枚举承载转换链路中的所有错误来源，避免字符串拼接式错误处理。
//! 通过 `thiserror` 保持人类可读错误，同时让调用侧可按分支匹配。
//!
//! 严重程度并不统一：`ContainerEncode` 由编排层就地降级为结果中的 `ico_error`，
//! 其余分支一律中止本次转换。

/// favicon 转换统一错误类型。
///
/// 该类型会在命令层被转换为 `FaviconCommandError`，最终透传给调用方。
#[derive(Debug, thiserror::Error)]
pub enum FaviconError {
    #[error("缺少输入：{0}")]
    MissingInput(String),

    #[error("SVG 解析错误：{0}")]
    Parse(String),

    #[error("SVG 尺寸无效：{0}")]
    InvalidDimensions(String),

    #[error("PNG 编码错误：{0}")]
    Encode(String),

    #[error("ICO 打包错误：{0}")]
    ContainerEncode(String),

    #[error("文件错误：{0}")]
    Io(String),

    #[error("资源限制：{0}")]
    ResourceLimit(String),

    #[error("参数错误：{0}")]
    InvalidArgument(String),

    #[error("已取消：{0}")]
    Cancelled(String),
}

impl FaviconError {
    /// 稳定错误码，供调用方按类型分支处理。
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingInput(_) => "missing_input",
            Self::Parse(_) => "parse_error",
            Self::InvalidDimensions(_) => "invalid_dimensions",
            Self::Encode(_) => "encode_error",
            Self::ContainerEncode(_) => "container_encode_error",
            Self::Io(_) => "io_error",
            Self::ResourceLimit(_) => "resource_limit",
            Self::InvalidArgument(_) => "invalid_argument",
            Self::Cancelled(_) => "cancelled",
        }
    }

    /// 出错所在的流水线阶段。
    pub fn stage(&self) -> &'static str {
        match self {
            Self::MissingInput(_) | Self::InvalidArgument(_) | Self::ResourceLimit(_) => "input",
            Self::Parse(_) | Self::InvalidDimensions(_) => "load",
            Self::Encode(_) => "encode",
            Self::ContainerEncode(_) => "container",
            Self::Io(_) => "delivery",
            Self::Cancelled(_) => "render",
        }
    }
}
