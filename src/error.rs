//! 统一错误类型模块
//!
//! # 设计思路
//!
//! 定义进程级 `AppError` 枚举，承载转换链路之外的失败来源（传输、配置、序列化）。
//! 转换本身的错误仍由 `FaviconError` 表达，并通过 `From` 直接上转。
//!
//! # 实现思路
//!
//! - 使用 `thiserror` 派生可读错误消息。
//! - 为 `FaviconError`、`std::io::Error`、`serde_json::Error` 提供 `From` 转换，无需手动 map。

use crate::favicon::FaviconError;

/// 应用级统一错误类型
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// favicon 转换错误
    #[error("{0}")]
    Favicon(#[from] FaviconError),

    /// 文件系统 / 标准输入输出错误
    #[error("I/O 错误: {0}")]
    Io(#[from] std::io::Error),

    /// JSON 序列化或反序列化失败
    #[error("JSON 错误: {0}")]
    Json(#[from] serde_json::Error),

    /// 配置文件不可用
    #[error("配置错误: {0}")]
    Config(String),

    /// 传输层异常
    #[error("传输层错误: {0}")]
    Transport(String),
}
