//! # favicon 生成服务：库入口
//!
//! ## 架构总览
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │             调用方（MCP 客户端，stdio JSON-RPC）          │
//! └───────┬──────────────────────────────────────────────────┘
//!         ↕ tools/call svg_to_favicon
//! ┌───────┼──────────────────────────────────────────────────┐
//! │       ↕            后端 (Rust)                           │
//! │                                                          │
//! │  ┌─ mcp ──────── 协议 / 工具描述 / 读写循环              │
//! │  │                                                       │
//! │  ├─ favicon ──── SVG → PNG ×5 + ICO                       │
//! │  │   ├─ loader         解析 + 尺寸校验                    │
//! │  │   ├─ fit / render   等比居中 + 抗锯齿光栅化            │
//! │  │   ├─ encoder        PNG（无损）                        │
//! │  │   ├─ container      ICO（失败降级）                    │
//! │  │   └─ delivery       写文件 / Base64                    │
//! │  │                                                       │
//! │  ├─ error ────── AppError (统一错误类型)                  │
//! │  ├─ settings           启动配置文件                       │
//! │  └─ logging            env_logger → 文件 / stderr         │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! ## 模块职责
//!
//! | 模块 | 职责 |
//! |------|------|
//! | [`error`] | 统一错误类型 `AppError` |
//! | [`favicon`] | 转换流水线、配置、交付 |
//! | [`mcp`] | stdio 工具服务 |
//! | [`settings`] | 从 `FAVICON_MCP_CONFIG` 加载配置 |
//! | [`logging`] | 日志初始化 |

pub mod error;
pub mod favicon;
pub mod logging;
pub mod mcp;
pub mod settings;
