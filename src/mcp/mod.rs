//! # 工具调用传输层
//!
//! 按行分隔的 JSON-RPC 2.0（MCP 风格）stdio 服务，只暴露一个 `svg_to_favicon` 工具。
//! 协议细节在 `protocol`，工具描述与结果格式在 `tools`，读写循环在 `server`。

pub mod protocol;
mod server;
mod tools;

pub use server::{McpServer, SERVER_NAME};
pub use tools::tool_definitions;
