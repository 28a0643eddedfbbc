//! # favicon 生成服务：应用入口
//!
//! 本文件仅负责日志、配置与服务初始化。
//! 业务逻辑分布在各子模块中，详见 `lib.rs` 架构文档。

use std::sync::Arc;

use favicon_mcp_server::favicon::FaviconServiceState;
use favicon_mcp_server::mcp::McpServer;
use favicon_mcp_server::{logging, settings};

#[tokio::main]
async fn main() {
    logging::init();
    log::info!("setup: begin");

    let service = FaviconServiceState::new();
    settings::apply_settings_from_env(&service);
    log::info!("setup: favicon service ready");

    log::info!("🚀 启动 stdio 服务...");
    if let Err(err) = McpServer::new(Arc::new(service)).serve_stdio().await {
        log::error!("服务异常退出: {err}");
        std::process::exit(1);
    }
    log::info!("服务已退出");
}
