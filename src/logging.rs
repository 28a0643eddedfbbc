//! 日志初始化
//!
//! stdout 被协议占用，日志默认追加到 `<用户配置目录>/favicon-mcp-server/app.log`；
//! 取不到配置目录时退回系统临时目录。`FAVICON_MCP_LOG=stderr` 时直接写 stderr。
//! 过滤级别沿用 `RUST_LOG`，默认 `info`。

use std::fs::{self, OpenOptions};
use std::path::PathBuf;

const APP_DIR_NAME: &str = "favicon-mcp-server";
const LOG_FILE_NAME: &str = "app.log";
const LOG_TARGET_ENV_VAR: &str = "FAVICON_MCP_LOG";

pub fn log_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(APP_DIR_NAME)
}

pub fn init() {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));

    let to_stderr = std::env::var(LOG_TARGET_ENV_VAR)
        .map(|value| value.eq_ignore_ascii_case("stderr"))
        .unwrap_or(false);

    let mut fallback_reason = None;
    if to_stderr {
        builder.target(env_logger::Target::Stderr);
    } else {
        let dir = log_dir();
        let opened = fs::create_dir_all(&dir).and_then(|_| {
            OpenOptions::new()
                .create(true)
                .append(true)
                .open(dir.join(LOG_FILE_NAME))
        });
        match opened {
            Ok(file) => {
                builder.target(env_logger::Target::Pipe(Box::new(file)));
            }
            Err(err) => {
                builder.target(env_logger::Target::Stderr);
                fallback_reason = Some(err);
            }
        }
    }

    builder.init();

    if let Some(err) = fallback_reason {
        log::warn!("无法打开日志文件，改为输出到 stderr: {err}");
    }
}
