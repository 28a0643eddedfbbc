//! 启动配置加载
//!
//! 通过环境变量 `FAVICON_MCP_CONFIG` 指定一个 JSON 文件（`FaviconAdvancedConfig` 格式），
//! 启动时读取并应用；未设置时使用默认配置。

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::AppError;
use crate::favicon::{FaviconAdvancedConfig, FaviconServiceState};

pub const CONFIG_ENV_VAR: &str = "FAVICON_MCP_CONFIG";

/// 环境变量中配置的路径（空值视为未设置）。
pub fn settings_path_from_env() -> Option<PathBuf> {
    std::env::var_os(CONFIG_ENV_VAR)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}

pub fn load_settings(path: &Path) -> Result<FaviconAdvancedConfig, AppError> {
    let content = fs::read_to_string(path).map_err(|e| {
        AppError::Config(format!("读取配置文件 '{}' 失败: {}", path.display(), e))
    })?;

    serde_json::from_str::<FaviconAdvancedConfig>(&content)
        .map_err(|e| AppError::Config(format!("解析配置文件失败: {}", e)))
}

/// 读取并应用配置文件；任何失败都只记录日志，服务继续使用默认配置。
pub fn apply_settings_from_env(service: &FaviconServiceState) {
    let Some(path) = settings_path_from_env() else {
        return;
    };

    let applied = load_settings(&path)
        .and_then(|settings| service.set_advanced_config(settings).map_err(AppError::from));

    match applied {
        Ok(()) => log::info!("⚙️ 已加载配置文件：{}", path.display()),
        Err(err) => log::error!("配置文件无效，使用默认配置: {err}"),
    }
}
