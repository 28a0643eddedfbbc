//! # 服务层（可注入状态）
//!
//! ## 设计思路
//!
//! 使用 `FaviconServiceState` 承载处理器与取消标志，替代全局单例函数。
//! 好处：
//! 1. 生命周期清晰（由 `main.rs` 统一管理）
//! 2. 测试可创建独立实例，减少共享状态副作用
//! 3. 并发请求之间互不共享可变状态
//!
//! ## 实现思路
//!
//! 对外仅暴露少量稳定 API：
//! - `process_request`：读取来源 → 转换 → 交付
//! - `register_cancel`：在调度前登记取消标志，返回的登记句柄释放时自动注销
//! - `cancel`：按请求 ID 设置取消标志（同一 ID 的所有进行中请求都会被标记）
//! - `set_advanced_config` / `get_advanced_config`：读写可调配置

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use super::delivery::{DeliveryReport, deliver_inline, deliver_to_directory};
use super::loader::read_svg_source;
use super::source::{OutputFormats, SvgSource};
use super::{FaviconConfig, FaviconError, FaviconHandler};

/// 对外可设置的配置子集。
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FaviconAdvancedConfig {
    pub max_source_bytes: u64,
    pub ico_sizes: Vec<u32>,
    pub load_system_fonts: bool,
    pub png_compression: String,
}

/// 一次转换请求。
#[derive(Debug, Clone)]
pub struct FaviconRequest {
    pub source: SvgSource,
    pub output_dir: Option<PathBuf>,
    pub formats: OutputFormats,
}

type CancelFlags = Mutex<HashMap<String, Vec<Arc<AtomicBool>>>>;

/// 单个请求的取消登记。
///
/// 可跨线程移动；释放时只移除自己的标志，不影响同 ID 的其他请求。
pub struct CancelRegistration {
    request_id: String,
    flag: Arc<AtomicBool>,
    flags: Arc<CancelFlags>,
}

impl CancelRegistration {
    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

impl Drop for CancelRegistration {
    fn drop(&mut self) {
        match self.flags.lock() {
            Ok(mut guard) => {
                if let Some(entries) = guard.get_mut(&self.request_id) {
                    entries.retain(|flag| !Arc::ptr_eq(flag, &self.flag));
                    if entries.is_empty() {
                        guard.remove(&self.request_id);
                    }
                }
            }
            Err(err) => log::warn!("清理取消标志失败：{}", err),
        }
    }
}

/// favicon 服务状态。
pub struct FaviconServiceState {
    handler: FaviconHandler,
    cancel_flags: Arc<CancelFlags>,
}

impl FaviconServiceState {
    /// 使用默认配置创建服务状态。
    pub fn new() -> Self {
        Self::with_config(FaviconConfig::default())
    }

    /// 使用自定义配置创建服务状态。
    ///
    /// 主要用于测试或按场景注入不同策略，不经过 `set_advanced_config` 的校验。
    ///
    /// # 示例
    /// ```rust
    /// use favicon_mcp_server::favicon::{FaviconConfig, FaviconServiceState};
    ///
    /// let mut config = FaviconConfig::default();
    /// config.load_system_fonts = false;
    /// let service = FaviconServiceState::with_config(config);
    /// ```
    pub fn with_config(config: FaviconConfig) -> Self {
        Self {
            handler: FaviconHandler::new(config),
            cancel_flags: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// 执行完整处理流程：读取→转换→交付。
    ///
    /// 提供登记句柄时可通过 `cancel` 在尺寸之间中止。
    pub fn process_request(
        &self,
        request: FaviconRequest,
        cancel: Option<&CancelRegistration>,
    ) -> Result<DeliveryReport, FaviconError> {
        let config = self.handler.config_snapshot()?;
        let raw = read_svg_source(request.source, &config)?;
        log::info!("🔄 开始转换 - 来源: {} 格式: {:?}", raw.source_hint, request.formats);

        let result = self.handler.convert_with_cancel(&raw.text, request.formats, || {
            cancel.is_some_and(CancelRegistration::is_cancelled)
        })?;

        match request.output_dir {
            Some(dir) => deliver_to_directory(&result, &dir),
            None => {
                log::info!("未指定输出目录，返回 Base64 数据");
                Ok(deliver_inline(&result))
            }
        }
    }

    /// 登记取消标志。应在请求被调度执行之前调用。
    pub fn register_cancel(&self, request_id: &str) -> Result<CancelRegistration, FaviconError> {
        let flag = Arc::new(AtomicBool::new(false));
        let mut guard = self
            .cancel_flags
            .lock()
            .map_err(|_| FaviconError::ResourceLimit("取消标志锁已中毒".to_string()))?;
        guard
            .entry(request_id.to_string())
            .or_default()
            .push(Arc::clone(&flag));

        Ok(CancelRegistration {
            request_id: request_id.to_string(),
            flag,
            flags: Arc::clone(&self.cancel_flags),
        })
    }

    /// 取消进行中的请求；返回是否找到该请求。
    pub fn cancel(&self, request_id: &str) -> Result<bool, FaviconError> {
        let guard = self
            .cancel_flags
            .lock()
            .map_err(|_| FaviconError::ResourceLimit("取消标志锁已中毒".to_string()))?;

        match guard.get(request_id) {
            Some(flags) => {
                for flag in flags {
                    flag.store(true, Ordering::SeqCst);
                }
                log::info!("🛑 已标记取消请求：{}（{} 个）", request_id, flags.len());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn set_advanced_config(&self, config: FaviconAdvancedConfig) -> Result<(), FaviconError> {
        self.handler.set_advanced_config(config)
    }

    pub fn get_advanced_config(&self) -> Result<FaviconAdvancedConfig, FaviconError> {
        self.handler.get_advanced_config()
    }
}

impl Default for FaviconServiceState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24"><circle cx="12" cy="12" r="9" fill="#e33"/></svg>"##;

    fn service() -> FaviconServiceState {
        FaviconServiceState::with_config(FaviconConfig {
            load_system_fonts: false,
            ..FaviconConfig::default()
        })
    }

    #[test]
    fn cancel_unknown_request_returns_false() {
        assert!(!service().cancel("nope").expect("cancel should not fail"));
    }

    #[test]
    fn cancel_flags_are_cleared_after_request() {
        let service = service();
        let request = FaviconRequest {
            source: SvgSource::Inline(SVG.to_string()),
            output_dir: None,
            formats: OutputFormats::default(),
        };

        let registration = service.register_cancel("req-1").expect("register should succeed");
        let report = service
            .process_request(request, Some(&registration))
            .expect("request should succeed");
        drop(registration);

        assert!(report.meta.contains_key("png"));
        assert!(!service.cancel("req-1").expect("cancel should not fail"));
    }

    #[test]
    fn failed_request_also_clears_flag() {
        let service = service();
        let request = FaviconRequest {
            source: SvgSource::Inline("<svg xmlns=\"http://www.w3.org/2000/svg\"/>".to_string()),
            output_dir: None,
            formats: OutputFormats::default(),
        };

        {
            let registration = service.register_cancel("req-2").expect("register should succeed");
            let result = service.process_request(request, Some(&registration));
            assert!(matches!(result, Err(FaviconError::InvalidDimensions(_))));
        }
        assert!(!service.cancel("req-2").expect("cancel should not fail"));
    }

    #[test]
    fn cancel_before_processing_starts_is_honoured() {
        let service = service();
        let registration = service.register_cancel("early").expect("register should succeed");

        assert!(service.cancel("early").expect("cancel should not fail"));
        assert!(registration.is_cancelled());

        let request = FaviconRequest {
            source: SvgSource::Inline(SVG.to_string()),
            output_dir: None,
            formats: OutputFormats::default(),
        };
        let result = service.process_request(request, Some(&registration));
        assert!(matches!(result, Err(FaviconError::Cancelled(_))));
    }

    #[test]
    fn reused_ids_keep_separate_flags() {
        let service = service();
        let first = service.register_cancel("dup").expect("register should succeed");
        let second = service.register_cancel("dup").expect("register should succeed");

        drop(first);
        assert!(service.cancel("dup").expect("cancel should not fail"));
        assert!(second.is_cancelled());

        drop(second);
        assert!(!service.cancel("dup").expect("cancel should not fail"));
    }
}
