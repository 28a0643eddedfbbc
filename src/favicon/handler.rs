//! # 核心编排模块
//!
//! ## 设计思路
//!
//! `FaviconHandler` 只负责流程编排与配置管理，不直接与传输层绑定。
//! 处理链路固定为：
//! 1. 读取配置快照
//! 2. 解析一次 SVG 场景
//! 3. 按输出表逐个尺寸：适配 → 光栅化 → PNG 编码
//! 4. 收集 ICO 帧并打包一次
//!
//! ## 实现思路
//!
//! - 配置通过 `Arc<RwLock<FaviconConfig>>` 支持运行时调整。
//! - 单次请求内使用“同一配置快照”，避免处理中途配置漂移。
//! - 解析、渲染、PNG 编码任一失败即中止整次转换（不返回残缺的 PNG 集合）；
//!   ICO 打包失败只记录到 `ico_error`。
//! - 每个尺寸之间检查一次取消标志。
//! - 记录 `load/render/container/total` 阶段耗时，便于性能诊断。

use std::sync::{Arc, RwLock};
use std::time::Instant;

use super::config::{catalogue_has_size, FAVICON_CATALOGUE};
use super::container::encode_ico;
use super::encoder::encode_png;
use super::fit::FitTransform;
use super::source::{OutputFormats, RasterImage, ResultSet};
use super::{FaviconAdvancedConfig, FaviconConfig, FaviconError, PngCompressionProfile};

const MIN_SOURCE_BYTES_LIMIT: u64 = 1024;
const MAX_SOURCE_BYTES_LIMIT: u64 = 64 * 1024 * 1024;

/// favicon 转换器。
///
/// 不持有任何跨请求的中间结果，多个实例之间无需同步。
pub struct FaviconHandler {
    pub(super) config: Arc<RwLock<FaviconConfig>>,
}

impl FaviconHandler {
    /// 根据初始配置创建处理器。
    ///
    /// # 示例
    /// ```rust
    /// use favicon_mcp_server::favicon::{FaviconConfig, FaviconHandler};
    ///
    /// let handler = FaviconHandler::new(FaviconConfig::default());
    /// ```
    pub fn new(config: FaviconConfig) -> Self {
        Self {
            config: Arc::new(RwLock::new(config)),
        }
    }

    /// 获取配置快照。
    ///
    /// 作用：保证单次请求链路使用一致参数。
    pub fn config_snapshot(&self) -> Result<FaviconConfig, FaviconError> {
        self.config
            .read()
            .map(|cfg| cfg.clone())
            .map_err(|_| FaviconError::ResourceLimit("配置读取锁已中毒".to_string()))
    }

    /// 校验并应用高级配置；校验失败时保持原配置不变。
    pub fn set_advanced_config(&self, advanced: FaviconAdvancedConfig) -> Result<(), FaviconError> {
        if !(MIN_SOURCE_BYTES_LIMIT..=MAX_SOURCE_BYTES_LIMIT).contains(&advanced.max_source_bytes) {
            return Err(FaviconError::InvalidArgument(format!(
                "max_source_bytes 必须在 {}~{} 字节之间",
                MIN_SOURCE_BYTES_LIMIT, MAX_SOURCE_BYTES_LIMIT
            )));
        }
        if advanced.ico_sizes.is_empty() {
            return Err(FaviconError::InvalidArgument("ico_sizes 不能为空".to_string()));
        }
        if let Some(size) = advanced
            .ico_sizes
            .iter()
            .find(|size| !(1..=256).contains(*size) || !catalogue_has_size(**size))
        {
            return Err(FaviconError::InvalidArgument(format!(
                "ico_sizes 含有无效尺寸：{}（必须在 1~256 之间且属于输出表）",
                size
            )));
        }
        let png_compression = PngCompressionProfile::from_str(&advanced.png_compression)?;

        let mut ico_sizes = advanced.ico_sizes;
        ico_sizes.sort_unstable();
        ico_sizes.dedup();

        let mut config = self
            .config
            .write()
            .map_err(|_| FaviconError::ResourceLimit("配置写入锁已中毒".to_string()))?;

        config.max_source_bytes = advanced.max_source_bytes;
        config.ico_sizes = ico_sizes;
        config.load_system_fonts = advanced.load_system_fonts;
        config.png_compression = png_compression;

        log::info!(
            "⚙️ 已更新转换配置（max_source_bytes={}, ico_sizes={:?}, fonts={}, png={}）",
            config.max_source_bytes,
            config.ico_sizes,
            config.load_system_fonts,
            config.png_compression.as_str()
        );

        Ok(())
    }

    /// 获取高级配置快照。
    pub fn get_advanced_config(&self) -> Result<FaviconAdvancedConfig, FaviconError> {
        let config = self.config_snapshot()?;
        Ok(FaviconAdvancedConfig {
            max_source_bytes: config.max_source_bytes,
            ico_sizes: config.ico_sizes,
            load_system_fonts: config.load_system_fonts,
            png_compression: config.png_compression.as_str().to_string(),
        })
    }

    /// 处理主入口：SVG 文本 → PNG 集合 + ICO。
    ///
    /// # 示例
    /// ```rust
    /// use favicon_mcp_server::favicon::{FaviconConfig, FaviconHandler, OutputFormats};
    ///
    /// let handler = FaviconHandler::new(FaviconConfig::default());
    /// let svg = r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24">
    ///     <circle cx="12" cy="12" r="10" fill="teal"/>
    /// </svg>"#;
    /// let result = handler.convert(svg, OutputFormats::default())?;
    /// assert_eq!(result.png.len(), 5);
    /// assert!(result.ico.is_some());
    /// # Ok::<(), favicon_mcp_server::favicon::FaviconError>(())
    /// ```
    pub fn convert(&self, svg_text: &str, formats: OutputFormats) -> Result<ResultSet, FaviconError> {
        self.convert_with_cancel(svg_text, formats, || false)
    }

    pub fn convert_with_cancel<C>(
        &self,
        svg_text: &str,
        formats: OutputFormats,
        is_cancelled: C,
    ) -> Result<ResultSet, FaviconError>
    where
        C: Fn() -> bool,
    {
        let config = self.config_snapshot()?;
        let total_start = Instant::now();

        let load_start = Instant::now();
        let scene = Self::load_scene(svg_text, &config)?;
        let load_elapsed = load_start.elapsed();

        let render_start = Instant::now();
        let mut result = ResultSet::default();
        let mut ico_frames: Vec<RasterImage> = Vec::with_capacity(config.ico_sizes.len());

        for spec in FAVICON_CATALOGUE.iter() {
            if is_cancelled() {
                log::info!("🛑 转换已取消（尚未渲染：{}）", spec.file_name());
                return Err(FaviconError::Cancelled("请求已被调用方取消".to_string()));
            }

            let fit = FitTransform::compute(scene.intrinsic(), spec.size);
            let raster = Self::rasterize(&scene, fit, spec.size)?;
            let png = encode_png(&raster, config.png_compression)?;

            log::debug!(
                "🖼️ {} 渲染完成 - scale={:.4} offset=({:.2}, {:.2}) bytes={}",
                spec.file_name(),
                fit.scale,
                fit.offset_x,
                fit.offset_y,
                png.len()
            );

            if formats.png {
                result.png.insert(spec.file_name(), png);
            }
            if formats.ico && config.ico_sizes.contains(&spec.size) {
                ico_frames.push(raster);
            }
        }
        let render_elapsed = render_start.elapsed();

        let container_start = Instant::now();
        if formats.ico {
            Self::attach_container(&mut result, ico_frames);
        }
        let container_elapsed = container_start.elapsed();

        log::info!(
            "✅ favicon 生成完成 - png={} ico={} load={}ms render={}ms container={}ms total={}ms",
            result.png.len(),
            result.ico.is_some(),
            load_elapsed.as_millis(),
            render_elapsed.as_millis(),
            container_elapsed.as_millis(),
            total_start.elapsed().as_millis()
        );

        Ok(result)
    }

    /// 打包 ICO；失败降级为 `ico_error`，不影响已生成的 PNG。
    pub(crate) fn attach_container(result: &mut ResultSet, mut frames: Vec<RasterImage>) {
        frames.sort_by_key(RasterImage::width);

        match encode_ico(&frames) {
            Ok(bytes) => {
                result.ico = Some(bytes);
                result.ico_error = None;
            }
            Err(err) => {
                log::warn!("⚠️ ICO 打包失败，仅交付 PNG：{}", err);
                result.ico = None;
                result.ico_error = Some(err.to_string());
            }
        }
    }
}
