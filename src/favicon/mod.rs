//! # favicon 转换模块（favicon）
//!
//! ## 设计思路
//!
//! 该模块将“来源读取 → 场景解析 → 等比适配 → 光栅化 → PNG 编码 → ICO 打包 → 交付”
//! 按职责拆分为多个子模块，避免单文件膨胀与耦合。
//!
//! - `commands`：仅做工具入参/出参适配（薄封装）
//! - `service`：承载可注入状态（`FaviconServiceState`）与取消标志
//! - `handler`：编排整条处理流水线
//! - `loader`：负责来源读取、尺寸预检与 SVG 解析
//! - `fit`：等比缩放与居中偏移
//! - `render`：抗锯齿光栅化
//! - `encoder` / `container`：PNG 编码与 ICO 打包
//! - `delivery`：写文件或 Base64 内联返回
//! - `config/error/source`：配置、错误、中间数据模型
//!
//! ## 新同事快速上手
//!
//! 可以按下面顺序理解调用链：
//!
//! ```text
//! MCP tools/call
//!    ↓
//! commands.rs（参数适配）
//!    ↓
//! service.rs（读取来源、取消标志、交付）
//!    ↓
//! handler.rs（统一编排 + 阶段耗时日志）
//!    ├─ loader.rs（一次解析，所有尺寸复用）
//!    ├─ fit.rs → render.rs → encoder.rs（逐尺寸）
//!    └─ container.rs（16/32 打包 ICO，失败降级）
//!    ↓
//! delivery.rs（文件 / Base64）
//! ```

pub mod commands;
mod config;
mod container;
mod delivery;
mod encoder;
mod error;
mod fit;
mod handler;
mod loader;
mod render;
mod service;
mod source;

pub use commands::{FaviconCommandError, SVG_TO_FAVICON_TOOL, SvgToFaviconArgs, svg_to_favicon};
pub use config::{
    FAVICON_CATALOGUE, FaviconConfig, FaviconSpec, ICO_FILE_NAME, PngCompressionProfile,
};
pub use container::encode_ico;
pub use delivery::{DeliveryReport, deliver_inline, deliver_to_directory};
pub use encoder::encode_png;
pub use error::FaviconError;
pub use fit::FitTransform;
pub use handler::FaviconHandler;
pub use service::{
    CancelRegistration, FaviconAdvancedConfig, FaviconRequest, FaviconServiceState,
};
pub use source::{IntrinsicSize, OutputFormats, RasterImage, ResultSet, SvgSource, VectorScene};
