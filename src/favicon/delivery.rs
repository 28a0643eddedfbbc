//! # 交付模块
//!
//! ## 设计思路
//!
//! 由是否提供输出目录决定交付方式：
//! - 有目录：写入文件（目录不存在时创建），文本结果逐个文件确认；
//! - 无目录：全部字节以 Base64 返回，不触碰文件系统。
//!
//! ## 实现思路
//!
//! - PNG 按文件名顺序写入，最后写 `favicon.ico`；任一文件写入失败立即返回，
//!   已写入的文件不做清理。
//! - `ico_error` 在两种模式下都原样透传。

use std::path::{Path, PathBuf};

use base64::{Engine as _, engine::general_purpose};
use serde_json::{Map, Value, json};

use super::config::ICO_FILE_NAME;
use super::source::ResultSet;
use super::FaviconError;

const SUCCESS_TEXT: &str = "Successfully generated favicons";

/// 交付结果：人类可读文本 + 结构化数据。
#[derive(Debug, Clone)]
pub struct DeliveryReport {
    pub text: String,
    pub meta: Map<String, Value>,
}

/// 以 Base64 形式内联返回所有输出。
pub fn deliver_inline(result: &ResultSet) -> DeliveryReport {
    let png: Map<String, Value> = result
        .png
        .iter()
        .map(|(name, bytes)| (name.clone(), Value::String(general_purpose::STANDARD.encode(bytes))))
        .collect();

    let mut meta = Map::new();
    if !png.is_empty() {
        meta.insert("png".to_string(), Value::Object(png));
    }
    attach_ico_fields(&mut meta, result);

    DeliveryReport {
        text: SUCCESS_TEXT.to_string(),
        meta,
    }
}

/// 将输出写入目录。
pub fn deliver_to_directory(result: &ResultSet, dir: &Path) -> Result<DeliveryReport, FaviconError> {
    log::info!("📂 写入输出目录：{}", dir.display());

    std::fs::create_dir_all(dir).map_err(|e| {
        FaviconError::Io(format!("创建输出目录 '{}' 失败：{}", dir.display(), e))
    })?;

    let mut written: Vec<PathBuf> = Vec::with_capacity(result.png.len() + 1);
    for (name, bytes) in &result.png {
        written.push(write_output(dir, name, bytes)?);
    }
    if let Some(ico) = &result.ico {
        written.push(write_output(dir, ICO_FILE_NAME, ico)?);
    }

    let mut lines = vec![SUCCESS_TEXT.to_string()];
    lines.extend(written.iter().map(|path| format!("Saved {}", path.display())));
    if let Some(error) = &result.ico_error {
        lines.push(format!("ICO skipped: {}", error));
    }

    let mut meta = Map::new();
    meta.insert(
        "files".to_string(),
        json!(written.iter().map(|path| path.display().to_string()).collect::<Vec<_>>()),
    );
    attach_ico_fields(&mut meta, result);

    Ok(DeliveryReport {
        text: lines.join("\n"),
        meta,
    })
}

fn write_output(dir: &Path, name: &str, bytes: &[u8]) -> Result<PathBuf, FaviconError> {
    let path = dir.join(name);
    std::fs::write(&path, bytes)
        .map_err(|e| FaviconError::Io(format!("写入 '{}' 失败：{}", path.display(), e)))?;
    log::debug!("💾 已写入 {}（{} 字节）", path.display(), bytes.len());
    Ok(path)
}

fn attach_ico_fields(meta: &mut Map<String, Value>, result: &ResultSet) {
    if let Some(ico) = &result.ico {
        meta.insert("ico".to_string(), Value::String(general_purpose::STANDARD.encode(ico)));
    }
    if let Some(error) = &result.ico_error {
        meta.insert("ico_error".to_string(), Value::String(error.clone()));
    }
}
