//! 响应解析服务 - 业务能力层
//!
//! 把原始响应解析成二进制文件或结构化的字幕批次，
//! 并提供「落地为本地文件」的下载动作。

use regex::Regex;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::clients::transport::RawResponse;
use crate::error::{AppError, AppResult, DecodingError, PreconditionFault};
use crate::models::{FileArtifact, TextBatchResult, TransferResult};

// regex 不支持反向引用，引号分支拆成两支
const FILENAME_PATTERN: &str = r#"filename[^;=\n]*=("[^"\n]*"|'[^'\n]*'|[^;\n]*)"#;

/// 解析原始响应
///
/// - `expect_binary = true`：包装为 `FileArtifact`，文件名取自 Content-Disposition
/// - `expect_binary = false`：按 `{ success, message, subtitle_texts }` 解析
///
/// 响应没有负载属于调用方的编程错误，返回 `PreconditionFault`。
pub fn resolve(raw: RawResponse, expect_binary: bool) -> AppResult<TransferResult> {
    if expect_binary {
        resolve_binary(raw).map(TransferResult::File)
    } else {
        resolve_text_batch(raw).map(TransferResult::TextBatch)
    }
}

/// 解析为二进制文件
pub fn resolve_binary(raw: RawResponse) -> AppResult<FileArtifact> {
    let body = raw.body.ok_or(PreconditionFault::MissingPayload)?;

    let content_type = raw
        .content_type
        .filter(|ct| !ct.trim().is_empty())
        .unwrap_or_else(|| sniff_content_type(&body).to_string());
    let filename = raw
        .content_disposition
        .as_deref()
        .and_then(extract_filename);

    debug!(
        "解析二进制响应: {} 字节, 类型 {}, 文件名 {:?}",
        body.len(),
        content_type,
        filename
    );

    Ok(FileArtifact {
        bytes: body,
        content_type,
        filename,
    })
}

/// 解析为结构化的字幕批次
pub fn resolve_text_batch(raw: RawResponse) -> AppResult<TextBatchResult> {
    let body = raw.body.ok_or(PreconditionFault::MissingPayload)?;

    let text = std::str::from_utf8(&body).map_err(|_| DecodingError::InvalidText)?;
    let batch: TextBatchResult = serde_json::from_str(text).map_err(DecodingError::from)?;
    debug!(
        "解析结构化响应: success={}, {} 段文本",
        batch.success,
        batch.texts().len()
    );
    Ok(batch)
}

/// 从 Content-Disposition 中提取文件名
///
/// 等价于模式 `filename[^;=\n]*=((['"]).*?\2|[^;\n]*)`，
/// 取第一处匹配并去掉所有引号字符。没有可用文件名时返回 `None`。
pub fn extract_filename(content_disposition: &str) -> Option<String> {
    let re = Regex::new(FILENAME_PATTERN).ok()?;
    let captures = re.captures(content_disposition)?;
    let raw = captures.get(1)?.as_str();
    let name: String = raw.chars().filter(|c| *c != '"' && *c != '\'').collect();
    let name = name.trim().to_string();
    (!name.is_empty()).then_some(name)
}

/// 负载自身携带的类型（传输层未给出 Content-Type 时使用）
fn sniff_content_type(body: &[u8]) -> &'static str {
    if body.starts_with(b"%PDF") {
        "application/pdf"
    } else if body.starts_with(b"PK\x03\x04") {
        "application/zip"
    } else if body.starts_with(b"{") || body.starts_with(b"[") {
        "application/json"
    } else {
        "application/octet-stream"
    }
}

impl FileArtifact {
    /// 最终使用的文件名：自定义 > 响应头 > 调用方给的兜底
    pub fn resolved_name(&self, custom_filename: Option<&str>, fallback: &str) -> String {
        custom_filename
            .filter(|n| !n.trim().is_empty())
            .map(str::to_string)
            .or_else(|| self.filename.clone())
            .unwrap_or_else(|| fallback.to_string())
    }

    /// 把文件写入 `dir`
    ///
    /// 先在目标目录中创建临时文件，写完后原子地重命名为最终文件名。
    /// 任一步骤失败时临时文件随 drop 一起删除，不会留下半成品。
    /// 同名文件已存在时追加 ` (n)`。
    pub fn download(
        &self,
        dir: &Path,
        custom_filename: Option<&str>,
        fallback: &str,
    ) -> AppResult<PathBuf> {
        let file_name = sanitize_filename(&self.resolved_name(custom_filename, fallback));

        std::fs::create_dir_all(dir)
            .map_err(|e| AppError::file_write_failed(dir.display().to_string(), e))?;

        let mut temp = NamedTempFile::new_in(dir)
            .map_err(|e| AppError::file_write_failed(dir.display().to_string(), e))?;
        let temp_path = temp.path().display().to_string();
        temp.write_all(&self.bytes)
            .map_err(|e| AppError::file_write_failed(&temp_path, e))?;
        temp.flush()
            .map_err(|e| AppError::file_write_failed(&temp_path, e))?;

        let target = unique_path(dir, &file_name);
        temp.persist_noclobber(&target).map_err(|e| {
            AppError::file_write_failed(target.display().to_string(), e.error)
        })?;

        info!("💾 已保存: {} ({} 字节)", target.display(), self.bytes.len());
        Ok(target)
    }
}

/// 去掉路径分隔符与控制字符，避免写出目标目录
fn sanitize_filename(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' | '\0'..='\u{1F}' => '_',
            c => c,
        })
        .collect();
    let cleaned = cleaned.trim_matches(|c| c == ' ' || c == '.').to_string();
    if cleaned.is_empty() {
        "download".to_string()
    } else {
        cleaned
    }
}

/// 已存在时生成 `name (1).ext`、`name (2).ext` ...
fn unique_path(dir: &Path, file_name: &str) -> PathBuf {
    let candidate = dir.join(file_name);
    if !candidate.exists() {
        return candidate;
    }

    let path = Path::new(file_name);
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| file_name.to_string());
    let ext = path.extension().map(|e| e.to_string_lossy().to_string());

    (1..)
        .map(|n| match &ext {
            Some(ext) => dir.join(format!("{} ({}).{}", stem, n, ext)),
            None => dir.join(format!("{} ({})", stem, n)),
        })
        .find(|p| !p.exists())
        .unwrap_or(candidate)
}
