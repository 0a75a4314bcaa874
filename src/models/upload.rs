use bytes::Bytes;
use std::fmt;
use std::path::Path;

use crate::error::{AppError, AppResult};

/// 上传项标识
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UploadId(pub u64);

impl fmt::Display for UploadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 待上传的文件
///
/// `bytes` 使用 `Bytes`，克隆只增加引用计数。
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub id: UploadId,
    pub name: String,
    pub content_type: String,
    pub bytes: Bytes,
}

impl UploadFile {
    pub fn new(id: UploadId, name: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        let name = name.into();
        let content_type = guess_content_type(&name).to_string();
        Self {
            id,
            name,
            content_type,
            bytes: bytes.into(),
        }
    }

    /// 从磁盘读取文件
    pub async fn from_path(id: UploadId, path: &Path) -> AppResult<Self> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| AppError::file_read_failed(path.display().to_string(), e))?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "upload.bin".to_string());
        Ok(Self::new(id, name, bytes))
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    /// 小写扩展名（不含点）
    pub fn extension(&self) -> Option<String> {
        Path::new(&self.name)
            .extension()
            .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
    }
}

/// 根据扩展名猜测 MIME 类型
fn guess_content_type(name: &str) -> &'static str {
    let ext = Path::new(name)
        .extension()
        .map(|ext| ext.to_string_lossy().to_ascii_lowercase());
    match ext.as_deref() {
        Some("docx") => {
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
        }
        Some("doc") => "application/msword",
        Some("pdf") => "application/pdf",
        Some("txt") => "text/plain",
        Some("md") => "text/markdown",
        _ => "application/octet-stream",
    }
}

/// 上传状态
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadStatus {
    /// 等待上传
    Idle,
    /// 上传中（0..=100）
    Uploading(u8),
    /// 成功
    Success,
    /// 失败
    Error(String),
}

impl UploadStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, UploadStatus::Success | UploadStatus::Error(_))
    }
}

/// 单个文件在批处理中的生命周期
#[derive(Debug, Clone)]
pub struct UploadItem {
    pub file: UploadFile,
    pub status: UploadStatus,
}

impl UploadItem {
    pub fn new(file: UploadFile) -> Self {
        Self {
            file,
            status: UploadStatus::Idle,
        }
    }

    pub fn id(&self) -> UploadId {
        self.file.id
    }
}
