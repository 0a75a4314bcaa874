use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// 一次远程调用解析后的结果
#[derive(Debug, Clone)]
pub enum TransferResult {
    /// 二进制文件
    File(FileArtifact),
    /// 结构化的字幕文本批次
    TextBatch(TextBatchResult),
}

impl TransferResult {
    pub fn into_file(self) -> Option<FileArtifact> {
        match self {
            TransferResult::File(artifact) => Some(artifact),
            TransferResult::TextBatch(_) => None,
        }
    }

    pub fn into_text_batch(self) -> Option<TextBatchResult> {
        match self {
            TransferResult::TextBatch(batch) => Some(batch),
            TransferResult::File(_) => None,
        }
    }
}

/// 服务端返回的二进制文件
///
/// 下载动作见 `services::artifact`。
#[derive(Debug, Clone)]
pub struct FileArtifact {
    pub bytes: Bytes,
    pub content_type: String,
    /// 从 Content-Disposition 中解析出的文件名
    pub filename: Option<String>,
}

/// 字幕批次的结构化响应
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextBatchResult {
    pub success: bool,
    #[serde(default)]
    pub message: String,
    /// 每个 URL 一段文本，可能缺失
    #[serde(default)]
    pub subtitle_texts: Option<Vec<String>>,
}

impl TextBatchResult {
    pub fn texts(&self) -> &[String] {
        self.subtitle_texts.as_deref().unwrap_or(&[])
    }
}

/// 字幕批次请求体
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubtitleRequest {
    pub urls: Vec<String>,
    pub output_word: bool,
}
