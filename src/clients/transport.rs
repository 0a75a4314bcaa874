//! 传输层接口
//!
//! HTTP 传输是外部协作者：这里只定义核心需要的能力，
//! 带上传进度的 multipart 请求、JSON 请求，以及读取响应元数据。

use async_trait::async_trait;
use bytes::Bytes;
use std::sync::Arc;

use crate::error::TransferError;

/// 上传进度回调：`(已发送字节, 总字节)`
pub type ProgressCallback = Arc<dyn Fn(u64, u64) + Send + Sync>;

/// 原始响应
#[derive(Debug, Clone, Default)]
pub struct RawResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub content_disposition: Option<String>,
    /// 没有负载时为 `None`
    pub body: Option<Bytes>,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// multipart 请求体中的文件部分
#[derive(Debug, Clone)]
pub struct FilePart {
    pub field: String,
    pub file_name: String,
    pub content_type: String,
    pub bytes: Bytes,
}

/// multipart 请求体
#[derive(Debug, Clone)]
pub struct MultipartPayload {
    pub file: FilePart,
    pub text_fields: Vec<(String, String)>,
}

impl MultipartPayload {
    pub fn new(file: FilePart) -> Self {
        Self {
            file,
            text_fields: Vec::new(),
        }
    }

    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.text_fields.push((name.into(), value.into()));
        self
    }

    pub fn text_field(&self, name: &str) -> Option<&str> {
        self.text_fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }
}

/// 传输层
///
/// 实现方负责超时；超时、网络错误与非 2xx 都以 `TransferError` 返回。
#[async_trait]
pub trait Transport: Send + Sync {
    /// 发送 multipart 请求，发送过程中调用 `progress`
    async fn post_multipart(
        &self,
        path: &str,
        payload: MultipartPayload,
        progress: ProgressCallback,
    ) -> Result<RawResponse, TransferError>;

    /// 发送 JSON 请求
    async fn post_json(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<RawResponse, TransferError>;
}
