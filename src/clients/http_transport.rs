/// 基于 reqwest 的传输层实现
///
/// 文件部分按 64 KiB 分块流式发送，每取出一块就上报一次进度。
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::{HeaderName, CONTENT_DISPOSITION, CONTENT_TYPE};
use reqwest::multipart::{Form, Part};
use reqwest::{Body, Client, Response};
use tracing::debug;

use crate::clients::transport::{MultipartPayload, ProgressCallback, RawResponse, Transport};
use crate::config::Config;
use crate::error::TransferError;
use crate::utils::truncate_text;

const CHUNK_SIZE: usize = 64 * 1024;

/// HTTP 传输
pub struct HttpTransport {
    client: Client,
    base_url: String,
}

impl HttpTransport {
    /// 创建新的 HTTP 传输
    pub fn new(config: &Config) -> Result<Self, TransferError> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(map_reqwest_error)?;

        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post_multipart(
        &self,
        path: &str,
        payload: MultipartPayload,
        progress: ProgressCallback,
    ) -> Result<RawResponse, TransferError> {
        let url = self.url(path);
        let file = payload.file;
        let total = file.bytes.len() as u64;
        debug!("POST {} (multipart, {} 字节)", url, total);

        let part = Part::stream_with_length(progress_body(file.bytes, progress), total)
            .file_name(file.file_name)
            .mime_str(&file.content_type)
            .map_err(map_reqwest_error)?;

        let mut form = Form::new().part(file.field, part);
        for (name, value) in payload.text_fields {
            form = form.text(name, value);
        }

        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        into_raw_response(response).await
    }

    async fn post_json(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<RawResponse, TransferError> {
        let url = self.url(path);
        debug!("POST {} (json)", url);

        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        into_raw_response(response).await
    }
}

/// 把文件切块包装成流，每交出一块就上报累计字节数
fn progress_body(bytes: Bytes, progress: ProgressCallback) -> Body {
    let total = bytes.len() as u64;
    let chunks: Vec<Bytes> = (0..bytes.len())
        .step_by(CHUNK_SIZE)
        .map(|start| bytes.slice(start..(start + CHUNK_SIZE).min(bytes.len())))
        .collect();

    let mut sent = 0u64;
    let stream = futures::stream::iter(chunks.into_iter().map(move |chunk| {
        sent += chunk.len() as u64;
        progress(sent, total);
        Ok::<Bytes, std::io::Error>(chunk)
    }));

    Body::wrap_stream(stream)
}

async fn into_raw_response(response: Response) -> Result<RawResponse, TransferError> {
    let status = response.status();
    let content_type = header_value(&response, CONTENT_TYPE);
    let content_disposition = header_value(&response, CONTENT_DISPOSITION);

    let body = response.bytes().await.map_err(map_reqwest_error)?;

    if !status.is_success() {
        return Err(TransferError::Status {
            status: status.as_u16(),
            message: server_error_message(&body),
        });
    }

    Ok(RawResponse {
        status: status.as_u16(),
        content_type,
        content_disposition,
        body: Some(body),
    })
}

fn header_value(response: &Response, name: HeaderName) -> Option<String> {
    response
        .headers()
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}

/// 从错误响应体中提取可读信息
///
/// 优先取 JSON 中的 `detail` / `message` 字段，否则取截断后的文本。
fn server_error_message(body: &[u8]) -> String {
    if let Ok(value) = serde_json::from_slice::<serde_json::Value>(body) {
        for key in ["detail", "message"] {
            if let Some(text) = value.get(key).and_then(|v| v.as_str()) {
                return text.to_string();
            }
        }
    }
    truncate_text(String::from_utf8_lossy(body).trim(), 200)
}

fn map_reqwest_error(err: reqwest::Error) -> TransferError {
    if err.is_timeout() {
        TransferError::Timeout
    } else {
        TransferError::Network(err)
    }
}
