/// 文档替换客户端
///
/// 封装 `/documents/replace` 接口：上传文件和替换表，取回处理后的文档
use std::sync::Arc;
use tracing::debug;

use crate::clients::transport::{FilePart, MultipartPayload, ProgressCallback, Transport};
use crate::error::{AppResult, PreconditionFault};
use crate::models::{FileArtifact, UploadFile};
use crate::services::artifact;
use crate::services::ReplacementMap;

pub const REPLACE_PATH: &str = "/documents/replace";

/// 文档替换客户端
#[derive(Clone)]
pub struct DocumentClient {
    transport: Arc<dyn Transport>,
}

impl DocumentClient {
    /// 创建新的文档替换客户端
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// 把替换表序列化为表单字段
    pub fn serialize_map(map: &ReplacementMap) -> AppResult<String> {
        map.to_json()
            .map_err(|e| PreconditionFault::MapSerialization(e.to_string()).into())
    }

    /// 构建 multipart 请求体：`file` + JSON 序列化的 `replacements`
    pub fn build_payload(file: &UploadFile, replacements_json: &str) -> MultipartPayload {
        MultipartPayload::new(FilePart {
            field: "file".to_string(),
            file_name: file.name.clone(),
            content_type: file.content_type.clone(),
            bytes: file.bytes.clone(),
        })
        .text("replacements", replacements_json)
    }

    /// 上传文件并替换关键字
    ///
    /// # 参数
    /// - `payload`: 由 `build_payload` 构建的请求体
    /// - `progress`: 上传进度回调
    ///
    /// # 返回
    /// 返回处理后的文档
    pub async fn replace_document_keywords(
        &self,
        payload: MultipartPayload,
        progress: ProgressCallback,
    ) -> AppResult<FileArtifact> {
        debug!("上传文档: {}", payload.file.file_name);

        let raw = self
            .transport
            .post_multipart(REPLACE_PATH, payload, progress)
            .await?;

        artifact::resolve_binary(raw)
    }
}
