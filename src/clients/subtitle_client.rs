/// 字幕批次客户端
///
/// 封装 `/youtube/download` 接口
use std::sync::Arc;
use tracing::{debug, info};

use crate::clients::transport::Transport;
use crate::error::{AppResult, PreconditionFault, ValidationError};
use crate::models::{SubtitleRequest, TransferResult};
use crate::services::artifact;

pub const SUBTITLE_PATH: &str = "/youtube/download";

/// 把多行文本拆成 URL 列表：按行切分、去空白、丢弃空行
pub fn parse_urls(input: &str) -> Vec<String> {
    input
        .lines()
        .map(str::trim)
        .filter(|url| !url.is_empty())
        .map(str::to_string)
        .collect()
}

/// 字幕批次客户端
#[derive(Clone)]
pub struct SubtitleClient {
    transport: Arc<dyn Transport>,
}

impl SubtitleClient {
    /// 创建新的字幕客户端
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// 下载一批 URL 的字幕
    ///
    /// `output_word` 为真时返回文档，否则返回结构化的文本批次。
    /// 空 URL 列表在发起请求之前就被拒绝。
    pub async fn download_subtitles(&self, request: SubtitleRequest) -> AppResult<TransferResult> {
        let urls: Vec<String> = request
            .urls
            .iter()
            .map(|url| url.trim())
            .filter(|url| !url.is_empty())
            .map(str::to_string)
            .collect();

        if urls.is_empty() {
            return Err(ValidationError::EmptyUrlBatch.into());
        }

        let request = SubtitleRequest {
            urls,
            output_word: request.output_word,
        };
        info!(
            "🎬 请求 {} 个视频的字幕 (输出文档: {})",
            request.urls.len(),
            request.output_word
        );

        let body = serde_json::to_value(&request)
            .map_err(|e| PreconditionFault::MapSerialization(e.to_string()))?;
        let raw = self.transport.post_json(SUBTITLE_PATH, &body).await?;
        debug!("字幕响应状态: {}", raw.status);

        artifact::resolve(raw, request.output_word)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_urls() {
        let input = "  https://www.youtube.com/watch?v=a \n\n\thttps://youtu.be/b\n   \n";
        assert_eq!(
            parse_urls(input),
            vec![
                "https://www.youtube.com/watch?v=a".to_string(),
                "https://youtu.be/b".to_string()
            ]
        );
        assert!(parse_urls(" \n \n").is_empty());
    }
}
