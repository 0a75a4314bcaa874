//! 应用层
//!
//! 把配置、传输、编排器和查看器组装起来，供命令行入口调用。

use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info, warn};

use crate::clients::{DocumentClient, HttpTransport, SubtitleClient, Transport};
use crate::config::Config;
use crate::models::{PunctuationCatalog, SubtitleRequest, TextBatchResult, TransferResult};
use crate::orchestrator::{BatchOptions, BatchSummary, BatchUploader, FileOutcome, UploadQueue};
use crate::services::{
    build_map_for_selection, LogNotifier, Notifier, PolicySelection, SystemClipboard,
};
use crate::utils::logging;
use crate::viewer::{render_tokens, SubtitleViewer, ViewerView};

/// 应用主结构
pub struct App {
    config: Config,
    transport: Arc<dyn Transport>,
    notifier: Arc<dyn Notifier>,
}

impl App {
    /// 初始化应用
    pub fn initialize(config: Config) -> Result<Self> {
        let transport =
            HttpTransport::new(&config).context("无法创建 HTTP 客户端")?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    /// 使用指定的传输层（测试中注入假实现）
    pub fn with_transport(config: Config, transport: Arc<dyn Transport>) -> Self {
        Self {
            config,
            transport,
            notifier: Arc::new(LogNotifier),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// 批量替换文档中的标点
    pub async fn run_replace(
        &self,
        files: &[PathBuf],
        selection: PolicySelection,
    ) -> Result<BatchSummary> {
        logging::log_startup("文档标点替换", &self.config.api_base_url);
        logging::init_log_file(&self.config.output_log_file, "文档标点替换")
            .with_context(|| format!("无法写入日志文件 {}", self.config.output_log_file))?;

        let queue = Arc::new(UploadQueue::new(&self.config, self.notifier.clone()));
        for path in files {
            // 被拒绝的文件已经通知过，继续处理其余文件
            if let Err(e) = queue.add_path(path).await {
                warn!("⚠️ 跳过 {}: {}", path.display(), e);
                self.log_line(&format!("跳过 {}: {}", path.display(), e));
            }
        }

        if queue.is_empty() {
            warn!("⚠️ 没有可上传的文件，程序结束");
            return Ok(BatchSummary::default());
        }

        let map = build_map_for_selection(&selection, &PunctuationCatalog::standard());
        info!("📋 替换策略: {} ({} 个符号)", selection.label(), map.len());

        let uploader = BatchUploader::new(
            DocumentClient::new(self.transport.clone()),
            BatchOptions::from_config(&self.config),
        );
        let summary = uploader
            .submit_queue(&queue, &map)
            .await
            .context("批量上传出现内部错误")?;

        for (id, name, outcome) in &summary.outcomes {
            let line = match outcome {
                FileOutcome::Success {
                    saved_to: Some(path),
                    ..
                } => format!("[{}] ✓ {} -> {}", id, name, path.display()),
                FileOutcome::Success { .. } => format!("[{}] ✓ {}", id, name),
                FileOutcome::Failed(reason) => format!("[{}] ✗ {}: {}", id, name, reason),
                FileOutcome::Skipped => format!("[{}] - {} 已移除", id, name),
            };
            self.log_line(&line);
        }

        logging::print_final_stats(
            summary.success_count(),
            summary.failed_count(),
            summary.total(),
            &self.config.output_log_file,
        );
        Ok(summary)
    }

    /// 下载一批 URL 的字幕
    ///
    /// `output_word` 为真时保存文档并返回 `None`，否则返回文本批次。
    pub async fn fetch_subtitles(
        &self,
        urls: Vec<String>,
        output_word: bool,
    ) -> Result<Option<TextBatchResult>> {
        logging::log_startup("字幕下载", &self.config.api_base_url);
        let client = SubtitleClient::new(self.transport.clone());

        let result = match client
            .download_subtitles(SubtitleRequest { urls, output_word })
            .await
        {
            Ok(result) => result,
            Err(e) => {
                self.notifier.error("Download failed", Some(&e.to_string()));
                return Err(e).context("字幕下载失败");
            }
        };

        match result {
            TransferResult::File(artifact) => {
                let fallback = format!(
                    "subtitles_{}.docx",
                    chrono::Local::now().format("%Y%m%d_%H%M%S")
                );
                let path = artifact
                    .download(&self.config.download_dir, None, &fallback)
                    .context("保存字幕文档失败")?;
                self.notifier
                    .success("Subtitles downloaded", Some(&path.display().to_string()));
                Ok(None)
            }
            TransferResult::TextBatch(batch) => {
                if !batch.success {
                    warn!("⚠️ 服务端报告失败: {}", batch.message);
                }
                Ok(Some(batch))
            }
        }
    }

    /// 交互式翻页查看字幕
    pub async fn browse(&self, batch: TextBatchResult) -> Result<()> {
        let mut viewer = SubtitleViewer::new(batch);
        let mut clipboard = SystemClipboard;
        let mut lines = BufReader::new(tokio::io::stdin()).lines();

        loop {
            print_view(&viewer);
            if viewer.total_pages() == 0 {
                return Ok(());
            }

            let Some(line) = lines.next_line().await.context("读取输入失败")? else {
                return Ok(());
            };
            match PagerCommand::parse(&line) {
                Some(PagerCommand::Next) => viewer.next(),
                Some(PagerCommand::Previous) => viewer.previous(),
                Some(PagerCommand::GoTo(page)) => viewer.go_to(page),
                Some(PagerCommand::Copy) => {
                    viewer.copy_current(&mut clipboard, self.notifier.as_ref())
                }
                Some(PagerCommand::Quit) => return Ok(()),
                None => println!("n 下一页 / p 上一页 / 数字 跳转 / c 复制 / q 退出"),
            }
        }
    }

    fn log_line(&self, line: &str) {
        if let Err(e) = logging::append_log_line(&self.config.output_log_file, line) {
            error!("写入日志文件失败: {}", e);
        }
    }
}

/// 翻页器命令
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PagerCommand {
    Next,
    Previous,
    GoTo(usize),
    Copy,
    Quit,
}

impl PagerCommand {
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim() {
            "n" | "next" => Some(PagerCommand::Next),
            "p" | "prev" => Some(PagerCommand::Previous),
            "c" | "copy" => Some(PagerCommand::Copy),
            "q" | "quit" => Some(PagerCommand::Quit),
            other => other.parse().ok().map(PagerCommand::GoTo),
        }
    }
}

fn print_view(viewer: &SubtitleViewer) {
    match viewer.view() {
        ViewerView::Empty { message } => println!("{}", message),
        ViewerView::Page {
            title,
            text,
            tokens,
            ..
        } => {
            println!("\n{}\n{}", title, "-".repeat(60));
            println!("{}", text);
            println!("{}", "-".repeat(60));
            if tokens.len() > 1 {
                println!("{}", render_tokens(&tokens));
            }
        }
    }
}
