//! 批量上传编排器 - 编排层
//!
//! ## 职责
//!
//! 给定 N 个文件和一张替换表，对每个文件独立、并发地发起一次远程调用，
//! 通过回调上报每个文件的进度、成功与失败。
//!
//! ## 设计特点
//!
//! - **单项隔离**：每个文件的失败只会变成它自己的 `on_error`，不影响兄弟任务
//! - **全部落定**：用 `join_all` 等待所有文件到达终态，不会因为第一个失败而提前返回
//! - **进度先于终态**：同一文件的 `on_progress` 一定发生在它的 `on_success` / `on_error` 之前
//! - **可选并发上限**：`Semaphore` 控制同时在途的请求数；等待期间被移除的文件不会发出请求

use futures::future::join_all;
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tokio::sync::Semaphore;
use tracing::{error, info, warn};

use crate::clients::transport::ProgressCallback;
use crate::clients::DocumentClient;
use crate::config::Config;
use crate::error::{AppError, AppResult, PreconditionFault};
use crate::models::{FileArtifact, UploadFile, UploadId};
use crate::orchestrator::upload_queue::UploadQueue;
use crate::services::ReplacementMap;
use crate::utils::logging;

/// 没有可用错误信息时的兜底文案
pub const UPLOAD_FAILED: &str = "Upload failed";

/// 单个文件的回调
///
/// 回调只会被该文件自己的请求触发。
pub trait UploadHandlers: Send + Sync {
    fn on_progress(&self, file: &UploadFile, percent: u8);

    fn on_success(&self, file: &UploadFile);

    fn on_error(&self, file: &UploadFile, reason: &str);

    /// 拿到并发许可、即将发出请求前调用；返回 `false` 时跳过该文件
    fn should_dispatch(&self, _file: &UploadFile) -> bool {
        true
    }
}

/// 把传输层的字节进度换算成单调不减的百分比
#[derive(Debug, Default)]
pub struct ProgressTracker {
    last: Option<u8>,
    finished: bool,
}

impl ProgressTracker {
    /// 返回需要上报的新百分比；没有变化、总量未知或已结束时返回 `None`
    pub fn update(&mut self, loaded: u64, total: u64) -> Option<u8> {
        if self.finished || total == 0 {
            return None;
        }
        let loaded = loaded.min(total);
        let percent = ((loaded as f64 * 100.0) / total as f64).round() as u8;

        match self.last {
            Some(last) if percent <= last => None,
            _ => {
                self.last = Some(percent);
                Some(percent)
            }
        }
    }

    /// 标记结束，之后到达的进度全部丢弃
    pub fn finish(&mut self) {
        self.finished = true;
    }

    pub fn last(&self) -> Option<u8> {
        self.last
    }
}

/// 单个文件的最终结果
#[derive(Debug, Clone)]
pub enum FileOutcome {
    /// 成功；开启自动下载时带上保存路径
    Success {
        artifact: FileArtifact,
        saved_to: Option<PathBuf>,
    },
    /// 失败原因
    Failed(String),
    /// 派发前被移除，没有发出请求
    Skipped,
}

/// 一批上传的统计
#[derive(Debug, Default)]
pub struct BatchSummary {
    pub outcomes: Vec<(UploadId, String, FileOutcome)>,
}

impl BatchSummary {
    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    pub fn success_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|(_, _, o)| matches!(o, FileOutcome::Success { .. }))
            .count()
    }

    pub fn failed_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|(_, _, o)| matches!(o, FileOutcome::Failed(_)))
            .count()
    }

    pub fn skipped_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|(_, _, o)| matches!(o, FileOutcome::Skipped))
            .count()
    }

    pub fn outcome(&self, id: UploadId) -> Option<&FileOutcome> {
        self.outcomes
            .iter()
            .find(|(oid, _, _)| *oid == id)
            .map(|(_, _, o)| o)
    }
}

/// 编排选项
#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// 并发上限，`None` 表示全部立即派发
    pub concurrency: Option<usize>,
    /// 成功后自动保存到 `download_dir`
    pub auto_download: bool,
    pub download_dir: PathBuf,
}

impl BatchOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            concurrency: config.concurrency_limit(),
            auto_download: config.auto_download,
            download_dir: config.download_dir.clone(),
        }
    }
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// 批量上传编排器
pub struct BatchUploader {
    client: DocumentClient,
    options: BatchOptions,
}

impl BatchUploader {
    pub fn new(client: DocumentClient, options: BatchOptions) -> Self {
        Self { client, options }
    }

    pub fn options(&self) -> &BatchOptions {
        &self.options
    }

    /// 提交一批文件
    ///
    /// 所有文件到达终态后才返回。单个文件的失败通过 `on_error` 上报，
    /// 不会让本函数返回错误；只有契约被破坏（重复的上传项、替换表无法序列化、
    /// 响应缺少负载）才以 `Err` 返回，且同样是在所有文件落定之后。
    pub async fn submit_batch(
        &self,
        files: Vec<UploadFile>,
        map: &ReplacementMap,
        handlers: Arc<dyn UploadHandlers>,
    ) -> AppResult<BatchSummary> {
        let mut seen = HashSet::new();
        if let Some(dup) = files.iter().find(|f| !seen.insert(f.id)) {
            return Err(PreconditionFault::DuplicateItem { id: dup.id.0 }.into());
        }
        let replacements = DocumentClient::serialize_map(map)?;

        logging::log_batch_start(files.len(), self.options.concurrency);
        info!("🔧 替换符号: {}", map);

        let semaphore = self
            .options
            .concurrency
            .map(|limit| Arc::new(Semaphore::new(limit.max(1))));

        let tasks = files.into_iter().enumerate().map(|(idx, file)| {
            self.upload_one(
                idx + 1,
                file,
                &replacements,
                semaphore.clone(),
                handlers.clone(),
            )
        });

        // 等待所有任务落定（不会因为单个失败而短路）
        let results = join_all(tasks).await;

        let mut summary = BatchSummary::default();
        let mut fault = None;
        for (id, name, result) in results {
            match result {
                Ok(outcome) => summary.outcomes.push((id, name, outcome)),
                Err(e) => {
                    summary
                        .outcomes
                        .push((id, name, FileOutcome::Failed(e.to_string())));
                    fault.get_or_insert(e);
                }
            }
        }

        match fault {
            Some(e) => Err(e),
            None => Ok(summary),
        }
    }

    /// 提交队列中所有等待中的文件，回调直接驱动队列状态
    pub async fn submit_queue(
        &self,
        queue: &Arc<UploadQueue>,
        map: &ReplacementMap,
    ) -> AppResult<BatchSummary> {
        let files = queue.take_pending();
        if files.is_empty() {
            info!("📭 队列中没有等待上传的文件");
            return Ok(BatchSummary::default());
        }
        let handlers: Arc<dyn UploadHandlers> = queue.clone();
        self.submit_batch(files, map, handlers).await
    }

    /// 处理单个文件
    ///
    /// 环境性失败在这里转换为 `on_error`；契约错误在通知之后继续向上返回。
    async fn upload_one(
        &self,
        index: usize,
        file: UploadFile,
        replacements: &str,
        semaphore: Option<Arc<Semaphore>>,
        handlers: Arc<dyn UploadHandlers>,
    ) -> (UploadId, String, AppResult<FileOutcome>) {
        let id = file.id;
        let name = file.name.clone();

        let _permit = match semaphore {
            Some(semaphore) => match semaphore.acquire_owned().await {
                Ok(permit) => Some(permit),
                Err(e) => {
                    error!("[文件 {}] 无法获取并发许可: {}", index, e);
                    handlers.on_error(&file, UPLOAD_FAILED);
                    return (id, name, Ok(FileOutcome::Failed(UPLOAD_FAILED.to_string())));
                }
            },
            None => None,
        };

        if !handlers.should_dispatch(&file) {
            info!("[文件 {}] ⏭️ {} 已被移除，跳过", index, name);
            return (id, name, Ok(FileOutcome::Skipped));
        }

        info!("[文件 {}] 📤 开始上传: {} ({} 字节)", index, name, file.size());

        let tracker = Arc::new(Mutex::new(ProgressTracker::default()));
        let progress: ProgressCallback = {
            let tracker = tracker.clone();
            let handlers = handlers.clone();
            let file = file.clone();
            Arc::new(move |loaded: u64, total: u64| {
                // 持锁回调，保证与 finish() 互斥
                let mut tracker = match tracker.lock() {
                    Ok(guard) => guard,
                    Err(poisoned) => poisoned.into_inner(),
                };
                if let Some(percent) = tracker.update(loaded, total) {
                    handlers.on_progress(&file, percent);
                }
            })
        };

        let result = self.transfer(&file, replacements, progress).await;

        match tracker.lock() {
            Ok(mut guard) => guard.finish(),
            Err(poisoned) => poisoned.into_inner().finish(),
        }

        match result {
            Ok((artifact, saved_to)) => {
                info!("[文件 {}] ✓ 处理成功: {}", index, name);
                handlers.on_success(&file);
                (id, name, Ok(FileOutcome::Success { artifact, saved_to }))
            }
            Err(e) => {
                let reason = failure_reason(&e);
                warn!("[文件 {}] ❌ 处理失败: {} - {}", index, name, reason);
                handlers.on_error(&file, &reason);
                if e.is_environmental() {
                    (id, name, Ok(FileOutcome::Failed(reason)))
                } else {
                    (id, name, Err(e))
                }
            }
        }
    }

    /// 上传 → 解析 → （可选）自动下载
    async fn transfer(
        &self,
        file: &UploadFile,
        replacements: &str,
        progress: ProgressCallback,
    ) -> AppResult<(FileArtifact, Option<PathBuf>)> {
        let payload = DocumentClient::build_payload(file, replacements);
        let artifact = self
            .client
            .replace_document_keywords(payload, progress)
            .await?;

        let saved_to = if self.options.auto_download {
            Some(artifact.download(&self.options.download_dir, None, &file.name)?)
        } else {
            None
        };

        Ok((artifact, saved_to))
    }
}

/// 面向用户的失败原因
///
/// 取底层错误的信息；为空时使用 `Upload failed`。
pub fn failure_reason(err: &AppError) -> String {
    let message = match err {
        AppError::Transfer(e) => e.to_string(),
        AppError::Decoding(e) => e.to_string(),
        AppError::File(e) => e.to_string(),
        other => other.to_string(),
    };
    if message.trim().is_empty() {
        UPLOAD_FAILED.to_string()
    } else {
        message
    }
}
