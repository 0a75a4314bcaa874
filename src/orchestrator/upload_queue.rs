//! 上传队列 - 编排层
//!
//! 保存待上传文件及其状态。入队时做数量、大小与类型校验，
//! 被拒绝的文件不会进入队列，也不会发起任何请求。
//!
//! 队列自身实现 `UploadHandlers`，批量上传的回调直接驱动每一项的状态变化。

use bytes::Bytes;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{AppError, AppResult, ValidationError};
use crate::models::{UploadFile, UploadId, UploadItem, UploadStatus};
use crate::orchestrator::batch_upload::UploadHandlers;
use crate::services::Notifier;
use crate::utils::truncate_text;

pub const SUCCESS_TITLE: &str = "File processed successfully";
pub const FAILURE_TITLE: &str = "Upload failed";
pub const REJECTED_TITLE: &str = "File rejected";

/// 入队限制
#[derive(Debug, Clone)]
pub struct QueueLimits {
    pub max_files: usize,
    pub max_file_size: u64,
    /// 小写、不含点；为空表示不限制
    pub accepted_extensions: Vec<String>,
}

impl QueueLimits {
    pub fn from_config(config: &Config) -> Self {
        Self {
            max_files: config.max_files,
            max_file_size: config.max_file_size,
            accepted_extensions: config.accepted_extensions.clone(),
        }
    }

    /// 校验单个文件能否进入已有 `current` 项的队列
    pub fn check(&self, file: &UploadFile, current: usize) -> Result<(), ValidationError> {
        if current >= self.max_files {
            return Err(ValidationError::TooManyFiles {
                max_files: self.max_files,
            });
        }
        if file.size() > self.max_file_size {
            return Err(ValidationError::FileTooLarge {
                size: file.size(),
                max_size: self.max_file_size,
            });
        }
        if !self.accepted_extensions.is_empty() {
            let accepted = file
                .extension()
                .map(|ext| self.accepted_extensions.iter().any(|a| *a == ext))
                .unwrap_or(false);
            if !accepted {
                return Err(ValidationError::FileTypeNotAccepted {
                    file_name: file.name.clone(),
                });
            }
        }
        Ok(())
    }
}

/// 上传队列
pub struct UploadQueue {
    limits: QueueLimits,
    remove_on_success: bool,
    notifier: Arc<dyn Notifier>,
    next_id: AtomicU64,
    items: Mutex<Vec<UploadItem>>,
}

impl UploadQueue {
    pub fn new(config: &Config, notifier: Arc<dyn Notifier>) -> Self {
        Self::with_limits(
            QueueLimits::from_config(config),
            config.remove_on_success,
            notifier,
        )
    }

    pub fn with_limits(
        limits: QueueLimits,
        remove_on_success: bool,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            limits,
            remove_on_success,
            notifier,
            next_id: AtomicU64::new(1),
            items: Mutex::new(Vec::new()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Vec<UploadItem>> {
        match self.items.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// 加入一个文件
    ///
    /// 校验失败时立即发出拒绝通知并返回错误，队列不变。
    pub fn add(
        &self,
        name: impl Into<String>,
        bytes: impl Into<Bytes>,
    ) -> Result<UploadId, ValidationError> {
        let id = UploadId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.push(UploadFile::new(id, name, bytes))
    }

    /// 从磁盘读取并加入队列
    pub async fn add_path(&self, path: &Path) -> AppResult<UploadId> {
        let id = UploadId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let file = UploadFile::from_path(id, path).await?;
        self.push(file).map_err(AppError::from)
    }

    fn push(&self, file: UploadFile) -> Result<UploadId, ValidationError> {
        let mut items = self.lock();
        if let Err(e) = self.limits.check(&file, items.len()) {
            drop(items);
            warn!("🚫 拒绝文件 {}: {}", file.name, e);
            self.notifier.error(
                REJECTED_TITLE,
                Some(&format!(
                    "\"{}\" has been rejected",
                    truncate_text(&file.name, 20)
                )),
            );
            return Err(e);
        }

        let id = file.id;
        debug!("📥 入队: {} ({} 字节)", file.name, file.size());
        items.push(UploadItem::new(file));
        Ok(id)
    }

    /// 移除一项，返回是否存在
    ///
    /// 在途的请求不会被取消，但之后的回调不再改变任何状态。
    pub fn remove(&self, id: UploadId) -> bool {
        let mut items = self.lock();
        let before = items.len();
        items.retain(|item| item.id() != id);
        before != items.len()
    }

    pub fn status(&self, id: UploadId) -> Option<UploadStatus> {
        self.lock()
            .iter()
            .find(|item| item.id() == id)
            .map(|item| item.status.clone())
    }

    /// 当前所有项的快照
    pub fn items(&self) -> Vec<UploadItem> {
        self.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// 取出所有等待中的文件并标记为上传中
    pub fn take_pending(&self) -> Vec<UploadFile> {
        let mut items = self.lock();
        items
            .iter_mut()
            .filter(|item| item.status == UploadStatus::Idle)
            .map(|item| {
                item.status = UploadStatus::Uploading(0);
                item.file.clone()
            })
            .collect()
    }

    /// 仅当该项仍在队列中时更新状态
    fn update(&self, id: UploadId, f: impl FnOnce(&mut UploadItem)) -> bool {
        let mut items = self.lock();
        match items.iter_mut().find(|item| item.id() == id) {
            Some(item) => {
                f(item);
                true
            }
            None => false,
        }
    }
}

impl UploadHandlers for UploadQueue {
    fn on_progress(&self, file: &UploadFile, percent: u8) {
        self.update(file.id, |item| {
            if !item.status.is_terminal() {
                item.status = UploadStatus::Uploading(percent.min(100));
            }
        });
    }

    fn on_success(&self, file: &UploadFile) {
        let present = self.update(file.id, |item| item.status = UploadStatus::Success);
        if !present {
            return;
        }
        if self.remove_on_success {
            self.remove(file.id);
        }
        self.notifier.success(SUCCESS_TITLE, Some(&file.name));
    }

    fn on_error(&self, file: &UploadFile, reason: &str) {
        let present = self.update(file.id, |item| {
            item.status = UploadStatus::Error(reason.to_string())
        });
        if present {
            self.notifier
                .error(FAILURE_TITLE, Some(&format!("{}: {}", file.name, reason)));
        }
    }

    fn should_dispatch(&self, file: &UploadFile) -> bool {
        self.lock().iter().any(|item| item.id() == file.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::notifier::{NoticeLevel, RecordingNotifier};

    fn queue(max_files: usize, exts: &[&str]) -> (UploadQueue, Arc<RecordingNotifier>) {
        let notifier = Arc::new(RecordingNotifier::new());
        let limits = QueueLimits {
            max_files,
            max_file_size: 16,
            accepted_extensions: exts.iter().map(|e| e.to_string()).collect(),
        };
        (
            UploadQueue::with_limits(limits, false, notifier.clone()),
            notifier,
        )
    }

    #[test]
    fn test_rejects_oversized_and_wrong_type() {
        let (queue, notifier) = queue(10, &["docx"]);

        assert!(matches!(
            queue.add("big.docx", vec![0u8; 17]),
            Err(ValidationError::FileTooLarge { size: 17, .. })
        ));
        assert!(matches!(
            queue.add("a_really_long_file_name_for_testing.pdf", vec![0u8; 4]),
            Err(ValidationError::FileTypeNotAccepted { .. })
        ));
        assert!(queue.is_empty());

        let notices = notifier.take();
        assert_eq!(notices.len(), 2);
        assert!(notices.iter().all(|n| n.level == NoticeLevel::Error));
        assert_eq!(
            notices[1].description.as_deref(),
            Some("\"a_really_long_file_n...\" has been rejected")
        );
    }

    #[test]
    fn test_rejects_beyond_max_files() {
        let (queue, _) = queue(2, &[]);
        assert!(queue.add("1.docx", vec![1]).is_ok());
        assert!(queue.add("2.docx", vec![2]).is_ok());
        assert!(matches!(
            queue.add("3.docx", vec![3]),
            Err(ValidationError::TooManyFiles { max_files: 2 })
        ));
        assert_eq!(queue.len(), 2);
    }

    #[test]
    fn test_callbacks_drive_status() {
        let (queue, notifier) = queue(10, &[]);
        let id = queue.add("a.docx", vec![1, 2, 3]).unwrap();
        let files = queue.take_pending();
        assert_eq!(files.len(), 1);
        assert_eq!(queue.status(id), Some(UploadStatus::Uploading(0)));
        assert!(queue.take_pending().is_empty());

        queue.on_progress(&files[0], 40);
        assert_eq!(queue.status(id), Some(UploadStatus::Uploading(40)));

        queue.on_error(&files[0], "boom");
        assert_eq!(queue.status(id), Some(UploadStatus::Error("boom".to_string())));
        // 终态之后的进度被忽略
        queue.on_progress(&files[0], 90);
        assert_eq!(queue.status(id), Some(UploadStatus::Error("boom".to_string())));

        let notices = notifier.take();
        assert_eq!(notices[0].title, FAILURE_TITLE);
        assert_eq!(notices[0].description.as_deref(), Some("a.docx: boom"));
    }

    #[test]
    fn test_removed_item_is_not_dispatched() {
        let (queue, notifier) = queue(10, &[]);
        let id = queue.add("a.docx", vec![1]).unwrap();
        let files = queue.take_pending();
        assert!(queue.should_dispatch(&files[0]));

        assert!(queue.remove(id));
        assert!(!queue.remove(id));
        assert!(!queue.should_dispatch(&files[0]));

        queue.on_success(&files[0]);
        assert_eq!(queue.status(id), None);
        assert!(notifier.take().is_empty());
    }

    #[test]
    fn test_remove_on_success() {
        let notifier = Arc::new(RecordingNotifier::new());
        let limits = QueueLimits {
            max_files: 10,
            max_file_size: 1024,
            accepted_extensions: Vec::new(),
        };
        let queue = UploadQueue::with_limits(limits, true, notifier.clone());
        let id = queue.add("a.docx", vec![1]).unwrap();
        let files = queue.take_pending();

        queue.on_success(&files[0]);
        assert_eq!(queue.status(id), None);
        let notices = notifier.take();
        assert_eq!(notices[0].level, NoticeLevel::Success);
        assert_eq!(notices[0].title, SUCCESS_TITLE);
    }
}
