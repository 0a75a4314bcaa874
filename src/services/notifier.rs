//! 通知服务 - 业务能力层
//!
//! 替代界面上的 toast：核心只负责发出「成功 / 失败」通知，
//! 如何展示由实现方决定。

use std::sync::Mutex;
use tracing::{error, info};

/// 通知级别
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
}

/// 一条通知
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub title: String,
    pub description: Option<String>,
}

/// 通知接收方
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);

    fn success(&self, title: &str, description: Option<&str>) {
        self.notify(Notice {
            level: NoticeLevel::Success,
            title: title.to_string(),
            description: description.map(str::to_string),
        });
    }

    fn error(&self, title: &str, description: Option<&str>) {
        self.notify(Notice {
            level: NoticeLevel::Error,
            title: title.to_string(),
            description: description.map(str::to_string),
        });
    }
}

/// 写入 tracing 日志的通知
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notice: Notice) {
        let description = notice.description.unwrap_or_default();
        match notice.level {
            NoticeLevel::Success => info!("✅ {} {}", notice.title, description),
            NoticeLevel::Error => error!("❌ {} {}", notice.title, description),
        }
    }
}

/// 把通知记在内存里，便于界面层轮询或测试断言
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// 取出并清空已记录的通知
    pub fn take(&self) -> Vec<Notice> {
        match self.notices.lock() {
            Ok(mut notices) => notices.drain(..).collect(),
            Err(poisoned) => poisoned.into_inner().drain(..).collect(),
        }
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: Notice) {
        match self.notices.lock() {
            Ok(mut notices) => notices.push(notice),
            Err(poisoned) => poisoned.into_inner().push(notice),
        }
    }
}
