//! 字幕批次查看器
//!
//! 一次显示一段字幕文本，带翻页、页码摘要和复制功能。

use tracing::{debug, warn};

use crate::models::TextBatchResult;
use crate::services::{ClipboardWriter, Notifier};
use crate::viewer::pagination::{paginate, PageToken, DEFAULT_MAX_VISIBLE};

pub const EMPTY_MESSAGE: &str = "No subtitles available";
pub const COPY_SUCCESS: &str = "Subtitle copied to clipboard";
pub const COPY_FAILURE: &str = "Failed to copy subtitle";

/// 查看器当前应当呈现的内容
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewerView<'a> {
    /// 没有任何文本块时显示响应里的 message
    Empty { message: String },
    Page {
        title: String,
        text: &'a str,
        tokens: Vec<PageToken>,
        has_previous: bool,
        has_next: bool,
    },
}

/// 字幕批次查看器
///
/// `current_page` 始终满足 `1 <= current_page <= max(1, total_pages)`。
#[derive(Debug, Clone)]
pub struct SubtitleViewer {
    result: TextBatchResult,
    current_page: usize,
    max_visible: usize,
}

impl Default for SubtitleViewer {
    fn default() -> Self {
        Self::new(TextBatchResult::default())
    }
}

impl SubtitleViewer {
    pub fn new(result: TextBatchResult) -> Self {
        Self {
            result,
            current_page: 1,
            max_visible: DEFAULT_MAX_VISIBLE,
        }
    }

    pub fn with_max_visible(mut self, max_visible: usize) -> Self {
        self.max_visible = max_visible;
        self
    }

    /// 替换数据源，当前页回到 1
    pub fn set_result(&mut self, result: TextBatchResult) {
        debug!("字幕查看器载入 {} 段文本", result.texts().len());
        self.result = result;
        self.current_page = 1;
    }

    pub fn result(&self) -> &TextBatchResult {
        &self.result
    }

    pub fn total_pages(&self) -> usize {
        self.result.texts().len()
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    /// 跳转到第 `page` 页；超出 `1..=total_pages` 时不做任何事
    pub fn go_to(&mut self, page: usize) {
        if page >= 1 && page <= self.total_pages() {
            self.current_page = page;
        }
    }

    pub fn next(&mut self) {
        self.go_to(self.current_page + 1);
    }

    pub fn previous(&mut self) {
        if self.current_page > 1 {
            self.go_to(self.current_page - 1);
        }
    }

    pub fn has_previous(&self) -> bool {
        self.current_page > 1
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages()
    }

    pub fn current_text(&self) -> Option<&str> {
        self.result
            .texts()
            .get(self.current_page - 1)
            .map(String::as_str)
    }

    pub fn title(&self) -> String {
        if self.total_pages() > 1 {
            format!("Subtitle ({} / {})", self.current_page, self.total_pages())
        } else {
            "Subtitle".to_string()
        }
    }

    pub fn tokens(&self) -> Vec<PageToken> {
        paginate(self.total_pages(), self.current_page, self.max_visible)
    }

    pub fn view(&self) -> ViewerView<'_> {
        match self.current_text() {
            Some(text) => ViewerView::Page {
                title: self.title(),
                text,
                tokens: self.tokens(),
                has_previous: self.has_previous(),
                has_next: self.has_next(),
            },
            None => {
                let message = self.result.message.trim();
                ViewerView::Empty {
                    message: if message.is_empty() {
                        EMPTY_MESSAGE.to_string()
                    } else {
                        message.to_string()
                    },
                }
            }
        }
    }

    /// 把当前页文本复制到剪贴板，结果通过通知报告
    pub fn copy_current(&self, clipboard: &mut dyn ClipboardWriter, notifier: &dyn Notifier) {
        let Some(text) = self.current_text() else {
            warn!("没有可复制的字幕");
            notifier.error(COPY_FAILURE, None);
            return;
        };

        match clipboard.write_text(text) {
            Ok(()) => notifier.success(COPY_SUCCESS, None),
            Err(e) => {
                warn!("复制字幕失败: {}", e);
                notifier.error(COPY_FAILURE, Some(&e));
            }
        }
    }
}
