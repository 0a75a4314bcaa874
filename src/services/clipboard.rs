//! 剪贴板服务
//!
//! 把文本写入系统剪贴板。

use arboard::Clipboard;
use tracing::debug;

/// 剪贴板写入方
pub trait ClipboardWriter {
    fn write_text(&mut self, text: &str) -> Result<(), String>;
}

/// 系统剪贴板（arboard）
///
/// 每次写入时才打开剪贴板，无图形环境时写入失败而不是构造失败。
#[derive(Debug, Default)]
pub struct SystemClipboard;

impl ClipboardWriter for SystemClipboard {
    fn write_text(&mut self, text: &str) -> Result<(), String> {
        let mut clipboard = Clipboard::new().map_err(|e| format!("无法打开剪贴板: {}", e))?;
        clipboard
            .set_text(text)
            .map_err(|e| format!("写入剪贴板失败: {}", e))?;
        debug!("已复制 {} 个字符到剪贴板", text.chars().count());
        Ok(())
    }
}
