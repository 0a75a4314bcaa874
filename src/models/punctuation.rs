//! 标点符号目录
//!
//! 两个有序集合：停顿符号（逗号、句号）以及包含停顿符号在内的全部标点。
//! 纯静态数据，供替换策略引擎使用。

use phf::{phf_ordered_set, OrderedSet};

/// 停顿符号（中英文逗号、句号、顿号）
pub static PAUSE_SYMBOLS: OrderedSet<&'static str> = phf_ordered_set! {
    "，", // 中文逗号
    ",",
    "。", // 中文句号
    ".",
    "、", // 顿号
};

/// 全部标点（停顿符号的严格超集）
pub static PUNCTUATION_MARKS: OrderedSet<&'static str> = phf_ordered_set! {
    // 停顿符号
    "，",
    ",",
    "。",
    ".",
    "、",
    // 感叹号
    "！",
    "!",
    // 问号
    "？",
    "?",
    // 分号
    "；",
    ";",
    // 冒号
    "：",
    ":",
    // 引号
    "\u{201C}",
    "\u{201D}",
    "\u{2018}",
    "\u{2019}",
    // 圆括号
    "（",
    "(",
    "）",
    ")",
    // 方括号
    "【",
    "[",
    "】",
    "]",
    // 书名号 / 尖括号
    "《",
    "<",
    "》",
    ">",
    // 其他
    "…",
    "—",
    "–",
    "-",
    "·",
};

/// 标点目录
///
/// 持有两个静态集合的引用，`all` 必须是 `pause` 的超集。
#[derive(Debug, Clone, Copy)]
pub struct PunctuationCatalog {
    pause: &'static OrderedSet<&'static str>,
    all: &'static OrderedSet<&'static str>,
}

impl PunctuationCatalog {
    /// 内置的中英文标点目录
    pub fn standard() -> Self {
        Self {
            pause: &PAUSE_SYMBOLS,
            all: &PUNCTUATION_MARKS,
        }
    }

    /// 停顿符号（按声明顺序）
    pub fn pause_symbols(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.pause.iter().copied()
    }

    /// 全部标点（按声明顺序）
    pub fn all_punctuation(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.all.iter().copied()
    }

    pub fn is_pause_symbol(&self, symbol: &str) -> bool {
        self.pause.contains(symbol)
    }

    pub fn is_punctuation(&self, symbol: &str) -> bool {
        self.all.contains(symbol)
    }
}

impl Default for PunctuationCatalog {
    fn default() -> Self {
        Self::standard()
    }
}
