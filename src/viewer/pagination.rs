//! 页码摘要
//!
//! 首尾页固定显示，当前页附近保留一个滑动窗口，其余部分用省略号代替。

use std::fmt;

/// 默认最多显示的页码数
pub const DEFAULT_MAX_VISIBLE: usize = 5;

/// 页码摘要中的一个元素
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageToken {
    Page { number: usize, active: bool },
    Ellipsis,
}

impl PageToken {
    fn page(number: usize, current: usize) -> Self {
        PageToken::Page {
            number,
            active: number == current,
        }
    }
}

impl fmt::Display for PageToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageToken::Page {
                number,
                active: true,
            } => write!(f, "[{}]", number),
            PageToken::Page { number, .. } => write!(f, "{}", number),
            PageToken::Ellipsis => write!(f, "…"),
        }
    }
}

/// 生成页码摘要
///
/// 总页数不超过 `max_visible` 时列出全部页码。否则首页与末页固定，
/// 中间是以当前页为中心、宽度为 3 的窗口（靠近两端时向内平移），
/// `current > 3` 时首页之后加省略号，`current < total - 2` 时末页之前加省略号。
///
/// `current` 超出范围时按 `1..=total` 截断。
pub fn paginate(total: usize, current: usize, max_visible: usize) -> Vec<PageToken> {
    if total == 0 {
        return Vec::new();
    }
    let current = current.clamp(1, total);

    if total <= max_visible {
        return (1..=total).map(|n| PageToken::page(n, current)).collect();
    }

    let mut lo = current.saturating_sub(1).max(1);
    let mut hi = lo + 2;
    if hi > total {
        hi = total;
        lo = total.saturating_sub(2).max(1);
    }

    let mut tokens = vec![PageToken::page(1, current)];
    if current > 3 {
        tokens.push(PageToken::Ellipsis);
    }
    tokens.extend(
        (lo..=hi)
            .filter(|n| *n != 1 && *n != total)
            .map(|n| PageToken::page(n, current)),
    );
    if current + 2 < total {
        tokens.push(PageToken::Ellipsis);
    }
    tokens.push(PageToken::page(total, current));
    tokens
}

/// 渲染为一行文本，当前页加方括号
pub fn render_tokens(tokens: &[PageToken]) -> String {
    tokens
        .iter()
        .map(PageToken::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbers(tokens: &[PageToken]) -> Vec<Option<usize>> {
        tokens
            .iter()
            .map(|t| match t {
                PageToken::Page { number, .. } => Some(*number),
                PageToken::Ellipsis => None,
            })
            .collect()
    }

    #[test]
    fn test_window_near_end() {
        assert_eq!(
            numbers(&paginate(10, 10, 5)),
            vec![Some(1), None, Some(8), Some(9), Some(10)]
        );
        assert_eq!(
            numbers(&paginate(10, 8, 5)),
            vec![Some(1), None, Some(7), Some(8), Some(9), Some(10)]
        );
    }

    #[test]
    fn test_out_of_range_current_is_clamped() {
        assert_eq!(paginate(0, 1, 5), Vec::new());
        assert_eq!(paginate(4, 9, 5), paginate(4, 4, 5));
    }

    #[test]
    fn test_render_tokens() {
        assert_eq!(render_tokens(&paginate(10, 5, 5)), "1 … 4 [5] 6 … 10");
        assert_eq!(render_tokens(&paginate(2, 1, 5)), "[1] 2");
    }
}
