//! 展示层状态
//!
//! 只维护分页状态与页码摘要，不关心界面如何绘制。

pub mod pagination;
pub mod subtitle_viewer;

pub use pagination::{paginate, render_tokens, PageToken, DEFAULT_MAX_VISIBLE};
pub use subtitle_viewer::{SubtitleViewer, ViewerView};
