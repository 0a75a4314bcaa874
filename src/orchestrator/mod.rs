//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责批量上传和流程调度。
//!
//! ## 模块划分
//!
//! ### `upload_queue` - 上传队列
//! - 入队校验（数量、大小、类型），拒绝时立即通知
//! - 保存每个文件的状态（Idle / Uploading / Success / Error）
//! - 作为回调接收方，由批量上传驱动状态变化
//!
//! ### `batch_upload` - 批量上传编排器
//! - 每个文件一个独立请求，全部并发
//! - 进度换算为单调不减的百分比
//! - 单个失败转换为该文件的 `on_error`，不影响其他文件
//! - 可选的并发上限（Semaphore）
//!
//! ## 层次关系
//!
//! ```text
//! upload_queue (Vec<UploadItem>)
//!     ↓ take_pending
//! batch_upload (join_all 每个文件)
//!     ↓
//! clients::DocumentClient (单个请求)
//!     ↓
//! services::artifact (解析响应 / 下载)
//! ```

pub mod batch_upload;
pub mod upload_queue;

pub use batch_upload::{
    failure_reason, BatchOptions, BatchSummary, BatchUploader, FileOutcome, ProgressTracker,
    UploadHandlers,
};
pub use upload_queue::{QueueLimits, UploadQueue};
