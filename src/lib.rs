//! # Doc Toolbox
//!
//! 批量文档标点替换与字幕下载的客户端
//!
//! ## 架构设计
//!
//! 本系统采用分层架构：
//!
//! ### ① 数据模型层（Models）
//! - `models/` - 标点目录、上传项、响应结果
//! - `PunctuationCatalog` - 停顿符号与全部标点两个有序集合
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"
//! - `replacement` - 策略选择与替换表生成
//! - `artifact` - 响应解析、文件名提取、落地下载
//! - `Notifier` / `ClipboardWriter` - 通知与剪贴板
//!
//! ### ③ 客户端层（Clients）
//! - `clients/` - `Transport` 接口及 reqwest 实现
//! - `DocumentClient` - 文档替换接口
//! - `SubtitleClient` - 字幕批次接口
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/upload_queue` - 上传队列与状态
//! - `orchestrator/batch_upload` - 批量并发上传，单项隔离
//!
//! ### ⑤ 展示状态（Viewer）
//! - `viewer/` - 字幕分页与页码摘要
//!
//! ## 模块结构

pub mod app;
pub mod cli;
pub mod clients;
pub mod config;
pub mod error;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod viewer;

// 重新导出常用类型
pub use app::App;
pub use config::Config;
pub use error::{AppError, AppResult};
pub use models::{PunctuationCatalog, TransferResult, UploadFile, UploadId, UploadStatus};
pub use orchestrator::{BatchUploader, UploadHandlers, UploadQueue};
pub use services::{build_map, select_policy, ReplacementMap, ReplacementPolicy};
pub use viewer::{paginate, PageToken, SubtitleViewer};
