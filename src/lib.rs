//! # Citation Batch
//!
//! 批量引用校验管线：接收多个上传文件，提取引用，按并发上限提交到远程校验服务，
//! 跟踪每个文件的处理状态，并汇总导出报告。
//!
//! ## 架构设计
//!
//! ### ① 基础设施层（Infrastructure / Clients）
//! - `clients/` - `VerificationBackend` 与 HTTP 实现 `VerifyClient`，唯一跨进程边界
//! - `infrastructure/` - `ProgressTracker`，持有所有文件的进度记录，只暴露快照
//!
//! ### ② 业务能力层（Services）
//! - `UnitExtractor` - 把文件拆成待校验引用
//! - `report` - 由快照生成报告、导出 CSV
//!
//! ### ③ 流程层（Workflow）
//! - `FileFlow` - 单个文件的 提取 → 提交
//! - `FileCtx` - 上下文封装（文件 ID + 序号）
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/batch_processor` - 入队、并发、取消、报告
//! - `orchestrator/file_processor` - 单个文件的状态推进
//!
//! ## 模块结构

pub mod clients;
pub mod config;
pub mod error;
pub mod infrastructure;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use clients::{VerificationBackend, VerifyClient};
pub use config::Config;
pub use error::{AppError, AppResult, ExtractionError, FormatRejectedError, ServiceError};
pub use infrastructure::ProgressTracker;
pub use models::{
    BatchReport, BatchVerifyResponse, FileProgress, FileStatus, InputFile, VerificationResult,
    VerificationStatus, VerificationUnit,
};
pub use orchestrator::{BatchProcessor, EnqueueOutcome, ProcessingStats};
pub use workflow::{FileCtx, FileFlow};
