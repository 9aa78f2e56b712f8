//! 编排层（Orchestration Layer）
//!
//! ## 模块划分
//!
//! ### `batch_processor` - 批量文件处理器
//! - 入队与格式校验
//! - 控制并发数量（Semaphore）
//! - 取消
//! - 对外提供快照、报告和 CSV 导出
//!
//! ### `file_processor` - 单个文件处理器
//! - 驱动单个文件走完 提取 → 提交
//! - 写入该文件的进度记录
//!
//! ## 层次关系
//!
//! ```text
//! batch_processor (处理 Vec<InputFile>)
//!     ↓
//! file_processor (处理单个 InputFile)
//!     ↓
//! workflow::FileFlow (提取 / 提交)
//!     ↓
//! services (UnitExtractor) + clients (VerificationBackend)
//! ```

pub mod batch_processor;
pub mod file_processor;

pub use batch_processor::{BatchProcessor, EnqueueOutcome, ProcessingStats, CANCELLED_MESSAGE};
pub use file_processor::{process_file, FileOutcome};
