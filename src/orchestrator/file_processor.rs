//! 单个文件处理器 - 编排层
//!
//! 驱动一个文件走完 提取 → 提交 → 记录结果，并把每一步写入进度记录器。
//! 任何失败都只落在本文件的记录上，不向上传播。

use crate::infrastructure::{checkpoint, ProgressTracker};
use crate::models::{ContentFormat, InputFile};
use crate::workflow::{FileCtx, FileFlow};
use tracing::{error, info, warn};

/// 单个文件的处理结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOutcome {
    Completed,
    Failed,
}

/// 处理单个文件
pub async fn process_file(
    flow: &FileFlow,
    tracker: &ProgressTracker,
    file: InputFile,
    format: ContentFormat,
    ctx: &FileCtx,
) -> FileOutcome {
    log_file_start(ctx);

    if let Err(e) = tracker.start(&ctx.file_id) {
        warn!("[文件 {}] ⚠️ 无法开始处理: {}", ctx.file_index, e);
        return FileOutcome::Failed;
    }

    // 提取后 file 被消费，字节内容不再保留
    let units = match flow.extract(file, format, ctx) {
        Ok(units) => units,
        Err(e) => {
            error!("[文件 {}] ❌ 提取失败: {}", ctx.file_index, e);
            return record_failure(tracker, ctx, e.to_string());
        }
    };
    record(tracker.advance(&ctx.file_id, checkpoint::EXTRACTED), ctx);

    let response = match flow.submit(&units, ctx).await {
        Ok(response) => response,
        Err(e) => {
            error!("[文件 {}] ❌ 校验请求失败: {}", ctx.file_index, e);
            return record_failure(tracker, ctx, e.to_string());
        }
    };
    record(tracker.advance(&ctx.file_id, checkpoint::RESPONDED), ctx);

    let result_count = response.results.len();
    match tracker.complete(&ctx.file_id, response) {
        Ok(()) => {
            info!("[文件 {}] ✅ 处理完成, 共 {} 条结果", ctx.file_index, result_count);
            FileOutcome::Completed
        }
        Err(e) => {
            error!("[文件 {}] 状态写入失败: {}", ctx.file_index, e);
            FileOutcome::Failed
        }
    }
}

fn record_failure(tracker: &ProgressTracker, ctx: &FileCtx, message: String) -> FileOutcome {
    record(tracker.fail(&ctx.file_id, message), ctx);
    FileOutcome::Failed
}

fn record(result: Result<(), crate::error::TrackerError>, ctx: &FileCtx) {
    if let Err(e) = result {
        error!("[文件 {}] 状态写入失败: {}", ctx.file_index, e);
    }
}

fn log_file_start(ctx: &FileCtx) {
    info!("{} 开始处理", ctx);
}
