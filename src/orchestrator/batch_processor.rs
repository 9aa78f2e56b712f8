//! 批量文件处理器 - 编排层
//!
//! ## 职责
//!
//! 对外暴露整个批处理管线：入队、运行、取消、读取快照、生成报告、导出 CSV。
//!
//! ## 核心功能
//!
//! 1. **入队校验**：不支持的格式在入队时直接拒绝，不产生进度记录
//! 2. **并发控制**：使用 Semaphore 限制同时在途的文件数量
//! 3. **故障隔离**：每个文件独立运行在自己的任务中，失败只记录在自己的进度上
//! 4. **取消**：取消后不再启动新的文件，已发出的请求自然结束
//! 5. **单写者**：只有本层写入 `ProgressTracker`，外部只能读快照
//! 6. **全局统计**：汇总所有文件的处理结果

use crate::clients::VerificationBackend;
use crate::config::Config;
use crate::error::{AppResult, FormatRejectedError};
use crate::infrastructure::ProgressTracker;
use crate::models::{BatchReport, ContentFormat, FileProgress, InputFile};
use crate::orchestrator::file_processor::{self, FileOutcome};
use crate::services::report;
use crate::utils::logging;
use crate::workflow::{FileCtx, FileFlow};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};
use tokio::sync::{watch, Semaphore};
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

/// 取消后尚未开始的文件记录的错误信息
pub const CANCELLED_MESSAGE: &str = "batch cancelled";

/// 入队结果
#[derive(Debug, Default)]
pub struct EnqueueOutcome {
    /// 已接受文件的 ID，按入队顺序
    pub accepted: Vec<String>,
    pub rejected: Vec<FormatRejectedError>,
}

/// 处理统计
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ProcessingStats {
    pub total: usize,
    pub completed: usize,
    pub failed: usize,
    pub rejected: usize,
    pub cancelled: bool,
}

struct QueuedFile {
    file: InputFile,
    format: ContentFormat,
    ctx: FileCtx,
}

#[derive(Default)]
struct Timing {
    started: Option<Instant>,
    finished: Option<Instant>,
}

/// 批量处理器
pub struct BatchProcessor {
    config: Config,
    flow: Arc<FileFlow>,
    tracker: Arc<ProgressTracker>,
    queue: Mutex<VecDeque<QueuedFile>>,
    /// 所有运行共享的并发名额
    permits: Arc<Semaphore>,
    cancelled: AtomicBool,
    next_index: AtomicUsize,
    timing: Mutex<Timing>,
}

impl BatchProcessor {
    /// 使用指定的校验后端创建
    pub fn new(config: Config, backend: Arc<dyn VerificationBackend>) -> Self {
        let flow = FileFlow::new(backend).with_verbose_logging(config.verbose_logging);
        let permits = Arc::new(Semaphore::new(config.concurrency_cap()));
        Self {
            config,
            flow: Arc::new(flow),
            tracker: Arc::new(ProgressTracker::new()),
            queue: Mutex::new(VecDeque::new()),
            permits,
            cancelled: AtomicBool::new(false),
            next_index: AtomicUsize::new(1),
            timing: Mutex::new(Timing::default()),
        }
    }

    /// 入队文件，不支持的格式直接拒绝
    pub fn enqueue(&self, files: Vec<InputFile>) -> EnqueueOutcome {
        let mut outcome = EnqueueOutcome::default();

        for file in files {
            let format = match file.format() {
                Ok(format) => format,
                Err(e) => {
                    warn!("⚠️ 拒绝文件 {}: {}", file.name, e);
                    outcome.rejected.push(e);
                    continue;
                }
            };

            let file_index = self.next_index.fetch_add(1, Ordering::SeqCst);
            let ctx = FileCtx::new(file.id.clone(), file_index, file.name.clone());
            self.tracker.register(&file.id, &file.name);
            outcome.accepted.push(file.id.clone());
            self.lock_queue().push_back(QueuedFile { file, format, ctx });
        }

        outcome
    }

    /// 处理队列中的文件，直到队列为空且已启动的文件都进入终态
    ///
    /// 运行期间新入队的文件也会被处理。已取消时，队列中的文件直接记为失败。
    pub async fn run(&self) -> ProcessingStats {
        let mut stats = ProcessingStats::default();
        let queued = self.lock_queue().len();
        if queued == 0 {
            warn!("⚠️ 队列为空，没有需要处理的文件");
            return stats;
        }

        self.mark_started();
        logging::log_batch_start(queued, self.config.concurrency_cap());

        loop {
            let mut handles = Vec::new();

            while let Some(item) = self.next_queued() {
                stats.total += 1;

                if self.is_cancelled() {
                    stats.cancelled = true;
                    self.abandon(item, CANCELLED_MESSAGE);
                    continue;
                }

                let permit = match self.permits.clone().acquire_owned().await {
                    Ok(permit) => permit,
                    Err(e) => {
                        error!("并发控制失败: {}", e);
                        self.abandon(item, &e.to_string());
                        continue;
                    }
                };

                // 等待名额期间可能已被取消
                if self.is_cancelled() {
                    drop(permit);
                    stats.cancelled = true;
                    self.abandon(item, CANCELLED_MESSAGE);
                    continue;
                }

                let flow = self.flow.clone();
                let tracker = self.tracker.clone();
                let file_id = item.ctx.file_id.clone();
                let file_index = item.ctx.file_index;

                let handle = tokio::spawn(async move {
                    let _permit = permit;
                    file_processor::process_file(&flow, &tracker, item.file, item.format, &item.ctx)
                        .await
                });
                handles.push((file_id, file_index, handle));
            }

            if handles.is_empty() {
                break;
            }
            stats.completed += self.join_all(handles).await;
        }

        if stats.cancelled {
            warn!("⏹️ 批次已取消，未开始的文件不再处理");
        }
        // 未启动的文件同样计为失败
        stats.failed = stats.total - stats.completed;

        self.mark_finished();
        logging::print_final_stats(stats.completed, stats.failed, stats.total, self.elapsed());

        stats
    }

    /// 等待一轮任务结束，返回成功数
    async fn join_all(&self, handles: Vec<(String, usize, JoinHandle<FileOutcome>)>) -> usize {
        let outcomes = futures::future::join_all(
            handles
                .into_iter()
                .map(|(id, index, handle)| async move { (id, index, handle.await) }),
        )
        .await;

        let mut completed = 0;
        for (file_id, file_index, joined) in outcomes {
            match joined {
                Ok(FileOutcome::Completed) => completed += 1,
                Ok(FileOutcome::Failed) => {}
                Err(e) => {
                    error!("[文件 {}] 任务执行失败: {}", file_index, e);
                    if let Err(e) = self.tracker.fail(&file_id, format!("task failed: {}", e)) {
                        error!("[文件 {}] 状态写入失败: {}", file_index, e);
                    }
                }
            }
        }
        completed
    }

    /// 入队并运行
    pub async fn run_batch(&self, files: Vec<InputFile>) -> ProcessingStats {
        let enqueued = self.enqueue(files);
        let mut stats = self.run().await;
        stats.rejected = enqueued.rejected.len();
        stats
    }

    /// 请求取消：已发出的请求继续，尚未开始的文件不再启动
    ///
    /// 取消状态一直保持，直到调用 [`BatchProcessor::resume`]
    pub fn cancel(&self) {
        info!("⏹️ 收到取消请求");
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// 清除取消状态，之后的 `run` 会重新启动队列中的文件
    pub fn resume(&self) {
        info!("▶️ 恢复处理");
        self.cancelled.store(false, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// 当前所有文件进度的只读快照
    pub fn snapshot(&self) -> Vec<FileProgress> {
        self.tracker.snapshot()
    }

    /// 订阅进度变更
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.tracker.subscribe()
    }

    /// 根据当前快照生成报告，运行中也可调用
    pub fn report(&self) -> BatchReport {
        report::build_report(&self.tracker.snapshot(), self.elapsed())
    }

    pub fn export_csv(&self) -> AppResult<Vec<u8>> {
        report::export_csv(&self.report())
    }

    /// 从首次运行开始的耗时；运行中按当前时间计算
    pub fn elapsed(&self) -> Duration {
        let timing = self.timing.lock().unwrap_or_else(PoisonError::into_inner);
        match timing.started {
            Some(started) => timing.finished.unwrap_or_else(Instant::now).duration_since(started),
            None => Duration::ZERO,
        }
    }

    fn abandon(&self, item: QueuedFile, reason: &str) {
        if let Err(e) = self.tracker.fail(&item.ctx.file_id, reason) {
            error!("[文件 {}] 状态写入失败: {}", item.ctx.file_index, e);
        }
    }

    fn next_queued(&self) -> Option<QueuedFile> {
        self.lock_queue().pop_front()
    }

    fn mark_started(&self) {
        let mut timing = self.timing.lock().unwrap_or_else(PoisonError::into_inner);
        if timing.started.is_none() {
            timing.started = Some(Instant::now());
        }
        timing.finished = None;
    }

    fn mark_finished(&self) {
        let mut timing = self.timing.lock().unwrap_or_else(PoisonError::into_inner);
        timing.finished = Some(Instant::now());
    }

    fn lock_queue(&self) -> MutexGuard<'_, VecDeque<QueuedFile>> {
        self.queue.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
