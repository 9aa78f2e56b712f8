//! 进度记录器 - 基础设施层
//!
//! 持有所有文件的 `FileProgress`，只暴露"读快照"和"订阅变更"的能力。
//! 写操作仅对 crate 内可见，由编排层独占调用。

use crate::error::TrackerError;
use crate::models::{BatchVerifyResponse, FileProgress, FileStatus};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tokio::sync::watch;

/// 进度检查点
pub mod checkpoint {
    pub const STARTED: u8 = 10;
    pub const EXTRACTED: u8 = 50;
    pub const RESPONDED: u8 = 90;
    pub const DONE: u8 = 100;
}

#[derive(Default)]
struct TrackerState {
    records: Vec<FileProgress>,
    index: HashMap<String, usize>,
}

/// 进度记录器
///
/// 记录按入队顺序保存；每次变更后版本号加一，观察者收到通知后自行读取快照
pub struct ProgressTracker {
    state: Mutex<TrackerState>,
    version: watch::Sender<u64>,
}

impl ProgressTracker {
    pub fn new() -> Self {
        let (version, _) = watch::channel(0);
        Self {
            state: Mutex::new(TrackerState::default()),
            version,
        }
    }

    /// 所有记录的拷贝
    pub fn snapshot(&self) -> Vec<FileProgress> {
        self.lock().records.clone()
    }

    pub fn get(&self, id: &str) -> Option<FileProgress> {
        let state = self.lock();
        state.index.get(id).map(|&i| state.records[i].clone())
    }

    pub fn len(&self) -> usize {
        self.lock().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 所有记录都已进入终态
    pub fn is_settled(&self) -> bool {
        self.lock().records.iter().all(|p| p.status.is_terminal())
    }

    /// 订阅变更通知，值为当前版本号
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.version.subscribe()
    }

    // ========== 写操作（仅编排层使用） ==========

    pub(crate) fn register(&self, id: &str, name: &str) {
        {
            let mut state = self.lock();
            if state.index.contains_key(id) {
                return;
            }
            let position = state.records.len();
            state.records.push(FileProgress::pending(id, name));
            state.index.insert(id.to_string(), position);
        }
        self.bump();
    }

    pub(crate) fn start(&self, id: &str) -> Result<(), TrackerError> {
        self.update(id, FileStatus::Processing, |p| {
            p.percent_complete = checkpoint::STARTED;
        })
    }

    pub(crate) fn advance(&self, id: &str, percent: u8) -> Result<(), TrackerError> {
        self.update(id, FileStatus::Processing, |p| {
            p.percent_complete = p.percent_complete.max(percent.min(checkpoint::RESPONDED));
        })
    }

    pub(crate) fn complete(
        &self,
        id: &str,
        response: BatchVerifyResponse,
    ) -> Result<(), TrackerError> {
        self.update(id, FileStatus::Completed, |p| {
            p.percent_complete = checkpoint::DONE;
            p.result = Some(response);
        })
    }

    pub(crate) fn fail(&self, id: &str, message: impl Into<String>) -> Result<(), TrackerError> {
        let message = message.into();
        self.update(id, FileStatus::Error, |p| {
            p.error_message = Some(message);
        })
    }

    fn update(
        &self,
        id: &str,
        next: FileStatus,
        apply: impl FnOnce(&mut FileProgress),
    ) -> Result<(), TrackerError> {
        {
            let mut state = self.lock();
            let position = *state
                .index
                .get(id)
                .ok_or_else(|| TrackerError::UnknownFile(id.to_string()))?;
            let record = &mut state.records[position];
            if !record.status.can_transition_to(next) {
                return Err(TrackerError::IllegalTransition {
                    id: id.to_string(),
                    from: record.status.as_str(),
                    to: next.as_str(),
                });
            }
            record.status = next;
            apply(record);
        }
        self.bump();
        Ok(())
    }

    fn bump(&self) {
        self.version.send_modify(|v| *v += 1);
    }

    fn lock(&self) -> MutexGuard<'_, TrackerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for ProgressTracker {
    fn default() -> Self {
        Self::new()
    }
}
