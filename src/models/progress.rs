use crate::models::verification::BatchVerifyResponse;
use std::fmt;

/// 文件处理状态: pending -> processing -> {completed | error}
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileStatus {
    Pending,
    Processing,
    Completed,
    Error,
}

impl FileStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FileStatus::Pending => "pending",
            FileStatus::Processing => "processing",
            FileStatus::Completed => "completed",
            FileStatus::Error => "error",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, FileStatus::Completed | FileStatus::Error)
    }

    /// 是否允许从 `self` 迁移到 `next`
    pub fn can_transition_to(&self, next: FileStatus) -> bool {
        match (self, next) {
            (FileStatus::Pending, FileStatus::Processing) => true,
            // 取消时尚未开始的文件直接结束
            (FileStatus::Pending, FileStatus::Error) => true,
            (FileStatus::Processing, FileStatus::Processing) => true,
            (FileStatus::Processing, FileStatus::Completed) => true,
            (FileStatus::Processing, FileStatus::Error) => true,
            _ => false,
        }
    }
}

impl fmt::Display for FileStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 单个文件的进度记录
///
/// `result` 仅在 `Completed` 时存在，`error_message` 仅在 `Error` 时存在
#[derive(Debug, Clone, PartialEq)]
pub struct FileProgress {
    pub id: String,
    pub name: String,
    pub status: FileStatus,
    pub percent_complete: u8,
    pub result: Option<BatchVerifyResponse>,
    pub error_message: Option<String>,
}

impl FileProgress {
    pub fn pending(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            status: FileStatus::Pending,
            percent_complete: 0,
            result: None,
            error_message: None,
        }
    }
}
