use crate::models::verification::VerificationResult;
use std::time::Duration;

/// 按结论分类的计数
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReportSummary {
    pub verified: usize,
    pub suspicious: usize,
    /// fake / url_broken / unknown
    pub failed: usize,
}

/// 处理失败的文件及原因
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileFailure {
    pub file_name: String,
    pub message: String,
}

/// 批次报告，只读，由进度快照重新计算得出
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchReport {
    pub results: Vec<VerificationResult>,
    pub summary: ReportSummary,
    pub failed_files: usize,
    pub errors: Vec<FileFailure>,
    pub elapsed: Duration,
}

impl BatchReport {
    pub fn total(&self) -> usize {
        self.results.len()
    }
}
