//! 报告汇总与导出 - 业务能力层
//!
//! 报告总是从进度快照重新计算，不做增量维护

use crate::error::AppResult;
use crate::models::{
    BatchReport, FileFailure, FileProgress, FileStatus, ReportSummary, VerificationResult,
    VerificationStatus,
};
use std::time::Duration;

/// CSV 表头
pub const CSV_HEADER: [&str; 4] = ["Citation", "Status", "Confidence", "Reasoning"];

/// 根据快照生成报告
///
/// 只收录 `Completed` 记录的结果；`Error` 记录单独计数并保留原因
pub fn build_report(snapshot: &[FileProgress], elapsed: Duration) -> BatchReport {
    let results: Vec<VerificationResult> = snapshot
        .iter()
        .filter(|p| p.status == FileStatus::Completed)
        .filter_map(|p| p.result.as_ref())
        .flat_map(|response| response.results.iter().cloned())
        .collect();

    let errors: Vec<FileFailure> = snapshot
        .iter()
        .filter(|p| p.status == FileStatus::Error)
        .map(|p| FileFailure {
            file_name: p.name.clone(),
            message: p.error_message.clone().unwrap_or_default(),
        })
        .collect();

    BatchReport {
        summary: summarize(&results),
        failed_files: errors.len(),
        errors,
        results,
        elapsed,
    }
}

/// 按结论分类计数
pub fn summarize(results: &[VerificationResult]) -> ReportSummary {
    results.iter().fold(ReportSummary::default(), |mut summary, r| {
        match r.status {
            VerificationStatus::Verified => summary.verified += 1,
            VerificationStatus::Suspicious => summary.suspicious += 1,
            VerificationStatus::Fake
            | VerificationStatus::UrlBroken
            | VerificationStatus::Unknown => summary.failed += 1,
        }
        summary
    })
}

/// 导出 CSV，每条结果一行
pub fn export_csv(report: &BatchReport) -> AppResult<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Necessary)
        .from_writer(Vec::new());

    writer.write_record(CSV_HEADER)?;
    for result in &report.results {
        let confidence = result.confidence.to_string();
        writer.write_record([
            result.citation.as_str(),
            result.status.as_str(),
            confidence.as_str(),
            result.rationale.as_deref().unwrap_or_default(),
        ])?;
    }

    writer
        .into_inner()
        .map_err(|e| crate::error::AppError::Export(e.to_string()))
}
