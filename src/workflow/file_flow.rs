//! 单文件处理流程 - 流程层
//!
//! 定义"一个文件"的处理步骤：提取引用 → 提交校验。
//! 不持有进度状态，状态写入由编排层负责。

use std::sync::Arc;
use tracing::{debug, info};

use crate::clients::VerificationBackend;
use crate::error::{ExtractionError, ServiceError};
use crate::models::{BatchVerifyResponse, ContentFormat, InputFile, VerificationUnit};
use crate::services::UnitExtractor;
use crate::utils::logging::truncate_text;
use crate::workflow::file_ctx::FileCtx;

/// 单文件处理流程
pub struct FileFlow {
    extractor: UnitExtractor,
    backend: Arc<dyn VerificationBackend>,
    verbose_logging: bool,
}

impl FileFlow {
    pub fn new(backend: Arc<dyn VerificationBackend>) -> Self {
        Self {
            extractor: UnitExtractor::new(),
            backend,
            verbose_logging: false,
        }
    }

    pub fn with_verbose_logging(mut self, verbose: bool) -> Self {
        self.verbose_logging = verbose;
        self
    }

    /// 提取引用，消费文件；返回后原始字节即被释放
    pub fn extract(
        &self,
        file: InputFile,
        format: ContentFormat,
        ctx: &FileCtx,
    ) -> Result<Vec<VerificationUnit>, ExtractionError> {
        debug!("[文件 {}] 格式: {:?}, 大小: {} bytes", ctx.file_index, format, file.size());

        let units = self.extractor.extract(&file, format)?;
        info!("[文件 {}] ✓ 提取到 {} 条引用", ctx.file_index, units.len());

        if self.verbose_logging {
            for (i, unit) in units.iter().take(3).enumerate() {
                info!("[文件 {}]   {}. {}", ctx.file_index, i + 1, truncate_text(&unit.text, 80));
            }
        }
        Ok(units)
    }

    /// 提交校验；没有引用时直接返回空结果，不访问服务
    pub async fn submit(
        &self,
        units: &[VerificationUnit],
        ctx: &FileCtx,
    ) -> Result<BatchVerifyResponse, ServiceError> {
        if units.is_empty() {
            info!("[文件 {}] ⏭️ 没有可校验的引用，跳过提交", ctx.file_index);
            return Ok(BatchVerifyResponse::empty());
        }

        info!("[文件 {}] 📤 正在提交 {} 条引用...", ctx.file_index, units.len());
        let response = self.backend.submit_batch(units).await?;
        info!(
            "[文件 {}] ✓ 校验完成: 通过 {}, 可疑 {}, 失败 {}",
            ctx.file_index,
            response.summary.verified,
            response.summary.suspicious,
            response.summary.failed
        );
        Ok(response)
    }
}
