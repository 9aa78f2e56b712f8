/// 校验服务 API 客户端
///
/// 唯一跨进程边界的组件：不重试，不解释校验结果
use crate::config::Config;
use crate::error::ServiceError;
use crate::models::{BatchVerifyRequest, BatchVerifyResponse, HealthStatus, VerificationUnit};
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

/// 批量校验能力
///
/// 返回的结果数量必须与 `units` 数量一致，否则视为 `ServiceError`
#[async_trait]
pub trait VerificationBackend: Send + Sync {
    async fn submit_batch(
        &self,
        units: &[VerificationUnit],
    ) -> Result<BatchVerifyResponse, ServiceError>;
}

/// 基于 reqwest 的校验服务客户端
pub struct VerifyClient {
    http: reqwest::Client,
    base_url: String,
    enable_parallel: bool,
    priority: String,
}

impl VerifyClient {
    /// 创建新的校验客户端，超时由底层 HTTP 客户端负责
    pub fn new(config: &Config) -> Result<Self, ServiceError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            enable_parallel: config.enable_parallel,
            priority: config.priority.clone(),
        })
    }

    /// 检查服务是否在线
    pub async fn health_check(&self) -> Result<HealthStatus, ServiceError> {
        let response = self.http.get(format!("{}/health", self.base_url)).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ServiceError::status(status.as_u16(), reason(status)));
        }
        response
            .json::<HealthStatus>()
            .await
            .map_err(|e| ServiceError::decode(status.as_u16(), e))
    }
}

#[async_trait]
impl VerificationBackend for VerifyClient {
    async fn submit_batch(
        &self,
        units: &[VerificationUnit],
    ) -> Result<BatchVerifyResponse, ServiceError> {
        let request = BatchVerifyRequest {
            citations: units,
            enable_parallel: self.enable_parallel,
            priority: &self.priority,
        };

        debug!("提交 {} 条引用到 {}/api/batch-verify", units.len(), self.base_url);

        let response = self
            .http
            .post(format!("{}/api/batch-verify", self.base_url))
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = if body.trim().is_empty() {
                reason(status)
            } else {
                format!("{}: {}", reason(status), body.trim())
            };
            return Err(ServiceError::status(status.as_u16(), message));
        }

        let parsed: BatchVerifyResponse = response
            .json()
            .await
            .map_err(|e| ServiceError::decode(status.as_u16(), e))?;

        if parsed.results.len() != units.len() {
            return Err(ServiceError::count_mismatch(
                status.as_u16(),
                units.len(),
                parsed.results.len(),
            ));
        }

        debug!("校验服务返回 {} 条结果", parsed.results.len());

        Ok(parsed)
    }
}

fn reason(status: reqwest::StatusCode) -> String {
    status
        .canonical_reason()
        .map(str::to_string)
        .unwrap_or_else(|| status.as_str().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let config = Config {
            api_base_url: "http://verify.local:8000/".to_string(),
            ..Config::default()
        };
        let client = VerifyClient::new(&config).unwrap();
        assert_eq!(client.base_url, "http://verify.local:8000");
    }

    #[tokio::test]
    async fn unreachable_service_is_a_transport_error() {
        let config = Config {
            api_base_url: "http://127.0.0.1:1".to_string(),
            request_timeout_secs: 2,
            ..Config::default()
        };
        let client = VerifyClient::new(&config).unwrap();
        let err = client
            .submit_batch(&[VerificationUnit::new("x")])
            .await
            .unwrap_err();
        assert_eq!(err.status_code, None);
    }
}
