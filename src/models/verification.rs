//! 校验服务的请求 / 响应结构
//!
//! 字段命名与服务端 JSON 保持一致（snake_case）。结果只做透传，不解释各层含义。

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// 一条待校验的引用
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationUnit {
    #[serde(rename = "citation_text")]
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doi: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

impl VerificationUnit {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            doi: None,
            url: None,
            context: None,
        }
    }
}

/// 总体校验结论
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationStatus {
    Verified,
    Suspicious,
    Fake,
    UrlBroken,
    #[serde(other)]
    Unknown,
}

impl VerificationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            VerificationStatus::Verified => "verified",
            VerificationStatus::Suspicious => "suspicious",
            VerificationStatus::Fake => "fake",
            VerificationStatus::UrlBroken => "url_broken",
            VerificationStatus::Unknown => "unknown",
        }
    }
}

/// 单层校验结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerResult {
    pub status: String,
    #[serde(default)]
    pub details: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map<String, Value>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationLayers {
    pub url_validation: LayerResult,
    pub metadata_check: LayerResult,
    pub content_verification: LayerResult,
    pub ai_scoring: LayerResult,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub citation_graph: Option<LayerResult>,
}

/// 一条引用的校验结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationResult {
    pub citation: String,
    pub status: VerificationStatus,
    /// 0-100
    pub confidence: f64,
    #[serde(rename = "verification_layers")]
    pub layers: VerificationLayers,
    #[serde(rename = "ai_reasoning", default, skip_serializing_if = "Option::is_none")]
    pub rationale: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<Value>,
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

/// POST /api/batch-verify 请求体
#[derive(Debug, Clone, Serialize)]
pub struct BatchVerifyRequest<'a> {
    pub citations: &'a [VerificationUnit],
    pub enable_parallel: bool,
    pub priority: &'a str,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchSummary {
    #[serde(default)]
    pub verified: usize,
    #[serde(default)]
    pub suspicious: usize,
    #[serde(default)]
    pub failed: usize,
}

/// POST /api/batch-verify 响应体
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchVerifyResponse {
    #[serde(alias = "total_count")]
    pub total_citations: usize,
    pub results: Vec<VerificationResult>,
    #[serde(default)]
    pub summary: BatchSummary,
    #[serde(default, alias = "processing_time_ms")]
    pub processing_time: f64,
    #[serde(default)]
    pub timestamp: String,
}

impl BatchVerifyResponse {
    /// 零条引用对应的响应
    pub fn empty() -> Self {
        Self {
            total_citations: 0,
            results: Vec::new(),
            summary: BatchSummary::default(),
            processing_time: 0.0,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// GET /health 响应体
#[derive(Debug, Clone, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub timestamp: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn layer(status: &str) -> Value {
        json!({ "status": status, "details": "ok" })
    }

    #[test]
    fn response_passes_layers_through_untouched() {
        let body = json!({
            "total_citations": 1,
            "results": [{
                "citation": "Smith (2020)",
                "status": "url_broken",
                "confidence": 42.5,
                "verification_layers": {
                    "url_validation": { "status": "failed", "details": "404", "confidence": 0.0, "metadata": { "code": 404 } },
                    "metadata_check": layer("passed"),
                    "content_verification": layer("skipped"),
                    "ai_scoring": layer("passed")
                },
                "ai_reasoning": "broken link",
                "metadata": { "source": "crossref" }
            }],
            "summary": { "verified": 0, "suspicious": 0, "failed": 1 },
            "processing_time": 12.0,
            "timestamp": "2024-01-01T00:00:00Z"
        });

        let response: BatchVerifyResponse = serde_json::from_value(body).unwrap();
        let result = &response.results[0];
        assert_eq!(result.status, VerificationStatus::UrlBroken);
        assert_eq!(result.layers.url_validation.status, "failed");
        assert_eq!(result.layers.url_validation.metadata.as_ref().unwrap()["code"], json!(404));
        assert!(result.layers.citation_graph.is_none());
        assert_eq!(result.rationale.as_deref(), Some("broken link"));
        assert_eq!(result.metadata["source"], json!("crossref"));
    }

    #[test]
    fn unrecognised_status_maps_to_unknown() {
        let status: VerificationStatus = serde_json::from_value(json!("pending_review")).unwrap();
        assert_eq!(status, VerificationStatus::Unknown);
    }

    #[test]
    fn request_omits_absent_hints() {
        let units = vec![VerificationUnit::new("A. Author, Title, 2021")];
        let request = BatchVerifyRequest {
            citations: &units,
            enable_parallel: true,
            priority: "balanced",
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            json!({
                "citations": [{ "citation_text": "A. Author, Title, 2021" }],
                "enable_parallel": true,
                "priority": "balanced"
            })
        );
    }
}
