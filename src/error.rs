use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 文件解析错误
    #[error("提取错误: {0}")]
    Extraction(#[from] ExtractionError),
    /// 校验服务错误
    #[error("服务错误: {0}")]
    Service(#[from] ServiceError),
    /// 不支持的文件格式
    #[error("格式错误: {0}")]
    FormatRejected(#[from] FormatRejectedError),
    /// 状态记录错误
    #[error("状态错误: {0}")]
    Tracker(#[from] TrackerError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
    /// 报告导出错误
    #[error("导出错误: {0}")]
    Export(String),
}

/// 文件内容无法按声明格式解析
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    /// JSON 语法错误
    #[error("Invalid JSON format: {0}")]
    InvalidJson(String),
    /// 内容不是合法的 UTF-8 文本
    #[error("File is not valid UTF-8 text")]
    InvalidUtf8,
}

/// 远程校验服务调用失败
///
/// `status_code` 为 `None` 表示请求根本没有拿到 HTTP 响应（连接失败、超时等）
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("API Error ({}): {message}", .status_code.map(|c| c.to_string()).unwrap_or_else(|| "transport".to_string()))]
pub struct ServiceError {
    pub status_code: Option<u16>,
    pub message: String,
}

impl ServiceError {
    /// 传输层错误（无 HTTP 状态码）
    pub fn transport(message: impl Into<String>) -> Self {
        Self {
            status_code: None,
            message: message.into(),
        }
    }

    /// 非 2xx 响应
    pub fn status(status_code: u16, message: impl Into<String>) -> Self {
        Self {
            status_code: Some(status_code),
            message: message.into(),
        }
    }

    /// 响应体无法解析
    pub fn decode(status_code: u16, source: impl std::fmt::Display) -> Self {
        Self::status(status_code, format!("invalid response body: {}", source))
    }

    /// 返回结果数量与请求数量不一致
    pub fn count_mismatch(status_code: u16, expected: usize, actual: usize) -> Self {
        Self::status(
            status_code,
            format!("expected {} results, service returned {}", expected, actual),
        )
    }
}

impl From<reqwest::Error> for ServiceError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => ServiceError::status(status.as_u16(), err.to_string()),
            None => ServiceError::transport(err.to_string()),
        }
    }
}

/// 入队时拒绝的文件
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unsupported file format: {file_name} ({content_type})")]
pub struct FormatRejectedError {
    pub file_name: String,
    pub content_type: String,
}

/// 状态记录器内部不变量被破坏
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TrackerError {
    #[error("unknown file id: {0}")]
    UnknownFile(String),
    #[error("illegal transition for {id}: {from} -> {to}")]
    IllegalTransition {
        id: String,
        from: &'static str,
        to: &'static str,
    },
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 读取配置文件失败
    #[error("无法读取配置文件 {path}: {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// TOML 解析失败
    #[error("配置文件解析失败 {path}: {source}")]
    ParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

impl From<csv::Error> for AppError {
    fn from(err: csv::Error) -> Self {
        AppError::Export(err.to_string())
    }
}

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_error_display_includes_status() {
        let err = ServiceError::status(503, "Service Unavailable");
        assert_eq!(err.to_string(), "API Error (503): Service Unavailable");

        let err = ServiceError::transport("connection refused");
        assert_eq!(err.to_string(), "API Error (transport): connection refused");
    }

    #[test]
    fn extraction_error_wraps_into_app_error() {
        let err: AppError = ExtractionError::InvalidUtf8.into();
        assert!(matches!(err, AppError::Extraction(ExtractionError::InvalidUtf8)));
    }
}
