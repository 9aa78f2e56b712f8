use crate::error::ConfigError;
use serde::Deserialize;
use std::path::Path;

/// 程序配置文件
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 同时处理的文件数量（同时在途的校验请求上限）
    pub max_concurrent_files: usize,
    /// 校验服务地址
    pub api_base_url: String,
    /// 单次请求超时（秒）
    pub request_timeout_secs: u64,
    /// 是否允许服务端并行处理
    pub enable_parallel: bool,
    /// 校验优先级: speed | balanced | accuracy
    pub priority: String,
    /// 待处理文件存放目录
    pub input_folder: String,
    /// 导出的 CSV 报告路径
    pub output_csv: String,
    /// 日志过滤规则（RUST_LOG 优先）
    pub log_filter: String,
    /// 是否显示详细日志（打印提取到的引用预览）
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_concurrent_files: 4,
            api_base_url: "http://localhost:8000".to_string(),
            request_timeout_secs: 120,
            enable_parallel: true,
            priority: "balanced".to_string(),
            input_folder: "input".to_string(),
            output_csv: "batch-results.csv".to_string(),
            log_filter: "info".to_string(),
            verbose_logging: false,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// 从 TOML 文件加载配置，缺省字段使用默认值，环境变量仍然优先
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFailed {
            path: path.display().to_string(),
            source,
        })?;
        let config: Config = toml::from_str(&content).map_err(|source| ConfigError::ParseFailed {
            path: path.display().to_string(),
            source,
        })?;
        Ok(config.with_env_overrides())
    }

    /// 实际使用的并发上限，至少为 1
    pub fn concurrency_cap(&self) -> usize {
        self.max_concurrent_files.max(1)
    }

    fn with_env_overrides(self) -> Self {
        Self {
            max_concurrent_files: env_parsed("MAX_CONCURRENT_FILES")
                .unwrap_or(self.max_concurrent_files),
            api_base_url: std::env::var("VERIFY_API_URL").unwrap_or(self.api_base_url),
            request_timeout_secs: env_parsed("REQUEST_TIMEOUT_SECS")
                .unwrap_or(self.request_timeout_secs),
            enable_parallel: env_parsed("ENABLE_PARALLEL").unwrap_or(self.enable_parallel),
            priority: std::env::var("VERIFY_PRIORITY").unwrap_or(self.priority),
            input_folder: std::env::var("INPUT_FOLDER").unwrap_or(self.input_folder),
            output_csv: std::env::var("OUTPUT_CSV").unwrap_or(self.output_csv),
            log_filter: std::env::var("LOG_FILTER").unwrap_or(self.log_filter),
            verbose_logging: env_parsed("VERBOSE_LOGGING").unwrap_or(self.verbose_logging),
        }
    }
}

/// 读取并解析环境变量，缺失或无法解析时返回 `None`
fn env_parsed<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn toml_file_fills_missing_keys_with_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "max_concurrent_files = 8").unwrap();
        writeln!(file, "priority = \"accuracy\"").unwrap();

        let config = Config::from_toml_file(file.path()).unwrap();
        assert_eq!(config.max_concurrent_files, 8);
        assert_eq!(config.priority, "accuracy");
        assert_eq!(config.request_timeout_secs, Config::default().request_timeout_secs);
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "max_concurrent_files = [").unwrap();

        let err = Config::from_toml_file(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::ParseFailed { .. }));
    }

    #[test]
    fn zero_concurrency_is_clamped() {
        let config = Config {
            max_concurrent_files: 0,
            ..Config::default()
        };
        assert_eq!(config.concurrency_cap(), 1);
    }
}
