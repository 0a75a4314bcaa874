use crate::error::{AppError, AppResult, ConfigError};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// 程序配置
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 远程处理服务地址
    pub api_base_url: String,
    /// 单次请求超时（秒）
    pub request_timeout_secs: u64,
    /// 同时上传的文件数量（0 表示不限制）
    pub max_concurrent_uploads: usize,
    /// 单批最多文件数
    pub max_files: usize,
    /// 单个文件大小上限（字节）
    pub max_file_size: u64,
    /// 允许的扩展名（为空表示不限制）
    pub accepted_extensions: Vec<String>,
    /// 成功后是否自动下载结果
    pub auto_download: bool,
    /// 成功后是否自动移出队列
    pub remove_on_success: bool,
    /// 下载目录
    pub download_dir: PathBuf,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    /// 输出日志文件
    pub output_log_file: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8000".to_string(),
            request_timeout_secs: 300,
            max_concurrent_uploads: 0,
            max_files: 10,
            max_file_size: 5 * 1024 * 1024,
            accepted_extensions: Vec::new(),
            auto_download: true,
            remove_on_success: false,
            download_dir: PathBuf::from("downloads"),
            verbose_logging: false,
            output_log_file: "output.txt".to_string(),
        }
    }
}

impl Config {
    /// 加载配置：默认值 → TOML 文件（可选）→ 环境变量
    pub fn load(path: Option<&Path>) -> AppResult<Self> {
        let base = match path {
            Some(path) => Self::from_toml_file(path)?,
            None => Self::default(),
        };
        base.with_env()
    }

    /// 从 TOML 文件读取，缺省字段使用默认值
    pub fn from_toml_file(path: &Path) -> AppResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| AppError::file_read_failed(path.display().to_string(), e))?;
        Self::from_toml_str(&content).map_err(|source| {
            ConfigError::TomlParseFailed {
                path: path.display().to_string(),
                source,
            }
            .into()
        })
    }

    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    pub fn from_env() -> AppResult<Self> {
        Self::default().with_env()
    }

    /// 用环境变量覆盖已有配置
    pub fn with_env(self) -> AppResult<Self> {
        Ok(Self {
            api_base_url: std::env::var("API_BASE_URL").unwrap_or(self.api_base_url),
            request_timeout_secs: env_parsed("REQUEST_TIMEOUT_SECS", "u64")?
                .unwrap_or(self.request_timeout_secs),
            max_concurrent_uploads: env_parsed("MAX_CONCURRENT_UPLOADS", "usize")?
                .unwrap_or(self.max_concurrent_uploads),
            max_files: env_parsed("MAX_FILES", "usize")?.unwrap_or(self.max_files),
            max_file_size: env_parsed("MAX_FILE_SIZE", "u64")?.unwrap_or(self.max_file_size),
            accepted_extensions: std::env::var("ACCEPTED_EXTENSIONS")
                .ok()
                .map(|v| parse_extensions(&v))
                .unwrap_or(self.accepted_extensions),
            auto_download: env_parsed("AUTO_DOWNLOAD", "bool")?.unwrap_or(self.auto_download),
            remove_on_success: env_parsed("REMOVE_ON_SUCCESS", "bool")?
                .unwrap_or(self.remove_on_success),
            download_dir: std::env::var("DOWNLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or(self.download_dir),
            verbose_logging: env_parsed("VERBOSE_LOGGING", "bool")?
                .unwrap_or(self.verbose_logging),
            output_log_file: std::env::var("OUTPUT_LOG_FILE").unwrap_or(self.output_log_file),
        })
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// 并发上限，`None` 表示全部立即派发
    pub fn concurrency_limit(&self) -> Option<usize> {
        (self.max_concurrent_uploads > 0).then_some(self.max_concurrent_uploads)
    }
}

fn env_parsed<T: std::str::FromStr>(var_name: &str, expected_type: &str) -> AppResult<Option<T>> {
    match std::env::var(var_name) {
        Ok(value) => value.trim().parse().map(Some).map_err(|_| {
            ConfigError::EnvVarParseFailed {
                var_name: var_name.to_string(),
                value,
                expected_type: expected_type.to_string(),
            }
            .into()
        }),
        Err(_) => Ok(None),
    }
}

/// 解析逗号分隔的扩展名列表，统一为小写且不带点
pub fn parse_extensions(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|ext| ext.trim().trim_start_matches('.').to_ascii_lowercase())
        .filter(|ext| !ext.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = Config::from_toml_str(
            r#"
            api_base_url = "https://tools.example.com"
            max_concurrent_uploads = 3
            accepted_extensions = ["docx"]
            "#,
        )
        .unwrap();

        assert_eq!(config.api_base_url, "https://tools.example.com");
        assert_eq!(config.concurrency_limit(), Some(3));
        assert_eq!(config.accepted_extensions, vec!["docx".to_string()]);
        assert_eq!(config.max_files, 10);
        assert!(config.auto_download);
    }

    #[test]
    fn test_default_is_unbounded() {
        assert_eq!(Config::default().concurrency_limit(), None);
    }

    #[test]
    fn test_parse_extensions() {
        assert_eq!(
            parse_extensions(" .DOCX, pdf ,,"),
            vec!["docx".to_string(), "pdf".to_string()]
        );
    }
}
