use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 输入校验错误（远程调用之前拒绝）
    #[error("校验错误: {0}")]
    Validation(#[from] ValidationError),
    /// 传输错误（网络 / 非 2xx / 超时）
    #[error("传输错误: {0}")]
    Transfer(#[from] TransferError),
    /// 响应解码错误
    #[error("解码错误: {0}")]
    Decoding(#[from] DecodingError),
    /// 内部契约被破坏
    #[error("内部错误: {0}")]
    Precondition(#[from] PreconditionFault),
    /// 文件操作错误
    #[error("文件错误: {0}")]
    File(#[from] FileError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
}

/// 输入校验错误
#[derive(Debug, Error)]
pub enum ValidationError {
    /// 没有任何有效的 URL
    #[error("Please enter at least one YouTube URL")]
    EmptyUrlBatch,
    /// 文件数量超过上限
    #[error("Maximum {max_files} files allowed")]
    TooManyFiles { max_files: usize },
    /// 文件过大
    #[error("File too large ({size} bytes, max {max_size} bytes)")]
    FileTooLarge { size: u64, max_size: u64 },
    /// 文件类型不允许
    #[error("File type not accepted: {file_name}")]
    FileTypeNotAccepted { file_name: String },
}

/// 传输错误
#[derive(Debug, Error)]
pub enum TransferError {
    /// 网络请求失败
    #[error("{0}")]
    Network(#[from] reqwest::Error),
    /// 服务端返回非 2xx
    #[error("Request failed with status code {status}{}", format_server_message(.message))]
    Status { status: u16, message: String },
    /// 请求超时
    #[error("Request timed out")]
    Timeout,
    /// 其他传输层错误
    #[error("{0}")]
    Other(String),
}

fn format_server_message(message: &str) -> String {
    if message.trim().is_empty() {
        String::new()
    } else {
        format!(": {}", message.trim())
    }
}

/// 响应解码错误
#[derive(Debug, Error)]
pub enum DecodingError {
    /// 结构化响应无法解析
    #[error("无法解析结构化响应: {0}")]
    Json(#[from] serde_json::Error),
    /// 响应体不是合法的 UTF-8
    #[error("响应体不是合法的 UTF-8 文本")]
    InvalidText,
}

/// 内部契约被破坏（编程错误，不应被吞掉）
#[derive(Debug, Error)]
pub enum PreconditionFault {
    /// 响应没有负载
    #[error("响应没有负载，无法解析")]
    MissingPayload,
    /// 同一批次中出现重复的上传项
    #[error("上传项 {id} 在同一批次中重复出现")]
    DuplicateItem { id: u64 },
    /// 替换表无法序列化
    #[error("替换表无法序列化: {0}")]
    MapSerialization(String),
}

/// 文件操作错误
#[derive(Debug, Error)]
pub enum FileError {
    /// 读取文件失败
    #[error("读取文件失败 ({path}): {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// 写入文件失败
    #[error("写入文件失败 ({path}): {source}")]
    WriteFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 环境变量解析失败
    #[error("环境变量 {var_name} 解析失败: 值 '{value}' 无法转换为 {expected_type}")]
    EnvVarParseFailed {
        var_name: String,
        value: String,
        expected_type: String,
    },
    /// 配置文件解析失败
    #[error("配置文件解析失败 ({path}): {source}")]
    TomlParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建文件读取错误
    pub fn file_read_failed(path: impl Into<String>, source: std::io::Error) -> Self {
        AppError::File(FileError::ReadFailed {
            path: path.into(),
            source,
        })
    }

    /// 创建文件写入错误
    pub fn file_write_failed(path: impl Into<String>, source: std::io::Error) -> Self {
        AppError::File(FileError::WriteFailed {
            path: path.into(),
            source,
        })
    }

    /// 是否属于环境性失败（应在单项边界被转换为回调通知）
    pub fn is_environmental(&self) -> bool {
        matches!(
            self,
            AppError::Transfer(_) | AppError::Decoding(_) | AppError::File(_)
        )
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
