use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 表格拉取错误（会话无法开始）
    #[error("拉取错误: {0}")]
    Fetch(#[from] FetchError),
    /// 答案键无法匹配选项（只影响单道题）
    #[error("答案解析错误: {0}")]
    Resolution(#[from] ResolutionError),
    /// 设置输入超出允许范围
    #[error("校验错误: {0}")]
    Validation(#[from] ValidationError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
    /// 其他错误（用于包装第三方库错误）
    #[error("错误: {0}")]
    Other(String),
}

/// 表格拉取错误
#[derive(Debug, Error)]
pub enum FetchError {
    /// 网络请求失败
    #[error("请求失败 ({endpoint}): {source}")]
    RequestFailed {
        endpoint: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// HTTP 状态码异常
    #[error("响应状态异常 ({endpoint}): {status}")]
    BadStatus { endpoint: String, status: u16 },
    /// 响应不是可识别的 setResponse(...) 包装
    #[error("无法解析表格响应: {reason}")]
    MalformedResponse { reason: String },
    /// 表格服务拒绝了查询
    #[error("查询被拒绝: {message}")]
    QueryRejected { message: String },
    /// 上一个请求尚未结束
    #[error("已有请求正在进行中")]
    RequestInFlight,
}

/// 答案解析错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolutionError {
    /// 选项文本无法拆分成至少两个选项
    #[error("选项格式错误: {reason} (原文: {variants})")]
    MalformedVariants { variants: String, reason: String },
    /// 答案键中的某个字母找不到对应选项
    #[error("无法在选项 [{options}] 中找到答案 {token} (答案键: {key})")]
    UnknownKey {
        key: String,
        token: String,
        options: String,
    },
    /// 答案键为空
    #[error("答案键为空")]
    EmptyKey,
}

/// 设置校验错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// 题目数量超出范围
    #[error("题目数量 {value} 超出范围 [{min}, {max}]")]
    QuestionCountOutOfRange { value: usize, min: usize, max: usize },
    /// 每题时间不能为 0
    #[error("每题时间必须大于 0")]
    TimePerQuestionZero,
    /// 每题时间超过上限
    #[error("每题时间 {value} 秒超过上限 {max} 秒")]
    TimePerQuestionOutOfRange { value: u64, max: u64 },
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 表格链接无法识别
    #[error("无法从链接中解析表格 ID: {url}")]
    InvalidSheetUrl { url: String },
    /// 设置文件解析失败
    #[error("设置文件解析失败 ({path}): {source}")]
    SetupParseFailed {
        path: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 文件读写失败
    #[error("文件操作失败 ({path}): {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

// ========== 从常见错误类型转换 ==========

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        let endpoint = err
            .url()
            .map(|u| u.to_string())
            .unwrap_or_default();
        AppError::Fetch(FetchError::RequestFailed {
            endpoint,
            source: Box::new(err),
        })
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Fetch(FetchError::MalformedResponse {
            reason: err.to_string(),
        })
    }
}

impl From<toml::de::Error> for AppError {
    fn from(err: toml::de::Error) -> Self {
        AppError::Config(ConfigError::SetupParseFailed {
            path: String::new(), // TOML错误通常不包含路径信息
            source: Box::new(err),
        })
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Config(ConfigError::Io {
            path: String::new(),
            source: err,
        })
    }
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建请求失败错误
    pub fn fetch_failed(
        endpoint: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::Fetch(FetchError::RequestFailed {
            endpoint: endpoint.into(),
            source: Box::new(source),
        })
    }

    /// 创建响应解析错误
    pub fn malformed_response(reason: impl Into<String>) -> Self {
        AppError::Fetch(FetchError::MalformedResponse {
            reason: reason.into(),
        })
    }

    /// 创建文件读写错误
    pub fn io_failed(path: impl Into<String>, source: std::io::Error) -> Self {
        AppError::Config(ConfigError::Io {
            path: path.into(),
            source,
        })
    }

    /// 是否是会话启动阶段的致命错误
    pub fn is_fatal(&self) -> bool {
        matches!(self, AppError::Fetch(_) | AppError::Config(_))
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
