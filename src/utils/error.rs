use thiserror::Error;

#[derive(Error, Debug)]
pub enum Story2TestError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("API returned {status}: {body}")]
    ApiStatusError { status: u16, body: String },

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value for {field} ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },

    #[error("Environment creation failed: {message}")]
    EnvCreationError { message: String },

    #[error("Dependency install failed: {message}")]
    DependencyInstallError { message: String },

    #[error("Launch failed: {message}")]
    LaunchError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Config,
    Data,
    Io,
    Process,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl Story2TestError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ApiError(_) | Self::ApiStatusError { .. } => ErrorCategory::Network,
            Self::ConfigError { .. }
            | Self::MissingConfigError { .. }
            | Self::InvalidConfigValueError { .. } => ErrorCategory::Config,
            Self::CsvError(_) | Self::SerializationError(_) | Self::ProcessingError { .. } => {
                ErrorCategory::Data
            }
            Self::IoError(_) | Self::ZipError(_) => ErrorCategory::Io,
            Self::EnvCreationError { .. }
            | Self::DependencyInstallError { .. }
            | Self::LaunchError { .. } => ErrorCategory::Process,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            // 網路錯誤通常重試即可恢復
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Config | ErrorCategory::Data | ErrorCategory::Process => {
                ErrorSeverity::High
            }
            ErrorCategory::Io => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            Self::ApiError(_) => "Check network connectivity and the API base URL".to_string(),
            Self::ApiStatusError { status: 401, .. } => {
                "Verify the API key (OPENAI_API_KEY or --api-key)".to_string()
            }
            Self::ApiStatusError { status: 429, .. } => {
                "Rate limited by the provider, wait a moment and retry".to_string()
            }
            Self::ApiStatusError { .. } => {
                "Inspect the response body and the provider status page".to_string()
            }
            Self::ConfigError { .. }
            | Self::MissingConfigError { .. }
            | Self::InvalidConfigValueError { .. } => {
                "Run with --help and review the flags or the TOML config file".to_string()
            }
            Self::ProcessingError { .. } => {
                "The model output was not usable, re-run the generation".to_string()
            }
            Self::CsvError(_) | Self::SerializationError(_) => {
                "Re-run the generation; report the raw output if it keeps failing".to_string()
            }
            Self::IoError(_) | Self::ZipError(_) => {
                "Check the output path exists and is writable".to_string()
            }
            Self::EnvCreationError { .. } => {
                "Make sure the Python interpreter is installed and on PATH".to_string()
            }
            Self::DependencyInstallError { .. } => {
                "Check the manifest path and network access to the package index".to_string()
            }
            Self::LaunchError { .. } => {
                "Check that the entry-point script exists and dependencies are installed"
                    .to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::ApiError(_) | Self::ApiStatusError { .. } => {
                format!("LLM API 呼叫失敗: {}", self)
            }
            Self::ConfigError { .. }
            | Self::MissingConfigError { .. }
            | Self::InvalidConfigValueError { .. } => format!("配置錯誤: {}", self),
            Self::ProcessingError { .. } => format!("模型輸出無法解析: {}", self),
            _ => self.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Story2TestError>;
