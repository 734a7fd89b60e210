use thiserror::Error;

#[derive(Error, Debug)]
pub enum WatchError {
    #[error("HTTP client error: {0}")]
    ClientError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML serialization error: {0}")]
    TomlSerializeError(#[from] toml::ser::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value for {field}: '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration validation failed for {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Notification error: {message}")]
    NotificationError { message: String },

    #[error("Logger error: {message}")]
    LoggerError { message: String },
}

/// 單一查詢單位的抓取錯誤，只記錄不中斷迴圈
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("{url} [{status}] {body}")]
    Http { status: u16, url: String, body: String },

    #[error("{url}: {cause}")]
    Network { url: String, cause: String },

    #[error("{url}: invalid JSON body ({cause})")]
    Decode { url: String, cause: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Network,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl WatchError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            WatchError::ConfigError { .. }
            | WatchError::MissingConfigError { .. }
            | WatchError::InvalidConfigValueError { .. }
            | WatchError::ConfigValidationError { .. }
            | WatchError::TomlSerializeError(_) => ErrorCategory::Configuration,
            WatchError::ClientError(_) => ErrorCategory::Network,
            WatchError::IoError(_)
            | WatchError::NotificationError { .. }
            | WatchError::LoggerError { .. } => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // 通知失敗只影響顯示，下一輪仍會重試
            WatchError::NotificationError { .. } => ErrorSeverity::Low,
            WatchError::ClientError(_) => ErrorSeverity::Medium,
            WatchError::ConfigError { .. }
            | WatchError::MissingConfigError { .. }
            | WatchError::InvalidConfigValueError { .. }
            | WatchError::ConfigValidationError { .. }
            | WatchError::TomlSerializeError(_) => ErrorSeverity::High,
            WatchError::IoError(_) | WatchError::LoggerError { .. } => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            WatchError::MissingConfigError { field } => {
                format!("Add `{}` to the configuration file", field)
            }
            WatchError::InvalidConfigValueError { field, .. }
            | WatchError::ConfigValidationError { field, .. } => {
                format!("Check the value of `{}` in the configuration file", field)
            }
            WatchError::ConfigError { .. } | WatchError::TomlSerializeError(_) => {
                "Run `slot-notifier init` to generate a default configuration".to_string()
            }
            WatchError::ClientError(_) => {
                "Check network connectivity and the configured server address".to_string()
            }
            WatchError::NotificationError { .. } => {
                "Make sure a desktop notification service is running, or set notification.desktop = false"
                    .to_string()
            }
            WatchError::LoggerError { .. } | WatchError::IoError(_) => {
                "Check file permissions for the config and log directories".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Configuration => format!("Configuration problem: {}", self),
            ErrorCategory::Network => format!("Network problem: {}", self),
            ErrorCategory::System => format!("System problem: {}", self),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        WatchError::ConfigError {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, WatchError>;
