use thiserror::Error;

#[derive(Error, Debug)]
pub enum SiteError {
    #[error("Store request failed: {0}")]
    StoreUnavailable(#[from] reqwest::Error),

    #[error("Store rejected the request ({status}): {message}")]
    StoreRejected { status: u16, message: String },

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Validation error in {field}: {message}")]
    ValidationError { field: String, message: String },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid configuration value for {field} ('{value}'): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Store,
    Config,
    Processing,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl SiteError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            SiteError::ValidationError { .. } => ErrorCategory::Validation,
            SiteError::StoreUnavailable(_) | SiteError::StoreRejected { .. } => {
                ErrorCategory::Store
            }
            SiteError::ConfigError { .. }
            | SiteError::MissingConfigError { .. }
            | SiteError::InvalidConfigValueError { .. } => ErrorCategory::Config,
            SiteError::ProcessingError { .. } | SiteError::SerializationError(_) => {
                ErrorCategory::Processing
            }
            SiteError::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            SiteError::ValidationError { .. } => ErrorSeverity::Low,
            SiteError::StoreUnavailable(_) => ErrorSeverity::Medium,
            SiteError::StoreRejected { status, .. } if *status >= 500 => ErrorSeverity::Medium,
            SiteError::StoreRejected { .. } | SiteError::ProcessingError { .. } => {
                ErrorSeverity::High
            }
            SiteError::ConfigError { .. }
            | SiteError::MissingConfigError { .. }
            | SiteError::InvalidConfigValueError { .. } => ErrorSeverity::High,
            SiteError::SerializationError(_) | SiteError::IoError(_) => ErrorSeverity::Critical,
        }
    }

    /// 所有對 store 的寫入都是冪等或帶過濾條件的，傳輸層錯誤一律可重試
    pub fn is_retryable(&self) -> bool {
        match self {
            SiteError::StoreUnavailable(_) => true,
            SiteError::StoreRejected { status, .. } => *status >= 500,
            _ => false,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            SiteError::ValidationError { message, .. } => message.clone(),
            SiteError::StoreUnavailable(_) => {
                "Could not reach the data service. Please try again.".to_string()
            }
            SiteError::StoreRejected { .. } => {
                "The data service rejected the request.".to_string()
            }
            SiteError::ConfigError { message } => format!("Configuration problem: {}", message),
            SiteError::MissingConfigError { field } => {
                format!("Missing configuration: {}", field)
            }
            SiteError::InvalidConfigValueError { field, reason, .. } => {
                format!("Invalid configuration for {}: {}", field, reason)
            }
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            SiteError::ValidationError { .. } => {
                "Fix the highlighted input and submit again".to_string()
            }
            SiteError::StoreUnavailable(_) => {
                "Check network connectivity and the store URL, then retry (safe to retry)"
                    .to_string()
            }
            SiteError::StoreRejected { status, .. } if *status == 401 || *status == 403 => {
                "Check the API key and row-level security policies".to_string()
            }
            SiteError::StoreRejected { .. } => {
                "Inspect the store response and the request filters".to_string()
            }
            SiteError::ConfigError { .. }
            | SiteError::MissingConfigError { .. }
            | SiteError::InvalidConfigValueError { .. } => {
                "Review the configuration file or CLI flags".to_string()
            }
            _ => "Re-run with --verbose for details".to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SiteError>;
