use thiserror::Error;

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Invalid input for {field} ('{value}'): {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid configuration value for {field} ('{value}'): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Configuration,
    Io,
    Processing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl EtlError {
    pub fn invalid_input(
        field: impl Into<String>,
        value: impl ToString,
        reason: impl Into<String>,
    ) -> Self {
        EtlError::InvalidInput {
            field: field.into(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            EtlError::InvalidInput { .. } | EtlError::CsvError(_) => ErrorCategory::Input,
            EtlError::ConfigError { .. }
            | EtlError::ConfigValidationError { .. }
            | EtlError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            EtlError::IoError(_) | EtlError::ZipError(_) => ErrorCategory::Io,
            EtlError::SerializationError(_) | EtlError::ProcessingError { .. } => {
                ErrorCategory::Processing
            }
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // 檔案可能暫時被鎖住或尚未產生，重跑即可
            EtlError::IoError(_) => ErrorSeverity::Medium,
            EtlError::ZipError(_) => ErrorSeverity::Critical,
            _ => ErrorSeverity::High,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            EtlError::InvalidInput { .. } => {
                "Fix the offending row (amounts must be non-negative numbers, seniority one of Junior/Mid/Senior, category Standard/Premium) or rerun with invalid-record skipping enabled"
            }
            EtlError::CsvError(_) => {
                "Check that the input file has a header row and the same number of columns on every line"
            }
            EtlError::IoError(_) => {
                "Check that the input file exists and the output directory is writable, then retry"
            }
            EtlError::ZipError(_) => "Check free disk space and write permissions for the output archive",
            EtlError::SerializationError(_) => "Report this as a bug together with the input file",
            EtlError::ConfigError { .. }
            | EtlError::ConfigValidationError { .. }
            | EtlError::InvalidConfigValueError { .. } => {
                "Review the configuration file or command-line flags against the documented options"
            }
            EtlError::ProcessingError { .. } => "Rerun with --verbose to see which phase failed",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            EtlError::InvalidInput { field, value, reason } => {
                format!("A sales record is invalid: {} = '{}' ({})", field, value, reason)
            }
            EtlError::CsvError(e) => format!("The input file could not be read as CSV: {}", e),
            EtlError::IoError(e) => format!("A file operation failed: {}", e),
            EtlError::ConfigError { message } => format!("Configuration problem: {}", message),
            EtlError::ConfigValidationError { field, message } => {
                format!("Configuration problem in '{}': {}", field, message)
            }
            EtlError::InvalidConfigValueError { field, value, reason } => {
                format!("Configuration value '{}' for '{}' is not allowed: {}", value, field, reason)
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, EtlError>;
