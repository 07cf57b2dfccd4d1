use thiserror::Error;

#[derive(Error, Debug)]
pub enum MigrateError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("CSV report error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Input data error: {message}")]
    InputDataError { message: String },

    #[error("No {entity} mapping for source id {id}")]
    MappingError { entity: String, id: String },

    #[error("Copy step '{step}' failed: {details}")]
    CopyError { step: String, details: String },

    #[error("Report generation error: {message}")]
    ReportError { message: String },
}

pub type Result<T> = std::result::Result<T, MigrateError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Io,
    Config,
    Data,
}

impl MigrateError {
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            MigrateError::ApiError(_) => ErrorSeverity::Medium,
            MigrateError::IoError(_) => ErrorSeverity::Critical,
            MigrateError::SerializationError(_)
            | MigrateError::CsvError(_)
            | MigrateError::ConfigValidationError { .. }
            | MigrateError::InvalidConfigValueError { .. }
            | MigrateError::InputDataError { .. }
            | MigrateError::MappingError { .. }
            | MigrateError::CopyError { .. }
            | MigrateError::ReportError { .. } => ErrorSeverity::High,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            MigrateError::ApiError(_) => ErrorCategory::Network,
            MigrateError::IoError(_) => ErrorCategory::Io,
            MigrateError::ConfigValidationError { .. }
            | MigrateError::InvalidConfigValueError { .. } => ErrorCategory::Config,
            _ => ErrorCategory::Data,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            MigrateError::ApiError(_) => {
                "Check network connectivity and the account API tokens, then re-run"
            }
            MigrateError::IoError(_) => "Check filesystem permissions and available disk space",
            MigrateError::SerializationError(_) => {
                "The platform returned an unexpected payload; verify the API version"
            }
            MigrateError::CsvError(_) | MigrateError::ReportError { .. } => {
                "Check that the report output path is writable"
            }
            MigrateError::ConfigValidationError { .. }
            | MigrateError::InvalidConfigValueError { .. } => {
                "Fix the configuration file and re-run"
            }
            MigrateError::InputDataError { .. } | MigrateError::MappingError { .. } => {
                "Regenerate the input files with create-inputs and re-run"
            }
            MigrateError::CopyError { .. } => {
                "Inspect the step failure above; the run record was not written"
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            MigrateError::ApiError(e) => format!("A platform API call failed: {}", e),
            MigrateError::IoError(e) => format!("A file operation failed: {}", e),
            MigrateError::MappingError { entity, id } => format!(
                "Source {} id {} has no target-account mapping (inputs are stale)",
                entity, id
            ),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_and_category_mapping() {
        let err = MigrateError::InputDataError {
            message: "empty".to_string(),
        };
        assert_eq!(err.severity(), ErrorSeverity::High);
        assert_eq!(err.category(), ErrorCategory::Data);

        let err = MigrateError::InvalidConfigValueError {
            field: "source.api_url".to_string(),
            value: "ftp://x".to_string(),
            reason: "scheme".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Config);
    }

    #[test]
    fn test_mapping_error_message_names_entity() {
        let err = MigrateError::MappingError {
            entity: "user".to_string(),
            id: "7".to_string(),
        };
        assert!(err.user_friendly_message().contains("user id 7"));
    }
}
