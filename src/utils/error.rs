use thiserror::Error;

/// Validation failures raised while quoting a shipment.
///
/// Every variant names the offending field so callers can render a message
/// next to the right form input.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum QuoteError {
    #[error("Invalid package type '{tier_code}'")]
    InvalidTier { tier_code: String },

    #[error("Invalid weight '{value}': weight must be a number greater than 0 kg")]
    InvalidWeight { value: String },

    #[error("Weight exceeds the {max_allowed} kg limit for package type '{tier_code}'")]
    WeightExceedsLimit { tier_code: String, max_allowed: f64 },

    #[error("Invalid {dimension} '{value}': dimensions must be numbers greater than 0 cm")]
    InvalidDimension {
        dimension: &'static str,
        value: String,
    },

    #[error("Invalid declared value '{value}': declared value must be a number not below 0")]
    InvalidDeclaredValue { value: String },
}

impl QuoteError {
    /// Name of the request field that failed validation.
    pub fn field(&self) -> &'static str {
        match self {
            QuoteError::InvalidTier { .. } => "tier_code",
            QuoteError::InvalidWeight { .. } | QuoteError::WeightExceedsLimit { .. } => {
                "declared_weight_kg"
            }
            QuoteError::InvalidDimension { dimension, .. } => *dimension,
            QuoteError::InvalidDeclaredValue { .. } => "declared_value",
        }
    }
}

#[derive(Error, Debug)]
pub enum PostalError {
    #[error("Quote rejected: {0}")]
    Quote(#[from] QuoteError),

    /// An order body turned away by the HTTP pricing step.
    #[error("Shipment rejected: {message}")]
    ShipmentRejected { message: String },

    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration '{field}'")]
    MissingConfigError { field: String },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Configuration,
    Storage,
    Processing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl PostalError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            PostalError::Quote(_) | PostalError::ShipmentRejected { .. } => {
                ErrorCategory::Validation
            }
            PostalError::ConfigValidationError { .. }
            | PostalError::InvalidConfigValueError { .. }
            | PostalError::MissingConfigError { .. } => ErrorCategory::Configuration,
            PostalError::IoError(_) | PostalError::ZipError(_) => ErrorCategory::Storage,
            PostalError::CsvError(_)
            | PostalError::SerializationError(_)
            | PostalError::ProcessingError { .. } => ErrorCategory::Processing,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Validation | ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Processing => ErrorSeverity::Medium,
            ErrorCategory::Storage => ErrorSeverity::Critical,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            PostalError::Quote(e) => e.to_string(),
            PostalError::ShipmentRejected { message } => message.clone(),
            PostalError::ConfigValidationError { field, message } => {
                format!("Configuration problem in '{}': {}", field, message)
            }
            PostalError::InvalidConfigValueError { field, reason, .. } => {
                format!("Configuration value '{}' is invalid: {}", field, reason)
            }
            PostalError::MissingConfigError { field } => {
                format!("Configuration value '{}' is required", field)
            }
            PostalError::IoError(e) => format!("Could not read or write a file: {}", e),
            PostalError::ZipError(e) => format!("Could not build the archive: {}", e),
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            PostalError::Quote(QuoteError::InvalidTier { .. }) => {
                "Use one of the package types listed by the rate card"
            }
            PostalError::Quote(QuoteError::WeightExceedsLimit { .. }) => {
                "Choose a heavier package type or split the shipment"
            }
            PostalError::Quote(_) | PostalError::ShipmentRejected { .. } => {
                "Correct the shipment details and quote again"
            }
            PostalError::ConfigValidationError { .. }
            | PostalError::InvalidConfigValueError { .. }
            | PostalError::MissingConfigError { .. } => {
                "Check the manifest file against the documented format"
            }
            PostalError::IoError(_) | PostalError::ZipError(_) => {
                "Check that the output path exists and is writable"
            }
            PostalError::CsvError(_)
            | PostalError::SerializationError(_)
            | PostalError::ProcessingError { .. } => "Re-run with --verbose and inspect the log",
        }
    }
}

impl From<toml::de::Error> for PostalError {
    fn from(e: toml::de::Error) -> Self {
        PostalError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        }
    }
}

pub type Result<T> = std::result::Result<T, PostalError>;
