use crate::core::{ConfigProvider, Dimensions, OutputFormat, QuoteRequest, ShipmentLine};
use crate::utils::error::{PostalError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

const VALID_FORMATS: [&str; 2] = ["csv", "json"];
const VALID_LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// A batch of shipments to quote, read from a TOML manifest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestConfig {
    pub batch: BatchConfig,
    pub output: OutputConfig,
    pub logging: Option<LoggingConfig>,
    #[serde(default)]
    pub shipments: Vec<ShipmentEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchConfig {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub path: String,
    pub formats: Vec<String>,
    pub compression: Option<CompressionConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompressionConfig {
    pub enabled: bool,
    pub filename: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: Option<String>,
    pub json: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShipmentEntry {
    pub reference: String,
    pub package_type: String,
    pub weight: f64,
    pub dimensions: Option<Dimensions>,
    pub declared_value: Option<f64>,
}

impl ShipmentEntry {
    pub fn to_line(&self) -> ShipmentLine {
        ShipmentLine {
            reference: self.reference.clone(),
            request: QuoteRequest {
                tier_code: self.package_type.clone(),
                declared_weight_kg: self.weight,
                dimensions_cm: self.dimensions,
                declared_value: self.declared_value,
            },
        }
    }
}

impl ManifestConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;
        Ok(toml::from_str(&processed_content)?)
    }

    /// Replaces `${VAR}` with the environment value; unset variables are left as is.
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| PostalError::ConfigValidationError {
            field: "env_substitution".to_string(),
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_non_empty_string("batch.name", &self.batch.name)?;
        validation::validate_path("output.path", &self.output.path)?;

        validation::validate_positive_number("output.formats", self.output.formats.len(), 1)?;
        validation::validate_allowed_values("output.formats", &self.output.formats, &VALID_FORMATS)?;

        if let Some(compression) = self.output.compression.as_ref().filter(|c| c.enabled) {
            validation::validate_non_empty_string("output.compression.filename", &compression.filename)?;
            if !compression.filename.ends_with(".zip") {
                return Err(PostalError::InvalidConfigValueError {
                    field: "output.compression.filename".to_string(),
                    value: compression.filename.clone(),
                    reason: "Archive name must end with .zip".to_string(),
                });
            }
        }

        if let Some(level) = self.logging.as_ref().and_then(|l| l.level.as_ref()) {
            validation::validate_allowed_values(
                "logging.level",
                std::slice::from_ref(level),
                &VALID_LOG_LEVELS,
            )?;
        }

        validation::validate_positive_number("shipments", self.shipments.len(), 1)?;

        let mut references = HashSet::new();
        for (index, shipment) in self.shipments.iter().enumerate() {
            let field = format!("shipments[{}].reference", index);
            validation::validate_non_empty_string(&field, &shipment.reference)?;
            if !references.insert(shipment.reference.as_str()) {
                return Err(PostalError::InvalidConfigValueError {
                    field,
                    value: shipment.reference.clone(),
                    reason: "Shipment references must be unique".to_string(),
                });
            }
        }

        Ok(())
    }

    pub fn output_path(&self) -> &str {
        &self.output.path
    }

    pub fn log_level(&self) -> Option<&str> {
        self.logging.as_ref().and_then(|l| l.level.as_deref())
    }

    pub fn json_logs(&self) -> bool {
        self.logging.as_ref().and_then(|l| l.json).unwrap_or(false)
    }
}

impl ConfigProvider for ManifestConfig {
    fn batch_name(&self) -> &str {
        &self.batch.name
    }

    fn output_path(&self) -> &str {
        &self.output.path
    }

    fn output_formats(&self) -> Vec<OutputFormat> {
        self.output
            .formats
            .iter()
            .filter_map(|f| match f.as_str() {
                "csv" => Some(OutputFormat::Csv),
                "json" => Some(OutputFormat::Json),
                _ => None,
            })
            .collect()
    }

    fn archive_name(&self) -> Option<&str> {
        self.output
            .compression
            .as_ref()
            .filter(|c| c.enabled)
            .map(|c| c.filename.as_str())
    }

    fn shipments(&self) -> Vec<ShipmentLine> {
        self.shipments.iter().map(ShipmentEntry::to_line).collect()
    }
}

impl Validate for ManifestConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
