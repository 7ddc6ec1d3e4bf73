pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use self::args::CliConfig;

#[cfg(feature = "cli")]
mod args {
    use crate::core::{Dimensions, QuoteRequest};
    use crate::utils::error::{PostalError, Result};
    use crate::utils::validation::{self, Validate};
    use clap::Parser;
    use serde::{Deserialize, Serialize};
    use std::path::PathBuf;

    #[derive(Debug, Clone, Serialize, Deserialize, Parser)]
    #[command(name = "epost-quote")]
    #[command(about = "Quote a postal shipment against the E-Post Office rate card")]
    pub struct CliConfig {
        /// Service tier code, e.g. standard_parcel or express_intl
        #[arg(long)]
        pub package_type: Option<String>,

        /// Declared weight in kg
        #[arg(long, allow_negative_numbers = true)]
        pub weight: Option<f64>,

        #[arg(long, allow_negative_numbers = true)]
        pub length: Option<f64>,

        #[arg(long, allow_negative_numbers = true)]
        pub width: Option<f64>,

        #[arg(long, allow_negative_numbers = true)]
        pub height: Option<f64>,

        /// Declared value for insurance and customs
        #[arg(long, allow_negative_numbers = true)]
        pub declared_value: Option<f64>,

        /// JSON file with an order-form body (packageType, weight, dimensions, customsDeclaration)
        #[arg(long, conflicts_with_all = ["package_type", "weight", "length", "width", "height", "declared_value"])]
        pub body: Option<PathBuf>,

        /// Print the rate card and exit
        #[arg(long)]
        pub rate_card: bool,

        /// Print machine-readable JSON
        #[arg(long)]
        pub json: bool,

        #[arg(long, help = "Enable verbose output")]
        pub verbose: bool,
    }

    impl CliConfig {
        fn dimensions(&self) -> Result<Option<Dimensions>> {
            match (self.length, self.width, self.height) {
                (None, None, None) => Ok(None),
                (Some(length), Some(width), Some(height)) => {
                    Ok(Some(Dimensions::new(length, width, height)))
                }
                (length, width, _) => {
                    let field = if length.is_none() {
                        "length"
                    } else if width.is_none() {
                        "width"
                    } else {
                        "height"
                    };
                    Err(PostalError::MissingConfigError {
                        field: field.to_string(),
                    })
                }
            }
        }

        /// Builds the engine request from flags. Not used with `--body`.
        pub fn to_request(&self) -> Result<QuoteRequest> {
            let tier_code = validation::validate_required_field("package-type", &self.package_type)?;
            let weight = validation::validate_required_field("weight", &self.weight)?;

            Ok(QuoteRequest {
                tier_code: tier_code.clone(),
                declared_weight_kg: *weight,
                dimensions_cm: self.dimensions()?,
                declared_value: self.declared_value,
            })
        }
    }

    impl Validate for CliConfig {
        fn validate(&self) -> Result<()> {
            if self.rate_card {
                return Ok(());
            }
            match &self.body {
                Some(path) => validation::validate_path("body", &path.to_string_lossy()),
                None => self.to_request().map(|_| ()),
            }
        }
    }

}
