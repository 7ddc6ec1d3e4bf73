pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::http::{price_shipment, quote_from_json, Rejection, RequestContext};
pub use config::{cli::LocalStorage, toml_config::ManifestConfig};
pub use self::core::{
    batch::BatchEngine,
    pipeline::ManifestPipeline,
    pricing::{calculate, preview, quote, rate_card, resolve_tier, suggest_tier, validate},
};
pub use domain::model::{Dimensions, QuoteBreakdown, QuoteRequest, QuoteResult, Scope, ServiceTier};
pub use utils::error::{PostalError, QuoteError, Result};
