pub mod batch;
pub mod pipeline;
pub mod pricing;

pub use crate::domain::model::{
    BatchResult, BatchSummary, Dimensions, LineOutcome, QuoteBreakdown, QuoteLine, QuoteRequest,
    QuoteResult, Scope, ServiceTier, ShipmentLine,
};
pub use crate::domain::ports::{ConfigProvider, OutputFormat, Pipeline, Storage};
pub use crate::utils::error::Result;
