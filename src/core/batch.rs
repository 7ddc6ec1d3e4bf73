use crate::core::{BatchSummary, Pipeline};
use crate::utils::error::Result;

#[derive(Debug, Clone)]
pub struct BatchOutcome {
    pub output_path: String,
    pub summary: BatchSummary,
}

pub struct BatchEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> BatchEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub async fn run(&self) -> Result<BatchOutcome> {
        tracing::info!("Starting batch quote run");

        let lines = self.pipeline.extract().await?;
        tracing::info!("Extracted {} shipment lines", lines.len());

        let result = self.pipeline.transform(lines).await?;
        let summary = result.summary.clone();
        tracing::info!(
            "Quoted {} of {} shipments ({} rejected), grand total {:.2}",
            summary.quoted,
            summary.total_lines,
            summary.rejected,
            summary.grand_total
        );

        let output_path = self.pipeline.load(result).await?;
        tracing::info!("Output saved to: {}", output_path);

        Ok(BatchOutcome {
            output_path,
            summary,
        })
    }
}
