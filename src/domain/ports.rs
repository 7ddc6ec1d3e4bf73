use crate::domain::model::{BatchResult, ShipmentLine};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Csv,
    Json,
}

pub trait ConfigProvider: Send + Sync {
    fn batch_name(&self) -> &str;
    fn output_path(&self) -> &str;
    fn output_formats(&self) -> Vec<OutputFormat>;
    /// Archive filename when outputs should be zipped together.
    fn archive_name(&self) -> Option<&str>;
    fn shipments(&self) -> Vec<ShipmentLine>;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Vec<ShipmentLine>>;
    async fn transform(&self, lines: Vec<ShipmentLine>) -> Result<BatchResult>;
    async fn load(&self, result: BatchResult) -> Result<String>;
}
