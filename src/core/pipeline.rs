use crate::core::pricing::{self, round2};
use crate::core::{
    BatchResult, BatchSummary, ConfigProvider, LineOutcome, OutputFormat, Pipeline, QuoteLine,
    ShipmentLine, Storage,
};
use crate::utils::error::{PostalError, Result};
use serde::Serialize;
use std::io::Write;
use zip::write::{FileOptions, ZipWriter};

pub const CSV_FILENAME: &str = "quotes.csv";
pub const JSON_FILENAME: &str = "quotes.json";

const CSV_HEADER: [&str; 10] = [
    "reference",
    "tier_code",
    "status",
    "base_rate",
    "weight_charge",
    "volume_charge",
    "insurance_charge",
    "international_surcharge",
    "total",
    "error",
];

#[derive(Serialize)]
struct BatchReport<'a> {
    generated_at: String,
    summary: &'a BatchSummary,
    lines: &'a [QuoteLine],
}

pub struct ManifestPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
}

impl<S: Storage, C: ConfigProvider> ManifestPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self { storage, config }
    }

    fn quote_line(line: ShipmentLine) -> QuoteLine {
        let outcome = match pricing::quote(&line.request) {
            Ok(quote) => LineOutcome::Quoted { quote },
            Err(e) => {
                tracing::debug!("Shipment {} rejected: {}", line.reference, e);
                LineOutcome::Rejected {
                    field: e.field().to_string(),
                    message: e.to_string(),
                }
            }
        };

        QuoteLine {
            reference: line.reference,
            tier_code: line.request.tier_code,
            outcome,
        }
    }

    fn render_csv(lines: &[QuoteLine]) -> Result<String> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(CSV_HEADER)?;

        for line in lines {
            let mut record = vec![line.reference.clone(), line.tier_code.clone()];
            match &line.outcome {
                LineOutcome::Quoted { quote } => {
                    let b = quote.breakdown();
                    record.push("quoted".to_string());
                    for amount in [
                        b.base_rate,
                        b.weight_charge,
                        b.volume_charge,
                        b.insurance_charge,
                        b.international_surcharge,
                        b.total,
                    ] {
                        record.push(format!("{:.2}", amount));
                    }
                    record.push(String::new());
                }
                LineOutcome::Rejected { message, .. } => {
                    record.push("rejected".to_string());
                    record.extend(std::iter::repeat(String::new()).take(6));
                    record.push(message.clone());
                }
            }
            writer.write_record(&record)?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| PostalError::ProcessingError {
                message: format!("Failed to flush CSV output: {}", e),
            })?;
        String::from_utf8(bytes).map_err(|e| PostalError::ProcessingError {
            message: format!("CSV output is not valid UTF-8: {}", e),
        })
    }

    fn outputs(&self, result: &BatchResult) -> Vec<(&'static str, String)> {
        self.config
            .output_formats()
            .into_iter()
            .map(|format| match format {
                OutputFormat::Csv => (CSV_FILENAME, result.csv_output.clone()),
                OutputFormat::Json => (JSON_FILENAME, result.json_output.clone()),
            })
            .collect()
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for ManifestPipeline<S, C> {
    async fn extract(&self) -> Result<Vec<ShipmentLine>> {
        let lines = self.config.shipments();
        if lines.is_empty() {
            tracing::warn!("Manifest '{}' has no shipments", self.config.batch_name());
        }
        tracing::debug!("Read {} shipment lines from manifest", lines.len());
        Ok(lines)
    }

    async fn transform(&self, lines: Vec<ShipmentLine>) -> Result<BatchResult> {
        let total_lines = lines.len();
        let lines: Vec<QuoteLine> = lines.into_iter().map(Self::quote_line).collect();

        let quoted: Vec<f64> = lines.iter().filter_map(|l| l.quote()).map(|q| q.total).collect();
        let summary = BatchSummary {
            batch_name: self.config.batch_name().to_string(),
            total_lines,
            quoted: quoted.len(),
            rejected: total_lines - quoted.len(),
            grand_total: round2(quoted.iter().sum()),
        };

        let csv_output = Self::render_csv(&lines)?;
        let report = BatchReport {
            generated_at: chrono::Utc::now().to_rfc3339(),
            summary: &summary,
            lines: &lines,
        };
        let json_output = serde_json::to_string_pretty(&report)?;

        Ok(BatchResult {
            lines,
            summary,
            csv_output,
            json_output,
        })
    }

    async fn load(&self, result: BatchResult) -> Result<String> {
        let outputs = self.outputs(&result);
        let output_path = self.config.output_path();

        if let Some(archive_name) = self.config.archive_name() {
            tracing::debug!("Creating ZIP file with {} files", outputs.len());

            let zip_data = {
                let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));
                for (name, content) in &outputs {
                    zip.start_file::<_, ()>(*name, FileOptions::default())?;
                    zip.write_all(content.as_bytes())?;
                }
                let cursor = zip.finish()?;
                cursor.into_inner()
            };

            tracing::debug!("Writing ZIP file ({} bytes) to storage", zip_data.len());
            self.storage.write_file(archive_name, &zip_data).await?;
            return Ok(format!("{}/{}", output_path, archive_name));
        }

        for (name, content) in &outputs {
            tracing::debug!("Writing {} ({} bytes) to storage", name, content.len());
            self.storage.write_file(name, content.as_bytes()).await?;
        }
        Ok(output_path.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::QuoteRequest;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Clone)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    }

    impl MockStorage {
        fn new() -> Self {
            Self {
                files: Arc::new(Mutex::new(HashMap::new())),
            }
        }

        async fn get_file(&self, path: &str) -> Option<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned()
        }
    }

    impl Storage for MockStorage {
        async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            let mut files = self.files.lock().await;
            files.insert(path.to_string(), data.to_vec());
            Ok(())
        }
    }

    struct MockConfig {
        formats: Vec<OutputFormat>,
        archive: Option<String>,
        shipments: Vec<ShipmentLine>,
    }

    impl MockConfig {
        fn new(shipments: Vec<ShipmentLine>) -> Self {
            Self {
                formats: vec![OutputFormat::Csv, OutputFormat::Json],
                archive: None,
                shipments,
            }
        }
    }

    impl ConfigProvider for MockConfig {
        fn batch_name(&self) -> &str {
            "test-batch"
        }

        fn output_path(&self) -> &str {
            "test_output"
        }

        fn output_formats(&self) -> Vec<OutputFormat> {
            self.formats.clone()
        }

        fn archive_name(&self) -> Option<&str> {
            self.archive.as_deref()
        }

        fn shipments(&self) -> Vec<ShipmentLine> {
            self.shipments.clone()
        }
    }

    fn line(reference: &str, request: QuoteRequest) -> ShipmentLine {
        ShipmentLine {
            reference: reference.to_string(),
            request,
        }
    }

    fn sample_lines() -> Vec<ShipmentLine> {
        vec![
            line(
                "ORD-1",
                QuoteRequest::new("standard_parcel", 0.5)
                    .with_dimensions(10.0, 10.0, 10.0)
                    .with_declared_value(0.0),
            ),
            line("ORD-2", QuoteRequest::new("bulk_shipment", 20.01)),
            line("ORD-3", QuoteRequest::new("basic_letter", 0.1)),
        ]
    }

    #[tokio::test]
    async fn test_extract_returns_manifest_lines() {
        let pipeline = ManifestPipeline::new(MockStorage::new(), MockConfig::new(sample_lines()));
        let lines = pipeline.extract().await.unwrap();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1].reference, "ORD-2");
    }

    #[tokio::test]
    async fn test_transform_keeps_rejected_lines() {
        let pipeline = ManifestPipeline::new(MockStorage::new(), MockConfig::new(vec![]));
        let result = pipeline.transform(sample_lines()).await.unwrap();

        assert_eq!(result.summary.total_lines, 3);
        assert_eq!(result.summary.quoted, 2);
        assert_eq!(result.summary.rejected, 1);
        assert_eq!(result.summary.grand_total, 268.0);

        match &result.lines[1].outcome {
            LineOutcome::Rejected { field, message } => {
                assert_eq!(field, "declared_weight_kg");
                assert!(message.contains("20 kg"));
            }
            other => panic!("expected rejection, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_transform_renders_csv_rows() {
        let pipeline = ManifestPipeline::new(MockStorage::new(), MockConfig::new(vec![]));
        let result = pipeline.transform(sample_lines()).await.unwrap();

        let rows: Vec<&str> = result.csv_output.lines().collect();
        assert_eq!(rows.len(), 4);
        assert!(rows[0].starts_with("reference,tier_code,status"));
        assert_eq!(
            rows[1],
            "ORD-1,standard_parcel,quoted,150.00,40.00,20.00,0.00,0.00,210.00,"
        );
        assert!(rows[2].starts_with("ORD-2,bulk_shipment,rejected,,,,,,,"));
        assert_eq!(rows[3], "ORD-3,basic_letter,quoted,50.00,8.00,0.00,0.00,0.00,58.00,");
    }

    #[tokio::test]
    async fn test_transform_json_report() {
        let pipeline = ManifestPipeline::new(MockStorage::new(), MockConfig::new(vec![]));
        let result = pipeline.transform(sample_lines()).await.unwrap();

        let report: serde_json::Value = serde_json::from_str(&result.json_output).unwrap();
        assert_eq!(report["summary"]["quoted"], 2);
        assert_eq!(report["lines"][0]["status"], "quoted");
        assert_eq!(report["lines"][0]["quote"]["total"], 210.0);
        assert_eq!(report["lines"][1]["status"], "rejected");
        assert!(report["generated_at"].is_string());
    }

    #[tokio::test]
    async fn test_load_writes_selected_formats() {
        let storage = MockStorage::new();
        let mut config = MockConfig::new(vec![]);
        config.formats = vec![OutputFormat::Csv];
        let pipeline = ManifestPipeline::new(storage.clone(), config);

        let result = pipeline.transform(sample_lines()).await.unwrap();
        let output_path = pipeline.load(result).await.unwrap();

        assert_eq!(output_path, "test_output");
        assert!(storage.get_file(CSV_FILENAME).await.is_some());
        assert!(storage.get_file(JSON_FILENAME).await.is_none());
    }

    #[tokio::test]
    async fn test_load_zip_content_verification() {
        let storage = MockStorage::new();
        let mut config = MockConfig::new(vec![]);
        config.archive = Some("quotes.zip".to_string());
        let pipeline = ManifestPipeline::new(storage.clone(), config);

        let result = pipeline.transform(sample_lines()).await.unwrap();
        let output_path = pipeline.load(result).await.unwrap();
        assert_eq!(output_path, "test_output/quotes.zip");
        assert!(storage.get_file(CSV_FILENAME).await.is_none());

        let zip_data = storage.get_file("quotes.zip").await.unwrap();
        let cursor = std::io::Cursor::new(zip_data);
        let mut archive = zip::ZipArchive::new(cursor).unwrap();
        assert_eq!(archive.len(), 2);

        let mut csv_file = archive.by_name(CSV_FILENAME).unwrap();
        let mut csv_content = String::new();
        std::io::Read::read_to_string(&mut csv_file, &mut csv_content).unwrap();
        assert!(csv_content.contains("ORD-1,standard_parcel,quoted"));
    }
}
