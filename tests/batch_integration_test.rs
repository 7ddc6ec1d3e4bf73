use anyhow::Result;
use epost_quote::utils::validation::Validate;
use epost_quote::{BatchEngine, LocalStorage, ManifestConfig, ManifestPipeline};
use tempfile::TempDir;

fn manifest(output_path: &str, compression: bool) -> String {
    let compression = if compression {
        "[output.compression]\nenabled = true\nfilename = \"quotes.zip\"\n"
    } else {
        ""
    };

    format!(
        r#"
[batch]
name = "integration"
description = "End-to-end batch"

[output]
path = "{}"
formats = ["csv", "json"]
{}
[[shipments]]
reference = "ORD-1"
package_type = "standard_parcel"
weight = 0.5
declared_value = 0
dimensions = {{ length = 10, width = 10, height = 10 }}

[[shipments]]
reference = "ORD-2"
package_type = "express_intl"
weight = 3
declared_value = 1000
dimensions = {{ length = 20, width = 20, height = 20 }}

[[shipments]]
reference = "ORD-3"
package_type = "unknown_tier"
weight = 1
"#,
        output_path, compression
    )
}

fn output_dir(temp_dir: &TempDir) -> String {
    temp_dir.path().to_string_lossy().replace('\\', "/")
}

#[tokio::test]
async fn test_end_to_end_batch_writes_files() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let output_path = output_dir(&temp_dir);

    let config = ManifestConfig::from_toml_str(&manifest(&output_path, false))?;
    config.validate()?;

    let storage = LocalStorage::new(output_path.clone());
    let engine = BatchEngine::new(ManifestPipeline::new(storage, config));
    let outcome = engine.run().await?;

    assert_eq!(outcome.output_path, output_path);
    assert_eq!(outcome.summary.quoted, 2);
    assert_eq!(outcome.summary.rejected, 1);
    assert_eq!(outcome.summary.grand_total, 4060.0);

    let csv_content = std::fs::read_to_string(temp_dir.path().join("quotes.csv"))?;
    assert!(csv_content.contains("ORD-1,standard_parcel,quoted,150.00,40.00,20.00,0.00,0.00,210.00,"));
    assert!(csv_content.contains("ORD-2,express_intl,quoted,2000.00,900.00,640.00,10.00,300.00,3850.00,"));
    assert!(csv_content.contains("Invalid package type 'unknown_tier'"));

    let json_content = std::fs::read_to_string(temp_dir.path().join("quotes.json"))?;
    let report: serde_json::Value = serde_json::from_str(&json_content)?;
    assert_eq!(report["summary"]["batch_name"], "integration");
    assert_eq!(report["lines"][2]["status"], "rejected");
    assert_eq!(report["lines"][2]["field"], "tier_code");

    Ok(())
}

#[tokio::test]
async fn test_end_to_end_batch_with_compression() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let output_path = output_dir(&temp_dir);

    let config = ManifestConfig::from_toml_str(&manifest(&output_path, true))?;
    config.validate()?;

    let storage = LocalStorage::new(output_path.clone());
    let engine = BatchEngine::new(ManifestPipeline::new(storage, config));
    let outcome = engine.run().await?;

    assert!(outcome.output_path.ends_with("quotes.zip"));
    assert!(!temp_dir.path().join("quotes.csv").exists());

    let zip_data = std::fs::read(temp_dir.path().join("quotes.zip"))?;
    let mut archive = zip::ZipArchive::new(std::io::Cursor::new(zip_data))?;
    let file_names: Vec<String> = (0..archive.len())
        .map(|i| archive.by_index(i).map(|f| f.name().to_string()))
        .collect::<std::result::Result<_, _>>()?;

    assert!(file_names.contains(&"quotes.csv".to_string()));
    assert!(file_names.contains(&"quotes.json".to_string()));

    Ok(())
}
