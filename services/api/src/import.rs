use crate::infra::build_store;
use chrono::{DateTime, Utc};
use clap::Args;
use estate_hub::config::AppConfig;
use estate_hub::error::AppError;
use estate_hub::telemetry;
use estate_hub::workflows::import::{
    CanonicalProperty, ImportError, ImportResult, PropertyImporter, SourceFormat,
};
use std::fmt::Write as _;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct ImportArgs {
    /// CSV export or pasted pipe table to import
    #[arg(long)]
    pub(crate) file: PathBuf,
    /// Source format (csv or pipe). Inferred from the file extension when omitted.
    #[arg(long)]
    pub(crate) format: Option<SourceFormat>,
    /// Parse and map the file without writing to the store
    #[arg(long)]
    pub(crate) dry_run: bool,
    /// Print every mapped listing
    #[arg(long)]
    pub(crate) list: bool,
}

pub(crate) async fn run_import(args: ImportArgs) -> Result<(), AppError> {
    let ImportArgs {
        file,
        format,
        dry_run,
        list,
    } = args;

    let config = AppConfig::load()?;
    if let Err(err) = telemetry::init(&config.telemetry) {
        eprintln!("logging disabled: {err}");
    }

    let format = format.unwrap_or_else(|| SourceFormat::from_path(&file));
    let store = build_store(&config.store)?;
    let importer = Arc::new(PropertyImporter::new(store, config.import.chunk_size));

    let content = std::fs::read_to_string(&file)?;
    if dry_run {
        let properties = importer.preview(format, &content)?;
        print!("{}", render_preview(&file, format, &properties, list));
        return Ok(());
    }

    let (result, properties) = import_content(&importer, format, &content, list).await?;
    print!(
        "{}",
        render_import_summary(&file, format, &result, Utc::now())
    );
    if list {
        print!("{}", render_listing(&properties));
    }
    Ok(())
}

/// Imports already-read content; the mapped listings come back only when
/// `list` is set.
async fn import_content(
    importer: &PropertyImporter,
    format: SourceFormat,
    content: &str,
    list: bool,
) -> Result<(ImportResult, Vec<CanonicalProperty>), ImportError> {
    let properties = if list {
        importer.preview(format, content)?
    } else {
        Vec::new()
    };
    let result = importer.import(format, content).await?;
    Ok((result, properties))
}

fn render_import_summary(
    file: &std::path::Path,
    format: SourceFormat,
    result: &ImportResult,
    completed_at: DateTime<Utc>,
) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Property import: {}", file.display());
    let _ = writeln!(
        out,
        "- Format: {} | completed {}",
        format.label(),
        completed_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
    let _ = writeln!(
        out,
        "- {} listings | {} written | {} failed",
        result.total, result.success, result.failed
    );
    if result.is_clean() {
        let _ = writeln!(out, "- No failed batches");
    } else {
        let _ = writeln!(out, "Failed batches:");
        for failure in &result.errors {
            let _ = writeln!(
                out,
                "  - batch {} ({} listings): {}",
                failure.chunk + 1,
                failure.records,
                failure.message
            );
        }
    }
    out
}

fn render_preview(
    file: &std::path::Path,
    format: SourceFormat,
    properties: &[CanonicalProperty],
    list: bool,
) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Dry run: {} ({})", file.display(), format.label());
    let _ = writeln!(
        out,
        "- {} listings would be written; store left untouched",
        properties.len()
    );
    if list {
        out.push_str(&render_listing(properties));
    }
    out
}

fn render_listing(properties: &[CanonicalProperty]) -> String {
    let mut out = String::new();
    if properties.is_empty() {
        return out;
    }
    let _ = writeln!(out, "Listings:");
    for property in properties {
        let _ = writeln!(
            out,
            "  - {} | {} | ${:.0} | {} bed / {} bath | {} m2",
            property.title,
            property.property_type.label(),
            property.price,
            property.bedrooms,
            property.bathrooms,
            property.area
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use estate_hub::workflows::import::{ImportFailure, DEFAULT_CHUNK_SIZE};
    use std::path::Path;

    #[test]
    fn summary_lists_failed_batches_one_based() {
        let result = ImportResult {
            total: 250,
            success: 150,
            failed: 100,
            errors: vec![ImportFailure {
                chunk: 1,
                records: 100,
                message: "listings store rejected batch".to_string(),
            }],
        };
        let completed_at = Utc
            .with_ymd_and_hms(2026, 3, 2, 9, 30, 0)
            .single()
            .expect("valid timestamp");

        let summary = render_import_summary(
            Path::new("stock.csv"),
            SourceFormat::Csv,
            &result,
            completed_at,
        );

        assert!(summary.contains("completed 2026-03-02 09:30:00 UTC"));
        assert!(summary.contains("250 listings | 150 written | 100 failed"));
        assert!(summary.contains("batch 2 (100 listings): listings store rejected batch"));
    }

    #[test]
    fn preview_listing_shows_mapped_titles() {
        let importer = PropertyImporter::new(
            Arc::new(crate::infra::InMemoryPropertyStore::default()),
            DEFAULT_CHUNK_SIZE,
        );
        let properties = importer
            .preview(
                SourceFormat::Csv,
                "Building Name,Unit Price,Internal Area,Bedroom\nAurora,\"$ 819,990.00\",89,2\n",
            )
            .expect("preview maps");

        let rendered = render_preview(Path::new("stock.csv"), SourceFormat::Csv, &properties, true);

        assert!(rendered.contains("1 listings would be written"));
        assert!(rendered.contains("2 Bed Apartment - Aurora | Apartment | $819990"));
    }

    #[test]
    fn clean_summary_reports_no_failed_batches() {
        let result = ImportResult {
            total: 3,
            success: 3,
            failed: 0,
            errors: Vec::new(),
        };
        let summary = render_import_summary(
            Path::new("stock.md"),
            SourceFormat::PipeTable,
            &result,
            Utc::now(),
        );

        assert!(summary.contains("Format: pipe table"));
        assert!(summary.contains("- No failed batches"));
    }

    #[tokio::test]
    async fn listed_import_writes_each_row_once() {
        let store = crate::infra::InMemoryPropertyStore::default();
        let importer = PropertyImporter::new(Arc::new(store.clone()), DEFAULT_CHUNK_SIZE);
        let content = "Building Name,Unit Price,Internal Area,Bedroom\n\
Aurora,\"$ 819,990.00\",89,2\n\
Aurora,\"$ 1,650,000\",150,4\n";

        let (result, properties) = import_content(&importer, SourceFormat::Csv, content, true)
            .await
            .expect("import runs");

        assert_eq!(result.success, 2);
        assert_eq!(properties.len(), 2);
        assert_eq!(store.records(), properties);
    }
}
