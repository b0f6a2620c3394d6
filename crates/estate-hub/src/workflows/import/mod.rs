//! Spreadsheet-to-listing import: parse delimited text, map rows onto the
//! canonical property shape, and write them to the listings store in chunks.

pub mod domain;
mod mapping;
mod normalizer;
mod parser;
pub mod router;
pub mod store;
pub mod writer;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, info};

pub use domain::{
    CanonicalProperty, ImportFailure, ImportResult, PropertyStatus, PropertyType, RawRow,
};
pub use parser::PIPE_HEADER_SENTINEL;
pub use router::import_router;
pub use store::{PropertyStore, RestPropertyStore, StoreError};
pub use writer::{BatchWriter, DEFAULT_CHUNK_SIZE, MAX_CHUNK_SIZE};

#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("failed to read import source: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error("no header line containing '{sentinel}' found in pipe table")]
    MissingHeader { sentinel: &'static str },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceFormat {
    Csv,
    PipeTable,
}

impl SourceFormat {
    /// `.md` and `.txt` exports are pasted tables; everything else is CSV.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
        match path
            .as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("md") | Some("txt") => Self::PipeTable,
            _ => Self::Csv,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Csv => "CSV",
            Self::PipeTable => "pipe table",
        }
    }
}

impl FromStr for SourceFormat {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "pipe" | "pipe-table" | "pipe_table" | "markdown" => Ok(Self::PipeTable),
            other => Err(format!(
                "unknown import format '{other}' (expected csv or pipe)"
            )),
        }
    }
}

/// Progress of a single import run. There is no way back from a later stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportStage {
    Idle,
    Parsing,
    Mapping,
    Writing,
    Done,
}

impl fmt::Display for ImportStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ImportStage::Idle => "idle",
            ImportStage::Parsing => "parsing",
            ImportStage::Mapping => "mapping",
            ImportStage::Writing => "writing",
            ImportStage::Done => "done",
        };
        f.write_str(label)
    }
}

pub struct PropertyImporter {
    writer: BatchWriter,
}

impl PropertyImporter {
    pub fn new(store: Arc<dyn PropertyStore>, chunk_size: usize) -> Self {
        Self {
            writer: BatchWriter::new(store, chunk_size),
        }
    }

    pub fn chunk_size(&self) -> usize {
        self.writer.chunk_size()
    }

    pub async fn import(
        &self,
        format: SourceFormat,
        content: &str,
    ) -> Result<ImportResult, ImportError> {
        let records = self.map_source(format, content)?;

        debug!(stage = %ImportStage::Writing, records = records.len(), "writing listings");
        let result = self.writer.write_all(&records).await;

        debug!(stage = %ImportStage::Done, "import finished");
        info!(
            source = format.label(),
            total = result.total,
            success = result.success,
            failed = result.failed,
            "property import complete"
        );
        Ok(result)
    }

    pub async fn import_csv(&self, content: &str) -> Result<ImportResult, ImportError> {
        self.import(SourceFormat::Csv, content).await
    }

    pub async fn import_pipe_table(&self, content: &str) -> Result<ImportResult, ImportError> {
        self.import(SourceFormat::PipeTable, content).await
    }

    pub async fn import_path<P: AsRef<Path>>(
        &self,
        format: SourceFormat,
        path: P,
    ) -> Result<ImportResult, ImportError> {
        let content = tokio::fs::read_to_string(path).await?;
        self.import(format, &content).await
    }

    /// Parses and maps without touching the store.
    pub fn preview(
        &self,
        format: SourceFormat,
        content: &str,
    ) -> Result<Vec<CanonicalProperty>, ImportError> {
        self.map_source(format, content)
    }

    fn map_source(
        &self,
        format: SourceFormat,
        content: &str,
    ) -> Result<Vec<CanonicalProperty>, ImportError> {
        debug!(stage = %ImportStage::Idle, source = format.label(), "import requested");

        debug!(stage = %ImportStage::Parsing, "splitting source rows");
        let rows = match format {
            SourceFormat::Csv => parser::parse_csv(content)?,
            SourceFormat::PipeTable => parser::parse_pipe_table(content)?,
        };

        debug!(stage = %ImportStage::Mapping, rows = rows.len(), "mapping rows");
        Ok(map_rows(&rows))
    }
}

fn map_rows(rows: &[RawRow]) -> Vec<CanonicalProperty> {
    let records: Vec<CanonicalProperty> = rows
        .iter()
        .filter(|row| mapping::has_required_cells(row))
        .filter_map(mapping::map_row)
        .collect();

    let skipped = rows.len() - records.len();
    if skipped > 0 {
        debug!(skipped, "rows without a positive price and area were dropped");
    }
    records
}
