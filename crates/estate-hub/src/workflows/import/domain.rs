use serde::{Deserialize, Serialize};
use std::fmt;

use super::normalizer::normalize_header;

pub const MAX_TITLE_CHARS: usize = 200;
pub const MAX_LOCATION_CHARS: usize = 200;
pub const MAX_DESCRIPTION_CHARS: usize = 500;
pub const PLACEHOLDER_IMAGE: &str = "/placeholder.svg";

/// One input line zipped against the header line. Headers are kept in
/// normalized form; cells are trimmed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRow {
    cells: Vec<(String, String)>,
}

impl RawRow {
    /// Cells past the end of `headers` are ignored; headers past the end of
    /// `values` are absent from the row.
    pub fn from_cells<H, V>(headers: &[H], values: &[V]) -> Self
    where
        H: AsRef<str>,
        V: AsRef<str>,
    {
        let cells = headers
            .iter()
            .zip(values.iter())
            .map(|(header, value)| {
                (
                    normalize_header(header.as_ref()),
                    value.as_ref().trim().to_string(),
                )
            })
            .collect();
        Self { cells }
    }

    /// Looks up a cell by header name, ignoring case and whitespace.
    pub fn get(&self, header: &str) -> Option<&str> {
        let key = normalize_header(header);
        self.cells
            .iter()
            .find(|(name, _)| *name == key)
            .map(|(_, value)| value.as_str())
    }

    pub fn cells(&self) -> impl Iterator<Item = (&str, &str)> {
        self.cells
            .iter()
            .map(|(header, value)| (header.as_str(), value.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(|(_, value)| value.is_empty())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyType {
    Apartment,
    Villa,
    Townhouse,
    Penthouse,
}

impl PropertyType {
    /// Only apartment and penthouse are ever inferred; villa and townhouse
    /// have no source column that could produce them.
    pub fn infer_from_bedrooms(bedrooms: u32) -> Self {
        if bedrooms >= 4 {
            Self::Penthouse
        } else {
            Self::Apartment
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Apartment => "apartment",
            Self::Villa => "villa",
            Self::Townhouse => "townhouse",
            Self::Penthouse => "penthouse",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Apartment => "Apartment",
            Self::Villa => "Villa",
            Self::Townhouse => "Townhouse",
            Self::Penthouse => "Penthouse",
        }
    }
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyStatus {
    Available,
}

/// Normalized listing handed to the store. Field names match the
/// `properties` table columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalProperty {
    pub title: String,
    #[serde(rename = "type")]
    pub property_type: PropertyType,
    pub status: PropertyStatus,
    pub price: f64,
    pub location: String,
    pub bedrooms: u32,
    pub bathrooms: u32,
    pub area: f64,
    pub image: String,
    pub description: String,
    pub features: Vec<String>,
}

impl CanonicalProperty {
    pub fn is_writable(&self) -> bool {
        self.price > 0.0 && self.area > 0.0
    }
}

/// A chunk the store refused; every record in it counts as failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportFailure {
    pub chunk: usize,
    pub records: usize,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportResult {
    pub total: usize,
    pub success: usize,
    pub failed: usize,
    pub errors: Vec<ImportFailure>,
}

impl ImportResult {
    /// True when every chunk reached the store.
    pub fn is_clean(&self) -> bool {
        self.failed == 0
    }
}
