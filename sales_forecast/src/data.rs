//! Raw sales rows, record validation and the CSV record source

use crate::error::Result;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

/// Column holding the creation timestamp, date first and space delimited
pub const DATE_FIELD: &str = "created";
/// Column holding the free-text product description
pub const PRODUCT_FIELD: &str = "short_desc";
/// Column holding the quantity sold as a numeric string
pub const QUANTITY_FIELD: &str = "total_sold";

/// Untyped row as produced by the record source
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRecord {
    fields: HashMap<String, String>,
}

impl RawRecord {
    /// Create a record from `(name, value)` pairs
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            fields: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Convenience constructor for the three fields the pipeline reads
    pub fn sale(created: &str, short_desc: &str, total_sold: &str) -> Self {
        Self::from_pairs([
            (DATE_FIELD, created),
            (PRODUCT_FIELD, short_desc),
            (QUANTITY_FIELD, total_sold),
        ])
    }

    /// Look up a field by name
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// Number of fields in the row
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check if the row has no fields
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// One validated sales fact
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesObservation {
    /// Year-month prefix of the sale date, e.g. `2024-07`
    pub period: String,
    /// Product description
    pub product: String,
    /// Quantity sold; may be negative
    pub quantity: f64,
}

impl SalesObservation {
    /// Build an observation from a raw row, or `None` if the row is malformed
    pub fn from_record(record: &RawRecord) -> Option<Self> {
        let period = period_prefix(record.get(DATE_FIELD)?)?;
        let product = record.get(PRODUCT_FIELD).filter(|p| !p.is_empty())?;
        let quantity = parse_quantity(record.get(QUANTITY_FIELD).unwrap_or(""));
        if quantity.is_nan() {
            return None;
        }

        Some(Self {
            period,
            product: product.to_string(),
            quantity,
        })
    }
}

/// Filter raw rows into well-formed observations, preserving order
pub fn validate(rows: &[RawRecord]) -> Vec<SalesObservation> {
    let observations: Vec<SalesObservation> =
        rows.iter().filter_map(SalesObservation::from_record).collect();

    let dropped = rows.len() - observations.len();
    if dropped > 0 {
        debug!(dropped, kept = observations.len(), "dropped malformed rows");
    }

    observations
}

/// Year-month prefix: the first seven characters of the text before the first space.
///
/// Returns `None` unless the prefix is a valid `YYYY-MM` month.
fn period_prefix(created: &str) -> Option<String> {
    let date = created.split(' ').next().unwrap_or("");
    let prefix: String = date.chars().take(7).collect();
    if prefix.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(&format!("{}-01", prefix), "%Y-%m-%d").ok()?;
    Some(prefix)
}

/// Lenient float parsing: reads the longest numeric prefix after leading
/// whitespace and returns NaN when there is none.
pub fn parse_quantity(text: &str) -> f64 {
    let s = text.trim_start();
    let bytes = s.as_bytes();
    let mut pos = 0;
    let mut negative = false;

    if let Some(&sign) = bytes.first() {
        if sign == b'+' || sign == b'-' {
            negative = sign == b'-';
            pos = 1;
        }
    }

    if s[pos..].starts_with("Infinity") {
        return if negative {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        };
    }

    let int_start = pos;
    while pos < bytes.len() && bytes[pos].is_ascii_digit() {
        pos += 1;
    }
    let int_part = &s[int_start..pos];

    let mut frac_part = "";
    if pos < bytes.len() && bytes[pos] == b'.' {
        let frac_start = pos + 1;
        let mut end = frac_start;
        while end < bytes.len() && bytes[end].is_ascii_digit() {
            end += 1;
        }
        frac_part = &s[frac_start..end];
        pos = end;
    }

    if int_part.is_empty() && frac_part.is_empty() {
        return f64::NAN;
    }

    let mut exponent = String::new();
    if pos < bytes.len() && (bytes[pos] == b'e' || bytes[pos] == b'E') {
        let mut end = pos + 1;
        if end < bytes.len() && (bytes[end] == b'+' || bytes[end] == b'-') {
            end += 1;
        }
        let digits_start = end;
        while end < bytes.len() && bytes[end].is_ascii_digit() {
            end += 1;
        }
        if end > digits_start {
            exponent = format!("e{}", &s[pos + 1..end]);
        }
    }

    let canonical = format!(
        "{}{}.{}{}",
        if negative { "-" } else { "" },
        if int_part.is_empty() { "0" } else { int_part },
        if frac_part.is_empty() { "0" } else { frac_part },
        exponent
    );
    canonical.parse().unwrap_or(f64::NAN)
}

/// Reads tabular sales files into raw rows
#[derive(Debug)]
pub struct DataLoader;

impl DataLoader {
    /// Load raw rows from a headed CSV file
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<Vec<RawRecord>> {
        let file = File::open(path.as_ref())?;
        let rows = Self::from_reader(file)?;
        info!(path = %path.as_ref().display(), rows = rows.len(), "loaded sales file");
        Ok(rows)
    }

    /// Load raw rows from any reader producing headed CSV
    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<RawRecord>> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::Headers)
            .from_reader(reader);

        let headers = csv_reader.headers()?.clone();
        let mut rows = Vec::new();
        for result in csv_reader.records() {
            let record = result?;
            // Short rows keep only the columns they have.
            rows.push(RawRecord::from_pairs(
                headers.iter().zip(record.iter()),
            ));
        }

        Ok(rows)
    }
}
