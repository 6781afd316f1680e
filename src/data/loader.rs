use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_json::{Map, Value as JsonValue};
use thiserror::Error;

use super::model::{columns, CellValue, Listing, ListingTable};

/// Top-level key holding the listing array.
pub const ITEMS_KEY: &str = "items";

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Why a file could not be turned into a table.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("reading {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parsing JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("missing top-level key '{0}'")]
    MissingKey(&'static str),

    #[error("'{0}' is not a list")]
    NotAList(&'static str),

    #[error("item {index} is not a JSON object")]
    InvalidRecord { index: usize },

    #[error("reading CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("unsupported file extension: .{0}")]
    UnsupportedExtension(String),
}

/// Result of a load that never fails: the table (empty on failure) plus the
/// error to surface as a warning, if any.
#[derive(Debug)]
pub struct LoadOutcome {
    pub table: Arc<ListingTable>,
    pub failure: Option<LoadError>,
}

impl LoadOutcome {
    pub fn failed(failure: LoadError) -> Self {
        LoadOutcome {
            table: Arc::new(ListingTable::empty()),
            failure: Some(failure),
        }
    }
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load a listing table from a file. Dispatch by extension.
///
/// Supported formats:
/// * `.json` – `{"items": [ {...}, ... ]}`, nested objects flattened
/// * `.csv`  – a previously exported table (header row, optional BOM)
pub fn load_file(path: &Path) -> Result<ListingTable, LoadError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "json" => load_raw_data(path),
        "csv" => load_csv(path),
        other => Err(LoadError::UnsupportedExtension(other.to_string())),
    }
}

/// Like [`load_file`], but absorbs the error into an empty table.
pub fn load_or_empty(path: &Path) -> LoadOutcome {
    match load_file(path) {
        Ok(table) => LoadOutcome {
            table: Arc::new(table),
            failure: None,
        },
        Err(e) => {
            log::error!("Failed to load {}: {e}", path.display());
            LoadOutcome::failed(e)
        }
    }
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Read `{"items": [...]}` and flatten every item into one row.
pub fn load_raw_data(path: &Path) -> Result<ListingTable, LoadError> {
    let text = read_text(path)?;
    parse_items(&text)
}

/// Parse the JSON document text. Split out from [`load_raw_data`] so the
/// flattening rules can be exercised without touching the filesystem.
pub fn parse_items(text: &str) -> Result<ListingTable, LoadError> {
    let root: JsonValue = serde_json::from_str(text)?;

    let items = root
        .as_object()
        .and_then(|obj| obj.get(ITEMS_KEY))
        .ok_or(LoadError::MissingKey(ITEMS_KEY))?
        .as_array()
        .ok_or(LoadError::NotAList(ITEMS_KEY))?;

    let mut order = ColumnOrder::default();
    let mut listings = Vec::with_capacity(items.len());

    for (index, item) in items.iter().enumerate() {
        let obj = item
            .as_object()
            .ok_or(LoadError::InvalidRecord { index })?;

        let mut fields = BTreeMap::new();
        flatten_object("", obj, &mut fields, &mut order);
        listings.push(Listing { fields });
    }

    log::info!(
        "Loaded {} listings with {} columns",
        listings.len(),
        order.names.len()
    );
    Ok(ListingTable::new(order.names, listings))
}

/// Column names in order of first appearance across all records.
#[derive(Default)]
struct ColumnOrder {
    names: Vec<String>,
    seen: HashSet<String>,
}

impl ColumnOrder {
    fn observe(&mut self, name: &str) {
        if self.seen.insert(name.to_string()) {
            self.names.push(name.to_string());
        }
    }
}

/// Nested objects become dotted column paths (`a.b.c`).
fn flatten_object(
    prefix: &str,
    obj: &Map<String, JsonValue>,
    fields: &mut BTreeMap<String, CellValue>,
    order: &mut ColumnOrder,
) {
    for (key, val) in obj {
        let name = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        match val {
            JsonValue::Object(inner) => flatten_object(&name, inner, fields, order),
            other => {
                order.observe(&name);
                fields.insert(name, json_to_cell(other));
            }
        }
    }
}

fn json_to_cell(val: &JsonValue) -> CellValue {
    match val {
        JsonValue::String(s) => CellValue::String(s.clone()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                CellValue::Integer(i)
            } else if let Some(f) = n.as_f64() {
                CellValue::Float(f)
            } else {
                CellValue::String(n.to_string())
            }
        }
        JsonValue::Bool(b) => CellValue::Bool(*b),
        JsonValue::Null => CellValue::Null,
        // arrays stay as their JSON text
        other => CellValue::String(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// Re-open an exported table. Cell types are guessed per value.
pub fn load_csv(path: &Path) -> Result<ListingTable, LoadError> {
    let text = read_text(path)?;
    parse_csv(&text)
}

pub fn parse_csv(text: &str) -> Result<ListingTable, LoadError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut reader = csv::Reader::from_reader(text.as_bytes());
    let headers: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();

    let mut listings = Vec::new();
    for result in reader.records() {
        let record = result?;
        let fields = headers
            .iter()
            .zip(record.iter())
            .map(|(name, value)| {
                let cell = if columns::TEXT.contains(&name.as_str()) && !value.is_empty() {
                    CellValue::String(value.to_string())
                } else {
                    guess_cell_type(value)
                };
                (name.clone(), cell)
            })
            .collect();
        listings.push(Listing { fields });
    }

    log::info!("Loaded {} listings from CSV", listings.len());
    Ok(ListingTable::new(headers, listings))
}

fn guess_cell_type(s: &str) -> CellValue {
    if s.is_empty() {
        return CellValue::Null;
    }
    if let Ok(i) = s.parse::<i64>() {
        return CellValue::Integer(i);
    }
    if let Ok(f) = s.parse::<f64>() {
        return CellValue::Float(f);
    }
    if s == "true" || s == "false" {
        return CellValue::Bool(s == "true");
    }
    CellValue::String(s.to_string())
}

fn read_text(path: &Path) -> Result<String, LoadError> {
    std::fs::read_to_string(path).map_err(|source| LoadError::Read {
        path: path.to_path_buf(),
        source,
    })
}
