use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use chrono::{DateTime, FixedOffset, NaiveDate};

// ---------------------------------------------------------------------------
// Well-known column names
// ---------------------------------------------------------------------------

/// Column names the preprocessor and the dashboard rely on.
pub mod columns {
    pub const TITLE: &str = "title";
    pub const CATEGORY: &str = "businessMiddleCodeName";
    pub const NEAR_SUBWAY: &str = "nearSubwayStation";

    pub const DEPOSIT: &str = "deposit";
    pub const MONTHLY_RENT: &str = "monthlyRent";
    pub const PREMIUM: &str = "premium";
    pub const MAINTENANCE_FEE: &str = "maintenanceFee";
    pub const SIZE: &str = "size";
    pub const FLOOR: &str = "floor";

    pub const CREATED_AT: &str = "createdDateUtc";
    pub const DATE_ONLY: &str = "date_only";

    pub const DEPOSIT_PER_SQM: &str = "deposit_per_sqm";
    pub const PREMIUM_RATIO: &str = "premium_ratio";
    pub const SUBWAY_MINUTES: &str = "subway_minutes";

    /// Columns coerced to numbers during preprocessing.
    pub const NUMERIC: [&str; 6] = [DEPOSIT, MONTHLY_RENT, PREMIUM, MAINTENANCE_FEE, SIZE, FLOOR];

    /// Currency-like columns whose missing values default to 0.
    pub const CURRENCY: [&str; 4] = [DEPOSIT, MONTHLY_RENT, PREMIUM, MAINTENANCE_FEE];

    /// Free-text columns; read back from CSV as strings even when they
    /// look numeric.
    pub const TEXT: [&str; 3] = [TITLE, CATEGORY, NEAR_SUBWAY];
}

// ---------------------------------------------------------------------------
// CellValue – a single cell of the listing table
// ---------------------------------------------------------------------------

/// A dynamically-typed cell, covering what the raw JSON and the
/// preprocessor can put into a column.
#[derive(Debug, Clone)]
pub enum CellValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Timestamp(DateTime<FixedOffset>),
    Date(NaiveDate),
    Null,
}

static NULL_CELL: CellValue = CellValue::Null;

impl PartialEq for CellValue {
    fn eq(&self, other: &Self) -> bool {
        use CellValue::*;
        match (self, other) {
            (Null, Null) => true,
            (Bool(a), Bool(b)) => a == b,
            (Integer(a), Integer(b)) => a == b,
            // bitwise so a NaN cell still equals itself
            (Float(a), Float(b)) => a.total_cmp(b).is_eq(),
            (String(a), String(b)) => a == b,
            (Date(a), Date(b)) => a == b,
            (Timestamp(a), Timestamp(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::String(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Timestamp(t) => write!(f, "{}", t.format("%Y-%m-%d %H:%M:%S%:z")),
            CellValue::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            CellValue::Null => write!(f, "<null>"),
        }
    }
}

impl CellValue {
    /// Numeric view of the cell, for integer and float cells only.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            CellValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            CellValue::Date(d) => Some(*d),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// Text written to a CSV cell. Nulls become empty cells and timestamps
    /// use RFC 3339 so the loader can parse them back.
    pub fn to_field(&self) -> String {
        match self {
            CellValue::Null => String::new(),
            CellValue::Timestamp(t) => t.to_rfc3339(),
            other => other.to_string(),
        }
    }
}

impl From<Option<f64>> for CellValue {
    fn from(v: Option<f64>) -> Self {
        v.map_or(CellValue::Null, CellValue::Float)
    }
}

// ---------------------------------------------------------------------------
// Listing – one row of the table
// ---------------------------------------------------------------------------

/// One commercial-property record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Listing {
    /// Column name → value. Columns absent here read as null.
    pub fields: BTreeMap<String, CellValue>,
}

impl Listing {
    pub fn get(&self, column: &str) -> &CellValue {
        self.fields.get(column).unwrap_or(&NULL_CELL)
    }

    pub fn set(&mut self, column: &str, value: CellValue) {
        self.fields.insert(column.to_string(), value);
    }

    pub fn number(&self, column: &str) -> Option<f64> {
        self.get(column).as_f64()
    }

    pub fn text(&self, column: &str) -> Option<&str> {
        self.get(column).as_str()
    }

    /// Business category name.
    pub fn category(&self) -> Option<&str> {
        self.text(columns::CATEGORY)
    }

    /// Calendar registration date (`date_only`).
    pub fn date(&self) -> Option<NaiveDate> {
        self.get(columns::DATE_ONLY).as_date()
    }

    /// Currency value with the missing-means-zero rule applied.
    pub fn amount(&self, column: &str) -> f64 {
        self.number(column).unwrap_or(0.0)
    }
}

// ---------------------------------------------------------------------------
// ListingTable – the complete loaded dataset
// ---------------------------------------------------------------------------

/// The working table: rows plus the column order used for display and export.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListingTable {
    /// Column names in order of first appearance; derived columns last.
    pub column_names: Vec<String>,
    /// All listings (rows).
    pub listings: Vec<Listing>,
}

impl ListingTable {
    pub fn new(column_names: Vec<String>, listings: Vec<Listing>) -> Self {
        ListingTable {
            column_names,
            listings,
        }
    }

    /// The "nothing to do" sentinel passed on after a failed load.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Number of listings.
    pub fn len(&self) -> usize {
        self.listings.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.listings.is_empty()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_names.iter().any(|c| c == name)
    }

    /// Append `name` to the column order unless it is already there.
    pub fn ensure_column(&mut self, name: &str) {
        if !self.has_column(name) {
            self.column_names.push(name.to_string());
        }
    }

    /// All values of one column, null where a row lacks it.
    pub fn column(&self, name: &str) -> Vec<&CellValue> {
        self.listings.iter().map(|l| l.get(name)).collect()
    }

    /// Numeric view of one column.
    pub fn numeric_column(&self, name: &str) -> Vec<Option<f64>> {
        self.listings.iter().map(|l| l.number(name)).collect()
    }

    /// Replace (or add) a whole column. `values` must hold one cell per row.
    pub fn set_column(&mut self, name: &str, values: Vec<CellValue>) {
        debug_assert_eq!(values.len(), self.listings.len());
        self.ensure_column(name);
        for (listing, value) in self.listings.iter_mut().zip(values) {
            listing.set(name, value);
        }
    }

    /// Sorted set of distinct, non-null category names.
    pub fn categories(&self) -> BTreeSet<String> {
        self.listings
            .iter()
            .filter_map(|l| l.category())
            .map(str::to_string)
            .collect()
    }
}
