use std::collections::BTreeSet;
use std::ops::Deref;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::model::{columns, Listing, ListingTable};

// ---------------------------------------------------------------------------
// Selection state
// ---------------------------------------------------------------------------

/// What the date picker handed back: a full range or a single day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DateSelection {
    Range(NaiveDate, NaiveDate),
    Single(NaiveDate),
}

impl DateSelection {
    /// Inclusive `(start, end)`; a single day is its own window.
    pub fn bounds(&self) -> (NaiveDate, NaiveDate) {
        match *self {
            DateSelection::Range(start, end) => (start, end),
            DateSelection::Single(day) => (day, day),
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        let (start, end) = self.bounds();
        start <= date && date <= end
    }
}

/// The user's filter choices. All ranges are inclusive on both ends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    /// Selected category names. Empty means nothing is shown.
    pub categories: BTreeSet<String>,
    pub floor: (i64, i64),
    pub deposit: (i64, i64),
    pub dates: DateSelection,
}

impl FilterState {
    /// Select everything the data covers.
    pub fn from_bounds(bounds: &DataBounds) -> Self {
        FilterState {
            categories: bounds.categories.iter().cloned().collect(),
            floor: bounds.floor.unwrap_or_default(),
            deposit: bounds.deposit.unwrap_or_default(),
            dates: bounds
                .dates
                .map_or(DateSelection::Single(NaiveDate::default()), |(start, end)| {
                    DateSelection::Range(start, end)
                }),
        }
    }

    /// Whether one listing passes all four predicates. Listings with an
    /// unknown category, floor, deposit or date never pass.
    pub fn matches(&self, listing: &Listing) -> bool {
        let category_ok = listing
            .category()
            .is_some_and(|c| self.categories.contains(c));
        let floor_ok = listing
            .number(columns::FLOOR)
            .is_some_and(|f| within(f, self.floor));
        let deposit_ok = listing
            .number(columns::DEPOSIT)
            .is_some_and(|d| within(d, self.deposit));
        let date_ok = listing.date().is_some_and(|d| self.dates.contains(d));

        category_ok && floor_ok && deposit_ok && date_ok
    }
}

fn within(value: f64, (lo, hi): (i64, i64)) -> bool {
    lo as f64 <= value && value <= hi as f64
}

// ---------------------------------------------------------------------------
// Control bounds
// ---------------------------------------------------------------------------

/// The ranges the filter controls offer, taken from the data.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DataBounds {
    /// Sorted distinct categories.
    pub categories: Vec<String>,
    /// Integer slider bounds; `None` when no row has a value.
    pub floor: Option<(i64, i64)>,
    pub deposit: Option<(i64, i64)>,
    pub dates: Option<(NaiveDate, NaiveDate)>,
}

impl DataBounds {
    pub fn from_table(table: &ListingTable) -> Self {
        let dates = table
            .listings
            .iter()
            .filter_map(Listing::date)
            .fold(None, |acc: Option<(NaiveDate, NaiveDate)>, d| match acc {
                None => Some((d, d)),
                Some((lo, hi)) => Some((lo.min(d), hi.max(d))),
            });

        DataBounds {
            categories: table.categories().into_iter().collect(),
            floor: integer_bounds(table.numeric_column(columns::FLOOR)),
            deposit: integer_bounds(table.numeric_column(columns::DEPOSIT)),
            dates,
        }
    }
}

/// Floor of the minimum and ceiling of the maximum, so the full slider
/// range always covers every value.
fn integer_bounds(values: Vec<Option<f64>>) -> Option<(i64, i64)> {
    values
        .into_iter()
        .flatten()
        .fold(None, |acc: Option<(f64, f64)>, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
        .map(|(lo, hi)| (lo.floor() as i64, hi.ceil() as i64))
}

// ---------------------------------------------------------------------------
// Filtered views
// ---------------------------------------------------------------------------

/// Indices of listings that pass every filter, in table order.
pub fn filtered_indices(table: &ListingTable, filters: &FilterState) -> Vec<usize> {
    table
        .listings
        .iter()
        .enumerate()
        .filter(|(_, listing)| filters.matches(listing))
        .map(|(i, _)| i)
        .collect()
}

/// The rows that survived filtering. Borrows the table and never mutates it.
#[derive(Debug, Clone)]
pub struct FilteredView<'a> {
    table: &'a ListingTable,
    indices: Vec<usize>,
}

impl<'a> FilteredView<'a> {
    pub fn new(table: &'a ListingTable, filters: &FilterState) -> Self {
        FilteredView {
            table,
            indices: filtered_indices(table, filters),
        }
    }

    /// A view over every row.
    pub fn all(table: &'a ListingTable) -> Self {
        FilteredView {
            table,
            indices: (0..table.len()).collect(),
        }
    }

    pub fn table(&self) -> &'a ListingTable {
        self.table
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn listings(&self) -> impl Iterator<Item = &'a Listing> + '_ {
        let table = self.table;
        self.indices.iter().map(move |&i| &table.listings[i])
    }

    /// Gate to the aggregate functions, which are undefined over zero rows.
    pub fn non_empty(self) -> Result<NonEmptyView<'a>, EmptyResultSet> {
        if self.is_empty() {
            Err(EmptyResultSet)
        } else {
            Ok(NonEmptyView(self))
        }
    }
}

/// No listing matched the filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("no listings match the selected filters")]
pub struct EmptyResultSet;

/// A filtered view holding at least one row.
#[derive(Debug, Clone)]
pub struct NonEmptyView<'a>(FilteredView<'a>);

impl<'a> Deref for NonEmptyView<'a> {
    type Target = FilteredView<'a>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
