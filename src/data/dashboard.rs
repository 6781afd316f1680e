use serde::Serialize;

use super::aggregate::{summarize, Summary};
use super::charts::ChartSet;
use super::filter::NonEmptyView;
use super::insight::{insight, Insight};

/// Everything the dashboard displays for one filtered view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub summary: Summary,
    pub charts: ChartSet,
    pub insight: Insight,
}

impl Dashboard {
    pub fn compute(view: &NonEmptyView<'_>, rent_bins: usize) -> Self {
        Dashboard {
            summary: summarize(view),
            charts: ChartSet::compute(view, rent_bins),
            insight: insight(view),
        }
    }
}
