use std::path::PathBuf;

use clap::Parser;

use crate::data::charts::DEFAULT_RENT_BINS;

/// Command-line options of the dashboard binary.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "rusty-realty",
    version,
    about = "Explore commercial real-estate listings: filters, metrics, charts and CSV export"
)]
pub struct Args {
    /// Listing file: `{"items": [...]}` JSON or a previously exported CSV.
    #[arg(long, default_value = "data/raw_data.json")]
    pub data: PathBuf,

    /// Directory receiving `real_estate_filtered_<YYYYMMDD>.csv`.
    #[arg(long, default_value = ".")]
    pub export_dir: PathBuf,

    /// Number of bins in the monthly-rent histogram.
    #[arg(long, default_value_t = DEFAULT_RENT_BINS)]
    pub bins: usize,

    /// TTF/OTF font with Hangul glyphs for the UI.
    #[arg(long)]
    pub font: Option<PathBuf>,

    /// Print the dashboard for the unfiltered data as JSON and exit.
    #[arg(long, conflicts_with = "export")]
    pub report: bool,

    /// Export the unfiltered data to CSV and exit.
    #[arg(long)]
    pub export: bool,
}

impl Default for Args {
    fn default() -> Self {
        Args {
            data: PathBuf::from("data/raw_data.json"),
            export_dir: PathBuf::from("."),
            bins: DEFAULT_RENT_BINS,
            font: None,
            report: false,
            export: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_parser() {
        let parsed = Args::try_parse_from(["rusty-realty"]).unwrap();
        let default = Args::default();
        assert_eq!(parsed.data, default.data);
        assert_eq!(parsed.export_dir, default.export_dir);
        assert_eq!(parsed.bins, 15);
        assert!(!parsed.report && !parsed.export);
    }

    #[test]
    fn flags_parse() {
        let parsed = Args::try_parse_from([
            "rusty-realty",
            "--data",
            "listings.json",
            "--bins",
            "20",
            "--report",
        ])
        .unwrap();
        assert_eq!(parsed.data, PathBuf::from("listings.json"));
        assert_eq!(parsed.bins, 20);
        assert!(parsed.report);
    }

    #[test]
    fn report_and_export_conflict() {
        assert!(Args::try_parse_from(["rusty-realty", "--report", "--export"]).is_err());
    }
}
