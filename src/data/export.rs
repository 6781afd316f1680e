use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use thiserror::Error;

use super::filter::FilteredView;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("writing {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("encoding CSV: {0}")]
    Csv(#[from] csv::Error),
}

/// `real_estate_filtered_<YYYYMMDD>.csv`
pub fn export_file_name(date: NaiveDate) -> String {
    format!("real_estate_filtered_{}.csv", date.format("%Y%m%d"))
}

/// Write the view as CSV: UTF-8 BOM, header in table column order, one
/// record per filtered listing.
pub fn write_csv<W: Write>(view: &FilteredView<'_>, mut out: W) -> Result<(), csv::Error> {
    out.write_all(UTF8_BOM)?;

    let columns = &view.table().column_names;
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(columns)?;
    for listing in view.listings() {
        writer.write_record(columns.iter().map(|c| listing.get(c).to_field()))?;
    }
    writer.flush()?;
    Ok(())
}

/// Write the export file into `dir`, named after `date`.
pub fn export_to_dir(
    view: &FilteredView<'_>,
    dir: &Path,
    date: NaiveDate,
) -> Result<PathBuf, ExportError> {
    let path = dir.join(export_file_name(date));
    let io_err = |source| ExportError::Io {
        path: path.clone(),
        source,
    };

    std::fs::create_dir_all(dir).map_err(io_err)?;
    let file = File::create(&path).map_err(io_err)?;
    write_csv(view, BufWriter::new(file))?;

    log::info!("Exported {} listings to {}", view.len(), path.display());
    Ok(path)
}
