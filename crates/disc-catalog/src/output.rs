use std::fs;
use std::io::Write;
use std::path::Path;

use crate::types::DiscRecord;

pub const CSV_COLUMNS: [&str; 13] = [
    "manufacturer",
    "name",
    "speed",
    "glide",
    "turn",
    "fade",
    "stability",
    "diameter",
    "height",
    "rim_depth",
    "rim_width",
    "bead",
    "link",
];

#[derive(Debug, thiserror::Error)]
pub enum OutputError {
    #[error("CSV write failed: {0}")]
    Csv(#[from] csv::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub fn write_csv<W: Write>(records: &[DiscRecord], writer: W) -> Result<(), OutputError> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(CSV_COLUMNS)?;

    for record in records {
        wtr.write_record(CSV_COLUMNS.iter().map(|column| record.get(column).to_cell()))?;
    }

    wtr.flush()?;
    Ok(())
}

pub fn write_csv_file(records: &[DiscRecord], path: &Path) -> Result<(), OutputError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    let file = fs::File::create(path)?;
    write_csv(records, file)?;
    log::info!("Wrote {} rows to {}", records.len(), path.display());
    Ok(())
}
