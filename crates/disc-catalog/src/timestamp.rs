use std::fs;
use std::path::Path;

use chrono::NaiveDate;

pub const LAST_UPDATE_OPEN: &str = r#"<span id="last-update">"#;
pub const LAST_UPDATE_CLOSE: &str = "</span";
pub const DATE_FORMAT: &str = "%B %d, %Y";

#[derive(Debug, thiserror::Error)]
pub enum TimestampError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Marker not found: {0}")]
    MarkerNotFound(String),
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub fn patch_last_updated(html: &str, date: NaiveDate) -> Result<String, TimestampError> {
    let start = html
        .find(LAST_UPDATE_OPEN)
        .ok_or_else(|| TimestampError::MarkerNotFound(LAST_UPDATE_OPEN.into()))?
        + LAST_UPDATE_OPEN.len();
    let end = html[start..]
        .find(LAST_UPDATE_CLOSE)
        .ok_or_else(|| TimestampError::MarkerNotFound(LAST_UPDATE_CLOSE.into()))?
        + start;

    let mut patched = String::with_capacity(html.len());
    patched.push_str(&html[..start]);
    patched.push_str(&format_date(date));
    patched.push_str(&html[end..]);
    Ok(patched)
}

pub fn update_html_file(path: &Path, date: NaiveDate) -> Result<(), TimestampError> {
    let html = fs::read_to_string(path)?;
    let patched = patch_last_updated(&html, date)?;
    fs::write(path, patched)?;
    log::info!("Updated last-updated timestamp in {}", path.display());
    Ok(())
}
