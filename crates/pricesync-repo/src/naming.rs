//! File naming conventions shared with the upstream price-list generator
//! and the deployed site.

use chrono::{Local, NaiveDate};

/// Name of the pointer file holding the current artifact's filename.
pub const POINTER_FILENAME: &str = "latest-json-filename.txt";

/// Suffix every price-list artifact ends with. Used to find stale ones.
pub const ARTIFACT_SUFFIX: &str = "_json_compres.gz";

/// Prefix every price-list artifact starts with.
pub const ARTIFACT_PREFIX: &str = "list_price_";

const DATE_FORMAT: &str = "%d-%m-%y";

/// Artifact filename for `date`: `list_price_<DD-MM-YY>_json_compres.gz`.
pub fn dated_filename(date: NaiveDate) -> String {
    format!("{ARTIFACT_PREFIX}{}{ARTIFACT_SUFFIX}", date.format(DATE_FORMAT))
}

/// Artifact filename for today's local date.
pub fn generate_dated_filename() -> String {
    dated_filename(Local::now().date_naive())
}

/// Footer literal the deployed page shows for a list generated on `date`.
pub fn footer_label(date: NaiveDate) -> String {
    format!("Según Lista {}", date.format(DATE_FORMAT))
}

/// Recover the date encoded in an artifact filename.
pub fn parse_artifact_date(filename: &str) -> Option<NaiveDate> {
    let stamp = filename
        .strip_prefix(ARTIFACT_PREFIX)?
        .strip_suffix(ARTIFACT_SUFFIX)?;
    NaiveDate::parse_from_str(stamp, DATE_FORMAT).ok()
}
