//! # Filename Subcommand
//!
//! Prints the artifact filename the generator is expected to produce for a
//! date, and optionally the footer the deployed page shows for it.

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::Args;

use pricesync_repo::naming::{dated_filename, footer_label};

/// Arguments for the filename subcommand.
#[derive(Args, Debug)]
pub struct FilenameArgs {
    /// Date as YYYY-MM-DD. Defaults to today (local time).
    #[arg(long)]
    pub date: Option<String>,

    /// Also print the page footer label for the date.
    #[arg(long)]
    pub footer: bool,
}

/// Execute the filename subcommand.
pub fn run_filename(args: &FilenameArgs) -> Result<u8> {
    let date = resolve_date(args.date.as_deref())?;
    println!("{}", dated_filename(date));
    if args.footer {
        println!("{}", footer_label(date));
    }
    Ok(0)
}

fn resolve_date(raw: Option<&str>) -> Result<NaiveDate> {
    match raw {
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .with_context(|| format!("invalid --date {s:?}, expected YYYY-MM-DD")),
        None => Ok(Local::now().date_naive()),
    }
}
