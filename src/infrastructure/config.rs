use std::path::PathBuf;

use clap::Parser;

use super::loader::Source;
use crate::domain::{FilterState, PrimaryFilter, SubFilter};

pub const DEFAULT_SOURCE: &str = "data/users.xlsx";
pub const DEFAULT_LOG_FILE: &str = "user-dashboard.log";

/// National/International user dashboard.
#[derive(Debug, Clone, Parser)]
#[command(name = "user-dashboard", version)]
#[command(about = "Charts national vs international users from a spreadsheet", long_about = None)]
pub struct Config {
    /// Spreadsheet to load: a local path or an http(s) URL (xlsx, xls, xlsb, ods or csv)
    #[arg(short, long, default_value = DEFAULT_SOURCE)]
    pub source: String,

    /// File receiving log output (RUST_LOG controls the level)
    #[arg(long, default_value = DEFAULT_LOG_FILE)]
    pub log_file: PathBuf,

    /// Print the chart data as JSON instead of starting the dashboard
    #[arg(short, long)]
    pub print: bool,

    /// Primary filter used with --print (All, Government, Non-Government)
    #[arg(short, long, default_value = "All")]
    pub filter: PrimaryFilter,

    /// Sub-filter used with --print (All, GSI); only applies to Government
    #[arg(long, default_value = "All")]
    pub sub_filter: SubFilter,
}

impl Config {
    pub fn source(&self) -> Source {
        Source::parse(&self.source)
    }

    pub fn filter_state(&self) -> FilterState {
        FilterState::new(self.filter, self.sub_filter)
    }
}
