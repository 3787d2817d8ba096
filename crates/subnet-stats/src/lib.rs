mod cli;
mod config;
mod error;
pub mod report;

pub use cli::Cli;
pub use config::ReportConfig;
pub use error::ReportError;
pub use report::render::SortKey;
pub use report::{build_role_buckets, collect_subnet_data, write_subnet_report, ReportOptions};
