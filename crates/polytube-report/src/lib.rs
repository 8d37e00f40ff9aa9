//! Tables, aggregation and charts of the engagement report.
//!
//! Extraction writes CSV tables through [`tables`] and a [`RunIndex`]
//! naming them. Reporting loads the index, joins the tables in
//! [`aggregate`] and renders the outputs with [`generate_reports`].

pub mod aggregate;
pub mod charts;
pub mod error;
pub mod index;
pub mod reports;
pub mod tables;

pub use aggregate::{ReportData, ReportTables};
pub use charts::load_chart_font;
pub use error::ReportError;
pub use index::RunIndex;
pub use reports::{generate_reports, prepare_reports_dir};
pub use tables::{
    read_rows, run_timestamp, timestamped_file, write_rows, CommentRow, VideoStatsRow,
};
