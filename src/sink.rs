use crate::models::RecordView;
use anyhow::Result;
use clap::ValueEnum;

/// Receives the accepted records of one conversion, in document order.
///
/// `on_stream_start` and `on_stream_end` are each called exactly once, even
/// when no record is accepted or the record limit stops the run early. The
/// total record count is never known up front.
pub trait FormatSink {
    fn on_stream_start(&mut self) -> Result<()>;

    fn on_record(&mut self, view: &RecordView<'_>) -> Result<()>;

    fn on_stream_end(&mut self) -> Result<()>;
}

/// Output format chosen once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Groonga `load` script with JSON records
    Groonga,
    /// Comma-separated rows: id, title, text
    Csv,
    /// SQL INSERT statements
    Sql,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            OutputFormat::Groonga => "groonga",
            OutputFormat::Csv => "csv",
            OutputFormat::Sql => "sql",
        };
        f.write_str(name)
    }
}
