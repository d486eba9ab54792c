use crate::models::RecordView;
use crate::sink::FormatSink;
use anyhow::{Context, Result};
use csv::{Writer, WriterBuilder};
use std::borrow::Cow;
use std::io::Write;

/// Writes one `id,title,text` row per page, without a header row.
pub struct CsvSink<W: Write> {
    writer: Writer<W>,
}

impl<W: Write> CsvSink<W> {
    pub fn new(out: W) -> Self {
        Self {
            writer: WriterBuilder::new().has_headers(false).from_writer(out),
        }
    }
}

impl<W: Write> FormatSink for CsvSink<W> {
    fn on_stream_start(&mut self) -> Result<()> {
        Ok(())
    }

    fn on_record(&mut self, view: &RecordView<'_>) -> Result<()> {
        let id = view.id().map(|id| id.to_string()).unwrap_or_default();
        let title = escape_field(view.title().unwrap_or_default());
        let text = escape_field(view.body.unwrap_or_default());

        self.writer
            .write_record([id.as_str(), &*title, &*text])
            .context("Failed to write CSV row")?;
        Ok(())
    }

    fn on_stream_end(&mut self) -> Result<()> {
        self.writer.flush().context("Failed to write CSV output")?;
        Ok(())
    }
}

/// Backslash-escapes `\`, CR and LF so every row stays on one physical line.
/// Quoting of commas and quotes is left to the CSV writer.
fn escape_field(value: &str) -> Cow<'_, str> {
    if !value.contains(['\\', '\r', '\n']) {
        return Cow::Borrowed(value);
    }

    let mut escaped = String::with_capacity(value.len() + 8);
    for c in value.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '\r' => escaped.push_str("\\r"),
            '\n' => escaped.push_str("\\n"),
            _ => escaped.push(c),
        }
    }
    Cow::Owned(escaped)
}
