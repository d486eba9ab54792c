use crate::config::GROONGA_TABLE;
use crate::models::RecordView;
use crate::sink::FormatSink;
use anyhow::{Context, Result};
use serde::Serialize;
use std::io::Write;

#[derive(Serialize)]
struct LoadEntry<'a> {
    #[serde(rename = "_key")]
    key: Option<u64>,
    title: Option<&'a str>,
    text: Option<&'a str>,
    categories: Vec<&'a str>,
}

/// Writes a Groonga `load` command whose payload is a JSON array of pages.
pub struct GroongaSink<W: Write> {
    out: W,
    first_record: bool,
}

impl<W: Write> GroongaSink<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            first_record: true,
        }
    }
}

impl<W: Write> FormatSink for GroongaSink<W> {
    fn on_stream_start(&mut self) -> Result<()> {
        write!(self.out, "load --table {}\n[\n", GROONGA_TABLE)
            .context("Failed to write load header")?;
        Ok(())
    }

    fn on_record(&mut self, view: &RecordView<'_>) -> Result<()> {
        let entry = LoadEntry {
            key: view.id(),
            title: view.title(),
            text: view.body,
            categories: view.categories(),
        };
        // Serialize first so a failure never leaves half an object behind.
        let json = serde_json::to_vec(&entry).context("Failed to encode page as JSON")?;

        if !self.first_record {
            self.out.write_all(b",\n")?;
        }
        self.out
            .write_all(&json)
            .context("Failed to write load record")?;
        self.first_record = false;
        Ok(())
    }

    fn on_stream_end(&mut self) -> Result<()> {
        if !self.first_record {
            self.out.write_all(b"\n")?;
        }
        self.out
            .write_all(b"]\n")
            .context("Failed to write load footer")?;
        self.out.flush()?;
        Ok(())
    }
}
