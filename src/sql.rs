use crate::config::SQL_TABLE;
use crate::models::RecordView;
use crate::sink::FormatSink;
use anyhow::{Context, Result};
use std::io::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqlMode {
    /// One terminated `INSERT` statement per page
    OneShot,
    /// A single multi-row `INSERT`
    Bulk,
}

impl SqlMode {
    pub fn from_bulk_flag(bulk: bool) -> Self {
        if bulk {
            SqlMode::Bulk
        } else {
            SqlMode::OneShot
        }
    }
}

/// Writes pages as `INSERT INTO pages (id, title, text)` statements.
pub struct SqlSink<W: Write> {
    out: W,
    mode: SqlMode,
    first_record: bool,
}

impl<W: Write> SqlSink<W> {
    pub fn new(out: W, mode: SqlMode) -> Self {
        Self {
            out,
            mode,
            first_record: true,
        }
    }
}

fn insert_header() -> String {
    format!("INSERT INTO {} (id, title, text) VALUES", SQL_TABLE)
}

impl<W: Write> FormatSink for SqlSink<W> {
    fn on_stream_start(&mut self) -> Result<()> {
        if self.mode == SqlMode::Bulk {
            writeln!(self.out, "{}", insert_header()).context("Failed to write SQL header")?;
        }
        Ok(())
    }

    fn on_record(&mut self, view: &RecordView<'_>) -> Result<()> {
        let tuple = value_tuple(view);
        let statement = match self.mode {
            SqlMode::OneShot => format!("{} {};\n", insert_header(), tuple),
            SqlMode::Bulk if self.first_record => tuple,
            SqlMode::Bulk => format!(",\n{}", tuple),
        };
        self.out
            .write_all(statement.as_bytes())
            .context("Failed to write SQL values")?;
        self.first_record = false;
        Ok(())
    }

    fn on_stream_end(&mut self) -> Result<()> {
        if self.mode == SqlMode::Bulk {
            if !self.first_record {
                self.out.write_all(b"\n")?;
            }
            self.out
                .write_all(b";\n")
                .context("Failed to write SQL terminator")?;
        }
        self.out.flush()?;
        Ok(())
    }
}

fn value_tuple(view: &RecordView<'_>) -> String {
    let id = view
        .id()
        .map(|id| id.to_string())
        .unwrap_or_else(|| "NULL".to_string());
    format!(
        "({}, {}, {})",
        id,
        quote_string(view.title()),
        quote_string(view.body)
    )
}

/// Single-quoted SQL literal: `'` doubles, `\` and LF become backslash escapes.
fn quote_string(value: Option<&str>) -> String {
    let Some(value) = value else {
        return "NULL".to_string();
    };

    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('\'');
    for c in value.chars() {
        match c {
            '\'' => quoted.push_str("''"),
            '\\' => quoted.push_str("\\\\"),
            '\n' => quoted.push_str("\\n"),
            _ => quoted.push(c),
        }
    }
    quoted.push('\'');
    quoted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Record;

    fn page(id: u64, title: &str, text: &str) -> Record {
        Record {
            id: Some(id),
            title: Some(title.to_string()),
            namespace: Some(0),
            redirect_target: None,
            body_text: Some(text.to_string()),
        }
    }

    fn render(records: &[Record], mode: SqlMode) -> String {
        let mut out = Vec::new();
        {
            let mut sink = SqlSink::new(&mut out, mode);
            sink.on_stream_start().unwrap();
            for record in records {
                sink.on_record(&RecordView::new(record, None)).unwrap();
            }
            sink.on_stream_end().unwrap();
        }
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn one_shot_emits_statement_per_record() {
        let output = render(&[page(1, "Title1", "a"), page(2, "Title2", "b")], SqlMode::OneShot);
        assert_eq!(
            output,
            "INSERT INTO pages (id, title, text) VALUES (1, 'Title1', 'a');\n\
             INSERT INTO pages (id, title, text) VALUES (2, 'Title2', 'b');\n"
        );
    }

    #[test]
    fn bulk_emits_single_statement() {
        let output = render(&[page(1, "Title1", "a"), page(2, "Title2", "b")], SqlMode::Bulk);
        assert_eq!(
            output,
            "INSERT INTO pages (id, title, text) VALUES\n(1, 'Title1', 'a'),\n(2, 'Title2', 'b')\n;\n"
        );
        assert_eq!(output.matches("INSERT").count(), 1);
        assert_eq!(output.matches(';').count(), 1);
    }

    #[test]
    fn bulk_without_records_keeps_header_and_terminator() {
        assert_eq!(
            render(&[], SqlMode::Bulk),
            "INSERT INTO pages (id, title, text) VALUES\n;\n"
        );
    }

    #[test]
    fn one_shot_without_records_is_empty() {
        assert_eq!(render(&[], SqlMode::OneShot), "");
    }

    #[test]
    fn strings_are_escaped() {
        assert_eq!(quote_string(Some("it's")), "'it''s'");
        assert_eq!(quote_string(Some("a\\b")), "'a\\\\b'");
        assert_eq!(quote_string(Some("one\ntwo")), "'one\\ntwo'");
        assert_eq!(quote_string(None), "NULL");
    }

    #[test]
    fn missing_id_is_null() {
        let record = Record {
            title: Some("T".to_string()),
            namespace: Some(0),
            ..Record::default()
        };
        let output = render(&[record], SqlMode::OneShot);
        assert_eq!(output, "INSERT INTO pages (id, title, text) VALUES (NULL, 'T', NULL);\n");
    }

    #[test]
    fn bulk_flag_selects_mode() {
        assert_eq!(SqlMode::from_bulk_flag(true), SqlMode::Bulk);
        assert_eq!(SqlMode::from_bulk_flag(false), SqlMode::OneShot);
    }
}
