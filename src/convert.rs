use crate::builder::RecordBuilder;
use crate::config::ConvertOptions;
use crate::delimited::CsvSink;
use crate::groonga::GroongaSink;
use crate::parser::xml_reader;
use crate::sink::{FormatSink, OutputFormat};
use crate::sql::{SqlMode, SqlSink};
use crate::stats::ConversionStats;
use anyhow::{Context, Result};
use quick_xml::events::Event;
use std::io::{BufRead, Write};
use tracing::{debug, info};

/// Streams `input` through a [`RecordBuilder`] into `sink`.
///
/// The sink's start and end hooks run exactly once each, including when the
/// record limit stops the walk early. Malformed XML, bad numbers and write
/// failures abort the conversion.
pub fn run_conversion<R, S>(input: R, sink: &mut S, options: &ConvertOptions) -> Result<ConversionStats>
where
    R: BufRead,
    S: FormatSink,
{
    let mut reader = xml_reader(input);
    let mut buf = Vec::new();

    sink.on_stream_start()?;

    let mut builder = RecordBuilder::new(&mut *sink, options);
    loop {
        let event = reader
            .read_event_into(&mut buf)
            .with_context(|| format!("XML error at byte {}", reader.buffer_position()))?;
        if let Event::Eof = event {
            debug!("Reached end of dump");
            break;
        }
        if builder.handle(&event)?.is_break() {
            break;
        }
        buf.clear();
    }
    let stats = builder.finish();

    sink.on_stream_end()?;

    info!(
        pages = stats.pages_seen,
        accepted = stats.pages_accepted,
        skipped = stats.skipped(),
        truncated = stats.bodies_truncated,
        stopped_early = stats.stopped_early,
        "Conversion finished"
    );
    Ok(stats)
}

/// Builds the sink for `format` over `out` and runs the conversion.
pub fn convert_to<R, W>(
    input: R,
    out: W,
    format: OutputFormat,
    bulk: bool,
    options: &ConvertOptions,
) -> Result<ConversionStats>
where
    R: BufRead,
    W: Write,
{
    info!(%format, bulk, "Starting conversion");
    match format {
        OutputFormat::Groonga => run_conversion(input, &mut GroongaSink::new(out), options),
        OutputFormat::Csv => run_conversion(input, &mut CsvSink::new(out), options),
        OutputFormat::Sql => run_conversion(
            input,
            &mut SqlSink::new(out, SqlMode::from_bulk_flag(bulk)),
            options,
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    /// Accepts writes until `limit` bytes have gone through, then fails.
    struct FailingWriter {
        written: usize,
        limit: usize,
    }

    impl FailingWriter {
        fn new(limit: usize) -> Self {
            Self { written: 0, limit }
        }
    }

    impl Write for FailingWriter {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            if self.written + buf.len() > self.limit {
                return Err(io::Error::new(io::ErrorKind::Other, "disk full"));
            }
            self.written += buf.len();
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    const TWO_PAGES: &str = "<mediawiki>\
        <page><title>Title1</title><ns>0</ns><id>1</id><revision><text>First body</text></revision></page>\
        <page><title>Title2</title><ns>0</ns><id>2</id><revision><text>Second body</text></revision></page>\
        </mediawiki>";

    fn convert(xml: &str, format: OutputFormat, options: &ConvertOptions) -> String {
        let mut out = Vec::new();
        convert_to(xml.as_bytes(), &mut out, format, false, options).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn empty_dump_groonga() {
        let xml = "<mediawiki xmlns=\"http://www.mediawiki.org/xml/export-0.8/\">\n</mediawiki>\n";
        let output = convert(xml, OutputFormat::Groonga, &ConvertOptions::default());
        assert_eq!(output, "load --table Pages\n[\n]\n");
    }

    #[test]
    fn entities_are_decoded() {
        let xml = r#"<mediawiki xmlns="http://www.mediawiki.org/xml/export-0.8/">
  <page>
    <title>Title</title>
    <ns>0</ns>
    <id>1</id>
    <revision>
      <id>1001</id>
      <text>Text1 &amp; Text2</text>
    </revision>
  </page>
</mediawiki>
"#;
        let output = convert(xml, OutputFormat::Groonga, &ConvertOptions::default());
        assert_eq!(
            output,
            "load --table Pages\n[\n{\"_key\":1,\"title\":\"Title\",\"text\":\"Text1 & Text2\",\"categories\":[]}\n]\n"
        );
    }

    #[test]
    fn cdata_body_is_captured() {
        let xml = "<mediawiki><page><ns>0</ns><id>4</id><revision><text><![CDATA[a < b]]></text></revision></page></mediawiki>";
        let output = convert(xml, OutputFormat::Csv, &ConvertOptions::default());
        assert_eq!(output, "4,,a < b\n");
    }

    #[test]
    fn malformed_xml_is_fatal() {
        let xml = "<mediawiki><page><title>Broken</page></mediawiki>";
        let mut out = Vec::new();
        let result = convert_to(
            xml.as_bytes(),
            &mut out,
            OutputFormat::Groonga,
            false,
            &ConvertOptions::default(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn empty_dump_csv_and_one_shot_sql_write_nothing() {
        let xml = "<mediawiki></mediawiki>";
        assert_eq!(convert(xml, OutputFormat::Csv, &ConvertOptions::default()), "");
        assert_eq!(convert(xml, OutputFormat::Sql, &ConvertOptions::default()), "");
    }

    #[test]
    fn empty_dump_sql_bulk_keeps_header_and_terminator() {
        let mut out = Vec::new();
        convert_to(
            "<mediawiki></mediawiki>".as_bytes(),
            &mut out,
            OutputFormat::Sql,
            true,
            &ConvertOptions::default(),
        )
        .unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "INSERT INTO pages (id, title, text) VALUES\n;\n"
        );
    }

    #[test]
    fn write_failure_aborts_every_format() {
        let cases = [
            (OutputFormat::Groonga, false),
            (OutputFormat::Csv, false),
            (OutputFormat::Sql, false),
            (OutputFormat::Sql, true),
        ];
        for limit in [0, 40] {
            for (format, bulk) in cases {
                let result = convert_to(
                    TWO_PAGES.as_bytes(),
                    FailingWriter::new(limit),
                    format,
                    bulk,
                    &ConvertOptions::default(),
                );
                let err = result.unwrap_err();
                let message = format!("{:#}", err);
                assert!(
                    message.contains("Failed to write"),
                    "{} (bulk={}, limit={}): {}",
                    format,
                    bulk,
                    limit,
                    message
                );
                assert!(message.contains("disk full"));
            }
        }
    }
}
