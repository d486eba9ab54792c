//! Event-driven page assembly.
//!
//! [`RecordBuilder`] consumes `quick-xml` events one at a time, keeps at most
//! one [`Record`] in flight and hands accepted pages straight to a
//! [`FormatSink`]. Memory stays bounded by nesting depth plus one page.

use crate::config::{
    ConvertOptions, ID_ELEMENT, NAMESPACE_ELEMENT, PAGE_ELEMENT, PROGRESS_INTERVAL,
    REDIRECT_ELEMENT, REDIRECT_TARGET_ATTR, TEXT_ELEMENT, TITLE_ELEMENT,
};
use crate::models::{Record, RecordView};
use crate::sink::FormatSink;
use crate::stats::ConversionStats;
use crate::text_stack::TextStack;
use anyhow::{Context, Result};
use indicatif::ProgressBar;
use quick_xml::events::{BytesStart, Event};
use std::ops::ControlFlow;
use std::str::FromStr;
use tracing::{debug, info, warn};

pub struct RecordBuilder<'s, S: FormatSink> {
    sink: &'s mut S,
    max_accepted_records: Option<usize>,
    max_body_characters: Option<usize>,
    texts: TextStack,
    current: Option<Record>,
    accepted: usize,
    stats: ConversionStats,
    progress: ProgressBar,
}

impl<'s, S: FormatSink> RecordBuilder<'s, S> {
    pub fn new(sink: &'s mut S, options: &ConvertOptions) -> Self {
        let progress = if options.show_progress {
            ProgressBar::new_spinner()
        } else {
            ProgressBar::hidden()
        };
        Self {
            sink,
            max_accepted_records: options.max_accepted_records,
            max_body_characters: options.max_body_characters,
            texts: TextStack::new(),
            current: None,
            accepted: 0,
            stats: ConversionStats::new(),
            progress,
        }
    }

    /// Feeds one tokenizer event.
    ///
    /// Returns `Break` once the record limit is hit; the caller must stop
    /// reading and finalize the output.
    pub fn handle(&mut self, event: &Event<'_>) -> Result<ControlFlow<()>> {
        match event {
            Event::Start(start) => {
                self.start_element(start)?;
                Ok(ControlFlow::Continue(()))
            }
            Event::Empty(start) => {
                self.start_element(start)?;
                self.end_element(start.local_name().as_ref())
            }
            Event::End(end) => self.end_element(end.local_name().as_ref()),
            Event::Text(text) => {
                let text = text.unescape().context("Failed to unescape text")?;
                self.texts.append(&text);
                Ok(ControlFlow::Continue(()))
            }
            Event::CData(cdata) => {
                let text = std::str::from_utf8(cdata).context("CDATA section is not valid UTF-8")?;
                self.texts.append(text);
                Ok(ControlFlow::Continue(()))
            }
            _ => Ok(ControlFlow::Continue(())),
        }
    }

    pub fn finish(self) -> ConversionStats {
        self.progress.finish_and_clear();
        self.stats
    }

    fn start_element(&mut self, start: &BytesStart<'_>) -> Result<()> {
        let name = start.local_name();
        let name = name.as_ref();

        if name == PAGE_ELEMENT {
            if self.current.is_some() {
                warn!("Nested <page> element, discarding the enclosing one");
            }
            self.current = Some(Record::default());
            self.texts.push_ignored();
            return Ok(());
        }

        let Some(record) = self.current.as_mut() else {
            self.texts.push_ignored();
            return Ok(());
        };

        if name == REDIRECT_ELEMENT {
            let target = match start
                .try_get_attribute(REDIRECT_TARGET_ATTR)
                .context("Malformed <redirect> attributes")?
            {
                Some(attr) => attr
                    .unescape_value()
                    .context("Failed to unescape redirect target")?
                    .into_owned(),
                None => String::new(),
            };
            record.redirect_target = Some(target);
        }

        if is_captured(name) {
            self.texts.push();
        } else {
            self.texts.push_ignored();
        }
        Ok(())
    }

    fn end_element(&mut self, name: &[u8]) -> Result<ControlFlow<()>> {
        let text = self.texts.pop().unwrap_or_default();

        if name == PAGE_ELEMENT {
            return self.finish_record();
        }

        let Some(record) = self.current.as_mut() else {
            return Ok(ControlFlow::Continue(()));
        };

        match name {
            // The page id precedes the revision and contributor ids, so the first one wins.
            ID_ELEMENT => {
                if record.id.is_none() {
                    record.id = Some(parse_number(&text, "id")?);
                }
            }
            TITLE_ELEMENT => record.title = Some(text),
            NAMESPACE_ELEMENT => record.namespace = Some(parse_number(&text, "ns")?),
            TEXT_ELEMENT => record.body_text = Some(text),
            _ => {}
        }
        Ok(ControlFlow::Continue(()))
    }

    fn finish_record(&mut self) -> Result<ControlFlow<()>> {
        let Some(record) = self.current.take() else {
            return Ok(ControlFlow::Continue(()));
        };

        if let Some(max) = self.max_accepted_records {
            if self.accepted >= max {
                info!(limit = max, "Record limit reached, stopping");
                self.stats.stopped_early = true;
                return Ok(ControlFlow::Break(()));
            }
        }

        self.stats.inc_seen();
        if self.stats.pages_seen % PROGRESS_INTERVAL == 0 {
            self.progress.tick();
        }

        if !record.is_target() {
            if record.redirect_target.is_some() {
                self.stats.inc_redirects();
            } else {
                self.stats.inc_namespace();
            }
            debug!(id = ?record.id, title = ?record.title, "Skipping page");
            return Ok(ControlFlow::Continue(()));
        }

        let view = RecordView::new(&record, self.max_body_characters);
        self.sink
            .on_record(&view)
            .with_context(|| format!("Failed to write page {:?}", record.id))?;

        if view.is_truncated() {
            self.stats.inc_truncated();
        }
        self.stats.add_categories(view.categories().len() as u64);
        self.accepted += 1;
        self.stats.inc_accepted();
        Ok(ControlFlow::Continue(()))
    }
}

fn is_captured(name: &[u8]) -> bool {
    matches!(
        name,
        ID_ELEMENT | TITLE_ELEMENT | NAMESPACE_ELEMENT | TEXT_ELEMENT
    )
}

fn parse_number<T>(text: &str, field: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    text.trim()
        .parse()
        .with_context(|| format!("Invalid <{}> value: {:?}", field, text))
}
