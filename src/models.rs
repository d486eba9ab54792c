use crate::config::MAIN_NAMESPACE;
use crate::content::{extract_categories, truncate_chars};

/// One `<page>` as captured from the dump.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    pub id: Option<u64>,
    pub title: Option<String>,
    pub namespace: Option<i64>,
    pub redirect_target: Option<String>,
    pub body_text: Option<String>,
}

impl Record {
    /// Content pages in the main namespace are the only ones emitted.
    pub fn is_target(&self) -> bool {
        self.redirect_target.is_none() && self.namespace == Some(MAIN_NAMESPACE)
    }
}

/// An accepted record as the sinks see it: the untouched record plus its
/// body cut down to the configured character limit.
#[derive(Debug, Clone, Copy)]
pub struct RecordView<'a> {
    pub record: &'a Record,
    pub body: Option<&'a str>,
}

impl<'a> RecordView<'a> {
    pub fn new(record: &'a Record, max_body_characters: Option<usize>) -> Self {
        let body = record.body_text.as_deref().map(|text| match max_body_characters {
            Some(max) => truncate_chars(text, max),
            None => text,
        });
        Self { record, body }
    }

    pub fn id(&self) -> Option<u64> {
        self.record.id
    }

    pub fn title(&self) -> Option<&'a str> {
        self.record.title.as_deref()
    }

    /// Whether the emitted body is shorter than the captured one.
    pub fn is_truncated(&self) -> bool {
        match (self.body, self.record.body_text.as_deref()) {
            (Some(body), Some(full)) => body.len() < full.len(),
            _ => false,
        }
    }

    /// Categories come from the full body so markers near the end survive truncation.
    pub fn categories(&self) -> Vec<&'a str> {
        self.record
            .body_text
            .as_deref()
            .map(extract_categories)
            .unwrap_or_default()
    }
}
