/// Element that wraps one extracted record
pub const PAGE_ELEMENT: &[u8] = b"page";

pub const ID_ELEMENT: &[u8] = b"id";
pub const TITLE_ELEMENT: &[u8] = b"title";
pub const NAMESPACE_ELEMENT: &[u8] = b"ns";
pub const TEXT_ELEMENT: &[u8] = b"text";

/// Redirect marker; the target lives in its `title` attribute
pub const REDIRECT_ELEMENT: &[u8] = b"redirect";
pub const REDIRECT_TARGET_ATTR: &[u8] = b"title";

/// Only main-content pages are extracted
pub const MAIN_NAMESPACE: i64 = 0;

/// Table targeted by the Groonga load script
pub const GROONGA_TABLE: &str = "Pages";

/// Table targeted by the SQL inserts
pub const SQL_TABLE: &str = "pages";

/// Progress update interval (tick every N pages)
pub const PROGRESS_INTERVAL: u64 = 1000;

/// Buffer size for output files and stdout
pub const OUTPUT_BUFFER_CAPACITY: usize = 128 * 1024;

/// Buffer size for reading (possibly decompressed) dump input
pub const INPUT_BUFFER_CAPACITY: usize = 256 * 1024;

/// Limits applied while converting a dump.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConvertOptions {
    /// Stop after this many accepted pages; `None` is unlimited
    pub max_accepted_records: Option<usize>,
    /// Keep at most this many leading characters of each body; `None` keeps all
    pub max_body_characters: Option<usize>,
    pub show_progress: bool,
}

impl ConvertOptions {
    /// Builds options from signed limits where any negative value means unlimited.
    pub fn from_limits(max_accepted_records: i64, max_body_characters: i64) -> Self {
        Self {
            max_accepted_records: non_negative(max_accepted_records),
            max_body_characters: non_negative(max_body_characters),
            show_progress: false,
        }
    }
}

fn non_negative(value: i64) -> Option<usize> {
    usize::try_from(value).ok()
}
