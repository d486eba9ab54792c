//! Wikisearch: streaming Wikipedia dump conversion for search-engine bulk loads
//!
//! This crate walks a MediaWiki XML export in a single forward pass and
//! re-emits its main-namespace content pages in one of three load formats:
//!
//! 1. **Groonga** -- a `load --table Pages` script with one JSON object per page
//! 2. **CSV** -- `id,title,text` rows
//! 3. **SQL** -- one `INSERT` per page, or a single multi-row `INSERT`
//!
//! # Architecture
//!
//! - **Streaming XML parsing** -- `quick-xml` events are handled one at a time;
//!   the full dump is never held in memory
//! - **Text stack** -- one buffer per open element so text and CDATA fragments
//!   land in the element that owns them
//! - **Record builder** -- assembles one page at a time, filters redirects and
//!   non-main namespaces, truncates bodies and forwards accepted pages
//! - **Format sinks** -- own quoting, escaping and separator placement for
//!   their target format
//! - **Early stop** -- the record limit surfaces as `ControlFlow::Break`, after
//!   which the driver still finalizes the output
//!
//! # Key Modules
//!
//! - [`convert`] -- Driver wiring the XML reader, builder and sink together
//! - [`builder`] -- Page assembly state machine
//! - [`text_stack`] -- Per-element text capture
//! - [`models`] -- `Record` and the truncated `RecordView` handed to sinks
//! - [`content`] -- Category extraction and character truncation
//! - [`sink`] -- The `FormatSink` trait and output format selection
//! - [`groonga`], [`delimited`], [`sql`] -- One sink per output format
//! - [`parser`] -- Dump opening (plain, bzip2, stdin) and reader setup
//! - [`stats`] -- Conversion counters
//! - [`config`] -- Limits and constants
//!
//! # Example Usage
//!
//! ```bash
//! # Groonga load script of the first 1000 pages, bodies cut to 4096 characters
//! wikisearch convert -i jawiki-latest-pages-articles.xml.bz2 --format groonga \
//!     --max-records 1000 --max-characters 4096 -o pages.grn
//!
//! # One multi-row INSERT from stdin
//! bzcat dump.xml.bz2 | wikisearch convert -i - --format sql --bulk > pages.sql
//! ```

pub mod builder;
pub mod config;
pub mod content;
pub mod convert;
pub mod delimited;
pub mod groonga;
pub mod models;
pub mod parser;
pub mod sink;
pub mod sql;
pub mod stats;
pub mod text_stack;
