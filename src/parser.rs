use crate::config::INPUT_BUFFER_CAPACITY;
use anyhow::{Context, Result};
use bzip2::read::MultiBzDecoder;
use quick_xml::reader::Reader;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use tracing::info;

/// Opens a dump for streaming: `-` reads stdin, `*.bz2` is decompressed on the fly.
pub fn open_dump(path: &str) -> Result<Box<dyn BufRead>> {
    if path == "-" {
        info!("Reading dump from stdin");
        return Ok(Box::new(BufReader::with_capacity(
            INPUT_BUFFER_CAPACITY,
            io::stdin(),
        )));
    }

    let file = File::open(path).with_context(|| format!("Failed to open wiki dump at: {}", path))?;

    if path.ends_with(".bz2") {
        info!(path, "Reading bzip2-compressed dump");
        // Dumps are multistream archives; a plain decoder stops after the first stream.
        Ok(Box::new(BufReader::with_capacity(
            INPUT_BUFFER_CAPACITY,
            MultiBzDecoder::new(file),
        )))
    } else {
        info!(path, "Reading plain XML dump");
        Ok(Box::new(BufReader::with_capacity(INPUT_BUFFER_CAPACITY, file)))
    }
}

/// Wraps a byte stream in an XML reader that keeps text exactly as written.
pub fn xml_reader<R: BufRead>(input: R) -> Reader<R> {
    let mut reader = Reader::from_reader(input);
    reader.expand_empty_elements(false);
    reader.trim_text(false);
    reader
}
