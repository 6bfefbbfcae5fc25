//! Delimited-file reader: the record source for ratio matrices, membership
//! fixtures, and organism lookup tables.
//!
//! Reads a whole file into a sequence of records (ordered string fields).
//! Consumers only ever see the record sequence; parsing quirks (separators,
//! quoting, comment lines) stay contained here.

use crate::error::{BiclustError, Result};
use std::path::Path;

/// Parsing options for [`DelimitedFile`].
///
/// The defaults match the most common fixture format: tab-separated, no
/// header, no quoting, no comment lines.
#[derive(Clone, Copy, Debug)]
pub struct ReadOptions {
    /// Field separator.
    pub separator: char,
    /// Treat the first non-skipped line as a header.
    pub has_header: bool,
    /// Quote character stripped from both ends of each field.
    pub quote: Option<char>,
    /// Lines starting with this character are skipped entirely.
    pub comment: Option<char>,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            separator: '\t',
            has_header: false,
            quote: None,
            comment: None,
        }
    }
}

/// A parsed delimited file: optional header plus data records.
#[derive(Clone, Debug)]
pub struct DelimitedFile {
    header: Option<Vec<String>>,
    lines: Vec<Vec<String>>,
}

impl DelimitedFile {
    /// Read and parse a file from disk.
    pub fn read<P: AsRef<Path>>(path: P, options: ReadOptions) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| BiclustError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Ok(Self::parse_str(&contents, options))
    }

    /// Parse delimited content already in memory.
    ///
    /// Blank lines and comment lines are skipped; a trailing carriage return
    /// is tolerated so CRLF files parse the same as LF files.
    pub fn parse_str(contents: &str, options: ReadOptions) -> Self {
        let mut header = None;
        let mut lines = Vec::new();
        for raw in contents.lines() {
            let line = raw.trim_end_matches('\r');
            if line.trim().is_empty() {
                continue;
            }
            if let Some(comment) = options.comment {
                if line.starts_with(comment) {
                    continue;
                }
            }
            let fields = split_fields(line, options.separator, options.quote);
            if options.has_header && header.is_none() {
                header = Some(fields);
            } else {
                lines.push(fields);
            }
        }
        Self { header, lines }
    }

    /// The header record, if the file was read with one.
    pub fn header(&self) -> Option<&[String]> {
        self.header.as_deref()
    }

    /// All data records, in file order.
    pub fn lines(&self) -> &[Vec<String>] {
        &self.lines
    }
}

fn split_fields(line: &str, separator: char, quote: Option<char>) -> Vec<String> {
    line.split(separator)
        .map(|field| match quote {
            Some(q) => field.trim_matches(q).to_string(),
            None => field.to_string(),
        })
        .collect()
}

// =============================================================================
// Tests
// =============================================================================
