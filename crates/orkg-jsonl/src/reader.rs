//! JSONL reading.
//!
//! [`JsonlReader`] pulls one record at a time from any async reader, keeping a
//! line counter for diagnostics. [`read_jsonl_resilient`] is the file-level
//! entry point used when loading a graph snapshot.

use crate::error::{Error, Result};
use crate::warning::Warning;
use serde::de::DeserializeOwned;
use std::path::Path;
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};

/// Lines longer than this are skipped rather than parsed.
pub const MAX_LINE_BYTES: usize = 16 * 1024 * 1024;

/// Async reader for JSONL data with 1-based line tracking.
pub struct JsonlReader<R> {
    reader: BufReader<R>,
    line_number: usize,
    buffer: Vec<u8>,
}

impl<R: AsyncRead + Unpin> JsonlReader<R> {
    /// Wraps `reader` in a buffered JSONL reader.
    #[must_use]
    pub fn new(reader: R) -> Self {
        Self {
            reader: BufReader::new(reader),
            line_number: 0,
            buffer: Vec::new(),
        }
    }

    /// The number of the last line read, 0 before the first read.
    #[must_use]
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    /// Reads the next raw line, without its terminator.
    ///
    /// Returns `None` at end of input.
    async fn next_line(&mut self) -> Result<Option<&[u8]>> {
        self.buffer.clear();
        let read = self.reader.read_until(b'\n', &mut self.buffer).await?;
        if read == 0 {
            return Ok(None);
        }
        self.line_number += 1;

        let mut end = self.buffer.len();
        while end > 0 && matches!(self.buffer[end - 1], b'\n' | b'\r') {
            end -= 1;
        }
        Ok(Some(&self.buffer[..end]))
    }

    /// Reads the next record, failing on the first malformed line.
    ///
    /// Blank lines are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidFormat`] when a line does not parse as `T`, or
    /// [`Error::Io`] if the underlying reader fails.
    pub async fn read_value<T: DeserializeOwned>(&mut self) -> Result<Option<T>> {
        loop {
            let line_number = self.line_number + 1;
            let Some(line) = self.next_line().await? else {
                return Ok(None);
            };
            if line.iter().all(u8::is_ascii_whitespace) {
                continue;
            }
            return serde_json::from_slice(line)
                .map(Some)
                .map_err(|e| Error::InvalidFormat {
                    line_number,
                    reason: e.to_string(),
                });
        }
    }

    /// Reads the next record, recording unparseable lines in `warnings`.
    ///
    /// # Errors
    ///
    /// Only I/O failures are returned; parse failures become warnings.
    pub async fn read_value_resilient<T: DeserializeOwned>(
        &mut self,
        warnings: &mut Vec<Warning>,
    ) -> Result<Option<T>> {
        loop {
            let line_number = self.line_number + 1;
            let Some(line) = self.next_line().await? else {
                return Ok(None);
            };
            if line.iter().all(u8::is_ascii_whitespace) {
                continue;
            }
            if line.len() > MAX_LINE_BYTES {
                warnings.push(Warning::SkippedLine {
                    line_number,
                    reason: format!("line exceeds {MAX_LINE_BYTES} bytes"),
                });
                continue;
            }
            match serde_json::from_slice(line) {
                Ok(value) => return Ok(Some(value)),
                Err(e) => {
                    tracing::debug!(line_number, error = %e, "Skipping malformed JSONL line");
                    warnings.push(Warning::MalformedJson {
                        line_number,
                        error: e.to_string(),
                    });
                }
            }
        }
    }
}

/// Reads every parseable record of the JSONL file at `path`.
///
/// Malformed or oversized lines are skipped and reported as warnings, in file
/// order. Blank lines are ignored silently.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or read.
pub async fn read_jsonl_resilient<T, P>(path: P) -> Result<(Vec<T>, Vec<Warning>)>
where
    T: DeserializeOwned,
    P: AsRef<Path>,
{
    let file = File::open(path.as_ref()).await?;
    let mut reader = JsonlReader::new(file);
    let mut values = Vec::new();
    let mut warnings = Vec::new();

    while let Some(value) = reader.read_value_resilient(&mut warnings).await? {
        values.push(value);
    }

    if !warnings.is_empty() {
        tracing::warn!(
            path = %path.as_ref().display(),
            count = warnings.len(),
            "Skipped unreadable JSONL lines"
        );
    }

    Ok((values, warnings))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use std::io::Cursor;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Row {
        id: u32,
    }

    #[tokio::test]
    async fn strict_read_skips_blank_lines() {
        let data = "{\"id\":1}\n\n   \n{\"id\":2}\r\n";
        let mut reader = JsonlReader::new(Cursor::new(data.as_bytes()));

        assert_eq!(reader.read_value::<Row>().await.unwrap(), Some(Row { id: 1 }));
        assert_eq!(reader.read_value::<Row>().await.unwrap(), Some(Row { id: 2 }));
        assert_eq!(reader.read_value::<Row>().await.unwrap(), None);
        assert_eq!(reader.line_number(), 4);
    }

    #[tokio::test]
    async fn strict_read_reports_line_of_bad_record() {
        let data = "{\"id\":1}\n{\"id\":\n";
        let mut reader = JsonlReader::new(Cursor::new(data.as_bytes()));

        reader.read_value::<Row>().await.unwrap();
        let err = reader.read_value::<Row>().await.unwrap_err();
        assert!(matches!(err, Error::InvalidFormat { line_number: 2, .. }));
    }

    #[tokio::test]
    async fn resilient_read_collects_warnings_and_continues() {
        let data = "{\"id\":1}\nnot json\n{\"id\":\"wrong type\"}\n{\"id\":4}";
        let mut reader = JsonlReader::new(Cursor::new(data.as_bytes()));
        let mut warnings = Vec::new();

        let mut rows = Vec::new();
        while let Some(row) = reader
            .read_value_resilient::<Row>(&mut warnings)
            .await
            .unwrap()
        {
            rows.push(row);
        }

        assert_eq!(rows, vec![Row { id: 1 }, Row { id: 4 }]);
        let lines: Vec<_> = warnings.iter().map(Warning::line_number).collect();
        assert_eq!(lines, vec![2, 3]);
    }

    #[tokio::test]
    async fn invalid_utf8_is_a_warning_not_an_error() {
        let mut data = b"{\"id\":1}\n".to_vec();
        data.extend_from_slice(&[0xff, 0xfe, b'\n']);
        let mut reader = JsonlReader::new(Cursor::new(data));
        let mut warnings = Vec::new();

        let first = reader.read_value_resilient::<Row>(&mut warnings).await.unwrap();
        let second = reader.read_value_resilient::<Row>(&mut warnings).await.unwrap();

        assert_eq!(first, Some(Row { id: 1 }));
        assert_eq!(second, None);
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].kind(), "malformed_json");
    }
}
