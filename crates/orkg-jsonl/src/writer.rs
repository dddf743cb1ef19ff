//! JSONL writing.

use crate::error::Result;
use serde::Serialize;
use tokio::io::{AsyncWrite, AsyncWriteExt, BufWriter};

/// Buffered writer emitting one compact JSON document per line.
pub struct JsonlWriter<W> {
    writer: BufWriter<W>,
    written: usize,
}

impl<W: AsyncWrite + Unpin> JsonlWriter<W> {
    /// Wraps `writer` in a buffered JSONL writer.
    #[must_use]
    pub fn new(writer: W) -> Self {
        Self {
            writer: BufWriter::new(writer),
            written: 0,
        }
    }

    /// Number of records written so far.
    #[must_use]
    pub fn written(&self) -> usize {
        self.written
    }

    /// Serializes `value` and appends it as a line.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub async fn write<T: Serialize>(&mut self, value: &T) -> Result<()> {
        let mut line = serde_json::to_vec(value)?;
        line.push(b'\n');
        self.writer.write_all(&line).await?;
        self.written += 1;
        Ok(())
    }

    /// Writes every value produced by `values`.
    ///
    /// # Errors
    ///
    /// Stops at and returns the first serialization or I/O error.
    pub async fn write_all<T, I>(&mut self, values: I) -> Result<()>
    where
        T: Serialize,
        I: IntoIterator<Item = T>,
    {
        for value in values {
            self.write(&value).await?;
        }
        Ok(())
    }

    /// Flushes buffered output to the underlying writer.
    ///
    /// # Errors
    ///
    /// Returns an error if the flush fails.
    pub async fn flush(&mut self) -> Result<()> {
        self.writer.flush().await?;
        Ok(())
    }

    /// Consumes the writer, returning the underlying sink.
    ///
    /// Call [`flush`](Self::flush) first; unflushed data is discarded.
    #[must_use]
    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;

    #[derive(Serialize)]
    struct Row<'a> {
        id: u32,
        label: &'a str,
    }

    #[tokio::test]
    async fn writes_one_line_per_record() {
        let mut writer = JsonlWriter::new(Vec::new());
        writer
            .write_all([Row { id: 1, label: "a" }, Row { id: 2, label: "b\nc" }])
            .await
            .unwrap();
        writer.flush().await.unwrap();
        assert_eq!(writer.written(), 2);

        let out = String::from_utf8(writer.into_inner()).unwrap();
        let lines: Vec<_> = out.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], r#"{"id":1,"label":"a"}"#);
        assert_eq!(lines[1], r#"{"id":2,"label":"b\nc"}"#);
    }
}
