//! Line-delimited JSON writer.

use std::io::{self, Write};

use opcorpora_parser::RecordSink;
use opcorpora_protocol::Record;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("failed to write record: {0}")]
    Io(#[from] io::Error),

    #[error("failed to encode record: {0}")]
    Json(#[from] serde_json::Error),
}

/// Writes each record as one JSON object followed by `\n`.
pub struct NdjsonWriter<W: Write> {
    out: W,
    lines: u64,
}

impl<W: Write> NdjsonWriter<W> {
    pub fn new(out: W) -> Self {
        Self { out, lines: 0 }
    }

    pub fn lines(&self) -> u64 {
        self.lines
    }

    /// Flush and hand back the underlying writer.
    pub fn finish(mut self) -> Result<W, SinkError> {
        self.out.flush()?;
        Ok(self.out)
    }
}

impl<W: Write> RecordSink for NdjsonWriter<W> {
    type Error = SinkError;

    fn accept(&mut self, record: Record) -> Result<(), SinkError> {
        serde_json::to_writer(&mut self.out, &record)?;
        self.out.write_all(b"\n")?;
        self.lines += 1;
        Ok(())
    }
}
