//! Output side of the interpreter: a pull iterator and a push driver.

use crate::error::ParseError;
use crate::event::EventSource;
use crate::interpreter::Interpreter;
use opcorpora_protocol::Record;
use thiserror::Error;

/// Iterator over completed records, pulling events only as needed.
///
/// The first error ends the iteration.
pub struct Records<S> {
    source: S,
    interpreter: Interpreter,
    finished: bool,
}

impl<S: EventSource> Records<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            interpreter: Interpreter::new(),
            finished: false,
        }
    }

    fn advance(&mut self) -> Result<Option<Record>, ParseError> {
        loop {
            match self.source.next_event()? {
                Some(event) => {
                    if let Some(record) = self.interpreter.step(event)? {
                        return Ok(Some(record));
                    }
                }
                None => {
                    self.interpreter.finish()?;
                    return Ok(None);
                }
            }
        }
    }
}

impl<S: EventSource> Iterator for Records<S> {
    type Item = Result<Record, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        match self.advance() {
            Ok(Some(record)) => Some(Ok(record)),
            Ok(None) => {
                self.finished = true;
                None
            }
            Err(e) => {
                self.finished = true;
                Some(Err(e))
            }
        }
    }
}

/// Downstream consumer of records. May block; records arrive in document order.
pub trait RecordSink {
    type Error;

    fn accept(&mut self, record: Record) -> Result<(), Self::Error>;
}

impl RecordSink for Vec<Record> {
    type Error = std::convert::Infallible;

    fn accept(&mut self, record: Record) -> Result<(), Self::Error> {
        self.push(record);
        Ok(())
    }
}

/// Adapter turning a closure into a [`RecordSink`].
pub struct FnSink<F>(F);

pub fn sink_fn<F, E>(f: F) -> FnSink<F>
where
    F: FnMut(Record) -> Result<(), E>,
{
    FnSink(f)
}

impl<F, E> RecordSink for FnSink<F>
where
    F: FnMut(Record) -> Result<(), E>,
{
    type Error = E;

    fn accept(&mut self, record: Record) -> Result<(), E> {
        (self.0)(record)
    }
}

#[derive(Debug, Error)]
pub enum ConvertError<E> {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("record sink failed: {0}")]
    Sink(#[source] E),
}

/// Per-kind record counts for one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConversionStats {
    pub lemmas: u64,
    pub forms: u64,
    pub grammemes: u64,
    pub link_types: u64,
    pub links: u64,
}

impl ConversionStats {
    pub fn record(&mut self, record: &Record) {
        match record {
            Record::Lemma(lemma) => {
                self.lemmas += 1;
                self.forms += lemma.forms.len() as u64;
            }
            Record::Grammeme(_) => self.grammemes += 1,
            Record::LinkType(_) => self.link_types += 1,
            Record::Link(_) => self.links += 1,
        }
    }

    /// Number of records emitted (forms are part of their lemma).
    pub fn total(&self) -> u64 {
        self.lemmas + self.grammemes + self.link_types + self.links
    }
}

/// Drive `source` to completion, handing every record to `sink`.
///
/// Records accepted before a failure stay accepted.
pub fn convert<S, K>(source: S, sink: &mut K) -> Result<ConversionStats, ConvertError<K::Error>>
where
    S: EventSource,
    K: RecordSink,
{
    convert_with(source, sink, |_| {})
}

/// Like [`convert`], calling `observe` with the running totals after each record.
pub fn convert_with<S, K, F>(
    source: S,
    sink: &mut K,
    mut observe: F,
) -> Result<ConversionStats, ConvertError<K::Error>>
where
    S: EventSource,
    K: RecordSink,
    F: FnMut(&ConversionStats),
{
    let mut stats = ConversionStats::default();

    for record in Records::new(source) {
        let record = record?;
        stats.record(&record);
        sink.accept(record).map_err(ConvertError::Sink)?;
        observe(&stats);
    }

    tracing::debug!(records = stats.total(), "event source exhausted");
    Ok(stats)
}
