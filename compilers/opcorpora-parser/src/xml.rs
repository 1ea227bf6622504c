//! `quick-xml` backed event source.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use quick_xml::events::{BytesStart, Event as XmlEvent};
use quick_xml::Reader;

use crate::error::{ParseError, ParseResult};
use crate::event::{Event, EventSource};
use opcorpora_protocol::Attributes;

/// Tokenizes an XML byte stream into [`Event`]s, one at a time.
///
/// Only one raw event is buffered at any moment, so memory use does not
/// depend on document size.
pub struct XmlEventSource<R: BufRead> {
    reader: Reader<R>,
    buf: Vec<u8>,
    done: bool,
    // Set when an empty element (`<g v="NOUN"/>`) is being expanded.
    pending_close: Option<String>,
}

impl XmlEventSource<BufReader<File>> {
    pub fn from_path(path: impl AsRef<Path>) -> ParseResult<Self> {
        let file = File::open(path.as_ref())?;
        Ok(Self::from_reader(BufReader::new(file)))
    }
}

impl<R: BufRead> XmlEventSource<R> {
    pub fn from_reader(inner: R) -> Self {
        let mut reader = Reader::from_reader(inner);
        // Mismatched end tags are a tokenizer failure, not something to patch over.
        reader.config_mut().check_end_names = true;
        Self {
            reader,
            buf: Vec::with_capacity(1024),
            done: false,
            pending_close: None,
        }
    }

    /// Byte offset of the tokenizer in the underlying stream.
    pub fn position(&self) -> u64 {
        self.reader.buffer_position()
    }

    fn xml_error(&self, source: quick_xml::Error) -> ParseError {
        ParseError::Xml {
            position: self.position(),
            source,
        }
    }
}

impl<R: BufRead> EventSource for XmlEventSource<R> {
    fn next_event(&mut self) -> ParseResult<Option<Event>> {
        if let Some(name) = self.pending_close.take() {
            return Ok(Some(Event::Close { name }));
        }
        if self.done {
            return Ok(None);
        }

        loop {
            self.buf.clear();
            let raw = match self.reader.read_event_into(&mut self.buf) {
                Ok(raw) => raw,
                Err(e) => {
                    self.done = true;
                    return Err(self.xml_error(e));
                }
            };

            let event = match raw {
                XmlEvent::Start(start) => open_event(&start),
                XmlEvent::Empty(start) => open_event(&start).map(|event| {
                    if let Event::Open { name, .. } = &event {
                        self.pending_close = Some(name.clone());
                    }
                    event
                }),
                XmlEvent::End(end) => utf8(end.name().as_ref()).map(|name| Event::Close {
                    name: name.to_owned(),
                }),
                XmlEvent::Text(text) => text
                    .unescape()
                    .map(|decoded| Event::Text(decoded.into_owned()))
                    .map_err(xml),
                XmlEvent::Eof => {
                    self.done = true;
                    return Ok(None);
                }
                // Declarations, comments, CDATA, PIs and doctype carry nothing we keep.
                other => {
                    tracing::trace!(event = ?other, "skipping markup");
                    continue;
                }
            };

            return match event {
                Ok(event) => Ok(Some(event)),
                Err(e) => {
                    self.done = true;
                    self.pending_close = None;
                    Err(match e {
                        ParseError::Xml { source, .. } => self.xml_error(source),
                        other => other,
                    })
                }
            };
        }
    }
}

fn open_event(start: &BytesStart<'_>) -> ParseResult<Event> {
    let name = utf8(start.name().as_ref())?.to_owned();

    let mut attributes = Attributes::new();
    for attr in start.attributes() {
        let attr = attr.map_err(|e| xml(e.into()))?;
        let key = utf8(attr.key.as_ref())?.to_owned();
        let value = attr.unescape_value().map_err(xml)?;
        attributes.push(key, value.into_owned());
    }

    Ok(Event::Open { name, attributes })
}

fn utf8(bytes: &[u8]) -> ParseResult<&str> {
    Ok(std::str::from_utf8(bytes)?)
}

// Position is filled in by the caller, which owns the reader.
fn xml(source: quick_xml::Error) -> ParseError {
    ParseError::Xml { position: 0, source }
}
