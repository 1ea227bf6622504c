//! Flat tag/text events, the only thing the interpreter knows about XML.

use crate::error::ParseResult;
use opcorpora_protocol::Attributes;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// `<name attr="...">`. Self-closing tags arrive as `Open` followed by `Close`.
    Open { name: String, attributes: Attributes },
    /// `</name>`
    Close { name: String },
    /// Character data with entities already decoded.
    Text(String),
}

impl Event {
    pub fn open(name: impl Into<String>, attributes: Attributes) -> Self {
        Event::Open {
            name: name.into(),
            attributes,
        }
    }

    pub fn close(name: impl Into<String>) -> Self {
        Event::Close { name: name.into() }
    }

    pub fn text(contents: impl Into<String>) -> Self {
        Event::Text(contents.into())
    }
}

/// Producer of events in document order.
///
/// `Ok(None)` is the completion signal; an `Err` is terminal.
pub trait EventSource {
    fn next_event(&mut self) -> ParseResult<Option<Event>>;
}

// Lets tests (and other producers) hand over plain iterators of events.
impl<I> EventSource for I
where
    I: Iterator<Item = ParseResult<Event>>,
{
    fn next_event(&mut self) -> ParseResult<Option<Event>> {
        self.next().transpose()
    }
}
