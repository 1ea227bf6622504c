use thiserror::Error;

/// Which side of a tag the interpreter was looking at when it gave up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagBoundary {
    Open,
    Close,
}

impl std::fmt::Display for TagBoundary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TagBoundary::Open => f.write_str("opening"),
            TagBoundary::Close => f.write_str("closing"),
        }
    }
}

/// Everything that can stop a conversion run. All of these are fatal.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("failed to read dictionary: {0}")]
    Io(#[from] std::io::Error),

    /// The tokenizer rejected the document (mismatched tags, bad entity, bad UTF-8, ...).
    #[error("malformed XML near byte {position}: {source}")]
    Xml {
        position: u64,
        #[source]
        source: quick_xml::Error,
    },

    #[error("tag or attribute name is not valid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    /// The event stream does not have the shape of the dictionary document.
    #[error("unexpected {boundary} tag <{tag}> while {state}")]
    Structure {
        tag: String,
        boundary: TagBoundary,
        state: &'static str,
    },

    #[error("<{tag}> is missing its `{attribute}` attribute")]
    MissingAttribute {
        tag: &'static str,
        attribute: &'static str,
    },

    #[error("document ended while {state}")]
    UnexpectedEof { state: &'static str },
}

pub type ParseResult<T> = Result<T, ParseError>;
