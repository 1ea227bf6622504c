//! Rebuilds dictionary entities from the flat event stream.
//!
//! The document shape is fixed and shallow, so instead of a tag stack the
//! interpreter keeps a single [`State`] naming the entity being assembled and
//! where the next text event belongs.

use crate::error::{ParseError, ParseResult, TagBoundary};
use crate::event::Event;
use opcorpora_protocol::{Attributes, Form, Grammeme, Lemma, Link, LinkType, Record};

/// Text-bearing children of `<grammeme>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrammemeField {
    Name,
    Alias,
    Description,
}

#[derive(Debug, Default)]
enum State {
    #[default]
    Idle,
    InLemma {
        lemma: Lemma,
        // A form only ever exists inside its lemma.
        form: Option<Form>,
    },
    InGrammeme {
        grammeme: Grammeme,
        field: Option<GrammemeField>,
    },
    // All text inside `<type>` is the link type's name.
    InLinkType { link_type: LinkType },
}

impl State {
    fn describe(&self) -> &'static str {
        match self {
            State::Idle => "outside any entity",
            State::InLemma { form: Some(_), .. } => "inside a form",
            State::InLemma { form: None, .. } => "inside a lemma",
            State::InGrammeme { .. } => "inside a grammeme",
            State::InLinkType { .. } => "inside a link type",
        }
    }
}

/// Single-pass reducer from [`Event`]s to [`Record`]s.
///
/// Every event produces at most one record, returned in document order of
/// the tag that completed it.
#[derive(Debug, Default)]
pub struct Interpreter {
    state: State,
}

impl Interpreter {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when no entity is half-built.
    pub fn is_idle(&self) -> bool {
        matches!(self.state, State::Idle)
    }

    /// Feed one event. Returns the record it completed, if any.
    pub fn step(&mut self, event: Event) -> ParseResult<Option<Record>> {
        match event {
            Event::Open { name, attributes } => self.open(name, attributes),
            Event::Close { name } => self.close(name),
            Event::Text(text) => {
                self.text(text);
                Ok(None)
            }
        }
    }

    /// Signal end of input. Fails if an entity was left open.
    pub fn finish(&mut self) -> ParseResult<()> {
        if self.is_idle() {
            Ok(())
        } else {
            let state = self.state.describe();
            self.state = State::Idle;
            Err(ParseError::UnexpectedEof { state })
        }
    }

    fn open(&mut self, name: String, attributes: Attributes) -> ParseResult<Option<Record>> {
        match name.as_str() {
            "type" => {
                self.start(name, State::InLinkType {
                    link_type: LinkType {
                        id: attributes.get_owned("id"),
                        name: None,
                    },
                })?;
            }
            "grammeme" => {
                // Top-level categories carry `parent=""`
                let parent = attributes.get("parent").filter(|p| !p.is_empty()).map(String::from);
                self.start(name, State::InGrammeme {
                    grammeme: Grammeme::new(parent),
                    field: None,
                })?;
            }
            "name" | "alias" | "description" => match &mut self.state {
                State::InGrammeme { field, .. } => {
                    *field = Some(match name.as_str() {
                        "name" => GrammemeField::Name,
                        "alias" => GrammemeField::Alias,
                        _ => GrammemeField::Description,
                    });
                }
                // Text keeps going to the link type's name
                State::InLinkType { .. } if name == "name" => {}
                _ => return Err(self.unexpected(name, TagBoundary::Open)),
            },
            "lemma" => {
                tracing::debug!(id = attributes.get("id"), "lemma started");
                self.start(name, State::InLemma {
                    lemma: Lemma::new(attributes),
                    form: None,
                })?;
            }
            "l" => {
                let (lemma, _) = self.lemma_mut(&name)?;
                lemma.text = attributes.get_owned("t");
            }
            "g" => {
                let (lemma, form) = self.lemma_mut(&name)?;
                let grammemes = match form {
                    Some(form) => &mut form.grammemes,
                    None => &mut lemma.grammemes,
                };
                let value = attributes.get_owned("v").ok_or(ParseError::MissingAttribute {
                    tag: "g",
                    attribute: "v",
                })?;
                grammemes.push(value);
            }
            "f" => {
                let (_, form) = self.lemma_mut(&name)?;
                if form.is_some() {
                    return Err(self.unexpected(name, TagBoundary::Open));
                }
                *form = Some(Form::new(attributes.get_owned("t")));
            }
            "link" => {
                return Ok(Some(Record::Link(Link {
                    id: attributes.get_owned("id"),
                    from: attributes.get_owned("from"),
                    to: attributes.get_owned("to"),
                    link_type: attributes.get_owned("type"),
                })));
            }
            _ => tracing::trace!(tag = %name, "ignoring tag"),
        }
        Ok(None)
    }

    fn close(&mut self, name: String) -> ParseResult<Option<Record>> {
        match name.as_str() {
            "lemma" => match std::mem::take(&mut self.state) {
                State::InLemma { lemma, form: None } => Ok(Some(Record::Lemma(lemma))),
                other => {
                    self.state = other;
                    Err(self.unexpected(name, TagBoundary::Close))
                }
            },
            "f" => match &mut self.state {
                State::InLemma { lemma, form } => match form.take() {
                    Some(done) => {
                        lemma.forms.push(done);
                        Ok(None)
                    }
                    None => Err(self.unexpected(name, TagBoundary::Close)),
                },
                _ => Err(self.unexpected(name, TagBoundary::Close)),
            },
            "name" | "alias" | "description" => {
                if let State::InGrammeme { field, .. } = &mut self.state {
                    *field = None;
                }
                Ok(None)
            }
            "grammeme" => match std::mem::take(&mut self.state) {
                State::InGrammeme { grammeme, .. } => Ok(Some(Record::Grammeme(grammeme))),
                other => {
                    self.state = other;
                    Err(self.unexpected(name, TagBoundary::Close))
                }
            },
            "type" => match std::mem::take(&mut self.state) {
                State::InLinkType { link_type } => Ok(Some(Record::LinkType(link_type))),
                other => {
                    self.state = other;
                    Err(self.unexpected(name, TagBoundary::Close))
                }
            },
            _ => Ok(None),
        }
    }

    fn text(&mut self, text: String) {
        let slot = match &mut self.state {
            State::InGrammeme {
                grammeme,
                field: Some(field),
            } => match field {
                GrammemeField::Name => &mut grammeme.name,
                GrammemeField::Alias => &mut grammeme.alias,
                GrammemeField::Description => &mut grammeme.description,
            },
            State::InLinkType { link_type } => &mut link_type.name,
            // Whitespace between tags
            _ => return,
        };

        // The tokenizer may split one text node, e.g. around a comment.
        slot.get_or_insert_with(String::new).push_str(&text);
    }

    /// Enter a new top-level entity. Only legal from `Idle`.
    fn start(&mut self, tag: String, next: State) -> ParseResult<()> {
        if !self.is_idle() {
            return Err(self.unexpected(tag, TagBoundary::Open));
        }
        self.state = next;
        Ok(())
    }

    fn lemma_mut(&mut self, tag: &str) -> ParseResult<(&mut Lemma, &mut Option<Form>)> {
        match &mut self.state {
            State::InLemma { lemma, form } => Ok((lemma, form)),
            other => Err(ParseError::Structure {
                tag: tag.to_owned(),
                boundary: TagBoundary::Open,
                state: other.describe(),
            }),
        }
    }

    fn unexpected(&self, tag: String, boundary: TagBoundary) -> ParseError {
        ParseError::Structure {
            tag,
            boundary,
            state: self.state.describe(),
        }
    }
}
