use crate::attributes::Attributes;
use alloc::string::String;
use alloc::vec::Vec;

#[cfg(feature = "serde")]
use serde::Serialize as SerdeSerialize;

/// A dictionary headword together with its paradigm.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(SerdeSerialize))]
pub struct Lemma {
    /// Everything on the `<lemma>` tag (`id`, `rev`, ...), verbatim.
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub attributes: Attributes,
    pub grammemes: Vec<String>,
    pub forms: Vec<Form>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub text: Option<String>,
}

impl Lemma {
    pub fn new(attributes: Attributes) -> Self {
        Self {
            attributes,
            grammemes: Vec::new(),
            forms: Vec::new(),
            text: None,
        }
    }

    pub fn id(&self) -> Option<&str> {
        self.attributes.get("id")
    }
}

/// One inflected variant, owned by its lemma.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(SerdeSerialize))]
pub struct Form {
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub text: Option<String>,
    pub grammemes: Vec<String>,
}

impl Form {
    pub fn new(text: Option<String>) -> Self {
        Self {
            text,
            grammemes: Vec::new(),
        }
    }
}

/// Definition of a grammatical category value (`NOUN`, `sing`, `nomn`, ...).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(SerdeSerialize))]
pub struct Grammeme {
    // Always present in the output, `null` for top-level categories.
    pub parent: Option<String>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub name: Option<String>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub alias: Option<String>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub description: Option<String>,
}

impl Grammeme {
    pub fn new(parent: Option<String>) -> Self {
        Self {
            parent,
            ..Self::default()
        }
    }
}

/// A labelled category of relation between lemmas (e.g. `ADJF-ADJS`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(SerdeSerialize))]
pub struct LinkType {
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub id: Option<String>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub name: Option<String>,
}

/// A relation instance between two lemmas.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(SerdeSerialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Link {
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub id: Option<String>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub from: Option<String>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub to: Option<String>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub link_type: Option<String>,
}

/// One completed entity, ready to be written out as a single line.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(SerdeSerialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", rename_all = "camelCase"))]
pub enum Record {
    Lemma(Lemma),
    Grammeme(Grammeme),
    LinkType(LinkType),
    Link(Link),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    Lemma,
    Grammeme,
    LinkType,
    Link,
}

impl RecordKind {
    /// Value of the `type` field in the serialized record.
    pub const fn as_str(self) -> &'static str {
        match self {
            RecordKind::Lemma => "lemma",
            RecordKind::Grammeme => "grammeme",
            RecordKind::LinkType => "linkType",
            RecordKind::Link => "link",
        }
    }
}

impl core::fmt::Display for RecordKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Record {
    pub fn kind(&self) -> RecordKind {
        match self {
            Record::Lemma(_) => RecordKind::Lemma,
            Record::Grammeme(_) => RecordKind::Grammeme,
            Record::LinkType(_) => RecordKind::LinkType,
            Record::Link(_) => RecordKind::Link,
        }
    }
}

impl From<Lemma> for Record {
    fn from(lemma: Lemma) -> Self {
        Record::Lemma(lemma)
    }
}

impl From<Grammeme> for Record {
    fn from(grammeme: Grammeme) -> Self {
        Record::Grammeme(grammeme)
    }
}

impl From<LinkType> for Record {
    fn from(link_type: LinkType) -> Self {
        Record::LinkType(link_type)
    }
}

impl From<Link> for Record {
    fn from(link: Link) -> Self {
        Record::Link(link)
    }
}
