pub mod error;
pub mod event;
pub mod interpreter;
pub mod records;
pub mod xml;

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

pub use error::{ParseError, ParseResult, TagBoundary};
pub use event::{Event, EventSource};
pub use interpreter::{GrammemeField, Interpreter};
pub use records::{convert, convert_with, sink_fn, ConversionStats, ConvertError, RecordSink, Records};
pub use xml::XmlEventSource;

/// Primary entry point: dictionary file -> stream of records.
pub fn records_from_path(path: impl AsRef<Path>) -> ParseResult<Records<XmlEventSource<BufReader<File>>>> {
    Ok(Records::new(XmlEventSource::from_path(path)?))
}

/// Same as [`records_from_path`] for any buffered reader.
pub fn records_from_reader<R: BufRead>(reader: R) -> Records<XmlEventSource<R>> {
    Records::new(XmlEventSource::from_reader(reader))
}

#[cfg(test)]
mod tests {
    use super::*;
    use opcorpora_protocol::{Attributes, Form, Grammeme, Link, LinkType, Record};
    use proptest::prelude::*;

    const DICTIONARY: &str = r#"<?xml version="1.0" encoding="utf-8" standalone="yes"?>
<dictionary version="0.92" revision="403605">
<grammemes>
<grammeme parent=""><name>POST</name><alias>ЧР</alias><description>часть речи</description></grammeme>
<grammeme parent="POST"><name>NOUN</name><alias>СУЩ</alias><description>имя существительное</description></grammeme>
</grammemes>
<restrictions>
<restr type="maybe" auto="0"><left type="lemma">ANim</left><right type="lemma">GNdr</right></restr>
</restrictions>
<lemmata>
<lemma id="1" rev="1"><l t="ёж"><g v="NOUN"/><g v="anim"/></l><f t="ёж"><g v="sing"/><g v="nomn"/></f><f t="ежа"><g v="sing"/><g v="gent"/></f></lemma>
</lemmata>
<link_types>
<type id="1">ADJF-ADJS</type>
</link_types>
<links>
<link id="1" from="6" to="7" type="1"/>
<link id="2" from="8" to="&amp;9" type="1"/>
</links>
</dictionary>
"#;

    #[test]
    fn test_dictionary_end_to_end() {
        let records: Vec<Record> = records_from_reader(DICTIONARY.as_bytes())
            .collect::<Result<_, _>>()
            .expect("dictionary parses");

        // 1. Emission order follows the completing tags
        let kinds: Vec<&str> = records.iter().map(|r| r.kind().as_str()).collect();
        assert_eq!(kinds, vec!["grammeme", "grammeme", "lemma", "linkType", "link", "link"]);

        // 2. Grammeme definitions
        assert_eq!(
            records[1],
            Record::Grammeme(Grammeme {
                parent: Some("POST".to_string()),
                name: Some("NOUN".to_string()),
                alias: Some("СУЩ".to_string()),
                description: Some("имя существительное".to_string()),
            })
        );

        // 3. The lemma and its paradigm
        let Record::Lemma(lemma) = &records[2] else {
            panic!("expected a lemma, got {:?}", records[2]);
        };
        assert_eq!(lemma.id(), Some("1"));
        assert_eq!(lemma.attributes.get("rev"), Some("1"));
        assert_eq!(lemma.text.as_deref(), Some("ёж"));
        assert_eq!(lemma.grammemes, vec!["NOUN", "anim"]);
        assert_eq!(
            lemma.forms,
            vec![
                Form { text: Some("ёж".to_string()), grammemes: vec!["sing".to_string(), "nomn".to_string()] },
                Form { text: Some("ежа".to_string()), grammemes: vec!["sing".to_string(), "gent".to_string()] },
            ]
        );

        // 4. Links, with entity decoding on attribute values
        assert_eq!(
            records[3],
            Record::LinkType(LinkType { id: Some("1".to_string()), name: Some("ADJF-ADJS".to_string()) })
        );
        assert_eq!(
            records[5],
            Record::Link(Link {
                id: Some("2".to_string()),
                from: Some("8".to_string()),
                to: Some("&9".to_string()),
                link_type: Some("1".to_string()),
            })
        );
    }

    #[test]
    fn test_missing_file_is_an_io_error() {
        let result = records_from_path("/nonexistent/dict.opcorpora.xml");
        assert!(matches!(result, Err(ParseError::Io(_))));
    }

    #[test]
    fn test_truncated_document_fails() {
        let truncated = r#"<dictionary><lemmata><lemma id="1"><l t="ёж"/>"#;
        let results: Vec<_> = records_from_reader(truncated.as_bytes()).collect();

        assert_eq!(results.len(), 1);
        assert!(results[0].is_err());
    }

    #[test]
    fn test_records_emitted_before_failure_are_kept() {
        let broken = r#"<links><link id="1" from="1" to="2" type="1"/><oops></links>"#;
        let mut accepted = Vec::new();

        let result = convert(XmlEventSource::from_reader(broken.as_bytes()), &mut accepted);

        assert!(matches!(result, Err(ConvertError::Parse(ParseError::Xml { .. }))));
        assert_eq!(accepted.len(), 1);
    }

    #[test]
    fn test_sink_failure_stops_the_run() {
        let mut seen = 0;
        let mut sink = sink_fn(|_record: Record| {
            seen += 1;
            if seen == 2 { Err("disk full") } else { Ok(()) }
        });

        let result = convert(XmlEventSource::from_reader(DICTIONARY.as_bytes()), &mut sink);

        assert!(matches!(result, Err(ConvertError::Sink("disk full"))));
        drop(sink);
        assert_eq!(seen, 2);
    }

    #[test]
    fn test_convert_counts_records() {
        let mut records = Vec::new();
        let stats = convert(XmlEventSource::from_reader(DICTIONARY.as_bytes()), &mut records).unwrap();

        assert_eq!(
            stats,
            ConversionStats { lemmas: 1, forms: 2, grammemes: 2, link_types: 1, links: 2 }
        );
        assert_eq!(stats.total(), records.len() as u64);
    }

    fn open(name: &str, pairs: &[(&str, &str)]) -> ParseResult<Event> {
        Ok(Event::open(name, pairs.iter().copied().collect::<Attributes>()))
    }

    fn close(name: &str) -> ParseResult<Event> {
        Ok(Event::close(name))
    }

    proptest! {
        #[test]
        fn test_lemma_shape_is_preserved(
            lemma_grammemes in prop::collection::vec("[A-Za-z]{2,6}", 0..6),
            forms in prop::collection::vec(
                ("[а-я]{1,8}", prop::collection::vec("[a-z]{3,5}", 0..5)),
                0..8,
            ),
        ) {
            let mut events = vec![open("lemma", &[("id", "42"), ("rev", "7")]), open("l", &[("t", "stem")])];
            for g in &lemma_grammemes {
                events.push(open("g", &[("v", g.as_str())]));
                events.push(close("g"));
            }
            events.push(close("l"));
            for (text, grammemes) in &forms {
                events.push(open("f", &[("t", text.as_str())]));
                for g in grammemes {
                    events.push(open("g", &[("v", g.as_str())]));
                    events.push(close("g"));
                }
                events.push(close("f"));
            }
            events.push(close("lemma"));

            let records: Vec<Record> = Records::new(events.into_iter()).collect::<Result<_, _>>().unwrap();

            prop_assert_eq!(records.len(), 1);
            let Record::Lemma(lemma) = &records[0] else {
                panic!("expected a lemma");
            };
            prop_assert_eq!(&lemma.grammemes, &lemma_grammemes);
            prop_assert_eq!(lemma.forms.len(), forms.len());
            for (form, (text, grammemes)) in lemma.forms.iter().zip(&forms) {
                prop_assert_eq!(form.text.as_deref(), Some(text.as_str()));
                prop_assert_eq!(&form.grammemes, grammemes);
            }
        }

        #[test]
        fn test_text_outside_destinations_never_mutates(noise in "[ \n\ta-z]{0,12}") {
            let events = vec![
                Ok(Event::text(noise.clone())),
                open("grammeme", &[("parent", "POST")]),
                Ok(Event::text(noise.clone())),
                open("name", &[]),
                Ok(Event::text("NOUN")),
                close("name"),
                Ok(Event::text(noise.clone())),
                close("grammeme"),
                Ok(Event::text(noise)),
            ];

            let records: Vec<Record> = Records::new(events.into_iter()).collect::<Result<_, _>>().unwrap();

            prop_assert_eq!(
                records,
                vec![Record::Grammeme(Grammeme {
                    parent: Some("POST".to_string()),
                    name: Some("NOUN".to_string()),
                    ..Grammeme::default()
                })]
            );
        }
    }
}
