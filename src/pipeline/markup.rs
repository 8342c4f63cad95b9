//! Markup documents (XML)
//!
//! Tag names, attributes and document structure are never touched. Only
//! character data and CDATA sections are extracted, and only the non-blank
//! ones; inter-element whitespace survives reconstruction byte for byte.

use crate::domain::{Result, StructuralUnit, UnitPosition};
use crate::pipeline::TranslationMap;
use quick_xml::events::{BytesCData, BytesText, Event};
use quick_xml::{Reader, Writer};
use std::io::Cursor;

fn unescape_text(t: &BytesText) -> Result<String> {
    t.unescape()
        .map(|cow| cow.into_owned())
        .map_err(|e| crate::domain::VeilError::Document(format!("XML error: {e}")))
}

/// Extract non-blank text segments in document order
pub fn extract(xml: &str) -> Result<Vec<StructuralUnit>> {
    let mut reader = Reader::from_str(xml);
    let mut units = Vec::new();
    let mut segment = 0;

    loop {
        match reader.read_event()? {
            Event::Text(t) => {
                let text = unescape_text(&t)?;
                if !text.trim().is_empty() {
                    units.push(StructuralUnit::new(text, UnitPosition::MarkupSegment(segment)));
                    segment += 1;
                }
            }
            Event::CData(c) => {
                let text = String::from_utf8_lossy(c.as_ref()).into_owned();
                if !text.trim().is_empty() {
                    units.push(StructuralUnit::new(text, UnitPosition::MarkupSegment(segment)));
                    segment += 1;
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }
    Ok(units)
}

/// Rebuild the markup with translated text segments
///
/// Every non-text event is passed through unchanged. Text segments without a
/// translation keep their original content.
pub fn reconstruct(xml: &str, translations: &TranslationMap) -> Result<String> {
    let mut reader = Reader::from_str(xml);
    let mut writer = Writer::new(Cursor::new(Vec::new()));

    loop {
        match reader.read_event()? {
            Event::Text(t) => {
                let text = unescape_text(&t)?;
                match translations.get(text.as_str()) {
                    Some(replacement) => {
                        writer.write_event(Event::Text(BytesText::new(replacement)))?
                    }
                    None => writer.write_event(Event::Text(t))?,
                }
            }
            Event::CData(c) => {
                let text = String::from_utf8_lossy(c.as_ref()).into_owned();
                match translations.get(text.as_str()) {
                    Some(replacement) => {
                        writer.write_event(Event::CData(BytesCData::new(replacement.as_str())))?
                    }
                    None => writer.write_event(Event::CData(c))?,
                }
            }
            Event::Eof => break,
            event => writer.write_event(event)?,
        }
    }

    let bytes = writer.into_inner().into_inner();
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const SAMPLE: &str = "<report>\n  <host name=\"web\">db01.example.com</host>\n  <note>clean</note>\n</report>";

    #[test]
    fn test_extract_text_segments_only() {
        let units = extract(SAMPLE).unwrap();
        let texts: Vec<&str> = units.iter().map(|u| u.text.as_str()).collect();
        assert_eq!(texts, vec!["db01.example.com", "clean"]);
        assert_eq!(units[0].position, UnitPosition::MarkupSegment(0));
        assert_eq!(units[1].position, UnitPosition::MarkupSegment(1));
    }

    #[test]
    fn test_reconstruct_preserves_structure() {
        let mut translations = HashMap::new();
        translations.insert(
            "db01.example.com".to_string(),
            "[HOSTNAME_ab12]".to_string(),
        );

        let out = reconstruct(SAMPLE, &translations).unwrap();
        assert!(out.contains("<host name=\"web\">[HOSTNAME_ab12]</host>"));
        assert!(out.contains("<note>clean</note>"));
        assert!(out.starts_with("<report>"));
    }

    #[test]
    fn test_reconstruct_without_translations_is_identity_shaped() {
        let out = reconstruct(SAMPLE, &HashMap::new()).unwrap();
        assert!(out.contains("db01.example.com"));
        assert!(out.contains("<note>clean</note>"));
    }

    #[test]
    fn test_blank_whitespace_not_extracted() {
        let units = extract("<a>\n   \n<b>x</b></a>").unwrap();
        assert_eq!(units.len(), 1);
        assert_eq!(units[0].text, "x");
    }

    #[test]
    fn test_cdata_extracted() {
        let units = extract("<log><![CDATA[user 10.0.0.1 failed]]></log>").unwrap();
        assert_eq!(units[0].text, "user 10.0.0.1 failed");
    }

    #[test]
    fn test_malformed_markup_errors() {
        assert!(extract("<a><b></a>").is_err());
    }
}
