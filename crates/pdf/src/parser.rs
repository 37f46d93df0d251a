//! Parser for the XHTML word layout printed by `pdftotext -bbox`.
//!
//! The layout looks like:
//!
//! ```text
//! <doc>
//!   <page width="720.000000" height="540.000000">
//!     <word xMin="56.800000" yMin="57.200000" xMax="94.100000" yMax="69.200000">Plan</word>
//!   </page>
//! </doc>
//! ```

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use slidetree_core::{Error, PageWords, Result, Word};
use unicode_normalization::UnicodeNormalization;

/// Parse the word layout of a whole document.
///
/// Each `<page>` element starts a new page, numbered from 1 in document
/// order. Word text is NFC-normalized; words with no text are skipped.
pub fn parse_bbox_xml(xml: &str) -> Result<Vec<PageWords>> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut pages: Vec<PageWords> = Vec::new();
    let mut current: Option<WordBox> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => {
                let name = e.name();
                match local_name(name.as_ref()) {
                    b"page" => pages.push(PageWords::new(pages.len() + 1, Vec::new())),
                    b"word" => current = Some(WordBox::from_element(e)?),
                    _ => {}
                }
            }
            Ok(Event::Empty(ref e)) => {
                let name = e.name();
                if local_name(name.as_ref()) == b"page" {
                    pages.push(PageWords::new(pages.len() + 1, Vec::new()));
                }
            }
            Ok(Event::Text(ref e)) => {
                if let Some(word) = current.as_mut() {
                    let text = e
                        .unescape()
                        .map_err(|e| Error::XmlError(format!("Invalid word text: {}", e)))?;
                    word.text.push_str(&text);
                }
            }
            Ok(Event::End(ref e)) => {
                let name = e.name();
                if local_name(name.as_ref()) == b"word" {
                    if let Some(word) = current.take() {
                        let page = pages.last_mut().ok_or_else(|| {
                            Error::XmlError("Word found outside of a page".to_string())
                        })?;
                        if let Some(word) = word.into_word() {
                            page.words.push(word);
                        }
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(Error::XmlError(format!(
                    "Error at position {}: {}",
                    reader.buffer_position(),
                    e
                )));
            }
            _ => {}
        }
    }

    log::debug!(
        "Parsed {} pages, {} words",
        pages.len(),
        pages.iter().map(|p| p.words.len()).sum::<usize>()
    );
    Ok(pages)
}

/// A `<word>` element being read.
#[derive(Debug, Default)]
struct WordBox {
    text: String,
    x_min: f64,
    y_min: f64,
    y_max: f64,
}

impl WordBox {
    fn from_element(e: &BytesStart) -> Result<Self> {
        let mut word = WordBox::default();

        for attr in e.attributes() {
            let attr = attr.map_err(|e| Error::XmlError(format!("Invalid word attribute: {}", e)))?;
            let slot = match attr.key.as_ref() {
                b"xMin" => &mut word.x_min,
                b"yMin" => &mut word.y_min,
                b"yMax" => &mut word.y_max,
                _ => continue,
            };
            let value = String::from_utf8_lossy(&attr.value);
            *slot = value.trim().parse::<f64>().map_err(|_| {
                Error::XmlError(format!(
                    "Invalid {} on word: '{}'",
                    String::from_utf8_lossy(attr.key.as_ref()),
                    value
                ))
            })?;
        }

        Ok(word)
    }

    /// The word with its box height standing in for its font size.
    fn into_word(self) -> Option<Word> {
        let text: String = self.text.trim().nfc().collect();
        if text.is_empty() {
            return None;
        }
        Some(Word::new(text, self.x_min, self.y_min, self.y_max - self.y_min))
    }
}

/// Extract the local name from a potentially namespaced XML element name.
fn local_name(name: &[u8]) -> &[u8] {
    match name.iter().position(|&b| b == b':') {
        Some(pos) => &name[pos + 1..],
        None => name,
    }
}
