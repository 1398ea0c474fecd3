//! OFX 1.x (SGML) normalization.
//!
//! Legacy OFX files start with a colon-delimited header and leave leaf
//! elements unclosed:
//!
//! ```text
//! OFXHEADER:100
//! DATA:OFXSGML
//!
//! <OFX>
//! <SIGNONMSGSRSV1>
//! <SONRS>
//! <DTSERVER>20240131120000
//! <LANGUAGE>ENG
//! </SONRS>
//! ...
//! ```
//!
//! [`normalize`] removes the header and rewrites the body as a single line of
//! well-formed XML. Tags, character data and entity references are read with
//! `sgmlish`; closing tags are then inferred on top of that event stream. A
//! leaf value runs from its start tag to the next tag or the end of the line,
//! whichever comes first; text on following lines before the next tag is
//! dropped. A tag with no value on its line opens an aggregate only when its
//! own end tag appears before the end tag of the element enclosing it.
//! Otherwise it is an empty leaf.

use crate::error::{Error, Result};
use quick_xml::escape::escape;
use sgmlish::SgmlEvent;
use tracing::{debug, warn};

/// Strip the legacy header and convert the body to XML.
pub fn normalize(text: &str) -> Result<String> {
    let xml = to_tree(strip_header(text)?)?;
    debug!(bytes = xml.len(), "normalized legacy OFX body");
    Ok(xml)
}

/// Remove the header block.
///
/// The header ends at the first `<`. The body keeps the character right
/// before it (normally the line break that ended the header).
pub fn strip_header(text: &str) -> Result<&str> {
    let first_tag = text.find('<').ok_or_else(|| {
        Error::NormalizationFailure("no markup found after the header".to_string())
    })?;

    let start = text[..first_tag]
        .char_indices()
        .next_back()
        .map(|(index, _)| index)
        .unwrap_or(first_tag);

    Ok(&text[start..])
}

/// Rewrite a legacy OFX body as one contiguous line of XML.
pub fn to_tree(body: &str) -> Result<String> {
    let tokens = tokenize(body)?;

    let mut xml = String::with_capacity(body.len());
    let mut open: Vec<&str> = Vec::new();
    let mut elements = 0usize;
    let mut index = 0;

    while index < tokens.len() {
        match &tokens[index] {
            Token::Start(name) => {
                elements += 1;
                let value = match tokens.get(index + 1) {
                    Some(Token::Text(text)) => leaf_value(text),
                    _ => "",
                };

                if !value.is_empty() {
                    push_leaf(&mut xml, name, value);
                    // skip the value and an explicit close right behind it
                    index += 2;
                    if matches!(tokens.get(index), Some(Token::End(end)) if end == name) {
                        index += 1;
                    }
                    continue;
                }

                if closes_within_parent(&tokens[index + 1..], name, &open) {
                    open.push(name);
                    push_open(&mut xml, name);
                } else {
                    push_leaf(&mut xml, name, "");
                }
            }
            Token::Empty(name) => {
                elements += 1;
                push_leaf(&mut xml, name, "");
            }
            Token::End(name) => match open.iter().rposition(|candidate| *candidate == name.as_str()) {
                Some(position) => {
                    while open.len() > position {
                        if let Some(closed) = open.pop() {
                            push_close(&mut xml, closed);
                        }
                    }
                }
                None => warn!(tag = %name, "ignoring end tag with no open element"),
            },
            Token::Text(_) => {}
        }
        index += 1;
    }

    while let Some(name) = open.pop() {
        push_close(&mut xml, name);
    }

    if elements == 0 {
        return Err(Error::NormalizationFailure(
            "body contains no elements".to_string(),
        ));
    }

    Ok(xml)
}

/// Colon-delimited header of a legacy file, read without validation.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LegacyHeader {
    entries: Vec<(String, String)>,
}

impl LegacyHeader {
    /// Read `KEY:VALUE` lines up to the first `<`.
    pub fn parse(text: &str) -> Self {
        let end = text.find('<').unwrap_or(text.len());
        let entries = text[..end]
            .trim_start_matches('\u{feff}')
            .lines()
            .filter_map(|line| {
                let (key, value) = line.trim().split_once(':')?;
                Some((key.trim().to_string(), value.trim().to_string()))
            })
            .collect();

        Self { entries }
    }

    /// Value of a header key, compared case-insensitively.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(key))
            .map(|(_, value)| value.as_str())
    }

    pub fn charset(&self) -> Option<&str> {
        self.get("CHARSET")
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Start(String),
    End(String),
    Empty(String),
    Text(String),
}

/// Read the body into tags and character data. Entity references are
/// expanded; unknown ones, such as the `&T` of a bare `AT&T`, stay literal.
fn tokenize(body: &str) -> Result<Vec<Token>> {
    let fragment = sgmlish::Parser::builder()
        .trim_whitespace(false)
        .expand_entities(|entity| {
            Some(match entity {
                "lt" => "<".to_string(),
                "gt" => ">".to_string(),
                "amp" => "&".to_string(),
                "quot" => "\"".to_string(),
                "apos" => "'".to_string(),
                "nbsp" => " ".to_string(),
                other => format!("&{}", other),
            })
        })
        .parse(body)?;

    let mut tokens: Vec<Token> = Vec::new();
    for event in fragment {
        match event {
            SgmlEvent::OpenStartTag { name } => tokens.push(Token::Start(name.into_owned())),
            SgmlEvent::XmlCloseEmptyElement => {
                if let Some(Token::Start(name)) = tokens.pop() {
                    tokens.push(Token::Empty(name));
                }
            }
            SgmlEvent::EndTag { name } => tokens.push(Token::End(name.into_owned())),
            SgmlEvent::Character(text) => match tokens.last_mut() {
                Some(Token::Text(previous)) => previous.push_str(&text),
                _ => tokens.push(Token::Text(text.into_owned())),
            },
            _ => {}
        }
    }

    Ok(tokens)
}

/// Whether `name` is closed explicitly before any element in `open` is.
fn closes_within_parent(rest: &[Token], name: &str, open: &[&str]) -> bool {
    for token in rest {
        if let Token::End(end) = token {
            if end == name {
                return true;
            }
            if open.contains(&end.as_str()) {
                return false;
            }
        }
    }
    false
}

/// Value text of a leaf: up to the end of its line, trimmed.
fn leaf_value(text: &str) -> &str {
    text.split(['\r', '\n']).next().unwrap_or("").trim()
}

fn push_open(xml: &mut String, name: &str) {
    xml.push('<');
    xml.push_str(name);
    xml.push('>');
}

fn push_close(xml: &mut String, name: &str) {
    xml.push_str("</");
    xml.push_str(name);
    xml.push('>');
}

fn push_leaf(xml: &mut String, name: &str, value: &str) {
    push_open(xml, name);
    xml.push_str(&escape(value));
    push_close(xml, name);
}
