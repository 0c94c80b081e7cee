//! XML element tree reader
//!
//! Turns raw XML text into an owned [`XmlNode`] tree. Only elements, their
//! attributes and their character data are kept; comments, processing
//! instructions, the XML declaration and doctype are skipped.

use crate::error::ParseError;
use indexmap::IndexMap;
use quick_xml::escape::unescape_with;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// A parsed XML element
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XmlNode {
    /// The name/tag of this element, prefix included
    pub name: String,
    /// Attribute names to values, in document order
    pub attributes: IndexMap<String, String>,
    /// Character data directly inside this element (text and CDATA)
    pub text_content: String,
    /// Child elements in document order
    pub children: Vec<XmlNode>,
}

impl XmlNode {
    /// Text content of this element and all of its descendants, in document order.
    ///
    /// Direct text is emitted before the children's text, since the tree does
    /// not record how text and child elements interleave.
    pub fn full_text(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        out.push_str(&self.text_content);
        for child in &self.children {
            child.collect_text(out);
        }
    }

    /// Whether [`full_text`](Self::full_text) contains any non-whitespace character.
    pub fn has_text(&self) -> bool {
        !self.text_content.trim().is_empty() || self.children.iter().any(XmlNode::has_text)
    }
}

/// Deepest element nesting accepted by the reader.
///
/// Reading, inference and rendering all recurse once per level, so the limit
/// keeps them inside a worker thread's default stack.
pub const MAX_DEPTH: usize = 256;

/// Parses an XML document held in memory and returns the root element
pub fn parse_xml_str(xml: &str) -> Result<XmlNode, ParseError> {
    parse_xml_reader(xml.as_bytes())
}

/// Parses an XML file and returns the root element
///
/// # Arguments
/// * `path` - The file path to the XML file to parse
///
/// # Returns
/// * `Result<XmlNode, ParseError>` - The parsed XML tree, or why the file
///   could not be read or is not well-formed
///
/// # Example
/// ```ignore
/// let root = parse_xml_file("data/feed.xml")?;
/// println!("Root element: {}", root.name);
/// ```
pub fn parse_xml_file<P: AsRef<Path>>(path: P) -> Result<XmlNode, ParseError> {
    let file = File::open(path)?;
    parse_xml_reader(BufReader::new(file))
}

/// Parses an XML document from any buffered source and returns the root element
pub fn parse_xml_reader<R: BufRead>(source: R) -> Result<XmlNode, ParseError> {
    let mut reader = Reader::from_reader(source);
    reader.trim_text(true);
    let mut tree = TreeReader {
        reader,
        entities: predefined_entities(),
    };

    let mut buf = Vec::new();
    let root = loop {
        buf.clear();
        let maybe_root = match tree.reader.read_event_into(&mut buf)? {
            Event::Start(start) => Some((start.into_owned(), false)),
            Event::Empty(start) => Some((start.into_owned(), true)),
            Event::DocType(doctype) => {
                tree.declare_entities(&String::from_utf8_lossy(&doctype));
                None
            }
            Event::Text(text) if !is_blank(&text) => return Err(ParseError::ContentOutsideRoot),
            Event::CData(_) | Event::End(_) => return Err(ParseError::ContentOutsideRoot),
            Event::Eof => return Err(ParseError::EmptyDocument),
            _ => None,
        };

        if let Some((start, self_closing)) = maybe_root {
            break tree.parse_node(start, self_closing, 1)?;
        }
    };

    // Only comments, processing instructions and whitespace may follow the root.
    loop {
        buf.clear();
        match tree.reader.read_event_into(&mut buf)? {
            Event::Eof => return Ok(root),
            Event::Text(text) if is_blank(&text) => {}
            Event::Comment(_) | Event::PI(_) => {}
            _ => return Err(ParseError::ContentOutsideRoot),
        }
    }
}

fn is_blank(bytes: &[u8]) -> bool {
    bytes.iter().all(u8::is_ascii_whitespace)
}

fn predefined_entities() -> HashMap<String, String> {
    [("lt", "<"), ("gt", ">"), ("amp", "&"), ("apos", "'"), ("quot", "\"")]
        .into_iter()
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .collect()
}

/// Internal general entities (`<!ENTITY name "value">`) declared in a doctype.
///
/// Parameter entities and external (`SYSTEM`/`PUBLIC`) entities are skipped.
fn entity_declarations(doctype: &str) -> Vec<(String, String)> {
    const DECL: &str = "<!ENTITY";

    let mut found = Vec::new();
    let mut rest = doctype;
    while let Some(at) = rest.find(DECL) {
        rest = rest[at + DECL.len()..].trim_start();
        let parameter = rest.starts_with('%');
        if parameter {
            rest = rest[1..].trim_start();
        }

        let name_end = rest.find(char::is_whitespace).unwrap_or(rest.len());
        let name = &rest[..name_end];
        rest = rest[name_end..].trim_start();

        let Some(quote) = rest.chars().next().filter(|c| *c == '"' || *c == '\'') else {
            continue;
        };
        let body = &rest[1..];
        let Some(close) = body.find(quote) else {
            break;
        };
        if !parameter && !name.is_empty() {
            found.push((name.to_string(), body[..close].to_string()));
        }
        rest = &body[close + 1..];
    }
    found
}

struct TreeReader<R> {
    reader: Reader<R>,
    /// Entity name to replacement text, predefined entities included
    entities: HashMap<String, String>,
}

impl<R: BufRead> TreeReader<R> {
    fn declare_entities(&mut self, doctype: &str) {
        for (name, raw) in entity_declarations(doctype) {
            // References inside a value resolve against earlier declarations.
            let value = match unescape_with(&raw, |n| self.entities.get(n).map(String::as_str)) {
                Ok(value) => value.into_owned(),
                Err(_) => raw.clone(),
            };
            // the first declaration of a name is binding
            self.entities.entry(name).or_insert(value);
        }
    }

    fn parse_node(
        &mut self,
        start: BytesStart<'static>,
        self_closing: bool,
        depth: usize,
    ) -> Result<XmlNode, ParseError> {
        if depth > MAX_DEPTH {
            return Err(ParseError::TooDeep { limit: MAX_DEPTH });
        }

        let element_name_bytes = start.name().as_ref().to_vec();
        let element_name = String::from_utf8_lossy(&element_name_bytes).to_string();
        let attributes = self.collect_attributes(&start)?;

        let mut node = XmlNode {
            name: element_name,
            attributes,
            text_content: String::new(),
            children: Vec::new(),
        };

        if self_closing {
            return Ok(node);
        }

        let mut buf = Vec::new();
        loop {
            buf.clear();
            match self.reader.read_event_into(&mut buf)? {
                Event::Start(child_start) => {
                    let child = self.parse_node(child_start.into_owned(), false, depth + 1)?;
                    node.children.push(child);
                }
                Event::Empty(child_start) => {
                    let child = self.parse_node(child_start.into_owned(), true, depth + 1)?;
                    node.children.push(child);
                }
                Event::Text(text) => {
                    let value = text.unescape_with(|n| self.entities.get(n).map(String::as_str))?;
                    if !value.trim().is_empty() {
                        node.text_content.push_str(&value);
                    }
                }
                Event::CData(data) => {
                    let value = String::from_utf8_lossy(&data);
                    if !value.trim().is_empty() {
                        node.text_content.push_str(&value);
                    }
                }
                Event::End(end) => {
                    if end.name().as_ref() != element_name_bytes.as_slice() {
                        return Err(ParseError::MismatchedEnd {
                            expected: node.name,
                            found: String::from_utf8_lossy(end.name().as_ref()).to_string(),
                        });
                    }
                    return Ok(node);
                }
                Event::Eof => {
                    return Err(ParseError::UnexpectedEof { element: node.name });
                }
                _ => {}
            }
        }
    }

    fn collect_attributes(&self, start: &BytesStart<'_>) -> Result<IndexMap<String, String>, ParseError> {
        let mut map = IndexMap::new();
        for attr in start.attributes() {
            let attr = attr?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).to_string();
            let value = attr
                .unescape_value_with(|n| self.entities.get(n).map(String::as_str))?
                .to_string();
            map.insert(key, value);
        }
        Ok(map)
    }
}
