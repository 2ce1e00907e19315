//! Generic XML decoding into a nested mapping.
//!
//! The mapping mirrors the document shape without any schema:
//! - attributes become `@name` keys
//! - child elements become keys; repeated siblings collapse into a `List`
//! - text of an element with neither attributes nor children is a bare `Text`,
//!   otherwise it is stored under `#text`
//! - an empty element without attributes is `Null`
//!
//! Whether a key holds one object or a list therefore depends on how many
//! siblings the document happened to contain. Consumers normalize with
//! [`XmlValue::as_list`].

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::fmt;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum XmlError {
    #[error("malformed xml: {0}")]
    Syntax(String),

    #[error("document has no root element")]
    NoRoot,

    #[error("element <{0}> is never closed")]
    Unclosed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum XmlValue {
    Null,
    Text(String),
    Map(BTreeMap<String, XmlValue>),
    List(Vec<XmlValue>),
}

impl XmlValue {
    /// Child entry by key, if this is a map.
    pub fn get(&self, key: &str) -> Option<&XmlValue> {
        match self {
            XmlValue::Map(map) => map.get(key),
            _ => None,
        }
    }

    /// Follow a chain of keys.
    pub fn path(&self, keys: &[&str]) -> Option<&XmlValue> {
        keys.iter().try_fold(self, |value, key| value.get(key))
    }

    /// Textual content: bare text, or the `#text` entry of a map.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            XmlValue::Text(text) => Some(text),
            XmlValue::Map(map) => map.get("#text").and_then(XmlValue::as_str),
            _ => None,
        }
    }

    /// Normalize the one-object / list-of-objects ambiguity.
    pub fn as_list(&self) -> Vec<&XmlValue> {
        match self {
            XmlValue::List(items) => items.iter().collect(),
            XmlValue::Null => Vec::new(),
            other => vec![other],
        }
    }

    fn write_indented(&self, f: &mut fmt::Formatter<'_>, indent: usize) -> fmt::Result {
        let pad = "  ".repeat(indent);
        match self {
            XmlValue::Null => writeln!(f, "~"),
            XmlValue::Text(text) => writeln!(f, "{text}"),
            XmlValue::Map(map) => {
                writeln!(f)?;
                for (key, value) in map {
                    write!(f, "{pad}{key}: ")?;
                    value.write_indented(f, indent + 1)?;
                }
                Ok(())
            }
            XmlValue::List(items) => {
                writeln!(f)?;
                for item in items {
                    write!(f, "{pad}- ")?;
                    item.write_indented(f, indent + 1)?;
                }
                Ok(())
            }
        }
    }
}

/// Indented, YAML-like rendering for terminal output.
impl fmt::Display for XmlValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            XmlValue::Map(map) => {
                for (key, value) in map {
                    write!(f, "{key}: ")?;
                    value.write_indented(f, 1)?;
                }
                Ok(())
            }
            other => other.write_indented(f, 0),
        }
    }
}

struct Frame {
    name: String,
    attributes: Vec<(String, String)>,
    children: BTreeMap<String, XmlValue>,
    text: String,
}

impl Frame {
    fn open(start: &BytesStart<'_>) -> Result<Self, XmlError> {
        let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
        let mut attributes = Vec::new();
        for attr in start.attributes() {
            let attr = attr.map_err(|e| XmlError::Syntax(e.to_string()))?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let value = attr
                .unescape_value()
                .map_err(|e| XmlError::Syntax(e.to_string()))?
                .into_owned();
            attributes.push((key, value));
        }
        Ok(Self {
            name,
            attributes,
            children: BTreeMap::new(),
            text: String::new(),
        })
    }

    fn attach(&mut self, name: String, value: XmlValue) {
        match self.children.entry(name) {
            Entry::Vacant(slot) => {
                slot.insert(value);
            }
            Entry::Occupied(mut slot) => match slot.get_mut() {
                XmlValue::List(items) => items.push(value),
                existing => {
                    let first = std::mem::replace(existing, XmlValue::Null);
                    *existing = XmlValue::List(vec![first, value]);
                }
            },
        }
    }

    fn close(self) -> (String, XmlValue) {
        let Frame {
            name,
            attributes,
            mut children,
            text,
        } = self;
        if attributes.is_empty() && children.is_empty() {
            let value = if text.is_empty() {
                XmlValue::Null
            } else {
                XmlValue::Text(text)
            };
            return (name, value);
        }
        for (key, value) in attributes {
            children.insert(format!("@{key}"), XmlValue::Text(value));
        }
        if !text.is_empty() {
            children.insert("#text".to_string(), XmlValue::Text(text));
        }
        (name, XmlValue::Map(children))
    }
}

/// Parse a document into `{ <root-name>: <root-value> }`.
pub fn parse(input: &str) -> Result<XmlValue, XmlError> {
    let mut reader = Reader::from_str(input);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<Frame> = Vec::new();
    let mut root: Option<(String, XmlValue)> = None;

    loop {
        let event = reader
            .read_event()
            .map_err(|e| XmlError::Syntax(e.to_string()))?;
        match event {
            Event::Start(start) => stack.push(Frame::open(&start)?),
            Event::Empty(start) => {
                let (name, value) = Frame::open(&start)?.close();
                match stack.last_mut() {
                    Some(parent) => parent.attach(name, value),
                    None => root = Some((name, value)),
                }
            }
            Event::End(_) => {
                let frame = stack
                    .pop()
                    .ok_or_else(|| XmlError::Syntax("unexpected closing tag".into()))?;
                let (name, value) = frame.close();
                match stack.last_mut() {
                    Some(parent) => parent.attach(name, value),
                    None => root = Some((name, value)),
                }
            }
            Event::Text(text) => {
                if let Some(top) = stack.last_mut() {
                    let text = text
                        .unescape()
                        .map_err(|e| XmlError::Syntax(e.to_string()))?;
                    top.text.push_str(&text);
                }
            }
            Event::CData(data) => {
                if let Some(top) = stack.last_mut() {
                    top.text
                        .push_str(&String::from_utf8_lossy(&data.into_inner()));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(open) = stack.pop() {
        return Err(XmlError::Unclosed(open.name));
    }
    let (name, value) = root.ok_or(XmlError::NoRoot)?;
    Ok(XmlValue::Map(BTreeMap::from([(name, value)])))
}
