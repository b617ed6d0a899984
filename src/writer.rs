/*!
 * XML writer implementation for rbxplugin
 */

use std::borrow::Cow;
use std::fs::File;
use std::io::{BufWriter, Write};

use quick_xml::events::attributes::Attribute;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::name::QName;
use quick_xml::Writer;

use crate::config::Config;
use crate::error::{BuildError, Result};
use crate::xml::{self, Element, XmlNode};

/// Whether `ch` may appear in document content
pub fn is_in_character_range(ch: char) -> bool {
    matches!(ch as u32,
        0x09 | 0x0A | 0x0D
        | 0x20..=0xDF77
        | 0xE000..=0xFFFD
        | 0x10000..=0x10FFFF)
}

/// Byte position and value of the first character outside the allowed range
pub fn find_invalid_character(text: &str) -> Option<(usize, char)> {
    text.char_indices().find(|&(_, ch)| !is_in_character_range(ch))
}

/// Escape text for the model format
///
/// Markup characters become named entities and everything outside
/// printable ASCII, except newlines, becomes a numeric reference.
pub fn escape(text: &str) -> Result<String> {
    if let Some((position, ch)) = find_invalid_character(text) {
        return Err(BuildError::InvalidCharacter { ch, position });
    }

    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\n' | '\r' | ' '..='~' => out.push(ch),
            _ => out.push_str(&format!("&#{};", ch as u32)),
        }
    }
    Ok(out)
}

/// XML writer for model documents
pub struct XmlWriter {
    /// Writer configuration
    config: Config,
}

impl XmlWriter {
    /// Create a new XML writer
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Serialize a document
    ///
    /// No declaration is written and empty elements are never collapsed;
    /// layout comes from the whitespace already in the tree and is written
    /// as is, while every other text is escaped.
    pub fn serialize(root: &Element) -> Result<Vec<u8>> {
        let mut writer = Writer::new(Vec::new());
        Self::write_element(root, &mut writer)?;
        Ok(writer.into_inner())
    }

    /// Write serialized output to the configured file
    pub fn write(&self, output: &[u8]) -> Result<()> {
        let file = File::create(&self.config.output)?;
        let mut writer = BufWriter::new(file);
        writer.write_all(output)?;
        writer.flush()?;
        Ok(())
    }

    fn write_element<W: Write>(element: &Element, writer: &mut Writer<W>) -> Result<()> {
        let mut start = BytesStart::new(element.tag.as_str());
        for (name, value) in &element.attributes {
            start.push_attribute(Attribute {
                key: QName(name.as_bytes()),
                value: Cow::Owned(escape(value)?.into_bytes()),
            });
        }
        writer.write_event(Event::Start(start))?;

        for child in &element.children {
            match child {
                XmlNode::Element(child) => Self::write_element(child, writer)?,
                XmlNode::Text(text) if element.holds_layout() && xml::is_layout(text) => {
                    writer.write_event(Event::Text(BytesText::from_escaped(text.as_str())))?
                }
                XmlNode::Text(text) => {
                    writer.write_event(Event::Text(BytesText::from_escaped(escape(text)?)))?
                }
            }
        }

        writer.write_event(Event::End(BytesEnd::new(element.tag.as_str())))?;

        Ok(())
    }
}
