/*!
 * Generic XML tree used to build and splice model documents
 *
 * Layout is carried in the tree itself as whitespace text nodes, so the
 * serializer never has to invent indentation.
 */

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

/// Tag of the document root
pub const ROOT_TAG: &str = "roblox";

/// Tag of an element that represents an object
pub const ITEM_TAG: &str = "Item";

/// Tag of the container holding an object's properties
pub const PROPERTIES_TAG: &str = "Properties";

/// Tag of a property whose value references another object
pub const REF_TAG: &str = "Ref";

/// Attribute holding an object's referent
pub const REFERENT_ATTR: &str = "referent";

/// A node of the output tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XmlNode {
    /// Element with a tag, attributes and children
    Element(Element),
    /// Raw (unescaped) text content
    Text(String),
}

/// An XML element
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    /// Tag name
    pub tag: String,
    /// Attributes in output order
    pub attributes: Vec<(String, String)>,
    /// Child nodes in output order
    pub children: Vec<XmlNode>,
}

/// Whitespace that places the next tag at `depth`
pub fn leading(depth: usize) -> XmlNode {
    XmlNode::Text(format!("\n{}", "\t".repeat(depth)))
}

/// Whether `text` is indentation of the kind [`leading`] produces
pub fn is_layout(text: &str) -> bool {
    text.chars().all(|ch| ch == '\n' || ch == '\t')
}

impl Element {
    /// Create an empty element
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Create an element at `depth` whose closing tag is already indented
    pub fn laid_out(tag: impl Into<String>, depth: usize) -> Self {
        let mut element = Self::new(tag);
        element.children.push(leading(depth));
        element
    }

    /// Create an element holding a single text child
    pub fn with_text(tag: impl Into<String>, text: impl Into<String>) -> Self {
        let mut element = Self::new(tag);
        element.children.push(XmlNode::Text(text.into()));
        element
    }

    /// Whether text children of this element are layout rather than values
    pub fn holds_layout(&self) -> bool {
        matches!(self.tag.as_str(), ROOT_TAG | ITEM_TAG | PROPERTIES_TAG)
    }

    /// Look up an attribute value
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Set an attribute, replacing an existing value in place
    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(key, _)| *key == name) {
            Some(slot) => slot.1 = value,
            None => self.attributes.push((name, value)),
        }
    }

    /// Mutable access to the first child when it is text
    pub fn first_text_mut(&mut self) -> Option<&mut String> {
        match self.children.first_mut() {
            Some(XmlNode::Text(text)) => Some(text),
            _ => None,
        }
    }

    /// The first child when it is text
    pub fn first_text(&self) -> Option<&str> {
        match self.children.first() {
            Some(XmlNode::Text(text)) => Some(text),
            _ => None,
        }
    }

    /// Iterate over child elements, skipping text
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|child| match child {
            XmlNode::Element(element) => Some(element),
            XmlNode::Text(_) => None,
        })
    }

    /// Append `child` at `depth`, keeping the closing-tag whitespace last
    pub fn append_laid_out(&mut self, child: Element, depth: usize) {
        let at = match self.children.last() {
            Some(XmlNode::Text(_)) => self.children.len() - 1,
            _ => self.children.len(),
        };
        self.children.insert(at, XmlNode::Element(child));
        self.children.insert(at, leading(depth));
    }

    /// Visit this element and every descendant element in document order
    pub fn visit_mut<F: FnMut(&mut Element)>(&mut self, f: &mut F) {
        f(self);
        for child in &mut self.children {
            if let XmlNode::Element(element) = child {
                element.visit_mut(f);
            }
        }
    }

    /// Visit this element and every descendant element in document order
    pub fn visit<F: FnMut(&Element)>(&self, f: &mut F) {
        f(self);
        for element in self.elements() {
            element.visit(f);
        }
    }
}

fn start_element(start: &BytesStart) -> Result<Element, quick_xml::Error> {
    let mut element = Element::new(String::from_utf8_lossy(start.name().as_ref()));
    for attribute in start.attributes() {
        let attribute = attribute?;
        let key = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
        let value = attribute.unescape_value()?.into_owned();
        element.attributes.push((key, value));
    }
    Ok(element)
}

/// Parse a document and return its root element, if it has one
pub fn parse_document(bytes: &[u8]) -> Result<Option<Element>, quick_xml::Error> {
    let mut reader = Reader::from_reader(bytes);
    let mut buf = Vec::new();
    // Open elements, innermost last
    let mut stack: Vec<Element> = Vec::new();
    let mut root = None;

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(start) => stack.push(start_element(&start)?),
            Event::Empty(start) => {
                let element = start_element(&start)?;
                match stack.last_mut() {
                    Some(parent) => parent.children.push(XmlNode::Element(element)),
                    None if root.is_none() => root = Some(element),
                    None => {}
                }
            }
            Event::End(_) => {
                if let Some(element) = stack.pop() {
                    match stack.last_mut() {
                        Some(parent) => parent.children.push(XmlNode::Element(element)),
                        None if root.is_none() => root = Some(element),
                        None => {}
                    }
                }
            }
            Event::Text(text) => {
                if let Some(parent) = stack.last_mut() {
                    parent
                        .children
                        .push(XmlNode::Text(text.unescape()?.into_owned()));
                }
            }
            Event::CData(data) => {
                if let Some(parent) = stack.last_mut() {
                    let text = String::from_utf8_lossy(&data.into_inner()).into_owned();
                    parent.children.push(XmlNode::Text(text));
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(root)
}
