/*!
 * Splicing of prebuilt model files into the document being built
 */

use std::fs;
use std::io;
use std::path::Path;

use thiserror::Error;

use crate::layout;
use crate::referent::{self, ReferentAllocator};
use crate::writer;
use crate::xml::{self, Element, XmlNode, ITEM_TAG};

/// Reasons a model file is left out of the output
#[derive(Error, Debug)]
pub enum SpliceError {
    #[error("failed to read model: {0}")]
    Io(#[from] io::Error),

    #[error("failed to parse model: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("model contains no objects")]
    Empty,

    #[error("model holds invalid character {ch:?} at byte {position} of a value")]
    InvalidCharacter { ch: char, position: usize },
}

/// Load the model at `path` and prepare its top-level items for `depth`
///
/// Every referent inside the model is replaced by a fresh one from
/// `allocator`, and references between the model's own items follow along.
pub fn splice_model(
    path: &Path,
    allocator: &mut ReferentAllocator,
    depth: usize,
) -> Result<Vec<Element>, SpliceError> {
    let bytes = fs::read(path)?;
    splice_bytes(&bytes, allocator, depth)
}

/// Same as [`splice_model`] for a model already in memory
pub fn splice_bytes(
    bytes: &[u8],
    allocator: &mut ReferentAllocator,
    depth: usize,
) -> Result<Vec<Element>, SpliceError> {
    let root = xml::parse_document(bytes)?.ok_or(SpliceError::Empty)?;

    let mut items: Vec<Element> = root
        .children
        .into_iter()
        .filter_map(|child| match child {
            XmlNode::Element(element) if element.tag == ITEM_TAG => Some(element),
            _ => None,
        })
        .collect();
    if items.is_empty() {
        return Err(SpliceError::Empty);
    }

    referent::renumber(&mut items, allocator);

    for item in &mut items {
        layout::normalize(item, depth);
    }
    check_characters(&items)?;

    Ok(items)
}

/// Reject items whose attribute values or text cannot be written back out
fn check_characters(items: &[Element]) -> Result<(), SpliceError> {
    let mut invalid = None;
    for item in items {
        item.visit(&mut |element| {
            if invalid.is_some() {
                return;
            }
            let attributes = element.attributes.iter().map(|(_, value)| value.as_str());
            let texts = element.children.iter().filter_map(|child| match child {
                XmlNode::Text(text) => Some(text.as_str()),
                XmlNode::Element(_) => None,
            });
            invalid = attributes
                .chain(texts)
                .find_map(writer::find_invalid_character);
        });
    }

    match invalid {
        Some((position, ch)) => Err(SpliceError::InvalidCharacter { ch, position }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::{leading, REFERENT_ATTR, REF_TAG};

    const TWO_PARTS: &[u8] = br#"<roblox version="4">
<External>null</External>
<Item class="Part" referent="RBXAAAA">
<Properties>
<string name="Name">Handle</string>
<Ref name="Target">RBXBBBB</Ref>
</Properties>
</Item>
<Item class="Weld" referent="RBXBBBB">
<Properties>
<Ref name="Part0">RBXAAAA</Ref>
<Ref name="Part1">RBXOUTSIDE</Ref>
</Properties>
</Item>
</roblox>"#;

    fn refs(item: &Element) -> Vec<String> {
        let mut values = Vec::new();
        item.visit(&mut |element| {
            if element.tag == REF_TAG {
                values.push(element.first_text().unwrap_or_default().to_string());
            }
        });
        values
    }

    #[test]
    fn remaps_internal_references() {
        let mut allocator = ReferentAllocator::new();
        allocator.next();
        allocator.next();

        let items = splice_bytes(TWO_PARTS, &mut allocator, 1).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].attr(REFERENT_ATTR), Some("RBX2"));
        assert_eq!(items[1].attr(REFERENT_ATTR), Some("RBX3"));
        assert_eq!(refs(&items[0]), ["RBX3"]);
        assert_eq!(refs(&items[1]), ["RBX2", "RBXOUTSIDE"]);
        assert_eq!(allocator.issued(), 4);
    }

    #[test]
    fn items_are_laid_out_for_depth() {
        let mut allocator = ReferentAllocator::new();
        let items = splice_bytes(TWO_PARTS, &mut allocator, 2).unwrap();
        assert_eq!(items[0].children.first(), Some(&leading(3)));
        assert_eq!(items[0].children.last(), Some(&leading(2)));
    }

    #[test]
    fn model_without_items_is_empty() {
        let mut allocator = ReferentAllocator::new();
        let err = splice_bytes(b"<roblox><External>nil</External></roblox>", &mut allocator, 1)
            .unwrap_err();
        assert!(matches!(err, SpliceError::Empty));

        let err = splice_bytes(b"", &mut allocator, 1).unwrap_err();
        assert!(matches!(err, SpliceError::Empty));
    }

    #[test]
    fn out_of_range_value_rejects_model() {
        let mut allocator = ReferentAllocator::new();
        let model = b"<roblox><Item class=\"Part\" referent=\"A\"><Properties>\
<string name=\"Name\">ok\x07</string></Properties></Item></roblox>";
        let err = splice_bytes(model, &mut allocator, 1).unwrap_err();
        assert!(matches!(
            err,
            SpliceError::InvalidCharacter { ch: '\u{7}', position: 2 }
        ));
    }

    #[test]
    fn stray_container_text_is_not_checked() {
        let mut allocator = ReferentAllocator::new();
        let model = b"<roblox><Item class=\"Part\" referent=\"A\">\x01<Properties>\
<string name=\"Name\">ok</string></Properties></Item></roblox>";
        let items = splice_bytes(model, &mut allocator, 1).unwrap();
        assert_eq!(items.len(), 1);
    }

    #[test]
    fn malformed_model_fails_to_parse() {
        let mut allocator = ReferentAllocator::new();
        let err = splice_bytes(b"<roblox><Item></roblox>", &mut allocator, 1).unwrap_err();
        assert!(matches!(err, SpliceError::Xml(_)));
    }

    #[test]
    fn missing_model_fails_to_read() {
        let mut allocator = ReferentAllocator::new();
        let err = splice_model(Path::new("/nonexistent/model.rbxm"), &mut allocator, 1)
            .unwrap_err();
        assert!(matches!(err, SpliceError::Io(_)));
    }
}
