/*!
 * Whitespace normalization for items moved between documents
 */

use crate::xml::{leading, Element, XmlNode, ITEM_TAG, PROPERTIES_TAG};

fn is_structural(element: &Element) -> bool {
    element.tag == ITEM_TAG || element.tag == PROPERTIES_TAG
}

/// Re-indent `element` as if it had been written at `depth`
///
/// Every text child of an item or properties container is treated as layout
/// and dropped, even if it is not whitespace. Property values are never
/// touched.
pub fn normalize(element: &mut Element, depth: usize) {
    let children = std::mem::take(&mut element.children);
    for child in children {
        let XmlNode::Element(mut child) = child else {
            continue;
        };
        if is_structural(&child) {
            normalize(&mut child, depth + 1);
        }
        element.children.push(leading(depth + 1));
        element.children.push(XmlNode::Element(child));
    }
    element.children.push(leading(depth));
}
