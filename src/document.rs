/*!
 * Assembly of the final model document
 */

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::{BuildError, Result};
use crate::referent::{self, ReferentAllocator};
use crate::walker::Walker;
use crate::xml::{Element, ROOT_TAG};

/// Root attributes, in output order
pub const ROOT_ATTRIBUTES: [(&str, &str); 4] = [
    ("xmlns:xmime", "http://www.w3.org/2005/05/xmlmime"),
    ("xmlns:xsi", "http://www.w3.org/2001/XMLSchema-instance"),
    ("xsi:noNamespaceSchemaLocation", "http://www.roblox.com/roblox.xsd"),
    ("version", "4"),
];

/// Content of the external-reference markers, in output order
pub const EXTERNALS: [&str; 2] = ["null", "nil"];

/// Create the document root with its fixed header
pub fn envelope() -> Element {
    let mut root = Element::laid_out(ROOT_TAG, 0);
    for (name, value) in ROOT_ATTRIBUTES {
        root.set_attr(name, value);
    }
    for marker in EXTERNALS {
        root.append_laid_out(Element::with_text("External", marker), 1);
    }
    root
}

/// Build the document for the directory at `input`
///
/// Entries of `input` become the root's items. Once the walk is done every
/// referent is reissued in document order, starting again at `RBX0`.
pub fn assemble(input: &Path, walker: &mut Walker) -> Result<Element> {
    if !fs::metadata(input)?.is_dir() {
        return Err(BuildError::NotADirectory(input.to_path_buf()));
    }

    let mut root = envelope();
    let mut allocator = ReferentAllocator::new();
    for item in walker.walk(input, 1, &mut allocator)? {
        root.append_laid_out(item, 1);
    }

    let mut allocator = ReferentAllocator::new();
    referent::renumber(std::slice::from_mut(&mut root), &mut allocator);
    debug!(referents = allocator.issued(), "renumbered document");
    walker.set_referents(allocator.issued());

    Ok(root)
}
