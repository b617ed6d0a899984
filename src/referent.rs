/*!
 * Referent allocation and reference rewriting
 */

use std::collections::HashMap;

use crate::xml::{Element, ITEM_TAG, REFERENT_ATTR, REF_TAG};

/// Prefix of every issued referent
pub const REFERENT_PREFIX: &str = "RBX";

/// Maps previously assigned referents to the ones replacing them
pub type RemapTable = HashMap<String, String>;

/// Issues sequential referents starting at `RBX0`
#[derive(Debug, Default)]
pub struct ReferentAllocator {
    next: usize,
}

impl ReferentAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue the next unused referent
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> String {
        let referent = format!("{}{}", REFERENT_PREFIX, self.next);
        self.next += 1;
        referent
    }

    /// Number of referents issued so far
    pub fn issued(&self) -> usize {
        self.next
    }
}

/// Give every item carrying a referent a fresh one, in document order
pub fn reassign_referents(roots: &mut [Element], allocator: &mut ReferentAllocator) -> RemapTable {
    let mut remap = RemapTable::new();
    for root in roots.iter_mut() {
        root.visit_mut(&mut |element| {
            if element.tag != ITEM_TAG {
                return;
            }
            if let Some(old) = element.attr(REFERENT_ATTR).map(str::to_owned) {
                let new = allocator.next();
                element.set_attr(REFERENT_ATTR, new.as_str());
                remap.insert(old, new);
            }
        });
    }
    remap
}

/// Point every reference found in `remap` at its new referent
///
/// Only the first text child of a reference is considered. References to
/// unknown referents are left alone. Returns the number rewritten.
pub fn rewrite_references(roots: &mut [Element], remap: &RemapTable) -> usize {
    let mut rewritten = 0;
    for root in roots.iter_mut() {
        root.visit_mut(&mut |element| {
            if element.tag != REF_TAG {
                return;
            }
            if let Some(value) = element.first_text_mut() {
                if let Some(new) = remap.get(value.as_str()) {
                    *value = new.clone();
                    rewritten += 1;
                }
            }
        });
    }
    rewritten
}

/// Reassign all referents under `roots` and rewrite the references to them
pub fn renumber(roots: &mut [Element], allocator: &mut ReferentAllocator) -> RemapTable {
    let remap = reassign_referents(roots, allocator);
    rewrite_references(roots, &remap);
    remap
}
