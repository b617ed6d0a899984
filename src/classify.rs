/*!
 * Mapping of filesystem entries to object classes
 */

use std::fs;
use std::io;
use std::path::Path;

use crate::object::ObjectNode;
use crate::writer;

/// Extension of script files
pub const SCRIPT_EXT: &str = ".lua";

/// Secondary extension marking a script as a module
pub const MODULE_EXT: &str = ".module";

/// Extension of model files spliced into the output
pub const MODEL_EXT: &str = ".rbxm";

/// What a filesystem entry turns into
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// A single freshly created object
    Object(ObjectNode),
    /// A model file whose objects are spliced in place
    Model,
}

/// Split a file name at its last dot
///
/// The extension keeps its dot; names without a dot have an empty extension.
pub fn split_name(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(index) => name.split_at(index),
        None => (name, ""),
    }
}

/// Name under which an entry takes part in sibling reuse
pub fn base_name(name: &str, is_dir: bool) -> &str {
    if is_dir {
        name
    } else {
        split_name(name).0
    }
}

/// Classify one directory entry
///
/// Only file content is read from disk. A read failure, or a name or content
/// holding a character the model format cannot carry, is returned to the
/// caller, which skips the entry.
///
/// Content that is not valid UTF-8 is taken byte by byte, each byte becoming
/// the character of the same value, so no byte is lost or replaced.
pub fn classify(path: &Path, name: &str, is_dir: bool) -> io::Result<Classification> {
    check_characters(name)?;
    if is_dir {
        return Ok(Classification::Object(ObjectNode::container(name)));
    }

    let (base, ext) = split_name(name);
    if ext == MODEL_EXT {
        return Ok(Classification::Model);
    }

    let content = read_content(path)?;
    let object = if ext == SCRIPT_EXT {
        match split_name(base) {
            (module, MODULE_EXT) => ObjectNode::module_script(module, content),
            _ => ObjectNode::script(base, content),
        }
    } else {
        ObjectNode::string_value(base, content)
    };

    Ok(Classification::Object(object))
}

/// Fail when `text` holds a character outside the allowed range
pub fn check_characters(text: &str) -> io::Result<()> {
    match writer::find_invalid_character(text) {
        Some((position, ch)) => Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("invalid character {ch:?} at byte {position}"),
        )),
        None => Ok(()),
    }
}

fn read_content(path: &Path) -> io::Result<String> {
    let bytes = fs::read(path)?;
    let content = match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(err) => err.into_bytes().into_iter().map(char::from).collect(),
    };
    check_characters(&content)?;
    Ok(content)
}
