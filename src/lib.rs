/*!
 * rbxplugin - Build a Roblox plugin model from a directory tree
 *
 * This library walks a directory, turns each entry into a typed object,
 * splices prebuilt model files in place and writes the result as an XML
 * model document with contiguous referents.
 */

pub mod builder;
pub mod classify;
pub mod config;
pub mod document;
pub mod error;
pub mod layout;
pub mod object;
pub mod referent;
pub mod report;
pub mod splice;
pub mod utils;
pub mod walker;
pub mod writer;
pub mod xml;


// Re-export main components for easier access
pub use builder::Builder;
pub use config::Config;
pub use error::{BuildError, Result};
pub use object::{ClassName, ObjectNode, Property, PropertyType};
pub use referent::{ReferentAllocator, RemapTable};
pub use report::{BuildReport, ReportFormat, Reporter};
pub use walker::{WalkStatistics, Walker};
pub use writer::XmlWriter;
pub use xml::{Element, XmlNode};

/// Version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
