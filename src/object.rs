/*!
 * Object model for the items written to a model document
 */

use strum::{AsRefStr, Display};

use crate::xml::{Element, XmlNode, ITEM_TAG, PROPERTIES_TAG, REFERENT_ATTR};

/// Classes of objects created from filesystem entries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr)]
pub enum ClassName {
    /// Container created for a directory
    Backpack,
    /// Script created for a `.lua` file
    Script,
    /// Module created for a `.module.lua` file
    ModuleScript,
    /// Value object holding the raw content of any other file
    StringValue,
}

/// Wire representation of a property value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr)]
pub enum PropertyType {
    #[strum(serialize = "bool")]
    Bool,
    #[strum(serialize = "string")]
    String,
    ProtectedString,
    /// Content link; the literal value `null` renders as an empty marker
    Content,
    /// Reference to another object's referent
    Ref,
}

/// A named, typed property value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
    pub kind: PropertyType,
    pub name: String,
    pub value: String,
}

impl Property {
    pub fn new(kind: PropertyType, name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            value: value.into(),
        }
    }

    fn to_element(&self) -> Element {
        let mut element = Element::new(self.kind.as_ref());
        element.set_attr("name", self.name.as_str());
        if self.kind == PropertyType::Content && self.value == "null" {
            element
                .children
                .push(XmlNode::Element(Element::new("null")));
        } else {
            element.children.push(XmlNode::Text(self.value.clone()));
        }
        element
    }
}

/// A typed object with an ordered property list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectNode {
    pub class: ClassName,
    pub properties: Vec<Property>,
    pub referent: Option<String>,
}

impl ObjectNode {
    pub fn new(class: ClassName, properties: Vec<Property>) -> Self {
        Self {
            class,
            properties,
            referent: None,
        }
    }

    /// Container object for a directory
    pub fn container(name: &str) -> Self {
        Self::new(
            ClassName::Backpack,
            vec![Property::new(PropertyType::String, "Name", name)],
        )
    }

    /// Enabled script object
    pub fn script(name: &str, source: String) -> Self {
        Self::new(
            ClassName::Script,
            vec![
                Property::new(PropertyType::Bool, "Disabled", "false"),
                Property::new(PropertyType::Content, "LinkedSource", "null"),
                Property::new(PropertyType::String, "Name", name),
                Property::new(PropertyType::ProtectedString, "Source", source),
            ],
        )
    }

    /// Module script object
    pub fn module_script(name: &str, source: String) -> Self {
        Self::new(
            ClassName::ModuleScript,
            vec![
                Property::new(PropertyType::String, "Name", name),
                Property::new(PropertyType::ProtectedString, "Source", source),
            ],
        )
    }

    /// Value object holding raw file content
    pub fn string_value(name: &str, value: String) -> Self {
        Self::new(
            ClassName::StringValue,
            vec![
                Property::new(PropertyType::String, "Name", name),
                Property::new(PropertyType::String, "Value", value),
            ],
        )
    }

    /// Look up a property value by name
    pub fn property(&self, name: &str) -> Option<&str> {
        self.properties
            .iter()
            .find(|property| property.name == name)
            .map(|property| property.value.as_str())
    }

    /// Render as an `Item` element laid out for `depth`
    ///
    /// The returned element has no children besides its properties; nested
    /// items are attached with [`Element::append_laid_out`] at `depth + 1`.
    pub fn to_element(&self, depth: usize) -> Element {
        let mut item = Element::laid_out(ITEM_TAG, depth);
        item.set_attr("class", self.class.as_ref());
        if let Some(referent) = &self.referent {
            item.set_attr(REFERENT_ATTR, referent.as_str());
        }

        let mut properties = Element::laid_out(PROPERTIES_TAG, depth + 1);
        for property in &self.properties {
            properties.append_laid_out(property.to_element(), depth + 2);
        }

        item.append_laid_out(properties, depth + 1);
        item
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::leading;

    #[test]
    fn property_type_tags() {
        assert_eq!(PropertyType::Bool.as_ref(), "bool");
        assert_eq!(PropertyType::String.as_ref(), "string");
        assert_eq!(PropertyType::ProtectedString.as_ref(), "ProtectedString");
        assert_eq!(PropertyType::Content.as_ref(), "Content");
        assert_eq!(PropertyType::Ref.to_string(), "Ref");
    }

    #[test]
    fn script_properties_in_order() {
        let script = ObjectNode::script("Main", "print(1)".to_string());
        let names: Vec<_> = script.properties.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["Disabled", "LinkedSource", "Name", "Source"]);
        assert_eq!(script.property("Disabled"), Some("false"));
        assert_eq!(script.property("Source"), Some("print(1)"));
    }

    #[test]
    fn element_layout_at_depth() {
        let mut object = ObjectNode::container("Lib");
        object.referent = Some("RBX7".to_string());
        let item = object.to_element(2);

        assert_eq!(item.tag, ITEM_TAG);
        assert_eq!(item.attr("class"), Some("Backpack"));
        assert_eq!(item.attr(REFERENT_ATTR), Some("RBX7"));
        assert_eq!(item.children.len(), 3);
        assert_eq!(item.children[0], leading(3));
        assert_eq!(item.children[2], leading(2));

        let properties = item.elements().next().unwrap();
        assert_eq!(properties.children[0], leading(4));
        assert_eq!(properties.children.last(), Some(&leading(3)));

        let name = properties.elements().next().unwrap();
        assert_eq!(name.tag, "string");
        assert_eq!(name.attr("name"), Some("Name"));
        assert_eq!(name.first_text(), Some("Lib"));
    }

    #[test]
    fn null_content_renders_marker() {
        let item = ObjectNode::script("Main", String::new()).to_element(1);
        let properties = item.elements().next().unwrap();
        let linked = properties
            .elements()
            .find(|p| p.attr("name") == Some("LinkedSource"))
            .unwrap();
        assert_eq!(linked.tag, "Content");
        assert_eq!(linked.children, vec![XmlNode::Element(Element::new("null"))]);
    }

    #[test]
    fn missing_referent_is_not_rendered() {
        let item = ObjectNode::string_value("data", "{}".to_string()).to_element(1);
        assert_eq!(item.attr(REFERENT_ATTR), None);
    }
}
