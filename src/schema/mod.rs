//! Inferred structure of an XML document
//!
//! A [`Schema`] describes one element shape: its tag name and an ordered list
//! of [`Property`] entries. Schemas are built once by [`build`] and never
//! mutated afterwards.

mod builder;

pub use builder::build;

use crate::naming::{to_field_name, to_type_name};
use serde::Serialize;

/// Structural description of one element shape
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Schema {
    /// Original tag name
    pub name: String,
    /// Attributes, then leaf children, then nested children, then the text body
    pub properties: Vec<Property>,
}

/// One field of a [`Schema`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Property {
    /// Attribute present on the element
    Attribute(String),
    /// The element carries character data
    TextBody,
    /// Child element whose only content is text
    LeafChild(String),
    /// Child element with a structure of its own
    NestedChild(Schema),
    /// Two or more siblings sharing a tag (leaf) or schema name (nested)
    ListOf(ListItem),
}

/// The repeated element of a [`Property::ListOf`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ListItem {
    Leaf(String),
    Nested(Schema),
}

impl Schema {
    pub fn new(name: impl Into<String>, properties: Vec<Property>) -> Self {
        Self {
            name: name.into(),
            properties,
        }
    }

    /// True when the element holds nothing but character data.
    ///
    /// A parent turns text-only children into [`Property::LeafChild`] fields.
    pub fn is_text_only(&self) -> bool {
        matches!(self.properties.as_slice(), [Property::TextBody])
    }

    /// Declaration name, e.g. `user_profile` -> `UserProfile`
    pub fn type_name(&self) -> String {
        to_type_name(&self.name)
    }

    /// Field name used when another declaration refers to this one
    pub fn field_name(&self) -> String {
        to_field_name(&self.name)
    }

    /// Schemas referenced by this one, in property order
    pub fn nested(&self) -> impl Iterator<Item = &Schema> {
        self.properties.iter().filter_map(|property| match property {
            Property::NestedChild(schema) | Property::ListOf(ListItem::Nested(schema)) => Some(schema),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_only_requires_single_text_body() {
        assert!(Schema::new("a", vec![Property::TextBody]).is_text_only());
        assert!(!Schema::new("a", vec![]).is_text_only());
        assert!(!Schema::new("a", vec![Property::Attribute("id".into()), Property::TextBody]).is_text_only());
        assert!(!Schema::new("a", vec![Property::TextBody, Property::TextBody]).is_text_only());
    }

    #[test]
    fn test_nested_lists_single_and_repeated_children() {
        let inner = Schema::new("inner", vec![Property::LeafChild("v".into())]);
        let item = Schema::new("item", vec![Property::Attribute("id".into())]);
        let schema = Schema::new(
            "outer",
            vec![
                Property::LeafChild("x".into()),
                Property::NestedChild(inner.clone()),
                Property::ListOf(ListItem::Leaf("tag".into())),
                Property::ListOf(ListItem::Nested(item.clone())),
            ],
        );

        let nested: Vec<&Schema> = schema.nested().collect();
        assert_eq!(nested, [&inner, &item]);
    }

    #[test]
    fn test_serializes_with_kind_tags() {
        let schema = Schema::new(
            "root",
            vec![Property::Attribute("id".into()), Property::TextBody],
        );
        let json = serde_json::to_value(&schema).unwrap();

        assert_eq!(json["name"], "root");
        assert_eq!(json["properties"][0]["kind"], "attribute");
        assert_eq!(json["properties"][0]["value"], "id");
        assert_eq!(json["properties"][1]["kind"], "text_body");
    }
}
