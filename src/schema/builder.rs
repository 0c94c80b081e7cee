//! Schema inference from a parsed element tree

use super::{ListItem, Property, Schema};
use crate::parse_xml::XmlNode;
use indexmap::IndexMap;

/// Infers the schema of `node` and, recursively, of all its descendants.
///
/// Children are built first. Text-only children are grouped by tag name into
/// leaf fields, the rest by schema name into nested fields; any group with two
/// or more members collapses into a single list field represented by its
/// first member.
pub fn build(node: &XmlNode) -> Schema {
    let mut properties: Vec<Property> = node
        .attributes
        .keys()
        .map(|name| Property::Attribute(name.clone()))
        .collect();

    let mut property_elements: IndexMap<String, usize> = IndexMap::new();
    let mut elements: IndexMap<String, Vec<Schema>> = IndexMap::new();
    for child in &node.children {
        let schema = build(child);
        if schema.is_text_only() {
            *property_elements.entry(schema.name).or_default() += 1;
        } else {
            elements.entry(schema.name.clone()).or_default().push(schema);
        }
    }

    properties.extend(property_elements.into_iter().map(|(name, count)| {
        if count == 1 {
            Property::LeafChild(name)
        } else {
            Property::ListOf(ListItem::Leaf(name))
        }
    }));

    properties.extend(elements.into_values().filter_map(|group| {
        let count = group.len();
        let first = group.into_iter().next()?;
        Some(if count == 1 {
            Property::NestedChild(first)
        } else {
            Property::ListOf(ListItem::Nested(first))
        })
    }));

    // Descendant text counts too, so a pure container whose children carry
    // text still gets a text body.
    if node.has_text() {
        properties.push(Property::TextBody);
    }

    tracing::trace!(element = %node.name, properties = properties.len(), "inferred schema");

    Schema {
        name: node.name.clone(),
        properties,
    }
}
