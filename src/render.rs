//! Schema to declaration text
//!
//! Every [`Schema`] becomes one TikXml-annotated Kotlin `data class` block.
//! Rendering is a pure function of the schema and the [`RenderOptions`].

use crate::naming::to_field_name;
use crate::schema::{ListItem, Property, Schema};
use std::collections::HashSet;
use std::fmt;

/// Indentation used for property lines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Indent {
    Spaces(usize),
    Tab,
}

impl fmt::Display for Indent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Indent::Spaces(width) => write!(f, "{:width$}", ""),
            Indent::Tab => f.write_str("\t"),
        }
    }
}

/// Rendering knobs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    pub indent: Indent,
    /// Mark every field type as nullable (`String?`)
    pub nullable: bool,
    /// Emit each nested declaration once per schema name instead of once per
    /// reference. Changes the output whenever a schema is referenced twice.
    pub dedupe: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            indent: Indent::Spaces(4),
            nullable: true,
            dedupe: false,
        }
    }
}

/// A single declaration block, renderable via [`fmt::Display`]
pub struct Declaration<'a> {
    schema: &'a Schema,
    options: &'a RenderOptions,
}

impl<'a> Declaration<'a> {
    pub fn new(schema: &'a Schema, options: &'a RenderOptions) -> Self {
        Self { schema, options }
    }

    fn write_property(&self, f: &mut fmt::Formatter<'_>, property: &Property) -> fmt::Result {
        let indent = self.options.indent;
        let opt = if self.options.nullable { "?" } else { "" };
        match property {
            Property::Attribute(name) => {
                writeln!(f, "{indent}@Attribute(name = \"{name}\")")?;
                writeln!(f, "{indent}val {}: String{opt},", to_field_name(name))
            }
            Property::TextBody => {
                writeln!(f, "{indent}@TextContent")?;
                writeln!(f, "{indent}val content: String{opt},")
            }
            Property::LeafChild(name) => {
                writeln!(f, "{indent}@PropertyElement(name = \"{name}\")")?;
                writeln!(f, "{indent}val {}: String{opt},", to_field_name(name))
            }
            Property::NestedChild(schema) => {
                writeln!(f, "{indent}@Element(name = \"{}\")", schema.name)?;
                writeln!(
                    f,
                    "{indent}val {}: {}{opt},",
                    schema.field_name(),
                    schema.type_name()
                )
            }
            Property::ListOf(ListItem::Leaf(name)) => {
                writeln!(f, "{indent}@PropertyElement(name = \"{name}\")")?;
                writeln!(f, "{indent}val {}List: List<String>{opt},", to_field_name(name))
            }
            Property::ListOf(ListItem::Nested(schema)) => {
                writeln!(f, "{indent}@Element(name = \"{}\")", schema.name)?;
                writeln!(
                    f,
                    "{indent}val {}List: List<{}>{opt},",
                    schema.field_name(),
                    schema.type_name()
                )
            }
        }
    }
}

impl fmt::Display for Declaration<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "@Xml(name = \"{}\")", self.schema.name)?;
        writeln!(f, "data class {}(", self.schema.type_name())?;
        for (index, property) in self.schema.properties.iter().enumerate() {
            if index > 0 {
                writeln!(f)?;
            }
            self.write_property(f, property)?;
        }
        writeln!(f, ")")?;
        writeln!(f)
    }
}

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&Declaration::new(self, &RenderOptions::default()), f)
    }
}

/// Renders the declaration block of `schema` alone
pub fn render(schema: &Schema, options: &RenderOptions) -> String {
    Declaration::new(schema, options).to_string()
}

/// Renders `schema` followed, depth-first, by every schema it references.
///
/// Without [`RenderOptions::dedupe`] a schema reachable from several places
/// is rendered at each of them. A block reached through a list field is
/// followed by one extra blank line.
///
/// # Arguments
/// * `schema` - Root of the inferred schema tree
/// * `options` - Indentation, nullability and duplicate handling
///
/// # Returns
/// * `String` - The root declaration, then every nested declaration
///
/// # Example
/// ```
/// use xml_schema_gen::{parse_xml_str, build, render_all, RenderOptions};
///
/// let root = parse_xml_str(r#"<order id="1"><line sku="a"/></order>"#).unwrap();
/// let text = render_all(&build(&root), &RenderOptions::default());
/// assert!(text.starts_with("@Xml(name = \"order\")"));
/// assert!(text.contains("data class Line("));
/// ```
pub fn render_all(schema: &Schema, options: &RenderOptions) -> String {
    let mut out = String::new();
    let mut seen = HashSet::new();
    render_tree(schema, options, &mut seen, &mut out);
    out
}

/// Appends the block for `schema` and its nested schemas; returns whether
/// anything was written.
fn render_tree<'a>(
    schema: &'a Schema,
    options: &RenderOptions,
    seen: &mut HashSet<&'a str>,
    out: &mut String,
) -> bool {
    if options.dedupe && !seen.insert(schema.name.as_str()) {
        return false;
    }
    out.push_str(&render(schema, options));
    for property in &schema.properties {
        match property {
            Property::NestedChild(nested) => {
                render_tree(nested, options, seen, out);
            }
            Property::ListOf(ListItem::Nested(nested)) => {
                if render_tree(nested, options, seen, out) {
                    out.push('\n');
                }
            }
            _ => {}
        }
    }
    true
}
