//! Infers the structure of an XML document and renders it as annotated
//! data-class declarations.
//!
//! # Module Structure
//! - `parse_xml` - XML text to an owned element tree
//! - `schema` - inferred structure and the builder that derives it
//! - `naming` - tag name to type/field name conversion
//! - `render` - schema to declaration text
//! - `convert` - string, file and batch pipelines
//! - `error` - parse and conversion errors
//!
//! # Example
//! ```
//! let text = xml_schema_gen::convert("<root><id>5</id><tag>a</tag><tag>b</tag></root>");
//! assert!(text.contains("val tagList: List<String>?,"));
//! ```

pub mod convert;
pub mod error;
pub mod naming;
pub mod parse_xml;
pub mod render;
pub mod schema;

// Re-export key types for convenience
pub use convert::{
    convert, convert_file, convert_files, convert_str, infer_schema, output_path, ConvertOptions,
    FileReport, OutputFormat,
};
pub use error::{ConvertError, ParseError};
pub use parse_xml::{parse_xml_file, parse_xml_reader, parse_xml_str, XmlNode};
pub use render::{render, render_all, Indent, RenderOptions};
pub use schema::{build, ListItem, Property, Schema};
