//! Error types for reading documents and converting them to declarations

use std::path::PathBuf;

/// Failure to turn raw text into an element tree.
///
/// Raised before any schema inference runs, so a document that fails here
/// never produces partial output.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("malformed XML: {0}")]
    Xml(#[from] quick_xml::Error),
    #[error("malformed attribute: {0}")]
    Attribute(#[from] quick_xml::events::attributes::AttrError),
    #[error("XML document is empty")]
    EmptyDocument,
    #[error("unexpected end of file while parsing element '{element}'")]
    UnexpectedEof { element: String },
    #[error("unexpected closing tag '</{found}>' while parsing '<{expected}>'")]
    MismatchedEnd { expected: String, found: String },
    #[error("elements nested deeper than {limit} levels")]
    TooDeep { limit: usize },
    #[error("content is not allowed outside the root element")]
    ContentOutsideRoot,
    #[error("failed to read XML: {0}")]
    Io(#[from] std::io::Error),
}

/// Failure of a conversion.
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    /// In-memory input that is not well-formed
    #[error(transparent)]
    Document(#[from] ParseError),
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: ParseError,
    },
    #[error("failed to encode schema as JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
