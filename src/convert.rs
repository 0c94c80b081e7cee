//! End-to-end conversion: XML text in, declaration text out

use crate::error::{ConvertError, ParseError};
use crate::parse_xml::parse_xml_str;
use crate::render::{render_all, RenderOptions};
use crate::schema::{build, Schema};
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Prefix applied to the input file name to form the output file name
pub const DEFAULT_PREFIX: &str = "generated_";

/// What the conversion writes out
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Annotated data-class declarations
    #[default]
    Declarations,
    /// The inferred schema tree as pretty-printed JSON
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertOptions {
    pub render: RenderOptions,
    pub format: OutputFormat,
    pub prefix: String,
    /// Directory for output files; defaults to the input file's directory
    pub out_dir: Option<PathBuf>,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            render: RenderOptions::default(),
            format: OutputFormat::default(),
            prefix: DEFAULT_PREFIX.to_string(),
            out_dir: None,
        }
    }
}

/// Outcome of one file in a batch
#[derive(Debug)]
pub struct FileReport {
    pub input: PathBuf,
    pub result: Result<PathBuf, ConvertError>,
}

/// Parses `xml` and infers the schema of its root element
pub fn infer_schema(xml: &str) -> Result<Schema, ParseError> {
    let start = Instant::now();
    let root = parse_xml_str(xml)?;
    let schema = build(&root);
    tracing::debug!(root = %schema.name, elapsed = ?start.elapsed(), "schema inferred");
    Ok(schema)
}

/// Converts an XML document to declarations, or to JSON with [`OutputFormat::Json`]
pub fn convert_str(xml: &str, options: &ConvertOptions) -> Result<String, ConvertError> {
    let schema = infer_schema(xml)?;
    render_output(&schema, options)
}

/// Converts an XML document, reporting a parse failure as text.
///
/// Returns the declarations, or `Parsing error!` followed by the parser's
/// message on the next line.
pub fn convert(xml: &str) -> String {
    match convert_str(xml, &ConvertOptions::default()) {
        Ok(text) => text,
        Err(ConvertError::Document(e)) => format!("Parsing error!\n{e}"),
        Err(e) => e.to_string(),
    }
}

fn render_output(schema: &Schema, options: &ConvertOptions) -> Result<String, ConvertError> {
    match options.format {
        OutputFormat::Declarations => Ok(render_all(schema, &options.render)),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(schema)?),
    }
}

/// Converts the document at `input` and returns the rendered text
pub fn convert_file_to_string(input: &Path, options: &ConvertOptions) -> Result<String, ConvertError> {
    let xml = fs::read_to_string(input).map_err(|source| ConvertError::Read {
        path: input.to_path_buf(),
        source,
    })?;
    let schema = infer_schema(&xml).map_err(|source| ConvertError::Parse {
        path: input.to_path_buf(),
        source,
    })?;
    render_output(&schema, options)
}

/// Where the output for `input` is written: the input's file name with the
/// configured prefix, in `out_dir` or next to the input
pub fn output_path(input: &Path, options: &ConvertOptions) -> PathBuf {
    let file_name = input
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let dir = match &options.out_dir {
        Some(dir) => dir.clone(),
        None => input.parent().map(Path::to_path_buf).unwrap_or_default(),
    };
    dir.join(format!("{}{}", options.prefix, file_name))
}

/// Converts the document at `input` and writes the result to [`output_path`]
///
/// # Arguments
/// * `input` - Path of the XML document
/// * `options` - Output format, rendering options and output location
///
/// # Returns
/// * `Result<PathBuf, ConvertError>` - Path of the written file. Nothing is
///   written when the input cannot be read or parsed.
///
/// # Example
/// ```ignore
/// let output = convert_file(Path::new("data/feed.xml"), &ConvertOptions::default())?;
/// assert_eq!(output, PathBuf::from("data/generated_feed.xml"));
/// ```
pub fn convert_file(input: &Path, options: &ConvertOptions) -> Result<PathBuf, ConvertError> {
    let text = convert_file_to_string(input, options)?;
    let output = output_path(input, options);
    fs::write(&output, text).map_err(|source| ConvertError::Write {
        path: output.clone(),
        source,
    })?;
    tracing::info!(input = %input.display(), output = %output.display(), "wrote declarations");
    Ok(output)
}

/// Converts several documents in parallel. One failure does not stop the
/// others; reports come back in input order.
pub fn convert_files(inputs: &[PathBuf], options: &ConvertOptions) -> Vec<FileReport> {
    inputs
        .par_iter()
        .map(|input| FileReport {
            input: input.clone(),
            result: convert_file(input, options),
        })
        .collect()
}
