//! CLI that turns XML documents into TikXml-annotated data classes
//!
//! Usage:
//!   xml2class [FILES]... [options]
//!
//! With no FILES, the file name is read from stdin. Each input `name.xml`
//! is written to `generated_name.xml` next to it unless `--stdout` is given.

use anyhow::Context;
use clap::{Parser, ValueEnum};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use xml_schema_gen::convert::{convert_file_to_string, convert_files, DEFAULT_PREFIX};
use xml_schema_gen::{ConvertError, ConvertOptions, Indent, OutputFormat, RenderOptions};

#[derive(Parser)]
#[command(name = "xml2class", about = "Generate annotated data classes from XML documents")]
struct Cli {
    /// XML files to convert (prompted for when omitted)
    files: Vec<PathBuf>,

    /// Prefix added to the input file name to form the output file name
    #[arg(long, default_value = DEFAULT_PREFIX)]
    prefix: String,

    /// Directory to write output files into (default: next to each input)
    #[arg(long)]
    out_dir: Option<PathBuf>,

    /// Print the result instead of writing output files
    #[arg(long)]
    stdout: bool,

    /// Emit each nested declaration once, even when referenced from several places
    #[arg(long)]
    dedupe: bool,

    /// Indent property lines with tabs
    #[arg(long, conflicts_with = "indent")]
    tabs: bool,

    /// Number of spaces per indent
    #[arg(long, default_value_t = 4)]
    indent: usize,

    /// Render field types without the nullable marker
    #[arg(long)]
    non_null: bool,

    #[arg(long, value_enum, default_value_t = Format::Declarations)]
    format: Format,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Declarations,
    Json,
}

impl Cli {
    fn options(&self) -> ConvertOptions {
        ConvertOptions {
            render: RenderOptions {
                indent: if self.tabs {
                    Indent::Tab
                } else {
                    Indent::Spaces(self.indent)
                },
                nullable: !self.non_null,
                dedupe: self.dedupe,
            },
            format: match self.format {
                Format::Declarations => OutputFormat::Declarations,
                Format::Json => OutputFormat::Json,
            },
            prefix: self.prefix.clone(),
            out_dir: self.out_dir.clone(),
        }
    }
}

fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("XML2CLASS_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();
}

fn prompt_file_name() -> anyhow::Result<PathBuf> {
    print!("file name -> ");
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("Failed to read file name")?;
    println!();

    let name = line.trim();
    anyhow::ensure!(!name.is_empty(), "no file name given");
    Ok(PathBuf::from(name))
}

/// Message printed in place of output for a failed file
fn failure_message(err: &ConvertError) -> String {
    match err {
        ConvertError::Parse { source, .. } => format!("Parsing error!\n{source}"),
        other => other.to_string(),
    }
}

fn main() -> anyhow::Result<ExitCode> {
    init_logging();

    let mut cli = Cli::parse();
    if cli.files.is_empty() {
        cli.files.push(prompt_file_name()?);
    }
    let options = cli.options();

    if let Some(dir) = &options.out_dir {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create output directory {}", dir.display()))?;
    }

    let mut failed = false;
    if cli.stdout {
        let mut out = io::stdout().lock();
        for input in &cli.files {
            match convert_file_to_string(input, &options) {
                Ok(text) => out.write_all(text.as_bytes())?,
                Err(e) => {
                    failed = true;
                    writeln!(out, "{}", failure_message(&e))?;
                }
            }
        }
    } else {
        for report in convert_files(&cli.files, &options) {
            match report.result {
                Ok(output) => println!("{} -> {}", report.input.display(), output.display()),
                Err(e) => {
                    failed = true;
                    eprintln!("{}: {}", report.input.display(), failure_message(&e));
                }
            }
        }
    }

    Ok(if failed { ExitCode::FAILURE } else { ExitCode::SUCCESS })
}
