//! md2txt CLI - Markdown to constrained plain text
//!
//! Converts Markdown files into fixed-width DOS-style text, micron, or
//! gemtext output.

use clap::{Parser, Subcommand};
use colored::*;
use md2txt::model::BlockStyle;
use md2txt::pipeline::Parser as _;
use md2txt::{parse_front_matter, preprocess, read_lines, Converter, PluginOptions, Registry};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Markdown conversion to fixed-width text dialects
#[derive(Parser)]
#[command(
    name = "md2txt",
    version,
    about = "Convert Markdown files to 80-column DOS-compatible text",
    long_about = "md2txt - Markdown to constrained plain text.\n\n\
                  Converts Markdown into fixed-width DOS text (CRLF, 80\n\
                  columns) or the micron and gemini dialects.\n\n\
                  Usage:\n  \
                  md2txt <file>                Convert to stdout\n  \
                  md2txt <file> -o out.txt     Convert to a file\n  \
                  md2txt events <file>         Dump the parsed event stream"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Input file path (for default conversion)
    input: Option<PathBuf>,

    /// Output file path (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Maximum column width
    #[arg(long, default_value = "80")]
    width: usize,

    /// Renderer dialect
    #[arg(long, default_value = "text")]
    renderer: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a document (the default command)
    Convert {
        /// Input file path
        input: PathBuf,

        /// Output file path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Maximum column width
        #[arg(long, default_value = "80")]
        width: usize,

        /// Renderer dialect
        #[arg(long, default_value = "text")]
        renderer: String,
    },

    /// Dump the parsed event stream as JSON
    Events {
        /// Input file path
        input: PathBuf,

        /// Output compact JSON (no indentation)
        #[arg(long)]
        compact: bool,
    },

    /// List the registered parsers and renderers
    Plugins,
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Convert {
            input,
            output,
            width,
            renderer,
        }) => convert(&input, output.as_deref(), width, &renderer),
        Some(Commands::Events { input, compact }) => dump_events(&input, compact),
        Some(Commands::Plugins) => list_plugins(),
        None => match cli.input {
            Some(input) => convert(&input, cli.output.as_deref(), cli.width, &cli.renderer),
            None => {
                eprintln!(
                    "{} no input file given (try {})",
                    "error:".red().bold(),
                    "md2txt --help".cyan()
                );
                std::process::exit(2);
            }
        },
    };

    if let Err(error) = result {
        eprintln!("{} {}", "error:".red().bold(), error);
        std::process::exit(1);
    }
}

fn convert(
    input: &Path,
    output: Option<&Path>,
    width: usize,
    renderer: &str,
) -> md2txt::Result<()> {
    let text = Converter::new()
        .with_width(width)
        .with_renderer(renderer)
        .convert_file(input)?;
    write_output(output, &text)?;
    if output.is_some() {
        eprintln!(
            "{} {}",
            "wrote".green().bold(),
            output.unwrap_or(input).display()
        );
    }
    Ok(())
}

fn dump_events(input: &Path, compact: bool) -> md2txt::Result<()> {
    let lines = read_lines(input)?;
    let (front, body) = parse_front_matter(&lines);
    let base_dir = input.parent().unwrap_or_else(|| Path::new("."));
    let source = preprocess(&body, base_dir)?;

    let base_style = BlockStyle::with_margins(front.margin_left, front.margin_right);
    let registry = Registry::with_defaults();
    let mut parser = registry.parser("markdown")?(base_style, &PluginOptions::new());
    let events = parser.parse(&source);

    let json = if compact {
        serde_json::to_string(&events)
    } else {
        serde_json::to_string_pretty(&events)
    }
    .expect("event stream serializes");
    println!("{json}");
    Ok(())
}

fn list_plugins() -> md2txt::Result<()> {
    let registry = Registry::with_defaults();
    println!("{}", "parsers:".bold());
    for name in registry.parser_names() {
        println!("  {name}");
    }
    println!("{}", "renderers:".bold());
    for name in registry.renderer_names() {
        println!("  {name}");
    }
    Ok(())
}

fn write_output(path: Option<&Path>, text: &str) -> md2txt::Result<()> {
    match path {
        Some(path) => {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)?;
                }
            }
            std::fs::write(path, text)?;
        }
        None => {
            std::io::stdout().write_all(text.as_bytes())?;
        }
    }
    Ok(())
}
