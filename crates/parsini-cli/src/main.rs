#![doc = include_str!("../README.md")]

use std::io::{self, Read, Write};
use std::path::Path;

use clap::{Parser, Subcommand};
use parsini_decode::DecodeError;
use parsini_tree::{Document, ParseError, Value};
use tracing::debug;
use tracing_subscriber::EnvFilter;

mod info;

use info::Info;

// ============================================================================
// Exit codes
// ============================================================================

const EXIT_SYNTAX_ERROR: i32 = 1;
const EXIT_DECODE_ERROR: i32 = 2;
const EXIT_IO_ERROR: i32 = 3;

// ============================================================================
// CLI argument structures
// ============================================================================

#[derive(Parser, Debug)]
#[command(name = "parsini", version, about = "Inspect and decode INI files")]
struct Cli {
    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the parsed value tree
    Tree {
        /// Input file, or "-" for stdin
        file: String,
    },

    /// Print the document as JSON
    Json {
        /// Input file, or "-" for stdin
        file: String,

        /// Single-line output
        #[arg(long)]
        compact: bool,
    },

    /// Print the value at a path such as `address.city` or `tags[0]`
    Get {
        /// Input file, or "-" for stdin
        file: String,

        /// Dotted path; a top-level key shadows a section of the same name
        path: String,
    },

    /// Decode the demo info model from an INI or JSON file
    Info {
        /// Input file; a `.json` extension selects JSON
        file: String,
    },
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match execute(&cli.command) {
        Ok(output) => {
            let mut stdout = io::stdout().lock();
            if let Err(e) = stdout.write_all(output.as_bytes()) {
                eprintln!("error: {e}");
                std::process::exit(EXIT_IO_ERROR);
            }
        }
        Err(e) => {
            match &e {
                CliError::Parse {
                    error,
                    text,
                    filename,
                } => error.write_report(filename, text, io::stderr()),
                _ => eprintln!("error: {e}"),
            }
            std::process::exit(e.exit_code());
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(io::stderr)
        .init();
}

fn execute(command: &Command) -> Result<String, CliError> {
    debug!(?command, "running");
    match command {
        Command::Tree { file } => {
            let root = load(file)?.into_root();
            let mut out = String::new();
            write_tree(&mut out, &root, 0);
            Ok(out)
        }
        Command::Json { file, compact } => {
            let json = serde_json::Value::from(load(file)?.into_root());
            let mut out = if *compact {
                serde_json::to_string(&json)?
            } else {
                serde_json::to_string_pretty(&json)?
            };
            out.push('\n');
            Ok(out)
        }
        Command::Get { file, path } => {
            let root = load(file)?.into_root();
            let value = root
                .get(path)
                .ok_or_else(|| CliError::NotFound(path.clone()))?;
            let mut out = match value {
                Value::String(s) => s.clone(),
                other => serde_json::to_string_pretty(&serde_json::Value::from(other))?,
            };
            out.push('\n');
            Ok(out)
        }
        Command::Info { file } => {
            let info: Info = if is_json(file) {
                let json: serde_json::Value = serde_json::from_str(&read_input(file)?)?;
                parsini_decode::from_value(&Value::from(json))?
            } else {
                parsini_decode::from_document(load(file)?)?
            };
            Ok(info.to_string())
        }
    }
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("{0}")]
    Io(#[from] io::Error),

    #[error("{error}")]
    Parse {
        error: ParseError,
        text: String,
        filename: String,
    },

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Decode(#[from] DecodeError),

    #[error("no value at path '{0}'")]
    NotFound(String),
}

impl CliError {
    fn exit_code(&self) -> i32 {
        match self {
            CliError::Io(_) => EXIT_IO_ERROR,
            CliError::Parse { .. } | CliError::Json(_) => EXIT_SYNTAX_ERROR,
            CliError::Decode(_) | CliError::NotFound(_) => EXIT_DECODE_ERROR,
        }
    }
}

// ============================================================================
// Input
// ============================================================================

fn read_input(file: &str) -> Result<String, io::Error> {
    if file == "-" {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        Ok(buf)
    } else {
        std::fs::read_to_string(file).map_err(|e| io::Error::new(e.kind(), format!("{file}: {e}")))
    }
}

fn load(file: &str) -> Result<Document, CliError> {
    let text = read_input(file)?;
    let filename = if file == "-" { "<stdin>" } else { file };
    parsini_tree::parse(&text).map_err(|error| CliError::Parse {
        error,
        text,
        filename: filename.to_string(),
    })
}

fn is_json(file: &str) -> bool {
    Path::new(file)
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

// ============================================================================
// Tree output
// ============================================================================

fn write_tree(out: &mut String, value: &Value, indent: usize) {
    let pad = "  ".repeat(indent);
    match value {
        Value::Null => out.push_str("Null\n"),
        Value::Bool(b) => out.push_str(&format!("Bool({b})\n")),
        Value::Number(n) => out.push_str(&format!("Number({n})\n")),
        Value::String(s) => out.push_str(&format!("String({s:?})\n")),
        Value::Array(items) => {
            out.push_str("Array [\n");
            for item in items {
                out.push_str(&pad);
                out.push_str("  ");
                write_tree(out, item, indent + 1);
            }
            out.push_str(&format!("{pad}]\n"));
        }
        Value::Object(object) => {
            out.push_str("Object {\n");
            for (key, item) in object {
                out.push_str(&format!("{pad}  {key}: "));
                write_tree(out, item, indent + 1);
            }
            out.push_str(&format!("{pad}}}\n"));
        }
    }
}
