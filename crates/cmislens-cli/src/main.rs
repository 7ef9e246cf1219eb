use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use glob::glob;
use serde::{Deserialize, Serialize};

mod render;

/// Current JSON report schema version.
const REPORT_VERSION: u32 = 1;

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("CMISLENS_BUILD_COMMIT"),
    " ",
    env!("CMISLENS_BUILD_DATE"),
    ")"
);

#[derive(Parser, Debug)]
#[command(name = "cmislens")]
#[command(version, long_version = LONG_VERSION)]
#[command(
    about = "Decoder for CMIS/QSFP-DD transceiver EEPROM dumps.",
    long_about = None,
    after_help = "Examples:\n  cmislens eeprom decode module.bin -o report.json\n  cmislens eeprom decode module.bin --stdout --pretty\n  cmislens eeprom show module.bin --text"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Operations on raw EEPROM dump files.
    Eeprom {
        #[command(subcommand)]
        command: EepromCommands,
    },
}

#[derive(Subcommand, Debug)]
enum EepromCommands {
    /// Decode a dump into a versioned JSON report or a text listing.
    #[command(alias = "show")]
    #[command(
        after_help = "Examples:\n  cmislens eeprom decode module.bin -o report.json\n  cmislens eeprom decode module.bin --stdout\n  cmislens eeprom show module.bin --text"
    )]
    Decode {
        /// Path to a raw dump file (256 or 768 bytes)
        input: PathBuf,

        /// Output report path (JSON)
        #[arg(short = 'o', long, required_unless_present_any = ["stdout", "text"])]
        report: Option<PathBuf>,

        /// Write the JSON report to stdout
        #[arg(long, conflicts_with = "report")]
        stdout: bool,

        /// Render a human-readable text listing instead of JSON
        #[arg(long, conflicts_with_all = ["report", "stdout", "pretty", "compact"])]
        text: bool,

        /// Pretty-print JSON output
        #[arg(long, conflicts_with = "compact")]
        pretty: bool,

        /// Compact JSON output (default)
        #[arg(long)]
        compact: bool,

        /// Declared memory length; defaults to the dump file size
        #[arg(long)]
        length: Option<usize>,

        /// Suppress non-error output
        #[arg(long)]
        quiet: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Eeprom { command } => match command {
            EepromCommands::Decode {
                input,
                report,
                stdout,
                text,
                pretty,
                compact,
                length,
                quiet,
            } => cmd_eeprom_decode(input, report, stdout, text, pretty, compact, length, quiet),
        },
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", err.message);
            if let Some(hint) = err.hint {
                eprintln!("hint: {}", hint);
            }
            ExitCode::from(2)
        }
    }
}

#[derive(Debug)]
struct CliError {
    message: String,
    hint: Option<String>,
}

impl CliError {
    fn new(message: impl Into<String>, hint: Option<String>) -> Self {
        Self {
            message: message.into(),
            hint,
        }
    }
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

impl From<anyhow::Error> for CliError {
    fn from(err: anyhow::Error) -> Self {
        CliError::new(err.to_string(), None)
    }
}

/// JSON report wrapper: schema version, tool and input metadata around the
/// decoded module.
#[derive(Debug, Serialize, Deserialize)]
struct DumpReport {
    report_version: u32,
    tool: ToolInfo,
    input: InputInfo,
    module: cmislens_core::ModuleReport,
}

#[derive(Debug, Serialize, Deserialize)]
struct ToolInfo {
    name: String,
    version: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct InputInfo {
    path: String,
    bytes: u64,
    declared_length: usize,
}

fn cmd_eeprom_decode(
    input: PathBuf,
    report: Option<PathBuf>,
    stdout: bool,
    text: bool,
    pretty: bool,
    compact: bool,
    length: Option<usize>,
    quiet: bool,
) -> Result<(), CliError> {
    let resolved_input = resolve_input_path(&input)?;
    validate_input_file(&resolved_input)?;

    let data = fs::read(&resolved_input)
        .with_context(|| format!("Failed to read dump file: {}", resolved_input.display()))?;
    let declared_len = length.unwrap_or(data.len());
    if !quiet && declared_len != 256 && declared_len != 768 {
        eprintln!(
            "note: unusual dump length {} (expected 256 or 768); extended pages may be absent",
            declared_len
        );
    }

    let module = cmislens_core::decode_module(&data, declared_len).map_err(|err| {
        CliError::new(
            format!("decode failed: {err}"),
            Some("check the dump file, or pass --length to narrow the declared size".to_string()),
        )
    })?;

    if text {
        print!("{}", render::render_text(&module));
        return Ok(());
    }

    let rep = DumpReport {
        report_version: REPORT_VERSION,
        tool: ToolInfo {
            name: "cmislens".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        input: InputInfo {
            path: resolved_input.display().to_string(),
            bytes: data.len() as u64,
            declared_length: declared_len,
        },
        module,
    };
    let json = serialize_report(&rep, pretty, compact)?;

    if stdout {
        print!("{}", json);
        return Ok(());
    }

    let report = report.ok_or_else(|| {
        CliError::new(
            "missing output path",
            Some("use -o/--report, --stdout or --text".to_string()),
        )
    })?;
    if let Some(parent) = report.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create output directory: {}", parent.display())
            })?;
        }
    }
    fs::write(&report, json)
        .with_context(|| format!("Failed to write report: {}", report.display()))?;

    if !quiet {
        eprintln!("OK: report written -> {}", report.display());
    }
    Ok(())
}

fn serialize_report(rep: &DumpReport, pretty: bool, compact: bool) -> Result<String, CliError> {
    if pretty && compact {
        return Err(CliError::new(
            "cannot use --pretty and --compact together",
            Some("choose one output format".to_string()),
        ));
    }
    if pretty {
        serde_json::to_string_pretty(rep)
            .context("JSON serialization failed")
            .map_err(Into::into)
    } else {
        serde_json::to_string(rep)
            .context("JSON serialization failed")
            .map_err(Into::into)
    }
}

fn validate_input_file(input: &PathBuf) -> Result<(), CliError> {
    if !input.exists() {
        return Err(CliError::new(
            format!("input file not found: {}", input.display()),
            Some("pass a raw EEPROM dump file".to_string()),
        ));
    }
    let meta = fs::metadata(input)
        .with_context(|| format!("Failed to read input file: {}", input.display()))?;
    if !meta.is_file() {
        return Err(CliError::new(
            format!("input is not a file: {}", input.display()),
            Some("pass a raw EEPROM dump file".to_string()),
        ));
    }
    Ok(())
}

fn resolve_input_path(input: &PathBuf) -> Result<PathBuf, CliError> {
    let pattern = input.to_string_lossy();
    if !is_glob_pattern(&pattern) {
        return Ok(input.clone());
    }

    let mut matches = Vec::new();
    let paths = glob(&pattern).map_err(|err| {
        CliError::new(
            format!("invalid input pattern '{}'", pattern),
            Some(format!("pattern error: {}", err.msg)),
        )
    })?;
    for entry in paths {
        let path = entry.map_err(|err| {
            CliError::new(
                format!("invalid input pattern '{}'", pattern),
                Some(format!("pattern error: {}", err)),
            )
        })?;
        if path.is_file() {
            matches.push(path);
        }
    }

    if matches.is_empty() {
        return Err(CliError::new(
            format!("no files match pattern '{}'", pattern),
            Some("check the path or quote the pattern".to_string()),
        ));
    }
    if matches.len() > 1 {
        return Err(CliError::new(
            format!(
                "multiple files match pattern '{}' ({} matches)",
                pattern,
                matches.len()
            ),
            Some("pass a single dump file, or run once per file".to_string()),
        ));
    }

    Ok(matches.remove(0))
}

fn is_glob_pattern(input: &str) -> bool {
    input.contains('*') || input.contains('?') || input.contains('[')
}
