//! CLI argument definitions for the roster client.

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use roster_model::{CanonicalField, SourceKind};

#[derive(Parser)]
#[command(
    name = "roster",
    version,
    about = "Upload student roster files to the risk backend",
    long_about = "Upload CSV or Excel student rosters, map their columns to the\n\
                  backend's canonical fields, and submit them for processing.\n\
                  Required fields: student_id, name, attendance_percentage, marks."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Allow sample cell values in trace logs.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,

    /// Backend API base URL (overrides the configuration file).
    #[arg(long = "base-url", env = "ROSTER_API_URL", value_name = "URL", global = true)]
    pub base_url: Option<String>,

    /// Configuration file to use instead of the default location.
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Upload a roster file, map its columns, and submit it for processing.
    Upload(UploadArgs),

    /// Upload separate attendance, marks, and fees files to be merged by student_id.
    #[command(name = "upload-multi")]
    UploadMulti(MultiUploadArgs),

    /// Download the sample format and write it as a CSV template.
    Template(TemplateArgs),

    /// List the canonical fields and which of them are required.
    Fields,

    /// Show or edit the configuration file.
    Config(ConfigArgs),
}

#[derive(Args)]
pub struct UploadArgs {
    /// CSV, XLSX, or XLS file to upload (at most 10 MB).
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Map a raw column to a canonical field, e.g. `--map "Roll No=student_id"`.
    #[arg(long = "map", value_name = "RAW=FIELD", value_parser = parse_map_entry)]
    pub map: Vec<(String, CanonicalField)>,

    /// Leave a raw column unmapped, even if the server suggested a field.
    #[arg(long = "unmap", value_name = "RAW")]
    pub unmap: Vec<String>,

    /// Apply a saved mapping preset before `--map`/`--unmap`.
    #[arg(long = "mapping-file", value_name = "PATH")]
    pub mapping_file: Option<PathBuf>,

    /// Save the final mapping as a preset.
    #[arg(long = "save-mapping", value_name = "PATH")]
    pub save_mapping: Option<PathBuf>,

    /// Fill columns the server left unsuggested from the local pattern table.
    #[arg(long = "local-suggestions")]
    pub local_suggestions: bool,

    /// Upload and show the mapping, but do not submit for processing.
    #[arg(long = "dry-run")]
    pub dry_run: bool,
}

#[derive(Args)]
#[command(group(
    clap::ArgGroup::new("sources")
        .args(["attendance", "marks", "fees"])
        .required(true)
        .multiple(true)
))]
pub struct MultiUploadArgs {
    /// File with student_id and attendance_percentage columns.
    #[arg(long = "attendance", value_name = "FILE")]
    pub attendance: Option<PathBuf>,

    /// File with student_id and marks columns.
    #[arg(long = "marks", value_name = "FILE")]
    pub marks: Option<PathBuf>,

    /// File with student_id, fees_paid, fees_due, and payment_status columns.
    #[arg(long = "fees", value_name = "FILE")]
    pub fees: Option<PathBuf>,
}

impl MultiUploadArgs {
    /// Given paths paired with their source kind.
    pub fn sources(&self) -> Vec<(SourceKind, &Path)> {
        [
            (SourceKind::Attendance, self.attendance.as_deref()),
            (SourceKind::Marks, self.marks.as_deref()),
            (SourceKind::Fees, self.fees.as_deref()),
        ]
        .into_iter()
        .filter_map(|(kind, path)| path.map(|path| (kind, path)))
        .collect()
    }
}

#[derive(Args)]
pub struct TemplateArgs {
    /// Where to write the template (default: sample_format.csv).
    #[arg(long = "output", short = 'o', value_name = "PATH")]
    pub output: Option<PathBuf>,
}

#[derive(Args)]
pub struct ConfigArgs {
    /// Print the effective configuration (the default when no edit is given).
    #[arg(long = "show")]
    pub show: bool,

    /// Store a new API base URL in the configuration file.
    #[arg(long = "set-base-url", value_name = "URL")]
    pub set_base_url: Option<String>,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

/// Parse `RAW=FIELD`. The split is at the last `=` so raw headers may contain one.
fn parse_map_entry(value: &str) -> Result<(String, CanonicalField), String> {
    let (raw, field) = value
        .rsplit_once('=')
        .ok_or_else(|| format!("expected RAW=FIELD, got '{value}'"))?;
    if raw.is_empty() {
        return Err("raw column name is empty".to_string());
    }
    let field = field.parse::<CanonicalField>().map_err(|e| e.to_string())?;
    Ok((raw.to_string(), field))
}
