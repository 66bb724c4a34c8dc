//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

use wellmatch_cli::commands::{MatchInput, Preset};

#[derive(Parser)]
#[command(
    name = "wellmatch",
    version,
    about = "Match patient symptoms to practitioners",
    long_about = "Recommend practitioners from a CSV registry for free-text symptoms.\n\n\
                  Scores symptom relevance, proximity and reputation, keeps one \
                  practitioner per specialty where possible, and always returns \
                  someone when the registry is not empty."
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

    /// Allow patient symptom text and locations in log output.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Recommend practitioners for a symptom description.
    Match(MatchArgs),

    /// List the practitioners a registry file yields.
    Practitioners(RegistryArgs),

    /// Show how symptom text is tokenized and expanded.
    Normalize(NormalizeArgs),
}

#[derive(Parser)]
pub struct MatchArgs {
    /// Practitioner registry CSV.
    #[arg(long = "registry", short = 'r', value_name = "CSV")]
    pub registry: PathBuf,

    /// Free-text symptom description.
    #[arg(long = "symptoms", short = 's', value_name = "TEXT")]
    pub symptoms: String,

    /// Patient city or "City, State" label.
    #[arg(long = "city", value_name = "CITY")]
    pub city: Option<String>,

    #[command(flatten)]
    pub calibration: CalibrationArgs,

    /// Output format.
    #[arg(long = "format", value_enum, default_value = "table")]
    pub format: OutputFormatArg,
}

impl MatchArgs {
    pub fn to_input(&self) -> MatchInput {
        MatchInput {
            registry: self.registry.clone(),
            symptoms: self.symptoms.clone(),
            city: self.city.clone(),
            config: self.calibration.config.clone(),
            preset: self.calibration.preset.into(),
        }
    }
}

#[derive(Parser)]
pub struct RegistryArgs {
    /// Practitioner registry CSV.
    #[arg(long = "registry", short = 'r', value_name = "CSV")]
    pub registry: PathBuf,
}

#[derive(Parser)]
pub struct NormalizeArgs {
    /// Free-text symptom description.
    #[arg(value_name = "TEXT")]
    pub text: String,

    #[command(flatten)]
    pub calibration: CalibrationArgs,
}

#[derive(Args)]
pub struct CalibrationArgs {
    /// JSON calibration file; omitted fields use defaults.
    #[arg(long = "config", value_name = "JSON", conflicts_with = "preset")]
    pub config: Option<PathBuf>,

    /// Built-in calibration.
    #[arg(long = "preset", value_enum, default_value = "default")]
    pub preset: PresetArg,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum PresetArg {
    Default,
    Strict,
    Relaxed,
}

impl From<PresetArg> for Preset {
    fn from(arg: PresetArg) -> Self {
        match arg {
            PresetArg::Default => Self::Default,
            PresetArg::Strict => Self::Strict,
            PresetArg::Relaxed => Self::Relaxed,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum OutputFormatArg {
    Table,
    Json,
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
