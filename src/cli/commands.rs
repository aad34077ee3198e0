use crate::config::parse_provider;
use crate::pipeline::TargetPlatform;
use clap::{Parser, Subcommand, ValueEnum};
use genai::adapter::AdapterKind;
use std::path::PathBuf;

/// Turns UI mockups and descriptions into Flutter or Angular projects
#[derive(Parser, Debug)]
#[command(
    name = "mockforge",
    about = "Turns UI mockups and descriptions into Flutter or Angular projects",
    version,
    author,
    long_about = "mockforge reads diagram markup of UI mockups, detects the screens they \
                  show, asks a generative service for a project and recovers a clean \
                  multi-file project from the reply. Without a service it renders the \
                  project from local templates."
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, global = true, value_name = "LEVEL", help = "Set logging level")]
    pub log_level: Option<String>,

    #[arg(short = 'v', long, global = true, help = "Enable debug logging")]
    pub verbose: bool,

    #[arg(
        short = 'q',
        long,
        global = true,
        conflicts_with = "verbose",
        help = "Quiet mode - suppress non-error output"
    )]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(
        about = "Detect screens in mockup markup",
        long_about = "Scans diagram markup and prints the detected screens, fields, buttons \
                      and radio groups as JSON.\n\n\
                      Examples:\n  \
                      mockforge detect mockup.drawio\n  \
                      cat mockup.drawio | mockforge detect -"
    )]
    Detect(DetectArgs),

    #[command(
        about = "Generate a project from a mockup or a description",
        long_about = "Generates a project and writes it to the output directory.\n\n\
                      Examples:\n  \
                      mockforge generate --markup mockup.drawio --out app\n  \
                      mockforge generate --prompt \"A todo list\" --platform angular --out app\n  \
                      mockforge generate --markup mockup.drawio --local --out app"
    )]
    Generate(GenerateArgs),

    #[command(
        about = "Recover files from a saved service reply",
        long_about = "Runs the extraction cascade and repair rules over a reply saved to a \
                      file, listing the recovered paths or writing them to a directory.\n\n\
                      Examples:\n  \
                      mockforge extract reply.md\n  \
                      mockforge extract reply.md --out app"
    )]
    Extract(ExtractArgs),

    #[command(
        about = "Apply the repair rules to one file",
        long_about = "Prints the repaired content of a file. The logical project path decides \
                      which rules apply and defaults to the file's own path.\n\n\
                      Examples:\n  \
                      mockforge repair main.dart --path lib/main.dart"
    )]
    Repair(RepairArgs),

    #[command(about = "Show the effective configuration")]
    Config(ConfigArgs),
}

#[derive(Parser, Debug, Clone)]
pub struct DetectArgs {
    #[arg(value_name = "MARKUP", help = "Mockup markup file, or - for stdin")]
    pub markup: PathBuf,

    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "json",
        help = "Output format"
    )]
    pub format: OutputFormatArg,
}

#[derive(Parser, Debug, Clone)]
pub struct GenerateArgs {
    #[arg(
        long,
        value_name = "FILE",
        required_unless_present = "prompt",
        help = "Mockup markup file, or - for stdin"
    )]
    pub markup: Option<PathBuf>,

    #[arg(
        long,
        value_name = "TEXT",
        help = "App description, or extra instructions when a mockup is given"
    )]
    pub prompt: Option<String>,

    #[arg(long, value_enum, default_value = "flutter", help = "Target framework")]
    pub platform: PlatformArg,

    #[arg(short = 'o', long, value_name = "DIR", help = "Output directory")]
    pub out: PathBuf,

    #[arg(long, help = "Render from local templates without calling a service")]
    pub local: bool,

    #[arg(
        long,
        conflicts_with = "local",
        help = "Fail instead of falling back to local templates when the service fails"
    )]
    pub no_fallback: bool,

    #[arg(
        short = 'p',
        long,
        value_parser = parse_adapter_kind,
        help = "Generative service provider (defaults to MOCKFORGE_PROVIDER)"
    )]
    pub provider: Option<AdapterKind>,

    #[arg(short = 'm', long, value_name = "MODEL", help = "Model name (provider-specific)")]
    pub model: Option<String>,

    #[arg(long, value_name = "SECONDS", help = "Service request timeout in seconds")]
    pub timeout: Option<u64>,

    #[arg(long, value_name = "FILE", help = "Append JSONL stage traces to this file")]
    pub trace_file: Option<PathBuf>,
}

#[derive(Parser, Debug, Clone)]
pub struct ExtractArgs {
    #[arg(value_name = "REPLY", help = "File holding the raw service reply, or - for stdin")]
    pub reply: PathBuf,

    #[arg(short = 'o', long, value_name = "DIR", help = "Write recovered files here")]
    pub out: Option<PathBuf>,
}

#[derive(Parser, Debug, Clone)]
pub struct RepairArgs {
    #[arg(value_name = "FILE", help = "File to repair")]
    pub file: PathBuf,

    #[arg(long, value_name = "PATH", help = "Logical project path, e.g. lib/main.dart")]
    pub path: Option<String>,

    #[arg(long, help = "Overwrite the file instead of printing the result")]
    pub in_place: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct ConfigArgs {
    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "human",
        help = "Output format"
    )]
    pub format: OutputFormatArg,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormatArg {
    Json,
    Human,
}

impl From<OutputFormatArg> for super::output::OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Json => super::output::OutputFormat::Json,
            OutputFormatArg::Human => super::output::OutputFormat::Human,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformArg {
    Flutter,
    Angular,
}

impl From<PlatformArg> for TargetPlatform {
    fn from(arg: PlatformArg) -> Self {
        match arg {
            PlatformArg::Flutter => TargetPlatform::Flutter,
            PlatformArg::Angular => TargetPlatform::Angular,
        }
    }
}

fn parse_adapter_kind(s: &str) -> Result<AdapterKind, String> {
    parse_provider(s).map_err(|e| e.to_string())
}
