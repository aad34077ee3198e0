pub mod commands;
pub mod handlers;
pub mod output;

pub use commands::{
    CliArgs, Commands, ConfigArgs, DetectArgs, ExtractArgs, GenerateArgs, OutputFormatArg,
    PlatformArg, RepairArgs,
};
pub use output::{OutputFormat, OutputFormatter};
