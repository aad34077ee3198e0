//! Command handlers
//!
//! Each handler returns the process exit code; failures are reported on stderr.

use super::commands::{ConfigArgs, DetectArgs, ExtractArgs, GenerateArgs, RepairArgs};
use super::output::{OutputFormat, OutputFormatter};
use crate::config::MockforgeConfig;
use crate::extraction::CodeExtractor;
use crate::llm::select_llm_client;
use crate::mockup::detect_screens;
use crate::pipeline::{GenerationPipeline, GenerationRequest, PipelineConfig};
use crate::progress::LoggingHandler;
use crate::project::write_project;
use crate::repair;
use crate::trace::TraceLogger;
use anyhow::{bail, Context, Result};
use std::fs;
use std::io::{self, Read};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, error, info};

fn exit_code(result: Result<()>) -> i32 {
    match result {
        Ok(()) => 0,
        Err(e) => {
            error!("{:#}", e);
            eprintln!("Error: {:#}", e);
            1
        }
    }
}

/// Reads a file, or stdin when the path is `-`
fn read_input(path: &Path) -> Result<String> {
    if path.as_os_str() == "-" {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read stdin")?;
        return Ok(buffer);
    }
    fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

pub fn handle_detect(args: &DetectArgs) -> i32 {
    exit_code(run_detect(args))
}

fn run_detect(args: &DetectArgs) -> Result<()> {
    let markup = read_input(&args.markup)?;
    let result = detect_screens(&markup);
    debug!("Detected screens: {:?}", result.detected_screens);

    let formatter = OutputFormatter::new(args.format.into());
    println!("{}", formatter.format_detection(&result)?);
    Ok(())
}

pub async fn handle_generate(args: &GenerateArgs, quiet: bool) -> i32 {
    exit_code(run_generate(args, quiet).await)
}

fn generation_config(args: &GenerateArgs) -> Result<MockforgeConfig> {
    let mut config = MockforgeConfig::default();
    if let Some(provider) = args.provider {
        config = config.with_provider(provider, args.model.clone());
    } else if let Some(model) = &args.model {
        config.model = model.clone();
    }
    if let Some(timeout) = args.timeout {
        config.request_timeout_secs = timeout;
    }
    if let Some(path) = &args.trace_file {
        config.trace_file = Some(path.clone());
    }
    if args.local {
        config = config.local_only();
    }
    config.validate().context("Invalid configuration")?;
    Ok(config)
}

async fn run_generate(args: &GenerateArgs, quiet: bool) -> Result<()> {
    let config = generation_config(args)?;
    info!("Generation mode: {}", config.mode);

    let mut request = match &args.markup {
        Some(path) => GenerationRequest::from_markup(read_input(path)?),
        None => GenerationRequest::default(),
    };
    if let Some(prompt) = &args.prompt {
        request = request.with_prompt(prompt.clone());
    }
    let request = request.with_platform(args.platform.into());

    let client = select_llm_client(&config).await.map(|selected| {
        debug!("Selected {}", selected.description);
        selected.client
    });
    let pipeline_config = PipelineConfig::from_config(&config).with_fallback(!args.no_fallback);
    let pipeline = GenerationPipeline::new(client, pipeline_config)
        .with_progress(Arc::new(LoggingHandler))
        .with_trace(TraceLogger::new(config.trace_file.clone()));

    let project = pipeline
        .generate(request)
        .await
        .context("Generation failed")?;

    let written = write_project(&project.files, &args.out)
        .with_context(|| format!("Failed to write project to {}", args.out.display()))?;

    if !quiet {
        let formatter = OutputFormatter::new(OutputFormat::Human);
        print!("{}", formatter.format_project(&project, &written)?);
    }
    Ok(())
}

pub fn handle_extract(args: &ExtractArgs) -> i32 {
    exit_code(run_extract(args))
}

fn run_extract(args: &ExtractArgs) -> Result<()> {
    let reply = read_input(&args.reply)?;
    let outcome = CodeExtractor::new().extract(&reply);
    if outcome.is_empty() {
        bail!("No files could be recovered from {}", args.reply.display());
    }
    info!(
        "Recovered {} file(s) with the {} strategy",
        outcome.files.len(),
        outcome.strategy.unwrap_or("unknown")
    );

    match &args.out {
        Some(out_dir) => {
            let written = write_project(&outcome.files, out_dir)
                .with_context(|| format!("Failed to write files to {}", out_dir.display()))?;
            for path in written {
                println!("{}", path.display());
            }
        }
        None => {
            for (path, content) in &outcome.files {
                println!("{}\t{} bytes", path, content.len());
            }
        }
    }
    Ok(())
}

pub fn handle_repair(args: &RepairArgs) -> i32 {
    exit_code(run_repair(args))
}

fn run_repair(args: &RepairArgs) -> Result<()> {
    let content = read_input(&args.file)?;
    let logical_path = args
        .path
        .clone()
        .unwrap_or_else(|| args.file.to_string_lossy().replace('\\', "/"));

    let repaired = repair::repair(&content, &logical_path);
    if repaired == content {
        debug!("No repair rule changed {}", logical_path);
    }

    if args.in_place {
        fs::write(&args.file, &repaired)
            .with_context(|| format!("Failed to write {}", args.file.display()))?;
    } else {
        print!("{}", repaired);
    }
    Ok(())
}

pub fn handle_config(args: &ConfigArgs) -> i32 {
    exit_code(run_config(args))
}

fn run_config(args: &ConfigArgs) -> Result<()> {
    let config = MockforgeConfig::default();
    if let Err(e) = config.validate() {
        eprintln!("Warning: {}", e);
    }
    let formatter = OutputFormatter::new(args.format.into());
    println!("{}", formatter.format_config(&config)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::commands::{OutputFormatArg, PlatformArg};
    use serial_test::serial;
    use tempfile::TempDir;

    #[test]
    fn test_read_input_missing_file() {
        let err = read_input(Path::new("/nonexistent/mockup.drawio")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/mockup.drawio"));
    }

    #[test]
    fn test_repair_in_place() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("main.dart");
        fs::write(
            &file,
            "import 'package:flutter/material.dart';\nvoid main() => runApp(MaterialApp.router(routerConfig: AppRouter.router));\n",
        )
        .unwrap();

        let code = handle_repair(&RepairArgs {
            file: file.clone(),
            path: Some("lib/main.dart".to_string()),
            in_place: true,
        });

        assert_eq!(code, 0);
        assert!(fs::read_to_string(&file).unwrap().contains("AppRouter().router"));
    }

    #[test]
    fn test_extract_writes_files() {
        let dir = TempDir::new().unwrap();
        let reply = dir.path().join("reply.md");
        fs::write(
            &reply,
            "[FILE: lib/util.dart]\n```dart\nint twice(int x) => x * 2;\n```\n",
        )
        .unwrap();
        let out = dir.path().join("out");

        let code = handle_extract(&ExtractArgs {
            reply,
            out: Some(out.clone()),
        });

        assert_eq!(code, 0);
        assert_eq!(
            fs::read_to_string(out.join("lib/util.dart")).unwrap(),
            "int twice(int x) => x * 2;\n"
        );
    }

    #[test]
    fn test_extract_nothing_fails() {
        let dir = TempDir::new().unwrap();
        let reply = dir.path().join("reply.md");
        fs::write(&reply, "Sorry, I cannot help with that.").unwrap();
        assert_eq!(handle_extract(&ExtractArgs { reply, out: None }), 1);
    }

    #[test]
    fn test_detect_missing_file_fails() {
        let code = handle_detect(&DetectArgs {
            markup: "/nonexistent/mockup.drawio".into(),
            format: OutputFormatArg::Json,
        });
        assert_eq!(code, 1);
    }

    #[tokio::test]
    #[serial]
    async fn test_generate_local_writes_project() {
        let dir = TempDir::new().unwrap();
        let args = GenerateArgs {
            markup: None,
            prompt: Some("A reading list".to_string()),
            platform: PlatformArg::Angular,
            out: dir.path().join("app"),
            local: true,
            no_fallback: false,
            provider: None,
            model: None,
            timeout: None,
            trace_file: None,
        };

        assert_eq!(handle_generate(&args, true).await, 0);
        assert!(dir.path().join("app/package.json").exists());
        assert!(dir.path().join("app/src/app/app.component.ts").exists());
    }
}
