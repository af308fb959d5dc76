use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use script_writer_cli::{export_script, register_character, renumber_script, validate_script};
use script_writer_core::{ExportFormat, ProjectConfig, CONFIG_FILE_NAME};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Script Writer CLI")]
struct Cli {
    /// Project configuration file.
    #[arg(long, global = true, default_value = CONFIG_FILE_NAME)]
    config: PathBuf,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Crop an image into a character portrait and store it in the project.
    Register {
        #[arg(long)]
        image: PathBuf,
        #[arg(long)]
        name: String,
        /// Crop window origin in preview pixels.
        #[arg(long, default_value_t = 0.0)]
        x: f32,
        #[arg(long, default_value_t = 0.0)]
        y: f32,
        /// Overrides `project_dir` from the configuration.
        #[arg(long)]
        project: Option<PathBuf>,
    },
    /// Check a script JSON file and print a summary.
    Validate { script: PathBuf },
    /// Export a script JSON file as JSON or CSV.
    Export {
        script: PathBuf,
        #[arg(long, default_value_t = ExportFormat::Csv)]
        format: ExportFormat,
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Rewrite a script with dense line numbers and no empty lines.
    Renumber {
        script: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Register {
            image,
            name,
            x,
            y,
            project,
        } => {
            let mut config = ProjectConfig::load_or_default(&cli.config)
                .with_context(|| format!("load config {}", cli.config.display()))?;
            if let Some(project) = project {
                config.project_dir = project;
            }
            let portrait = register_character(&config, &image, &name, [x, y])?;
            println!("{}", portrait.display());
        }
        Command::Validate { script } => {
            let summary = validate_script(&script)?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        Command::Export {
            script,
            format,
            output,
        } => {
            let written = export_script(&script, format, &output)?;
            println!("wrote {written} lines to {}", output.display());
        }
        Command::Renumber { script, output } => {
            let written = renumber_script(&script, &output)?;
            println!("wrote {written} lines to {}", output.display());
        }
    }
    Ok(())
}
