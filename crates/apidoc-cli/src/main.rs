//! Apidoc CLI - API documentation for PHP projects

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use apidoc_core::config::CONFIG_FILE;
use apidoc_core::{DocConfig, GenerateReport, Generator};
use clap::{Parser, Subcommand};

mod init;
mod logging;

#[derive(Parser)]
#[command(name = "apidoc")]
#[command(version = apidoc_core::VERSION)]
#[command(about = "API documentation generator for PHP", long_about = None)]
struct Cli {
    /// Log debug output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate HTML documentation
    Generate {
        /// Project directory
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Configuration file (defaults to PATH/apidoc.toml)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Output directory, overriding the configuration
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Prefix of generated links, overriding the configuration
        #[arg(long)]
        base_url: Option<String>,
    },

    /// Resolve and render everything without writing
    Check {
        /// Project directory
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Configuration file (defaults to PATH/apidoc.toml)
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Write a default apidoc.toml
    Init {
        /// Project directory
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Project title (defaults to directory name)
        #[arg(long)]
        name: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match cli.command {
        Commands::Generate {
            path,
            config,
            output,
            base_url,
        } => {
            let mut config = load_config(&path, config.as_deref())?;
            if let Some(base_url) = base_url {
                config.output.base_url = base_url;
            }
            let mut generator = Generator::new(config, &path);
            if let Some(output) = output {
                generator = generator.with_output_dir(output);
            }
            let report = generator.run().context("Documentation run failed")?;
            print_skipped(&report);
            println!(
                "Documented {} structures in {} pages under {}",
                report.structures,
                report.pages.len(),
                generator.output_dir().display()
            );
        }

        Commands::Check { path, config } => {
            let config = load_config(&path, config.as_deref())?;
            let report = Generator::new(config, &path)
                .check()
                .context("Check failed")?;
            print_skipped(&report);
            println!(
                "Checked {} structures from {} files",
                report.structures, report.files_scanned
            );
        }

        Commands::Init { path, name } => {
            let written = init::init_project(init::InitOptions { path, name })?;
            println!("Created {}", written.display());
        }
    }

    Ok(())
}

fn load_config(root: &Path, explicit: Option<&Path>) -> Result<DocConfig> {
    let path = explicit.map_or_else(|| root.join(CONFIG_FILE), Path::to_path_buf);
    DocConfig::from_path(&path).with_context(|| format!("Failed to load {}", path.display()))
}

fn print_skipped(report: &GenerateReport) {
    for skipped in &report.files_skipped {
        eprintln!("skipped {}:", skipped.path.display());
        for error in &skipped.errors {
            eprintln!("  {error}");
        }
    }
}
