//! Trellis Code Generator
//!
//! Generates graph adapter implementations from trellis schema traits.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use colored::Colorize;
use tracing::{debug, error};
use tracing_subscriber::{filter::EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use trellis_gen::config::{CONFIG_FILE, GeneratorConfig};
use trellis_gen::errors::GeneratorError;
use trellis_gen::output::GenerationReport;

/// Trellis code generator - turns schema traits into graph adapters
#[derive(Parser, Debug)]
#[command(name = "trellis-gen")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Configuration file (defaults to ./trellis.toml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Source file containing schema traits (repeatable)
    #[arg(short, long = "input")]
    inputs: Vec<PathBuf>,

    /// Output directory for generated code
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Path generated code uses to reach the trellis runtime
    #[arg(long)]
    runtime_crate: Option<String>,

    /// Print generated code without writing files
    #[arg(long)]
    dry_run: bool,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn config(&self) -> Result<GeneratorConfig, GeneratorError> {
        let mut config = match &self.config {
            Some(path) => GeneratorConfig::from_file(path)?,
            None if Path::new(CONFIG_FILE).exists() => {
                GeneratorConfig::from_file(Path::new(CONFIG_FILE))?
            }
            None => GeneratorConfig::default(),
        };

        if !self.inputs.is_empty() {
            config.inputs = self.inputs.clone();
        }
        if let Some(output) = &self.output {
            config.output = output.clone();
        }
        if let Some(runtime_crate) = &self.runtime_crate {
            config.runtime_crate = runtime_crate.clone();
        }
        Ok(config)
    }
}

fn print_summary(report: &GenerationReport) {
    eprintln!("\n{}\n", "=== Generation Summary ===".bold());

    if !report.written.is_empty() {
        eprintln!("{}", "Written:".green());
        for path in &report.written {
            eprintln!("  {}", path.display());
        }
    }

    if !report.unchanged.is_empty() {
        eprintln!("{}", "Unchanged:".dimmed());
        for path in &report.unchanged {
            eprintln!("  {}", path.display());
        }
    }

    if report.has_failures() {
        eprintln!("{}", "Failed:".red());
        for failure in &report.failures {
            eprintln!("  {}: {}", failure.schema.bold(), failure.error);
        }
    }

    if !report.diagnostics.is_empty() {
        eprintln!("{}", "Diagnostics:".yellow());
        for diagnostic in &report.diagnostics {
            eprintln!("  {}", diagnostic.render_colored());
        }
    }

    eprintln!(
        "\nTotal: {} written, {} unchanged, {} failed, {} warnings",
        report.written.len(),
        report.unchanged.len(),
        report.failures.len(),
        report.diagnostics.warning_count()
    );
}

/// Default log directives for a `-v` count.
fn verbosity_filter(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "warn,trellis_gen=info",
        2 => "info,trellis_gen=debug",
        _ => "debug,trellis_gen=trace",
    }
}

/// `RUST_LOG` wins; otherwise `-v` raises the generator's own log level.
fn init_tracing(verbose: u8) {
    let base_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| verbosity_filter(verbose).to_string());
    let filter = EnvFilter::try_new(&base_filter).unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    let result = cli.config().and_then(|config| {
        debug!(?config, dry_run = cli.dry_run, "starting batch");
        trellis_gen::run(&config, cli.dry_run)
    });

    match result {
        Ok(report) => {
            print_summary(&report);
            if report.has_failures() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            }
        }
        Err(err) => {
            error!("{err}");
            eprintln!("{} {}", "error:".red().bold(), err);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_maps_to_valid_env_filters() {
        assert_eq!(verbosity_filter(0), "warn");
        assert_eq!(verbosity_filter(1), "warn,trellis_gen=info");
        assert_eq!(verbosity_filter(7), "debug,trellis_gen=trace");
        for verbose in 0..4 {
            assert!(EnvFilter::try_new(verbosity_filter(verbose)).is_ok());
        }
    }

    #[test]
    fn verbose_flag_counts() {
        let cli = Cli::parse_from(["trellis-gen", "-vv"]);
        assert_eq!(cli.verbose, 2);
    }
}
