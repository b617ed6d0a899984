/*!
 * Command-line interface for rbxplugin
 */

use std::io;
use std::sync::Arc;
use std::time::Instant;

use clap::{CommandFactory, Parser};
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::EnvFilter;

use rbxplugin::builder::Builder;
use rbxplugin::config::{Args, Config};
use rbxplugin::report::{BuildReport, ReportFormat, Reporter};
use rbxplugin::utils::count_files;

fn main() -> io::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    // Parse command line arguments
    let args = Args::parse();

    if let Some(shell) = args.generate {
        clap_complete::generate(shell, &mut Args::command(), "rbxplugin", &mut io::stdout());
        return Ok(());
    }

    // Create configuration
    let config = Config::from_args(args);

    // Validate configuration
    config.validate()?;

    if !config.build {
        Args::command().print_help()?;
        return Ok(());
    }

    let progress = ProgressBar::new(count_files(&config.input));
    let style = ProgressStyle::default_bar()
        .template("{spinner:.green} {prefix:.bold.cyan} {wide_msg:.dim.white} {pos}/{len} ({percent}%)")
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
    progress.set_style(style);
    progress.enable_steady_tick(std::time::Duration::from_millis(100));
    progress.set_prefix("📊 Building");
    progress.set_message(format!("📂 Reading directory: {}", config.input.display()));

    let start_time = Instant::now();

    let mut builder = Builder::new(config.clone(), Arc::new(progress.clone()));
    let written = builder.write_output()?;

    let duration = start_time.elapsed();
    progress.finish_and_clear();

    if !config.quiet {
        let report = BuildReport {
            output_file: config.output.display().to_string(),
            duration,
            output_size: written as u64,
            statistics: builder.statistics().clone(),
        };
        Reporter::new(ReportFormat::ConsoleTable).print_report(&report);
    }

    Ok(())
}
