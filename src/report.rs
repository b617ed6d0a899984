/*!
 * Reporting functionality for rbxplugin
 *
 * Provides a summary of a finished build using the tabled library for
 * clean, consistent table rendering.
 */

use std::time::Duration;

use tabled::{
    settings::{object::Columns, Alignment, Modify, Padding, Style},
    Table, Tabled,
};

use crate::utils::format_file_size;
use crate::walker::WalkStatistics;

/// Summary of a build
#[derive(Debug, Clone)]
pub struct BuildReport {
    /// Output file path
    pub output_file: String,
    /// Time taken to build and write
    pub duration: Duration,
    /// Size of the serialized document in bytes
    pub output_size: u64,
    /// Walk statistics
    pub statistics: WalkStatistics,
}

/// Format of the report output
pub enum ReportFormat {
    /// Console table output
    ConsoleTable,
}

/// Report generator for build results
pub struct Reporter {
    format: ReportFormat,
}

impl Reporter {
    /// Create a new reporter
    pub fn new(format: ReportFormat) -> Self {
        Self { format }
    }

    /// Format a number with human-readable units
    fn format_number(&self, num: usize) -> String {
        if num >= 1_000_000 {
            format!("{:.1}M", num as f64 / 1_000_000.0)
        } else if num >= 1_000 {
            format!("{:.1}K", num as f64 / 1_000.0)
        } else {
            num.to_string()
        }
    }

    /// Generate a report string for a build
    pub fn generate_report(&self, report: &BuildReport) -> String {
        match self.format {
            ReportFormat::ConsoleTable => self.generate_console_report(report),
        }
    }

    /// Print the report to stdout
    pub fn print_report(&self, report: &BuildReport) {
        println!("\n{}", self.generate_report(report));
    }

    // Create a summary table using the tabled crate
    fn create_summary_table(&self, report: &BuildReport) -> String {
        #[derive(Tabled)]
        struct SummaryRow {
            #[tabled(rename = "Metric")]
            key: String,

            #[tabled(rename = "Value")]
            value: String,
        }

        let stats = &report.statistics;
        let row = |key: &str, value: String| SummaryRow {
            key: key.to_string(),
            value,
        };

        let mut rows = vec![
            row("📂 Output File", report.output_file.clone()),
            row("⏱️ Process Time", format!("{:.4?}", report.duration)),
            row("📦 Output Size", format_file_size(report.output_size)),
            row("🗂️ Containers", self.format_number(stats.containers)),
            row("📜 Scripts", self.format_number(stats.scripts)),
            row("🧩 Module Scripts", self.format_number(stats.module_scripts)),
            row("📝 Values", self.format_number(stats.values)),
        ];

        if stats.models > 0 {
            rows.push(row(
                "🔗 Spliced Models",
                format!(
                    "{} ({} objects)",
                    self.format_number(stats.models),
                    self.format_number(stats.spliced_objects)
                ),
            ));
        }

        rows.push(row("🔖 Referents", self.format_number(stats.referents)));

        let mut table = Table::new(rows);
        table
            .with(Style::rounded())
            .with(Padding::new(1, 1, 0, 0))
            .with(Modify::new(Columns::new(..)).with(Alignment::left()));

        table.to_string()
    }

    // Generate a console table report
    fn generate_console_report(&self, report: &BuildReport) -> String {
        format!("✅  BUILD COMPLETE\n{}", self.create_summary_table(report))
    }
}
