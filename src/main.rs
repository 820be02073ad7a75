//! Sheetload CLI - Repair XML exports and convert them to Excel
//!
//! # Main Commands
//!
//! ```bash
//! sheetload convert export.xml          # Repair + convert to export.xlsx
//! sheetload convert export.xml -o out   # Same, workbook named out.xlsx
//! ```
//!
//! # Debug Commands (for development)
//!
//! ```bash
//! sheetload repair export.xml           # Only write export_repaired.xml
//! sheetload inspect export.xml          # Show inferred sheets, write nothing
//! sheetload inspect export.xml --json   # Same, as JSON
//! ```

use clap::{Parser, Subcommand};
use sheetload::{convert_file, inspect_file, repair_file, ConvertOptions};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "sheetload")]
#[command(about = "Repair malformed XML exports and convert them to Excel workbooks", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Full pipeline: repair, parse, and write an Excel workbook
    Convert {
        /// Input XML file
        input: PathBuf,

        /// Output workbook name (default: input base name + .xlsx)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Only repair the XML entities and write the _repaired file
    Repair {
        /// Input XML file
        input: PathBuf,
    },

    /// Repair and parse in memory, report the inferred sheets
    Inspect {
        /// Input XML file
        input: PathBuf,

        /// Output the summary as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Convert { input, output } => cmd_convert(&input, output),
        Commands::Repair { input } => cmd_repair(&input),
        Commands::Inspect { input, json } => cmd_inspect(&input, json),
    };

    if let Err(e) = result {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }
}

fn cmd_convert(input: &Path, output: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("📄 Converting: {}", input.display());

    let report = convert_file(input, ConvertOptions { output })?;

    eprintln!("   Encoding: {}", report.encoding);
    eprintln!("   Repaired {} data spans", report.spans);
    eprintln!("   💾 Repaired XML saved to: {}", report.repaired.display());

    for sheet in &report.sheets {
        eprintln!(
            "   ✓ Sheet '{}': {} records, {} columns",
            sheet.name, sheet.records, sheet.columns
        );
    }

    eprintln!("💾 Workbook written to: {}", report.workbook.display());
    eprintln!("✨ Done!");
    Ok(())
}

fn cmd_repair(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("🔧 Repairing: {}", input.display());

    let report = repair_file(input)?;

    eprintln!("   Encoding: {}", report.encoding);
    eprintln!("   Data spans: {}", report.spans);
    if report.changed {
        eprintln!("   ✓ Entities rewritten");
    } else {
        eprintln!("   ✓ Already clean, no changes");
    }

    eprintln!("💾 Repaired XML saved to: {}", report.repaired.display());
    Ok(())
}

fn cmd_inspect(input: &Path, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("🔍 Inspecting: {}", input.display());

    let report = inspect_file(input)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    eprintln!("   Encoding: {}", report.encoding);
    eprintln!("   Data spans: {}", report.spans);

    if report.sheets.is_empty() {
        eprintln!("   (no sheet groups found)");
    }
    for sheet in &report.sheets {
        println!(
            "  📄 {} — {} records, {} columns",
            sheet.name, sheet.records, sheet.columns
        );
    }

    Ok(())
}
