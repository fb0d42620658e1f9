// ==========================================
// Printer inventory - command line entry point
// ==========================================
// import | export | constraints | check-locations
// Exit code 0 on success, 1 on any failure.
// ==========================================

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use printer_inventory::config::AppConfig;
use printer_inventory::exporter::{export_printer_data, render_statistics};
use printer_inventory::importer::{find_multi_location_printers, run_import};
use printer_inventory::{db, logging, schema};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Default file name of the constraint report
const DEFAULT_REPORT_FILE: &str = "db_constraints.txt";

#[derive(Parser)]
#[command(name = "printer-inventory")]
#[command(about = "Printer / slot / CARIdoc inventory: spreadsheet import and export")]
#[command(version)]
struct Cli {
    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rebuild the database from a workbook
    Import {
        /// Workbook with the printers sheet first and the forms sheet second
        file: PathBuf,

        /// Database file (default: $PRINTER_INVENTORY_DB_PATH or printers.db)
        #[arg(long = "db")]
        db_path: Option<String>,

        /// Print the import summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Write the database back to a workbook
    Export {
        #[arg(long = "db")]
        db_path: Option<String>,

        /// Output workbook (default: $PRINTER_INVENTORY_EXPORT_PATH or Druckerliste_CARI_export.xlsx)
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,

        /// Print the statistics as JSON
        #[arg(long)]
        json: bool,
    },

    /// Write the table / foreign key / index report
    Constraints {
        #[arg(long = "db")]
        db_path: Option<String>,

        #[arg(short = 'o', long, default_value = DEFAULT_REPORT_FILE)]
        output: PathBuf,
    },

    /// List printers whose bureaus span several locations
    CheckLocations {
        #[arg(long = "db")]
        db_path: Option<String>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    if cli.log_json {
        logging::init_json();
    } else {
        logging::init();
    }

    match run(cli.command) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(command: Commands) -> Result<ExitCode> {
    let config = AppConfig::from_env();

    match command {
        Commands::Import { file, db_path, json } => {
            let config = config.with_db_path(db_path);
            let summary = run_import(&file, &config.db_path)
                .with_context(|| format!("import of {} failed", file.display()))?;

            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                println!("Import finished ({} ms)", summary.elapsed_ms);
                println!("  Printers:          {}", summary.counts.printers);
                println!("  Slots:             {}", summary.counts.slots);
                println!("  Bureaus:           {}", summary.counts.bureaus);
                println!("  CARIdocs:          {}", summary.counts.document_formats);
                println!("  Slot assignments:  {}", summary.counts.slot_assignments);
                println!("  Skipped rows:      {}", summary.skipped_slot_rows);
            }
            Ok(ExitCode::SUCCESS)
        }

        Commands::Export { db_path, output, json } => {
            let config = config.with_db_path(db_path).with_export_path(output);
            let outcome =
                export_printer_data(Path::new(&config.db_path), &config.export_path, None);

            if json {
                println!("{}", serde_json::to_string_pretty(&outcome)?);
            } else {
                println!("{}", outcome.message);
                if let Some(stats) = &outcome.stats {
                    println!();
                    print!("{}", render_statistics(stats));
                }
            }

            Ok(if outcome.success {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }

        Commands::Constraints { db_path, output } => {
            let config = config.with_db_path(db_path);
            let tables = db::with_read_connection(&config.db_path, |tx| schema::describe_schema(tx))
                .with_context(|| format!("cannot read schema of {}", config.db_path))?;

            std::fs::write(&output, schema::render_schema_report(&tables))
                .with_context(|| format!("cannot write {}", output.display()))?;
            println!("Constraints written to {}", output.display());
            Ok(ExitCode::SUCCESS)
        }

        Commands::CheckLocations { db_path } => {
            let config = config.with_db_path(db_path);
            let offenders = db::with_read_connection(&config.db_path, |tx| {
                find_multi_location_printers(tx)
            })
            .with_context(|| format!("cannot query {}", config.db_path))?;

            if offenders.is_empty() {
                println!("Every printer serves a single location.");
                return Ok(ExitCode::SUCCESS);
            }
            for (printer, locations) in &offenders {
                println!("{}: {} locations", printer, locations);
            }
            Ok(ExitCode::FAILURE)
        }
    }
}
