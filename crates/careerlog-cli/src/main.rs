//! `careerlog`: export the career log stored in a save file.
//!
//! Reads a save file in the host's brace-delimited format, finds the node
//! holding the career log sections, and either writes the CSV report or
//! uploads the records to the career log server.
//!
//! # Usage
//!
//! ```text
//! careerlog [--config careerlog-config.yaml] export-csv --save persistent.sfs [--out career.csv]
//! careerlog [--config careerlog-config.yaml] upload --save persistent.sfs
//! ```
//!
//! Log verbosity comes from `RUST_LOG`, falling back to `logging.level` in
//! the configuration.

mod error;

use std::path::{Path, PathBuf};

use careerlog_core::persist::PERIODS_SECTION;
use careerlog_core::{CareerLogConfig, CareerRecords, SaveNode};
use careerlog_export::{export_to_file, WebExporter};
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::error::CliError;

/// Command-line arguments.
#[derive(Parser, Debug)]
#[command(author, version, about = "Export career log data from a save file", long_about = None)]
struct Cli {
    /// Path to the YAML configuration file.
    #[arg(long, global = true, default_value = "careerlog-config.yaml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write one CSV row per log period.
    ExportCsv {
        /// Save file to read.
        #[arg(long)]
        save: PathBuf,
        /// Output file; defaults to `export.csv_path` from the configuration.
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Send every record to the career log server.
    Upload {
        /// Save file to read.
        #[arg(long)]
        save: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli.config)?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with_target(true)
        .init();

    match cli.command {
        Command::ExportCsv { save, out } => {
            let records = load_records(&save)?;
            let out = out.unwrap_or_else(|| PathBuf::from(&config.export.csv_path));
            let rows = export_to_file(&records, &out).map_err(CliError::from)?;
            info!(rows, out = %out.display(), "CSV export finished");
        }
        Command::Upload { save } => {
            let records = load_records(&save)?;
            let exporter = WebExporter::from_config(&config.export).map_err(CliError::from)?;
            if config.export.career_id.is_empty() {
                warn!("export.career_id is empty; periods are uploaded without a career id");
            }

            let mut failure = None;
            exporter
                .export(
                    &records,
                    &config.export.career_id,
                    || info!("Career log upload succeeded"),
                    |message| failure = Some(message),
                )
                .await;
            if let Some(message) = failure {
                return Err(CliError::UploadFailed { message }.into());
            }
        }
    }

    Ok(())
}

/// Load the configuration file, or defaults plus environment overrides if
/// it does not exist.
fn load_config(path: &Path) -> Result<CareerLogConfig, CliError> {
    if path.exists() {
        return Ok(CareerLogConfig::from_file(path)?);
    }
    let mut config = CareerLogConfig::default();
    config.export.apply_env_overrides();
    Ok(config)
}

/// Read the save file at `path` and load its career log records.
fn load_records(path: &Path) -> Result<CareerRecords, CliError> {
    let text = std::fs::read_to_string(path).map_err(|source| CliError::ReadSave {
        path: path.to_path_buf(),
        source,
    })?;
    let root = SaveNode::parse(&text)?;
    let node = career_node(&root).ok_or_else(|| CliError::NoCareerLog {
        path: path.to_path_buf(),
    })?;

    let (records, report) = CareerRecords::from_save(node);
    info!(
        save = %path.display(),
        periods = report.periods,
        contracts = report.contracts,
        launches = report.launches,
        facility_constructions = report.facility_constructions,
        techs = report.techs,
        skipped = report.skipped,
        "Career log records loaded"
    );
    Ok(records)
}

/// The first node, depth first, that directly holds the period section.
fn career_node(node: &SaveNode) -> Option<&SaveNode> {
    if node.get_node(PERIODS_SECTION).is_some() {
        return Some(node);
    }
    node.nodes().iter().find_map(career_node)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn career_node_is_found_inside_scenario() {
        let text = "\
GAME
{
\tSCENARIO
\t{
\t\tname = ResearchAndDevelopment
\t}
\tSCENARIO
\t{
\t\tname = CareerLog
\t\tCurPeriodStart = 0
\t\tLOGPERIODS
\t\t{
\t\t}
\t}
}
";
        let root = SaveNode::parse(text).unwrap();
        let node = career_node(&root).unwrap();
        assert_eq!(node.get_value("name"), Some("CareerLog"));
    }

    #[test]
    fn missing_career_log_is_none() {
        let root = SaveNode::parse("GAME\n{\n\tversion = 1.12\n}\n").unwrap();
        assert!(career_node(&root).is_none());
    }

    #[test]
    fn cli_parses_subcommands() {
        let cli = Cli::try_parse_from([
            "careerlog",
            "export-csv",
            "--save",
            "persistent.sfs",
            "--config",
            "alt.yaml",
        ])
        .unwrap();
        assert_eq!(cli.config, PathBuf::from("alt.yaml"));
        assert!(matches!(
            cli.command,
            Command::ExportCsv { ref save, out: None } if save == &PathBuf::from("persistent.sfs")
        ));
    }
}
