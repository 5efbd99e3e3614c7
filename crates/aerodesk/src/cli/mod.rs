//! Command-line interface for aerodesk.
//!
//! This module provides the CLI structure and command definitions for the
//! `adk` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    AircraftCommand, AnalyzeCommand, BriefModeArg, CatalogCommand, CharacteristicCommand,
    ConfigCommand, ProjectCommand, RequirementsCommand, SelectionCommand, SketchCommand,
    StatsCommand, TechCategoryCommand, TechCommand, TechOptionCommand,
};

/// adk - Aircraft preliminary-design workbench
///
/// Manages design projects with requirements briefs, technology packs,
/// concept sketches, constraint analyses and statistics over a shared
/// aircraft catalog.
#[derive(Debug, Parser)]
#[command(name = "adk")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage design projects
    #[command(subcommand)]
    Project(ProjectCommand),

    /// Author the requirements brief of a project
    #[command(subcommand)]
    Requirements(RequirementsCommand),

    /// Manage the shared aircraft catalog
    #[command(subcommand)]
    Catalog(CatalogCommand),

    /// Manage the technology pack of a project
    #[command(subcommand)]
    Tech(TechCommand),

    /// Manage the concept sketches of a project
    #[command(subcommand)]
    Sketch(SketchCommand),

    /// Run and inspect the constraint analysis of a project
    #[command(subcommand)]
    Analyze(AnalyzeCommand),

    /// Statistics over catalog aircraft
    #[command(subcommand)]
    Stats(StatsCommand),

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> crate::logging::Verbosity {
        if self.quiet {
            crate::logging::Verbosity::Quiet
        } else {
            match self.verbose {
                0 => crate::logging::Verbosity::Normal,
                1 => crate::logging::Verbosity::Verbose,
                _ => crate::logging::Verbosity::Trace,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_name() {
        let cli = Cli::command();
        assert_eq!(cli.get_name(), "adk");
    }

    #[test]
    fn test_cli_verify() {
        // Verify the CLI structure is valid
        Cli::command().debug_assert();
    }

    #[test]
    fn test_verbosity_quiet() {
        let cli = Cli::try_parse_from(["adk", "-q", "project", "list"]).unwrap();
        assert_eq!(cli.verbosity(), crate::logging::Verbosity::Quiet);
    }

    #[test]
    fn test_verbosity_normal() {
        let cli = Cli::try_parse_from(["adk", "project", "list"]).unwrap();
        assert_eq!(cli.verbosity(), crate::logging::Verbosity::Normal);
    }

    #[test]
    fn test_verbosity_verbose_and_trace() {
        let cli = Cli::try_parse_from(["adk", "-v", "project", "list"]).unwrap();
        assert_eq!(cli.verbosity(), crate::logging::Verbosity::Verbose);

        let cli = Cli::try_parse_from(["adk", "-vv", "project", "list"]).unwrap();
        assert_eq!(cli.verbosity(), crate::logging::Verbosity::Trace);
    }

    #[test]
    fn test_parse_project_create() {
        let cli = Cli::try_parse_from(["adk", "project", "create", "demo"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Project(ProjectCommand::Create { .. })
        ));
    }

    #[test]
    fn test_parse_with_config() {
        let cli =
            Cli::try_parse_from(["adk", "-c", "/custom/config.toml", "project", "list"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/custom/config.toml")));
    }

    #[test]
    fn test_parse_catalog_aircraft_add() {
        let cli = Cli::try_parse_from([
            "adk", "catalog", "aircraft", "add", "Falcon", "--notes", "twin",
        ])
        .unwrap();
        let Command::Catalog(CatalogCommand::Aircraft(AircraftCommand::Add { name, notes })) =
            cli.command
        else {
            panic!("unexpected command");
        };
        assert_eq!(name, "Falcon");
        assert_eq!(notes.as_deref(), Some("twin"));
    }

    #[test]
    fn test_parse_requirements_mode() {
        let cli = Cli::try_parse_from(["adk", "requirements", "mode", "demo", "concept"]).unwrap();
        let Command::Requirements(RequirementsCommand::Mode { mode, .. }) = cli.command else {
            panic!("unexpected command");
        };
        assert_eq!(mode, BriefModeArg::Concept);
    }

    #[test]
    fn test_parse_analyze_run_with_tech() {
        let cli = Cli::try_parse_from(["adk", "analyze", "run", "demo", "--apply-tech"]).unwrap();
        let Command::Analyze(AnalyzeCommand::Run { apply_tech, .. }) = cli.command else {
            panic!("unexpected command");
        };
        assert!(apply_tech);
    }

    #[test]
    fn test_parse_stats_selection_add() {
        let cli = Cli::try_parse_from([
            "adk",
            "stats",
            "selection",
            "add",
            "demo",
            "Twins",
            "--aircraft",
            "1,2,3",
        ])
        .unwrap();
        let Command::Stats(StatsCommand::Selection(SelectionCommand::Add {
            aircraft_ids, ..
        })) = cli.command
        else {
            panic!("unexpected command");
        };
        assert_eq!(aircraft_ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_parse_stats_hist_defaults() {
        let cli = Cli::try_parse_from(["adk", "stats", "hist", "demo", "mtow"]).unwrap();
        let Command::Stats(StatsCommand::Hist { bins, log, .. }) = cli.command else {
            panic!("unexpected command");
        };
        assert_eq!(bins, 10);
        assert!(!log);
    }

    #[test]
    fn test_parse_sketch_add_with_caption() {
        let cli = Cli::try_parse_from([
            "adk", "sketch", "add", "demo", "wing.png", "-m", "front view",
        ])
        .unwrap();
        let Command::Sketch(SketchCommand::Add { caption, .. }) = cli.command else {
            panic!("unexpected command");
        };
        assert_eq!(caption, "front view");
    }

    #[test]
    fn test_parse_config_validate() {
        let cli = Cli::try_parse_from(["adk", "config", "validate"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Config(ConfigCommand::Validate { file: None })
        ));
    }
}
