//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::{Subcommand, ValueEnum};

use crate::requirements::BriefMode;

/// Project management commands.
#[derive(Debug, Subcommand)]
pub enum ProjectCommand {
    /// Create a new project
    Create {
        /// Project name
        name: String,
    },

    /// List all projects
    List {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show a project's manifest
    Show {
        /// Project name
        name: String,

        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Delete a project and everything it contains
    Delete {
        /// Project name
        name: String,

        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

/// Requirements brief commands.
#[derive(Debug, Subcommand)]
pub enum RequirementsCommand {
    /// Show the requirements brief
    Show {
        /// Project name
        project: String,

        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Switch between the classic and concept sheets
    Mode {
        /// Project name
        project: String,

        /// Sheet to author
        #[arg(value_enum)]
        mode: BriefModeArg,
    },

    /// Set a field of the active sheet
    Set {
        /// Project name
        project: String,

        /// Field name
        field: String,

        /// Field value
        value: String,
    },

    /// Get a field of the active sheet
    Get {
        /// Project name
        project: String,

        /// Field name
        field: String,
    },

    /// List the field names of the active sheet
    Fields {
        /// Project name
        project: String,
    },
}

/// Aircraft catalog commands.
#[derive(Debug, Subcommand)]
pub enum CatalogCommand {
    /// Manage aircraft
    #[command(subcommand)]
    Aircraft(AircraftCommand),

    /// Manage characteristics
    #[command(subcommand)]
    Characteristic(CharacteristicCommand),

    /// Set a characteristic value for an aircraft
    Set {
        /// Aircraft name
        aircraft: String,

        /// Characteristic name
        characteristic: String,

        /// Value
        value: String,
    },

    /// Remove a characteristic value from an aircraft
    Unset {
        /// Aircraft name
        aircraft: String,

        /// Characteristic name
        characteristic: String,
    },

    /// Export the catalog to a JSON file
    Export {
        /// Destination file
        file: PathBuf,
    },

    /// Import a JSON dump, merging by name
    Import {
        /// Source file
        file: PathBuf,
    },
}

/// Aircraft subcommands.
#[derive(Debug, Subcommand)]
pub enum AircraftCommand {
    /// Add an aircraft
    Add {
        /// Aircraft name
        name: String,

        /// Free-form notes
        #[arg(short, long)]
        notes: Option<String>,
    },

    /// List aircraft
    List {
        /// Case-insensitive name filter
        #[arg(short, long)]
        filter: Option<String>,

        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show an aircraft and its values
    Show {
        /// Aircraft name
        name: String,

        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Rename an aircraft
    Rename {
        /// Current name
        name: String,

        /// New name
        new_name: String,
    },

    /// Update the notes of an aircraft
    Notes {
        /// Aircraft name
        name: String,

        /// New notes (omit to clear)
        notes: Option<String>,
    },

    /// Delete an aircraft and its values
    Delete {
        /// Aircraft name
        name: String,
    },
}

/// Characteristic subcommands.
#[derive(Debug, Subcommand)]
pub enum CharacteristicCommand {
    /// Add a characteristic
    Add {
        /// Characteristic name
        name: String,

        /// Unit label
        #[arg(short, long)]
        unit: Option<String>,
    },

    /// List characteristics
    List {
        /// Case-insensitive name filter
        #[arg(short, long)]
        filter: Option<String>,

        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Rename a characteristic
    Rename {
        /// Current name
        name: String,

        /// New name
        new_name: String,
    },

    /// Update the unit of a characteristic
    Unit {
        /// Characteristic name
        name: String,

        /// New unit (omit to clear)
        unit: Option<String>,
    },

    /// Delete a characteristic and its values
    Delete {
        /// Characteristic name
        name: String,
    },
}

/// Technology pack commands.
#[derive(Debug, Subcommand)]
pub enum TechCommand {
    /// Show the technology pack
    Show {
        /// Project name
        project: String,

        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Manage categories
    #[command(subcommand)]
    Category(TechCategoryCommand),

    /// Manage options
    #[command(subcommand)]
    Option(TechOptionCommand),

    /// Select options in a category (replaces the selection)
    Select {
        /// Project name
        project: String,

        /// Category name
        category: String,

        /// Option labels to select
        options: Vec<String>,
    },

    /// Set the justification text of a category
    Justify {
        /// Project name
        project: String,

        /// Category name
        category: String,

        /// Justification text
        text: String,
    },

    /// Show the summed aerodynamic deltas of the current selection
    Deltas {
        /// Project name
        project: String,

        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },
}

/// Technology category subcommands.
#[derive(Debug, Subcommand)]
pub enum TechCategoryCommand {
    /// Add a category
    Add {
        /// Project name
        project: String,

        /// Category name
        name: String,
    },

    /// Rename a category
    Rename {
        /// Project name
        project: String,

        /// Current name
        name: String,

        /// New name
        new_name: String,
    },

    /// Remove a category
    Remove {
        /// Project name
        project: String,

        /// Category name
        name: String,
    },
}

/// Technology option subcommands.
#[derive(Debug, Subcommand)]
pub enum TechOptionCommand {
    /// Add an option to a category
    Add {
        /// Project name
        project: String,

        /// Category name
        category: String,

        /// Option label
        label: String,

        /// Delta to takeoff CLmax
        #[arg(long, default_value = "0.0")]
        d_cl_takeoff: f64,

        /// Delta to landing CLmax
        #[arg(long, default_value = "0.0")]
        d_cl_landing: f64,

        /// Delta to Cd0
        #[arg(long, default_value = "0.0")]
        d_cd0: f64,

        /// Delta to Oswald efficiency
        #[arg(long, default_value = "0.0")]
        d_oswald: f64,
    },

    /// Rename an option
    Rename {
        /// Project name
        project: String,

        /// Category name
        category: String,

        /// Current label
        label: String,

        /// New label
        new_label: String,
    },

    /// Remove an option
    Remove {
        /// Project name
        project: String,

        /// Category name
        category: String,

        /// Option label
        label: String,
    },
}

/// Sketch commands.
#[derive(Debug, Subcommand)]
pub enum SketchCommand {
    /// Register an image as a sketch
    Add {
        /// Project name
        project: String,

        /// Path to the image file
        file: PathBuf,

        /// Caption text
        #[arg(short = 'm', long, default_value = "")]
        caption: String,
    },

    /// List registered sketches
    List {
        /// Project name
        project: String,

        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Set the caption of a sketch
    Caption {
        /// Project name
        project: String,

        /// Sketch id
        id: String,

        /// New caption
        caption: String,
    },

    /// Remove a sketch and its stored file
    Remove {
        /// Project name
        project: String,

        /// Sketch id
        id: String,
    },
}

/// Constraint analysis commands.
#[derive(Debug, Subcommand)]
pub enum AnalyzeCommand {
    /// Run the constraint analysis and save the results
    Run {
        /// Project name
        project: String,

        /// Apply the technology pack deltas to the aero inputs
        #[arg(long)]
        apply_tech: bool,

        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the saved inputs, sweep and results
    Show {
        /// Project name
        project: String,

        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Set one analysis input by dotted path
    /// (e.g. requirements.cruise_speed_kts)
    Set {
        /// Project name
        project: String,

        /// Dotted input path
        key: String,

        /// New value
        value: String,
    },

    /// Set the wing-loading sweep
    Sweep {
        /// Project name
        project: String,

        /// Lowest wing loading in N/m²
        ws_min: f64,

        /// Highest wing loading in N/m²
        ws_max: f64,

        /// Step size in N/m²
        ws_step: f64,
    },

    /// Export the saved results as CSV
    Export {
        /// Project name
        project: String,

        /// Destination directory (defaults to the configured export dir)
        #[arg(short, long)]
        dir: Option<PathBuf>,
    },
}

/// Statistics commands.
#[derive(Debug, Subcommand)]
pub enum StatsCommand {
    /// Manage aircraft selections
    #[command(subcommand)]
    Selection(SelectionCommand),

    /// Summary statistics per characteristic
    Describe {
        /// Project name
        project: String,

        /// Characteristic names
        features: Vec<String>,

        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Histogram of one characteristic
    Hist {
        /// Project name
        project: String,

        /// Characteristic name
        feature: String,

        /// Number of bins
        #[arg(short, long, default_value = "10")]
        bins: usize,

        /// Log10-transform the values first
        #[arg(long)]
        log: bool,

        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Boxplot statistics of one characteristic
    Box {
        /// Project name
        project: String,

        /// Characteristic name
        feature: String,

        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Paired points of two characteristics
    Scatter {
        /// Project name
        project: String,

        /// X characteristic
        x: String,

        /// Y characteristic
        y: String,

        /// Log10 the x axis
        #[arg(long)]
        log_x: bool,

        /// Log10 the y axis
        #[arg(long)]
        log_y: bool,

        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Export the dataset and describe table as CSV
    Export {
        /// Project name
        project: String,

        /// Characteristic names
        features: Vec<String>,
    },
}

/// Selection subcommands.
#[derive(Debug, Subcommand)]
pub enum SelectionCommand {
    /// Create a selection and make it active
    Add {
        /// Project name
        project: String,

        /// Selection name
        name: String,

        /// Catalog ids of the member aircraft
        #[arg(long = "aircraft", value_delimiter = ',')]
        aircraft_ids: Vec<i64>,
    },

    /// List selections
    List {
        /// Project name
        project: String,

        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Rename a selection
    Rename {
        /// Project name
        project: String,

        /// Selection id or name
        selection: String,

        /// New name
        new_name: String,
    },

    /// Delete a selection
    Delete {
        /// Project name
        project: String,

        /// Selection id or name
        selection: String,
    },

    /// Duplicate a selection
    Duplicate {
        /// Project name
        project: String,

        /// Selection id or name
        selection: String,
    },

    /// Mark a selection as active
    Activate {
        /// Project name
        project: String,

        /// Selection id or name
        selection: String,
    },

    /// Replace the member aircraft of a selection
    Members {
        /// Project name
        project: String,

        /// Selection id or name
        selection: String,

        /// Catalog ids of the member aircraft
        #[arg(value_delimiter = ',')]
        aircraft_ids: Vec<i64>,
    },
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// Brief mode argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BriefModeArg {
    /// Classic requirements sheet
    Classic,
    /// New-concept exploration sheet
    Concept,
}

impl From<BriefModeArg> for BriefMode {
    fn from(arg: BriefModeArg) -> Self {
        match arg {
            BriefModeArg::Classic => Self::Classic,
            BriefModeArg::Concept => Self::Concept,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_brief_mode_arg_conversion() {
        assert_eq!(BriefMode::from(BriefModeArg::Classic), BriefMode::Classic);
        assert_eq!(BriefMode::from(BriefModeArg::Concept), BriefMode::Concept);
    }

    #[test]
    fn test_project_command_debug() {
        let cmd = ProjectCommand::Create {
            name: "demo".to_string(),
        };
        let debug_str = format!("{cmd:?}");
        assert!(debug_str.contains("Create"));
        assert!(debug_str.contains("demo"));
    }

    #[test]
    fn test_catalog_command_debug() {
        let cmd = CatalogCommand::Set {
            aircraft: "Falcon".to_string(),
            characteristic: "mtow".to_string(),
            value: "8000".to_string(),
        };
        let debug_str = format!("{cmd:?}");
        assert!(debug_str.contains("Falcon"));
        assert!(debug_str.contains("mtow"));
    }

    #[test]
    fn test_stats_command_debug() {
        let cmd = StatsCommand::Hist {
            project: "demo".to_string(),
            feature: "mtow".to_string(),
            bins: 10,
            log: false,
            json: false,
        };
        let debug_str = format!("{cmd:?}");
        assert!(debug_str.contains("Hist"));
        assert!(debug_str.contains("bins"));
    }
}
