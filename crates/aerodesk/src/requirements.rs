//! Requirements brief ("cahier des charges") for a project.
//!
//! The brief has two alternative shapes: a classic requirements sheet and a
//! free-form concept sheet. Both are always stored; `mode` records which one
//! the author is working in.

use std::path::Path;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::paths::{read_json_or_default, write_json_atomic};

/// File name of the brief inside a project directory.
const FILE_NAME: &str = "requirements.json";

/// Which sheet of the brief is being authored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BriefMode {
    /// Classic requirements sheet.
    #[default]
    Classic,
    /// New-concept exploration sheet.
    Concept,
}

impl std::fmt::Display for BriefMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Classic => write!(f, "classic"),
            Self::Concept => write!(f, "concept"),
        }
    }
}

/// Classic requirements sheet.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassicSection {
    /// Mission definition.
    pub mission: String,
    /// Performance targets.
    pub performance: String,
    /// Handling qualities.
    pub handling: String,
    /// Manufacturing constraints.
    pub manufacturing: String,
    /// Certifiability considerations.
    pub certifiability: String,
    /// Upgrade path expectations.
    pub upgradability: String,
    /// Maintainability requirements.
    pub maintainability: String,
    /// Accessibility requirements.
    pub accessibility: String,
    /// Aesthetic direction.
    pub aesthetics: String,
    /// Client or launch customer.
    pub client: String,
}

/// New-concept exploration sheet.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ConceptSection {
    /// Sources of inspiration.
    pub inspiration: String,
    /// Intended audience or market.
    pub target_audience: String,
    /// Innovations pursued.
    pub innovations: String,
    /// Known constraints.
    pub constraints: String,
    /// Key features of the concept.
    pub key_features: String,
    /// Free-form notes.
    pub notes: String,
}

/// The full requirements brief document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RequirementsBrief {
    /// Document format version.
    pub version: String,
    /// Last save timestamp (RFC 3339, UTC). Empty until first save.
    pub last_modified_utc: String,
    /// Active sheet.
    pub mode: BriefMode,
    /// Classic sheet contents.
    pub classic: ClassicSection,
    /// Concept sheet contents.
    pub concept: ConceptSection,
}

impl Default for RequirementsBrief {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            last_modified_utc: String::new(),
            mode: BriefMode::default(),
            classic: ClassicSection::default(),
            concept: ConceptSection::default(),
        }
    }
}

impl RequirementsBrief {
    /// Field names of the classic sheet, in display order.
    pub const CLASSIC_FIELDS: &'static [&'static str] = &[
        "mission",
        "performance",
        "handling",
        "manufacturing",
        "certifiability",
        "upgradability",
        "maintainability",
        "accessibility",
        "aesthetics",
        "client",
    ];

    /// Field names of the concept sheet, in display order.
    pub const CONCEPT_FIELDS: &'static [&'static str] = &[
        "inspiration",
        "target_audience",
        "innovations",
        "constraints",
        "key_features",
        "notes",
    ];

    /// Strip surrounding whitespace from every text field.
    pub fn trim(&mut self) {
        for field in Self::CLASSIC_FIELDS {
            if let Some(slot) = self.classic.field_mut(field) {
                *slot = slot.trim().to_string();
            }
        }
        for field in Self::CONCEPT_FIELDS {
            if let Some(slot) = self.concept.field_mut(field) {
                *slot = slot.trim().to_string();
            }
        }
    }

    /// Get a field of the active sheet by name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&str> {
        match self.mode {
            BriefMode::Classic => self.classic.field(name),
            BriefMode::Concept => self.concept.field(name),
        }
    }

    /// Set a field of the active sheet by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the field name is unknown for the active sheet.
    pub fn set_field(&mut self, name: &str, value: &str) -> Result<()> {
        let slot = match self.mode {
            BriefMode::Classic => self.classic.field_mut(name),
            BriefMode::Concept => self.concept.field_mut(name),
        };
        match slot {
            Some(slot) => {
                *slot = value.trim().to_string();
                Ok(())
            }
            None => Err(Error::validation(format!(
                "unknown {} field '{name}'",
                self.mode
            ))),
        }
    }
}

impl ClassicSection {
    fn field(&self, name: &str) -> Option<&str> {
        self.slot(name).map(String::as_str)
    }

    fn slot(&self, name: &str) -> Option<&String> {
        match name {
            "mission" => Some(&self.mission),
            "performance" => Some(&self.performance),
            "handling" => Some(&self.handling),
            "manufacturing" => Some(&self.manufacturing),
            "certifiability" => Some(&self.certifiability),
            "upgradability" => Some(&self.upgradability),
            "maintainability" => Some(&self.maintainability),
            "accessibility" => Some(&self.accessibility),
            "aesthetics" => Some(&self.aesthetics),
            "client" => Some(&self.client),
            _ => None,
        }
    }

    fn field_mut(&mut self, name: &str) -> Option<&mut String> {
        match name {
            "mission" => Some(&mut self.mission),
            "performance" => Some(&mut self.performance),
            "handling" => Some(&mut self.handling),
            "manufacturing" => Some(&mut self.manufacturing),
            "certifiability" => Some(&mut self.certifiability),
            "upgradability" => Some(&mut self.upgradability),
            "maintainability" => Some(&mut self.maintainability),
            "accessibility" => Some(&mut self.accessibility),
            "aesthetics" => Some(&mut self.aesthetics),
            "client" => Some(&mut self.client),
            _ => None,
        }
    }
}

impl ConceptSection {
    fn field(&self, name: &str) -> Option<&str> {
        match name {
            "inspiration" => Some(&self.inspiration),
            "target_audience" => Some(&self.target_audience),
            "innovations" => Some(&self.innovations),
            "constraints" => Some(&self.constraints),
            "key_features" => Some(&self.key_features),
            "notes" => Some(&self.notes),
            _ => None,
        }
    }

    fn field_mut(&mut self, name: &str) -> Option<&mut String> {
        match name {
            "inspiration" => Some(&mut self.inspiration),
            "target_audience" => Some(&mut self.target_audience),
            "innovations" => Some(&mut self.innovations),
            "constraints" => Some(&mut self.constraints),
            "key_features" => Some(&mut self.key_features),
            "notes" => Some(&mut self.notes),
            _ => None,
        }
    }
}

/// Load the brief for a project, falling back to defaults when absent.
///
/// Unknown keys in the stored document are dropped and missing keys are
/// defaulted, so older or hand-edited files load cleanly.
///
/// # Errors
///
/// Returns an error if an existing file cannot be read or parsed.
pub fn load(project_root: &Path) -> Result<RequirementsBrief> {
    let brief = read_json_or_default(&project_root.join(FILE_NAME))?;
    debug!("Loaded requirements brief from {}", project_root.display());
    Ok(brief)
}

/// Save the brief for a project atomically, trimming whitespace and
/// stamping `last_modified_utc`.
///
/// # Errors
///
/// Returns an error if the document cannot be written.
pub fn save(project_root: &Path, brief: &mut RequirementsBrief) -> Result<()> {
    brief.trim();
    brief.last_modified_utc = Utc::now().to_rfc3339();
    write_json_atomic(&project_root.join(FILE_NAME), brief)
}
