//! Per-project technology pack.
//!
//! Categories of technology options (materials, processes, propulsion,
//! avionics by default), with per-category selections and justification
//! text. Each option can carry aerodynamic deltas; the sum over selected
//! options feeds the constraint analysis.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::paths::{read_json, write_json_atomic};

/// File name of the tech pack inside a project directory.
const FILE_NAME: &str = "technologies.json";

/// Current document version.
pub const CURRENT_VERSION: u32 = 1;

/// Aerodynamic effect of adopting one technology option.
///
/// All fields are additive deltas to the baseline aero inputs of the
/// constraint analysis.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AeroDeltas {
    /// Delta to takeoff `CLmax`.
    pub cl_max_takeoff: f64,
    /// Delta to landing `CLmax`.
    pub cl_max_landing: f64,
    /// Delta to zero-lift drag coefficient `Cd0`.
    pub cd0: f64,
    /// Delta to Oswald span efficiency `e`.
    pub oswald_e: f64,
}

impl AeroDeltas {
    /// Sum two delta bundles.
    #[must_use]
    pub fn add(self, other: Self) -> Self {
        Self {
            cl_max_takeoff: self.cl_max_takeoff + other.cl_max_takeoff,
            cl_max_landing: self.cl_max_landing + other.cl_max_landing,
            cd0: self.cd0 + other.cd0,
            oswald_e: self.oswald_e + other.oswald_e,
        }
    }

    /// Whether all deltas are zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.cl_max_takeoff == 0.0
            && self.cl_max_landing == 0.0
            && self.cd0 == 0.0
            && self.oswald_e == 0.0
    }
}

/// One technology option within a category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TechOption {
    /// Stable id.
    pub id: String,
    /// Display label, unique case-insensitively within the category.
    pub label: String,
    /// Aerodynamic deltas applied when this option is selected.
    #[serde(default)]
    pub deltas: AeroDeltas,
}

/// A category of technology options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TechCategory {
    /// Stable id.
    pub id: String,
    /// Display name, unique case-insensitively.
    pub name: String,
    /// Available options.
    #[serde(default)]
    pub options: Vec<TechOption>,
    /// Ids of the selected options.
    #[serde(default)]
    pub selected_option_ids: Vec<String>,
    /// Free-form rationale for the selection.
    #[serde(default)]
    pub justification: String,
}

impl TechCategory {
    fn new(name: impl Into<String>, options: &[&str]) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            options: options
                .iter()
                .map(|label| TechOption {
                    id: Uuid::new_v4().to_string(),
                    label: (*label).to_string(),
                    deltas: AeroDeltas::default(),
                })
                .collect(),
            selected_option_ids: Vec::new(),
            justification: String::new(),
        }
    }

    fn find_option(&self, opt_id: &str) -> Option<&TechOption> {
        self.options.iter().find(|o| o.id == opt_id)
    }

    fn find_option_by_label(&self, label: &str) -> Option<&TechOption> {
        self.options
            .iter()
            .find(|o| o.label.eq_ignore_ascii_case(label))
    }
}

/// The technology pack document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TechPack {
    /// Document format version.
    pub version: u32,
    /// All categories.
    #[serde(default)]
    pub categories: Vec<TechCategory>,
}

impl Default for TechPack {
    /// Seeds the default categories and their standard options.
    fn default() -> Self {
        Self {
            version: CURRENT_VERSION,
            categories: vec![
                TechCategory::new(
                    "Materials",
                    &[
                        "Aluminium",
                        "Composites (CFRP/GFRP)",
                        "Titanium",
                        "Steel",
                        "Metal/composite hybrids",
                        "Engineered wood",
                    ],
                ),
                TechCategory::new(
                    "Processes",
                    &[
                        "Machining",
                        "Forming",
                        "Riveted assembly",
                        "Structural bonding",
                        "Welding",
                        "Metal 3D printing",
                        "Polymer 3D printing",
                        "Prepreg layup",
                        "RTM/infusion",
                    ],
                ),
                TechCategory::new(
                    "Propulsion/Energy",
                    &[
                        "Turbojets",
                        "Turboprops",
                        "Pistons",
                        "Battery electric",
                        "Hybrid-electric",
                        "Hydrogen (fuel cell/combustion)",
                    ],
                ),
                TechCategory::new(
                    "Avionics",
                    &[
                        "FBW (fly-by-wire)",
                        "EFIS",
                        "FMS",
                        "Autopilot cat. A/B",
                        "Datalink",
                        "Health monitoring",
                    ],
                ),
            ],
        }
    }
}

impl TechPack {
    // === Category operations ===

    /// Add a category. Returns its id.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is empty or already taken
    /// (case-insensitive).
    pub fn add_category(&mut self, name: &str) -> Result<String> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::validation("category name cannot be empty"));
        }
        if self.find_category_by_name(name).is_some() {
            return Err(Error::duplicate("category", name));
        }
        let category = TechCategory::new(name, &[]);
        let id = category.id.clone();
        self.categories.push(category);
        Ok(id)
    }

    /// Rename a category.
    ///
    /// # Errors
    ///
    /// Returns an error if the category is unknown, the new name is empty,
    /// or it collides with another category.
    pub fn rename_category(&mut self, cat_id: &str, new_name: &str) -> Result<()> {
        let new_name = new_name.trim();
        if new_name.is_empty() {
            return Err(Error::validation("category name cannot be empty"));
        }
        if let Some(existing) = self.find_category_by_name(new_name) {
            if existing.id != cat_id {
                return Err(Error::duplicate("category", new_name));
            }
        }
        let category = self.category_mut(cat_id)?;
        category.name = new_name.to_string();
        Ok(())
    }

    /// Remove a category.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the category id is unknown.
    pub fn remove_category(&mut self, cat_id: &str) -> Result<()> {
        let before = self.categories.len();
        self.categories.retain(|c| c.id != cat_id);
        if self.categories.len() == before {
            return Err(Error::not_found("category", cat_id));
        }
        Ok(())
    }

    // === Option operations ===

    /// Add an option to a category. Returns the option id.
    ///
    /// # Errors
    ///
    /// Returns an error if the category is unknown, the label is empty, or
    /// it collides with another option in the category.
    pub fn add_option(&mut self, cat_id: &str, label: &str, deltas: AeroDeltas) -> Result<String> {
        let label = label.trim();
        if label.is_empty() {
            return Err(Error::validation("option label cannot be empty"));
        }
        let category = self.category_mut(cat_id)?;
        if category.find_option_by_label(label).is_some() {
            return Err(Error::duplicate("option", label));
        }
        let option = TechOption {
            id: Uuid::new_v4().to_string(),
            label: label.to_string(),
            deltas,
        };
        let id = option.id.clone();
        category.options.push(option);
        Ok(id)
    }

    /// Rename an option.
    ///
    /// # Errors
    ///
    /// Returns an error if the category or option is unknown, the new label
    /// is empty, or it collides with another option in the category.
    pub fn rename_option(&mut self, cat_id: &str, opt_id: &str, new_label: &str) -> Result<()> {
        let new_label = new_label.trim();
        if new_label.is_empty() {
            return Err(Error::validation("option label cannot be empty"));
        }
        let category = self.category_mut(cat_id)?;
        if let Some(existing) = category.find_option_by_label(new_label) {
            if existing.id != opt_id {
                return Err(Error::duplicate("option", new_label));
            }
        }
        let option = category
            .options
            .iter_mut()
            .find(|o| o.id == opt_id)
            .ok_or_else(|| Error::not_found("option", opt_id))?;
        option.label = new_label.to_string();
        Ok(())
    }

    /// Set the aerodynamic deltas of an option.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the category or option id is unknown.
    pub fn set_option_deltas(
        &mut self,
        cat_id: &str,
        opt_id: &str,
        deltas: AeroDeltas,
    ) -> Result<()> {
        let category = self.category_mut(cat_id)?;
        let option = category
            .options
            .iter_mut()
            .find(|o| o.id == opt_id)
            .ok_or_else(|| Error::not_found("option", opt_id))?;
        option.deltas = deltas;
        Ok(())
    }

    /// Remove an option, deselecting it if selected.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the category or option id is unknown.
    pub fn remove_option(&mut self, cat_id: &str, opt_id: &str) -> Result<()> {
        let category = self.category_mut(cat_id)?;
        let before = category.options.len();
        category.options.retain(|o| o.id != opt_id);
        if category.options.len() == before {
            return Err(Error::not_found("option", opt_id));
        }
        category.selected_option_ids.retain(|id| id != opt_id);
        Ok(())
    }

    // === Selection & justification ===

    /// Replace the selected option ids of a category.
    ///
    /// # Errors
    ///
    /// Returns an error if the category is unknown or any id does not name
    /// an option of that category.
    pub fn set_selected_options(&mut self, cat_id: &str, option_ids: Vec<String>) -> Result<()> {
        let category = self.category_mut(cat_id)?;
        for id in &option_ids {
            if category.find_option(id).is_none() {
                return Err(Error::not_found("option", id.clone()));
            }
        }
        category.selected_option_ids = option_ids;
        Ok(())
    }

    /// Set the justification text of a category.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the category id is unknown.
    pub fn set_justification(&mut self, cat_id: &str, text: &str) -> Result<()> {
        let category = self.category_mut(cat_id)?;
        category.justification = text.to_string();
        Ok(())
    }

    // === Queries ===

    /// Find a category by id.
    #[must_use]
    pub fn category(&self, cat_id: &str) -> Option<&TechCategory> {
        self.categories.iter().find(|c| c.id == cat_id)
    }

    /// Find a category by name, case-insensitively.
    #[must_use]
    pub fn find_category_by_name(&self, name: &str) -> Option<&TechCategory> {
        self.categories
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name))
    }

    /// Sum the aerodynamic deltas of every selected option.
    #[must_use]
    pub fn deltas(&self) -> AeroDeltas {
        let mut total = AeroDeltas::default();
        for category in &self.categories {
            for opt_id in &category.selected_option_ids {
                if let Some(option) = category.find_option(opt_id) {
                    total = total.add(option.deltas);
                }
            }
        }
        total
    }

    fn category_mut(&mut self, cat_id: &str) -> Result<&mut TechCategory> {
        self.categories
            .iter_mut()
            .find(|c| c.id == cat_id)
            .ok_or_else(|| Error::not_found("category", cat_id))
    }
}

/// Upgrade an older document to the current version.
///
/// Version 1 is the base format, so this is currently the identity.
///
/// # Errors
///
/// Returns an error if the stored version is newer than this build
/// understands.
pub fn migrate_if_needed(pack: &mut TechPack) -> Result<()> {
    if pack.version > CURRENT_VERSION {
        return Err(Error::validation(format!(
            "technology pack version {} is newer than supported version {CURRENT_VERSION}",
            pack.version
        )));
    }
    if pack.version < CURRENT_VERSION {
        warn!(
            "Upgrading technology pack from version {} to {}",
            pack.version, CURRENT_VERSION
        );
        pack.version = CURRENT_VERSION;
    }
    Ok(())
}

/// Load the tech pack for a project, seeding defaults when absent.
///
/// # Errors
///
/// Returns an error if an existing file cannot be read or parsed, or the
/// stored version is unsupported.
pub fn load(project_root: &Path) -> Result<TechPack> {
    let path = project_root.join(FILE_NAME);
    let mut pack = if path.is_file() {
        read_json(&path)?
    } else {
        debug!("No technology pack found, seeding defaults");
        TechPack::default()
    };
    migrate_if_needed(&mut pack)?;
    Ok(pack)
}

/// Save the tech pack for a project atomically.
///
/// # Errors
///
/// Returns an error if the document cannot be written.
pub fn save(project_root: &Path, pack: &TechPack) -> Result<()> {
    write_json_atomic(&project_root.join(FILE_NAME), pack)?;
    info!("Saved technology pack for {}", project_root.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_pack_seeded() {
        let pack = TechPack::default();
        assert_eq!(pack.version, CURRENT_VERSION);
        let names: Vec<_> = pack.categories.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["Materials", "Processes", "Propulsion/Energy", "Avionics"]
        );
        assert!(pack
            .find_category_by_name("materials")
            .unwrap()
            .options
            .iter()
            .any(|o| o.label == "Aluminium"));
    }

    #[test]
    fn test_add_category() {
        let mut pack = TechPack::default();
        let id = pack.add_category("Landing gear").unwrap();
        assert_eq!(pack.category(&id).unwrap().name, "Landing gear");
    }

    #[test]
    fn test_add_category_duplicate_case_insensitive() {
        let mut pack = TechPack::default();
        let err = pack.add_category("MATERIALS").unwrap_err();
        assert!(err.is_duplicate());
    }

    #[test]
    fn test_add_category_empty_name() {
        let mut pack = TechPack::default();
        assert!(pack.add_category("  ").is_err());
    }

    #[test]
    fn test_rename_category() {
        let mut pack = TechPack::default();
        let id = pack.categories[0].id.clone();
        pack.rename_category(&id, "Structures").unwrap();
        assert_eq!(pack.category(&id).unwrap().name, "Structures");
        // Renaming to its own name (different case) is allowed.
        pack.rename_category(&id, "structures").unwrap();
    }

    #[test]
    fn test_rename_category_collision() {
        let mut pack = TechPack::default();
        let id = pack.categories[0].id.clone();
        assert!(pack.rename_category(&id, "Avionics").unwrap_err().is_duplicate());
    }

    #[test]
    fn test_remove_category() {
        let mut pack = TechPack::default();
        let id = pack.categories[0].id.clone();
        pack.remove_category(&id).unwrap();
        assert!(pack.category(&id).is_none());
        assert!(pack.remove_category(&id).unwrap_err().is_not_found());
    }

    #[test]
    fn test_option_crud() {
        let mut pack = TechPack::default();
        let cat = pack.add_category("Flaps").unwrap();
        let opt = pack
            .add_option(&cat, "Fowler flaps", AeroDeltas::default())
            .unwrap();

        assert!(pack
            .add_option(&cat, "FOWLER FLAPS", AeroDeltas::default())
            .unwrap_err()
            .is_duplicate());

        pack.rename_option(&cat, &opt, "Double-slotted Fowler").unwrap();
        assert_eq!(
            pack.category(&cat).unwrap().options[0].label,
            "Double-slotted Fowler"
        );

        pack.remove_option(&cat, &opt).unwrap();
        assert!(pack.category(&cat).unwrap().options.is_empty());
    }

    #[test]
    fn test_remove_option_deselects() {
        let mut pack = TechPack::default();
        let cat = pack.add_category("Flaps").unwrap();
        let opt = pack
            .add_option(&cat, "Fowler flaps", AeroDeltas::default())
            .unwrap();
        pack.set_selected_options(&cat, vec![opt.clone()]).unwrap();

        pack.remove_option(&cat, &opt).unwrap();
        assert!(pack.category(&cat).unwrap().selected_option_ids.is_empty());
    }

    #[test]
    fn test_set_selected_options_validates_ids() {
        let mut pack = TechPack::default();
        let cat = pack.add_category("Flaps").unwrap();
        let err = pack
            .set_selected_options(&cat, vec!["bogus".to_string()])
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_justification() {
        let mut pack = TechPack::default();
        let cat = pack.categories[0].id.clone();
        pack.set_justification(&cat, "weight-driven choice").unwrap();
        assert_eq!(pack.category(&cat).unwrap().justification, "weight-driven choice");
    }

    #[test]
    fn test_deltas_sum_over_selections() {
        let mut pack = TechPack::default();
        let cat = pack.add_category("High-lift").unwrap();
        let flaps = pack
            .add_option(
                &cat,
                "Fowler flaps",
                AeroDeltas {
                    cl_max_takeoff: 0.3,
                    cl_max_landing: 0.5,
                    cd0: 0.001,
                    oswald_e: 0.0,
                },
            )
            .unwrap();
        let slats = pack
            .add_option(
                &cat,
                "Leading-edge slats",
                AeroDeltas {
                    cl_max_takeoff: 0.2,
                    cl_max_landing: 0.2,
                    cd0: 0.0005,
                    oswald_e: -0.01,
                },
            )
            .unwrap();

        // Nothing selected yet.
        assert!(pack.deltas().is_zero());

        pack.set_selected_options(&cat, vec![flaps, slats]).unwrap();
        let total = pack.deltas();
        assert!((total.cl_max_takeoff - 0.5).abs() < 1e-12);
        assert!((total.cl_max_landing - 0.7).abs() < 1e-12);
        assert!((total.cd0 - 0.0015).abs() < 1e-12);
        assert!((total.oswald_e - (-0.01)).abs() < 1e-12);
    }

    #[test]
    fn test_load_missing_seeds_defaults() {
        let dir = TempDir::new().unwrap();
        let pack = load(dir.path()).unwrap();
        assert_eq!(pack.categories.len(), 4);
    }

    #[test]
    fn test_save_and_reload() {
        let dir = TempDir::new().unwrap();
        let mut pack = TechPack::default();
        let cat = pack.add_category("High-lift").unwrap();
        pack.set_justification(&cat, "STOL requirement").unwrap();
        save(dir.path(), &pack).unwrap();

        let back = load(dir.path()).unwrap();
        assert_eq!(back, pack);
    }

    #[test]
    fn test_migrate_rejects_newer_version() {
        let mut pack = TechPack {
            version: CURRENT_VERSION + 1,
            categories: Vec::new(),
        };
        assert!(migrate_if_needed(&mut pack).is_err());
    }

    #[test]
    fn test_migrate_upgrades_older_version() {
        let mut pack = TechPack {
            version: 0,
            categories: Vec::new(),
        };
        migrate_if_needed(&mut pack).unwrap();
        assert_eq!(pack.version, CURRENT_VERSION);
    }
}
