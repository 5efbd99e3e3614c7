//! `adk` - CLI for aerodesk
//!
//! This binary provides the command-line interface for managing design
//! projects, the shared aircraft catalog, constraint analyses and
//! statistics.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::error::Error;

use clap::Parser;

use aerodesk::catalog::{Aircraft, Catalog, Characteristic};
use aerodesk::cli::{
    AircraftCommand, AnalyzeCommand, CatalogCommand, CharacteristicCommand, Cli, Command,
    ConfigCommand, ProjectCommand, RequirementsCommand, SelectionCommand, SketchCommand,
    StatsCommand, TechCategoryCommand, TechCommand, TechOptionCommand,
};
use aerodesk::constraint::{self, Sweep};
use aerodesk::project::{Project, ProjectManager};
use aerodesk::sketches::SketchStore;
use aerodesk::stats::{self, LastAnalysis, StatsState};
use aerodesk::techpack::{self, AeroDeltas, TechPack};
use aerodesk::{init_logging, requirements, Config};

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    // Load configuration
    let config = Config::load_from(cli.config.clone())?;

    // Execute the command
    match cli.command {
        Command::Project(cmd) => handle_project(&config, cmd),
        Command::Requirements(cmd) => handle_requirements(&config, cmd),
        Command::Catalog(cmd) => handle_catalog(&config, cmd),
        Command::Tech(cmd) => handle_tech(&config, cmd),
        Command::Sketch(cmd) => handle_sketch(&config, cmd),
        Command::Analyze(cmd) => handle_analyze(&config, cmd),
        Command::Stats(cmd) => handle_stats(&config, cmd),
        Command::Config(cmd) => handle_config(&config, cmd),
    }
}

fn manager(config: &Config) -> ProjectManager {
    ProjectManager::new(config.projects_dir())
}

fn open_catalog(config: &Config) -> Result<Catalog, Box<dyn Error>> {
    Ok(Catalog::open(config.catalog_path())?)
}

fn find_aircraft(catalog: &Catalog, name: &str) -> Result<Aircraft, Box<dyn Error>> {
    Ok(catalog
        .find_aircraft_by_name(name)?
        .ok_or_else(|| aerodesk::Error::not_found("aircraft", name))?)
}

fn find_characteristic(catalog: &Catalog, name: &str) -> Result<Characteristic, Box<dyn Error>> {
    Ok(catalog
        .find_characteristic_by_name(name)?
        .ok_or_else(|| aerodesk::Error::not_found("characteristic", name))?)
}

fn handle_project(config: &Config, cmd: ProjectCommand) -> Result<(), Box<dyn Error>> {
    let manager = manager(config);
    match cmd {
        ProjectCommand::Create { name } => {
            let project = manager.create(&name)?;
            println!("Created project '{}' at {}", project.name(), project.root().display());
        }
        ProjectCommand::List { json } => {
            let names = manager.list()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&names)?);
            } else if names.is_empty() {
                println!("No projects.");
            } else {
                for name in names {
                    println!("{name}");
                }
            }
        }
        ProjectCommand::Show { name, json } => {
            let project = manager.open(&name)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&project.manifest)?);
            } else {
                println!("Project:  {}", project.name());
                println!("Root:     {}", project.root().display());
                println!("Created:  {}", project.manifest.created_utc);
                println!(
                    "Modules:  {}",
                    if project.manifest.modules.is_empty() {
                        "(none)".to_string()
                    } else {
                        project.manifest.modules.join(", ")
                    }
                );
            }
        }
        ProjectCommand::Delete { name, yes } => {
            if yes {
                manager.delete(&name)?;
                println!("Deleted project '{name}'.");
            } else {
                println!("This will delete project '{name}' and all of its documents.");
                println!("Use --yes to confirm.");
            }
        }
    }
    Ok(())
}

fn handle_requirements(config: &Config, cmd: RequirementsCommand) -> Result<(), Box<dyn Error>> {
    let manager = manager(config);
    match cmd {
        RequirementsCommand::Show { project, json } => {
            let project = manager.open(&project)?;
            let brief = requirements::load(project.root())?;
            if json {
                println!("{}", serde_json::to_string_pretty(&brief)?);
            } else {
                println!("Mode: {}", brief.mode);
                if !brief.last_modified_utc.is_empty() {
                    println!("Last modified: {}", brief.last_modified_utc);
                }
                println!();
                let fields = match brief.mode {
                    requirements::BriefMode::Classic => {
                        requirements::RequirementsBrief::CLASSIC_FIELDS
                    }
                    requirements::BriefMode::Concept => {
                        requirements::RequirementsBrief::CONCEPT_FIELDS
                    }
                };
                for field in fields {
                    let value = brief.field(field).unwrap_or_default();
                    println!(
                        "{field}: {}",
                        if value.is_empty() { "(empty)" } else { value }
                    );
                }
            }
        }
        RequirementsCommand::Mode { project, mode } => {
            let mut project = manager.open(&project)?;
            let mut brief = requirements::load(project.root())?;
            brief.mode = mode.into();
            requirements::save(project.root(), &mut brief)?;
            project.register_module("requirements")?;
            println!("Brief mode set to {}.", brief.mode);
        }
        RequirementsCommand::Set {
            project,
            field,
            value,
        } => {
            let mut project = manager.open(&project)?;
            let mut brief = requirements::load(project.root())?;
            brief.set_field(&field, &value)?;
            requirements::save(project.root(), &mut brief)?;
            project.register_module("requirements")?;
            println!("Set {field}.");
        }
        RequirementsCommand::Get { project, field } => {
            let project = manager.open(&project)?;
            let brief = requirements::load(project.root())?;
            match brief.field(&field) {
                Some(value) => println!("{value}"),
                None => {
                    return Err(aerodesk::Error::validation(format!(
                        "unknown {} field '{field}'",
                        brief.mode
                    ))
                    .into())
                }
            }
        }
        RequirementsCommand::Fields { project } => {
            let project = manager.open(&project)?;
            let brief = requirements::load(project.root())?;
            let fields = match brief.mode {
                requirements::BriefMode::Classic => {
                    requirements::RequirementsBrief::CLASSIC_FIELDS
                }
                requirements::BriefMode::Concept => {
                    requirements::RequirementsBrief::CONCEPT_FIELDS
                }
            };
            for field in fields {
                println!("{field}");
            }
        }
    }
    Ok(())
}

fn handle_catalog(config: &Config, cmd: CatalogCommand) -> Result<(), Box<dyn Error>> {
    let catalog = open_catalog(config)?;
    match cmd {
        CatalogCommand::Aircraft(cmd) => handle_aircraft(&catalog, cmd)?,
        CatalogCommand::Characteristic(cmd) => handle_characteristic(&catalog, cmd)?,
        CatalogCommand::Set {
            aircraft,
            characteristic,
            value,
        } => {
            let aircraft = find_aircraft(&catalog, &aircraft)?;
            let characteristic = find_characteristic(&catalog, &characteristic)?;
            catalog.set_value(aircraft.id, characteristic.id, &value)?;
            println!("Set {} for {}.", characteristic.name, aircraft.name);
        }
        CatalogCommand::Unset {
            aircraft,
            characteristic,
        } => {
            let aircraft = find_aircraft(&catalog, &aircraft)?;
            let characteristic = find_characteristic(&catalog, &characteristic)?;
            if catalog.remove_value(aircraft.id, characteristic.id)? {
                println!("Removed {} from {}.", characteristic.name, aircraft.name);
            } else {
                println!("No value was set.");
            }
        }
        CatalogCommand::Export { file } => {
            catalog.export_json(&file)?;
            println!("Exported catalog to {}.", file.display());
        }
        CatalogCommand::Import { file } => {
            let applied = catalog.import_json(&file)?;
            println!(
                "Imported {} ({applied} values applied).",
                file.display()
            );
        }
    }
    Ok(())
}

fn handle_aircraft(catalog: &Catalog, cmd: AircraftCommand) -> Result<(), Box<dyn Error>> {
    match cmd {
        AircraftCommand::Add { name, notes } => {
            let id = catalog.create_aircraft(&name, notes.as_deref())?;
            println!("Added aircraft '{name}' (id {id}).");
        }
        AircraftCommand::List { filter, json } => {
            let aircraft = catalog.list_aircraft(filter.as_deref())?;
            if json {
                println!("{}", serde_json::to_string_pretty(&aircraft)?);
            } else if aircraft.is_empty() {
                println!("No aircraft.");
            } else {
                for a in aircraft {
                    match &a.notes {
                        Some(notes) => println!("{:>5}  {}  ({notes})", a.id, a.name),
                        None => println!("{:>5}  {}", a.id, a.name),
                    }
                }
            }
        }
        AircraftCommand::Show { name, json } => {
            let aircraft = find_aircraft(catalog, &name)?;
            let values = catalog.values_for_aircraft(aircraft.id)?;
            if json {
                let doc = serde_json::json!({ "aircraft": aircraft, "values": values });
                println!("{}", serde_json::to_string_pretty(&doc)?);
            } else {
                println!("{} (id {})", aircraft.name, aircraft.id);
                if let Some(notes) = &aircraft.notes {
                    println!("Notes: {notes}");
                }
                for value in values {
                    let unit = value.unit.as_deref().unwrap_or("");
                    println!(
                        "  {}: {} {unit}",
                        value.name,
                        value.value.as_deref().unwrap_or("(unset)")
                    );
                }
            }
        }
        AircraftCommand::Rename { name, new_name } => {
            let aircraft = find_aircraft(catalog, &name)?;
            catalog.rename_aircraft(aircraft.id, &new_name)?;
            println!("Renamed '{name}' to '{new_name}'.");
        }
        AircraftCommand::Notes { name, notes } => {
            let aircraft = find_aircraft(catalog, &name)?;
            catalog.update_aircraft_notes(aircraft.id, notes.as_deref())?;
            println!("Updated notes for '{name}'.");
        }
        AircraftCommand::Delete { name } => {
            let aircraft = find_aircraft(catalog, &name)?;
            catalog.delete_aircraft(aircraft.id)?;
            println!("Deleted aircraft '{name}'.");
        }
    }
    Ok(())
}

fn handle_characteristic(
    catalog: &Catalog,
    cmd: CharacteristicCommand,
) -> Result<(), Box<dyn Error>> {
    match cmd {
        CharacteristicCommand::Add { name, unit } => {
            let id = catalog.create_characteristic(&name, unit.as_deref())?;
            println!("Added characteristic '{name}' (id {id}).");
        }
        CharacteristicCommand::List { filter, json } => {
            let characteristics = catalog.list_characteristics(filter.as_deref())?;
            if json {
                println!("{}", serde_json::to_string_pretty(&characteristics)?);
            } else if characteristics.is_empty() {
                println!("No characteristics.");
            } else {
                for c in characteristics {
                    match &c.unit {
                        Some(unit) => println!("{:>5}  {}  [{unit}]", c.id, c.name),
                        None => println!("{:>5}  {}", c.id, c.name),
                    }
                }
            }
        }
        CharacteristicCommand::Rename { name, new_name } => {
            let characteristic = find_characteristic(catalog, &name)?;
            catalog.rename_characteristic(characteristic.id, &new_name)?;
            println!("Renamed '{name}' to '{new_name}'.");
        }
        CharacteristicCommand::Unit { name, unit } => {
            let characteristic = find_characteristic(catalog, &name)?;
            catalog.update_characteristic_unit(characteristic.id, unit.as_deref())?;
            println!("Updated unit for '{name}'.");
        }
        CharacteristicCommand::Delete { name } => {
            let characteristic = find_characteristic(catalog, &name)?;
            catalog.delete_characteristic(characteristic.id)?;
            println!("Deleted characteristic '{name}'.");
        }
    }
    Ok(())
}

fn load_pack(project: &Project) -> Result<TechPack, Box<dyn Error>> {
    Ok(techpack::load(project.root())?)
}

fn save_pack(project: &mut Project, pack: &TechPack) -> Result<(), Box<dyn Error>> {
    techpack::save(project.root(), pack)?;
    project.register_module("technologies")?;
    Ok(())
}

fn category_id(pack: &TechPack, name: &str) -> Result<String, Box<dyn Error>> {
    Ok(pack
        .find_category_by_name(name)
        .map(|c| c.id.clone())
        .ok_or_else(|| aerodesk::Error::not_found("category", name))?)
}

fn option_id(pack: &TechPack, cat_id: &str, label: &str) -> Result<String, Box<dyn Error>> {
    let category = pack
        .category(cat_id)
        .ok_or_else(|| aerodesk::Error::not_found("category", cat_id))?;
    Ok(category
        .options
        .iter()
        .find(|o| o.label.eq_ignore_ascii_case(label))
        .map(|o| o.id.clone())
        .ok_or_else(|| aerodesk::Error::not_found("option", label))?)
}

fn handle_tech(config: &Config, cmd: TechCommand) -> Result<(), Box<dyn Error>> {
    let manager = manager(config);
    match cmd {
        TechCommand::Show { project, json } => {
            let project = manager.open(&project)?;
            let pack = load_pack(&project)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&pack)?);
            } else {
                for category in &pack.categories {
                    println!("{}", category.name);
                    for option in &category.options {
                        let marker = if category.selected_option_ids.contains(&option.id) {
                            "*"
                        } else {
                            " "
                        };
                        println!("  [{marker}] {}", option.label);
                    }
                    if !category.justification.is_empty() {
                        println!("  Justification: {}", category.justification);
                    }
                }
            }
        }
        TechCommand::Category(cmd) => match cmd {
            TechCategoryCommand::Add { project, name } => {
                let mut project = manager.open(&project)?;
                let mut pack = load_pack(&project)?;
                pack.add_category(&name)?;
                save_pack(&mut project, &pack)?;
                println!("Added category '{name}'.");
            }
            TechCategoryCommand::Rename {
                project,
                name,
                new_name,
            } => {
                let mut project = manager.open(&project)?;
                let mut pack = load_pack(&project)?;
                let id = category_id(&pack, &name)?;
                pack.rename_category(&id, &new_name)?;
                save_pack(&mut project, &pack)?;
                println!("Renamed category '{name}' to '{new_name}'.");
            }
            TechCategoryCommand::Remove { project, name } => {
                let mut project = manager.open(&project)?;
                let mut pack = load_pack(&project)?;
                let id = category_id(&pack, &name)?;
                pack.remove_category(&id)?;
                save_pack(&mut project, &pack)?;
                println!("Removed category '{name}'.");
            }
        },
        TechCommand::Option(cmd) => match cmd {
            TechOptionCommand::Add {
                project,
                category,
                label,
                d_cl_takeoff,
                d_cl_landing,
                d_cd0,
                d_oswald,
            } => {
                let mut project = manager.open(&project)?;
                let mut pack = load_pack(&project)?;
                let cat_id = category_id(&pack, &category)?;
                let deltas = AeroDeltas {
                    cl_max_takeoff: d_cl_takeoff,
                    cl_max_landing: d_cl_landing,
                    cd0: d_cd0,
                    oswald_e: d_oswald,
                };
                pack.add_option(&cat_id, &label, deltas)?;
                save_pack(&mut project, &pack)?;
                println!("Added option '{label}' to '{category}'.");
            }
            TechOptionCommand::Rename {
                project,
                category,
                label,
                new_label,
            } => {
                let mut project = manager.open(&project)?;
                let mut pack = load_pack(&project)?;
                let cat_id = category_id(&pack, &category)?;
                let opt_id = option_id(&pack, &cat_id, &label)?;
                pack.rename_option(&cat_id, &opt_id, &new_label)?;
                save_pack(&mut project, &pack)?;
                println!("Renamed option '{label}' to '{new_label}'.");
            }
            TechOptionCommand::Remove {
                project,
                category,
                label,
            } => {
                let mut project = manager.open(&project)?;
                let mut pack = load_pack(&project)?;
                let cat_id = category_id(&pack, &category)?;
                let opt_id = option_id(&pack, &cat_id, &label)?;
                pack.remove_option(&cat_id, &opt_id)?;
                save_pack(&mut project, &pack)?;
                println!("Removed option '{label}'.");
            }
        },
        TechCommand::Select {
            project,
            category,
            options,
        } => {
            let mut project = manager.open(&project)?;
            let mut pack = load_pack(&project)?;
            let cat_id = category_id(&pack, &category)?;
            let ids = options
                .iter()
                .map(|label| option_id(&pack, &cat_id, label))
                .collect::<Result<Vec<_>, _>>()?;
            let count = ids.len();
            pack.set_selected_options(&cat_id, ids)?;
            save_pack(&mut project, &pack)?;
            println!("Selected {count} option(s) in '{category}'.");
        }
        TechCommand::Justify {
            project,
            category,
            text,
        } => {
            let mut project = manager.open(&project)?;
            let mut pack = load_pack(&project)?;
            let cat_id = category_id(&pack, &category)?;
            pack.set_justification(&cat_id, &text)?;
            save_pack(&mut project, &pack)?;
            println!("Updated justification for '{category}'.");
        }
        TechCommand::Deltas { project, json } => {
            let project = manager.open(&project)?;
            let pack = load_pack(&project)?;
            let deltas = pack.deltas();
            if json {
                println!("{}", serde_json::to_string_pretty(&deltas)?);
            } else {
                println!("CLmax takeoff: {:+}", deltas.cl_max_takeoff);
                println!("CLmax landing: {:+}", deltas.cl_max_landing);
                println!("Cd0:           {:+}", deltas.cd0);
                println!("Oswald e:      {:+}", deltas.oswald_e);
            }
        }
    }
    Ok(())
}

fn handle_sketch(config: &Config, cmd: SketchCommand) -> Result<(), Box<dyn Error>> {
    let manager = manager(config);
    match cmd {
        SketchCommand::Add {
            project,
            file,
            caption,
        } => {
            let mut project = manager.open(&project)?;
            let store = SketchStore::new(project.root());
            let sketch = store.add(&file, &caption)?;
            project.register_module("sketches")?;
            println!("Added sketch '{}' (id {}).", sketch.file_name, sketch.id);
        }
        SketchCommand::List { project, json } => {
            let project = manager.open(&project)?;
            let index = SketchStore::new(project.root()).load()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&index)?);
            } else if index.sketches.is_empty() {
                println!("No sketches.");
            } else {
                for sketch in &index.sketches {
                    println!("{}  {}", sketch.id, sketch.file_name);
                    if !sketch.caption.is_empty() {
                        println!("    {}", sketch.caption);
                    }
                }
            }
        }
        SketchCommand::Caption {
            project,
            id,
            caption,
        } => {
            let project = manager.open(&project)?;
            SketchStore::new(project.root()).set_caption(&id, &caption)?;
            println!("Updated caption.");
        }
        SketchCommand::Remove { project, id } => {
            let project = manager.open(&project)?;
            SketchStore::new(project.root()).remove(&id)?;
            println!("Removed sketch.");
        }
    }
    Ok(())
}

/// Parse a CLI value as JSON scalar: number, boolean, null, or string.
fn parse_scalar(raw: &str) -> serde_json::Value {
    if let Ok(number) = raw.parse::<f64>() {
        return serde_json::json!(number);
    }
    match raw {
        "true" => serde_json::Value::Bool(true),
        "false" => serde_json::Value::Bool(false),
        "null" => serde_json::Value::Null,
        _ => serde_json::Value::String(raw.to_string()),
    }
}

fn handle_analyze(config: &Config, cmd: AnalyzeCommand) -> Result<(), Box<dyn Error>> {
    let manager = manager(config);
    match cmd {
        AnalyzeCommand::Run {
            project,
            apply_tech,
            json,
        } => {
            let mut project = manager.open(&project)?;
            let mut state = constraint::state::load(project.root())?;
            // First run on a fresh project picks up the configured sweep.
            if state.timestamps.created.is_empty() {
                state.sweep = Sweep {
                    ws_min: config.analysis.ws_min,
                    ws_max: config.analysis.ws_max,
                    ws_step: config.analysis.ws_step,
                };
            }
            let deltas = if apply_tech {
                techpack::load(project.root())?.deltas()
            } else {
                AeroDeltas::default()
            };
            state.results = constraint::compute(&state.inputs, &state.sweep, deltas)?;
            constraint::state::save(project.root(), &mut state)?;
            project.register_module("constraint_analysis")?;

            let rec = &state.results.recommendation;
            if json {
                println!("{}", serde_json::to_string_pretty(&state.results)?);
            } else if rec.feasible {
                println!("Envelope points:   {}", state.results.envelope.len());
                println!("Landing W/S cap:   {:.1} N/m²", state.results.ws_max_landing);
                println!("Recommended W/S:   {:.1} N/m²", rec.ws);
                println!("Recommended T/W:   {:.3}", rec.tw);
            } else {
                println!("No feasible design point: the landing wing-loading cap");
                println!(
                    "({:.1} N/m²) falls below the sweep start.",
                    state.results.ws_max_landing
                );
            }
        }
        AnalyzeCommand::Show { project, json } => {
            let project = manager.open(&project)?;
            let state = constraint::state::load(project.root())?;
            if json {
                println!("{}", serde_json::to_string_pretty(&state)?);
            } else {
                println!(
                    "Sweep: {} to {} N/m² step {}",
                    state.sweep.ws_min, state.sweep.ws_max, state.sweep.ws_step
                );
                if state.timestamps.updated.is_empty() {
                    println!("No analysis has been run.");
                } else {
                    let rec = &state.results.recommendation;
                    println!("Updated: {}", state.timestamps.updated);
                    println!("Landing W/S cap: {:.1} N/m²", state.results.ws_max_landing);
                    if rec.feasible {
                        println!("Recommended W/S: {:.1} N/m², T/W: {:.3}", rec.ws, rec.tw);
                    } else {
                        println!("No feasible design point.");
                    }
                }
            }
        }
        AnalyzeCommand::Set {
            project,
            key,
            value,
        } => {
            let mut project = manager.open(&project)?;
            let mut state = constraint::state::load(project.root())?;

            let mut doc = serde_json::to_value(state.inputs)?;
            let mut cursor = &mut doc;
            for part in key.split('.') {
                cursor = cursor
                    .get_mut(part)
                    .ok_or_else(|| aerodesk::Error::not_found("input", key.clone()))?;
            }
            *cursor = parse_scalar(&value);
            state.inputs = serde_json::from_value(doc)?;

            constraint::state::save(project.root(), &mut state)?;
            project.register_module("constraint_analysis")?;
            println!("Set {key} = {value}.");
        }
        AnalyzeCommand::Sweep {
            project,
            ws_min,
            ws_max,
            ws_step,
        } => {
            let mut project = manager.open(&project)?;
            let mut state = constraint::state::load(project.root())?;
            let sweep = Sweep {
                ws_min,
                ws_max,
                ws_step,
            };
            sweep.validate()?;
            state.sweep = sweep;
            constraint::state::save(project.root(), &mut state)?;
            project.register_module("constraint_analysis")?;
            println!("Sweep set to {ws_min}..{ws_max} step {ws_step} N/m².");
        }
        AnalyzeCommand::Export { project, dir } => {
            let project = manager.open(&project)?;
            let state = constraint::state::load(project.root())?;
            if state.timestamps.updated.is_empty() {
                return Err(
                    aerodesk::Error::validation("no analysis has been run yet").into(),
                );
            }
            let dir = dir.unwrap_or_else(|| config.export_dir().join(project.name()));
            let paths = constraint::export::export_csv(&state.results, &dir)?;
            for path in paths {
                println!("Wrote {}", path.display());
            }
        }
    }
    Ok(())
}

fn load_stats(project: &Project) -> Result<StatsState, Box<dyn Error>> {
    Ok(stats::load(project.root())?)
}

fn save_stats(project: &mut Project, state: &StatsState) -> Result<(), Box<dyn Error>> {
    stats::save(project.root(), state)?;
    project.register_module("stats")?;
    Ok(())
}

fn selection_id(state: &StatsState, ident: &str) -> Result<String, Box<dyn Error>> {
    Ok(state
        .find(ident)
        .map(|s| s.id.clone())
        .ok_or_else(|| aerodesk::Error::not_found("selection", ident))?)
}

/// Resolve the active selection and assemble the dataset for `features`.
/// An empty feature list means every catalog characteristic.
fn active_dataset(
    config: &Config,
    state: &StatsState,
    features: &[String],
) -> Result<stats::analysis::Dataset, Box<dyn Error>> {
    let selection = state
        .active()
        .ok_or_else(|| aerodesk::Error::validation("no active selection"))?;
    let catalog = open_catalog(config)?;
    let features: Vec<String> = if features.is_empty() {
        catalog
            .list_characteristics(None)?
            .into_iter()
            .map(|c| c.name)
            .collect()
    } else {
        features.to_vec()
    };
    Ok(stats::analysis::assemble(&catalog, selection, &features)?)
}

fn handle_stats(config: &Config, cmd: StatsCommand) -> Result<(), Box<dyn Error>> {
    let manager = manager(config);
    match cmd {
        StatsCommand::Selection(cmd) => handle_selection(config, cmd)?,
        StatsCommand::Describe {
            project,
            features,
            json,
        } => {
            let mut project = manager.open(&project)?;
            let mut state = load_stats(&project)?;
            let dataset = active_dataset(config, &state, &features)?;
            let rows = stats::analysis::describe(&dataset)?;
            state.record_analysis(LastAnalysis {
                analysis_type: "describe".to_string(),
                features: dataset.features.clone(),
                params: serde_json::json!({}),
            });
            save_stats(&mut project, &state)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&rows)?);
            } else {
                println!(
                    "{:<20} {:>5} {:>12} {:>12} {:>12} {:>12} {:>12} {:>12} {:>12}",
                    "feature", "count", "mean", "std", "min", "q1", "median", "q3", "max"
                );
                for row in rows {
                    let fmt = |v: Option<f64>| {
                        v.map_or_else(|| "-".to_string(), |v| format!("{v:.3}"))
                    };
                    println!(
                        "{:<20} {:>5} {:>12} {:>12} {:>12} {:>12} {:>12} {:>12} {:>12}",
                        row.feature,
                        row.count,
                        fmt(row.mean),
                        fmt(row.std),
                        fmt(row.min),
                        fmt(row.q1),
                        fmt(row.median),
                        fmt(row.q3),
                        fmt(row.max),
                    );
                }
            }
        }
        StatsCommand::Hist {
            project,
            feature,
            bins,
            log,
            json,
        } => {
            let mut project = manager.open(&project)?;
            let mut state = load_stats(&project)?;
            let dataset = active_dataset(config, &state, std::slice::from_ref(&feature))?;
            let hist = stats::analysis::histogram(&dataset, &feature, bins, log)?;
            state.record_analysis(LastAnalysis {
                analysis_type: "histogram".to_string(),
                features: vec![feature.clone()],
                params: serde_json::json!({ "bins": bins, "log": log }),
            });
            save_stats(&mut project, &state)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&hist)?);
            } else {
                for (i, count) in hist.counts.iter().enumerate() {
                    println!(
                        "[{:>10.3}, {:>10.3})  {count}",
                        hist.edges[i],
                        hist.edges[i + 1]
                    );
                }
                if hist.dropped > 0 {
                    println!("({} non-positive values dropped for log10)", hist.dropped);
                }
            }
        }
        StatsCommand::Box {
            project,
            feature,
            json,
        } => {
            let mut project = manager.open(&project)?;
            let mut state = load_stats(&project)?;
            let dataset = active_dataset(config, &state, std::slice::from_ref(&feature))?;
            let stats_box = stats::analysis::boxplot(&dataset, &feature)?;
            state.record_analysis(LastAnalysis {
                analysis_type: "boxplot".to_string(),
                features: vec![feature.clone()],
                params: serde_json::json!({}),
            });
            save_stats(&mut project, &state)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&stats_box)?);
            } else {
                println!("min:          {}", stats_box.min);
                println!("whisker low:  {}", stats_box.whisker_low);
                println!("q1:           {}", stats_box.q1);
                println!("median:       {}", stats_box.median);
                println!("q3:           {}", stats_box.q3);
                println!("whisker high: {}", stats_box.whisker_high);
                println!("max:          {}", stats_box.max);
                if !stats_box.outliers.is_empty() {
                    println!("outliers:     {:?}", stats_box.outliers);
                }
            }
        }
        StatsCommand::Scatter {
            project,
            x,
            y,
            log_x,
            log_y,
            json,
        } => {
            let mut project = manager.open(&project)?;
            let mut state = load_stats(&project)?;
            let features = vec![x.clone(), y.clone()];
            let dataset = active_dataset(config, &state, &features)?;
            let points = stats::analysis::scatter(&dataset, &x, &y, log_x, log_y)?;
            state.record_analysis(LastAnalysis {
                analysis_type: "scatter".to_string(),
                features,
                params: serde_json::json!({ "log_x": log_x, "log_y": log_y }),
            });
            save_stats(&mut project, &state)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&points)?);
            } else {
                for point in points {
                    println!("{}: ({}, {})", point.aircraft_name, point.x, point.y);
                }
            }
        }
        StatsCommand::Export { project, features } => {
            let mut project = manager.open(&project)?;
            let state = load_stats(&project)?;
            let dataset = active_dataset(config, &state, &features)?;
            let summary = stats::analysis::describe(&dataset)?;
            let dir = stats::stats_dir(project.root());
            let paths = stats::export::export_csv(&dataset, &summary, &dir)?;
            project.register_module("stats")?;
            for path in paths {
                println!("Wrote {}", path.display());
            }
        }
    }
    Ok(())
}

fn handle_selection(config: &Config, cmd: SelectionCommand) -> Result<(), Box<dyn Error>> {
    let manager = manager(config);
    match cmd {
        SelectionCommand::Add {
            project,
            name,
            aircraft_ids,
        } => {
            let mut project = manager.open(&project)?;
            let mut state = load_stats(&project)?;
            let id = state.add(&name, aircraft_ids);
            save_stats(&mut project, &state)?;
            println!("Created selection '{name}' (id {id}).");
        }
        SelectionCommand::List { project, json } => {
            let project = manager.open(&project)?;
            let state = load_stats(&project)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&state)?);
            } else if state.selections.is_empty() {
                println!("No selections.");
            } else {
                for selection in state.selections.values() {
                    let marker = if state.last_active_selection.as_deref() == Some(&selection.id) {
                        "*"
                    } else {
                        " "
                    };
                    println!(
                        "[{marker}] {}  {}  ({} aircraft)",
                        selection.id,
                        selection.name,
                        selection.aircraft_ids.len()
                    );
                }
            }
        }
        SelectionCommand::Rename {
            project,
            selection,
            new_name,
        } => {
            let mut project = manager.open(&project)?;
            let mut state = load_stats(&project)?;
            let id = selection_id(&state, &selection)?;
            state.rename(&id, &new_name)?;
            save_stats(&mut project, &state)?;
            println!("Renamed selection to '{new_name}'.");
        }
        SelectionCommand::Delete { project, selection } => {
            let mut project = manager.open(&project)?;
            let mut state = load_stats(&project)?;
            let id = selection_id(&state, &selection)?;
            state.delete(&id)?;
            save_stats(&mut project, &state)?;
            println!("Deleted selection.");
        }
        SelectionCommand::Duplicate { project, selection } => {
            let mut project = manager.open(&project)?;
            let mut state = load_stats(&project)?;
            let id = selection_id(&state, &selection)?;
            let copy = state.duplicate(&id)?;
            save_stats(&mut project, &state)?;
            println!("Created copy (id {copy}).");
        }
        SelectionCommand::Activate { project, selection } => {
            let mut project = manager.open(&project)?;
            let mut state = load_stats(&project)?;
            let id = selection_id(&state, &selection)?;
            state.set_active(&id)?;
            save_stats(&mut project, &state)?;
            println!("Activated selection.");
        }
        SelectionCommand::Members {
            project,
            selection,
            aircraft_ids,
        } => {
            let mut project = manager.open(&project)?;
            let mut state = load_stats(&project)?;
            let id = selection_id(&state, &selection)?;
            let count = aircraft_ids.len();
            state.set_aircraft(&id, aircraft_ids)?;
            save_stats(&mut project, &state)?;
            println!("Selection now has {count} aircraft.");
        }
    }
    Ok(())
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> Result<(), Box<dyn Error>> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Storage]");
                println!("  Projects dir:  {}", config.projects_dir().display());
                println!("  Catalog path:  {}", config.catalog_path().display());
                println!("  Export dir:    {}", config.export_dir().display());
                println!();
                println!("[Analysis]");
                println!("  W/S min:       {} N/m²", config.analysis.ws_min);
                println!("  W/S max:       {} N/m²", config.analysis.ws_max);
                println!("  W/S step:      {} N/m²", config.analysis.ws_step);
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}
