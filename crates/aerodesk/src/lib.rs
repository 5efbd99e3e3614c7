//! `aerodesk` - An aircraft preliminary-design workbench
//!
//! This library manages design projects (requirements briefs, technology
//! packs, concept sketches, constraint analyses, statistics) and a shared
//! catalog of reference aircraft.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod atmosphere;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod constraint;
pub mod error;
pub mod logging;
pub mod paths;
pub mod project;
pub mod requirements;
pub mod sketches;
pub mod stats;
pub mod techpack;

pub use catalog::Catalog;
pub use config::Config;
pub use error::{Error, Result};
pub use logging::init_logging;
pub use project::{Project, ProjectManager};
