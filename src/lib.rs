//! # Orggen - Per-organization configuration generator for Fabric networks
//!
//! This library bootstraps a multi-organization network topology by
//! rendering each organization's configuration artifacts from a shared set
//! of templates.
//!
//! ## Overview
//!
//! Given either a count or an explicit list of organization names, orggen
//! derives a unique name and a collision-free pair of ports for every
//! organization and renders four template families for it:
//!
//! - crypto (identity) config -> `organizations/crypto-config-<name>.yaml`
//! - channel config -> `configtx/<name>/configtx.yaml`
//! - peer compose manifest -> `docker/docker-compose-<name>.yaml`
//! - CouchDB compose manifest -> `docker/docker-compose-couch-<name>.yaml`
//!
//! The two compose manifests are optional for a whole run.
//!
//! ## Architecture
//!
//! - `manifest`: organization list resolution and `OrganizationSpec`
//! - `ports`: peer and CouchDB port derivation
//! - `template`: template loading and rendering (Tera)
//! - `layout`: output path convention
//! - `generator`: the single generation pass
//! - `config`: YAML settings and CLI overrides
//! - `inspector`: admin MSP extraction from a decoded channel config
//! - `registration`: the ledger registration contract
//! - `error`: shared error taxonomy
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use orggen::{Generator, Manifest, OutputLayout, TemplateSet};
//! use std::path::Path;
//!
//! let manifest = Manifest::from_count(3)?;
//! let templates = TemplateSet::load(Path::new("templates"), true)?;
//! let layout = OutputLayout::default();
//!
//! let report = Generator::new(&templates, &layout).run(&manifest)?;
//! println!("wrote {} files", report.files.len());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Error Handling
//!
//! Library functions return [`error::GeneratorError`]; every error is fatal
//! to the run and already-written files are left in place. The binaries
//! report errors through `color_eyre`.

pub mod config;
pub mod error;
pub mod generator;
pub mod inspector;
pub mod layout;
pub mod manifest;
pub mod ports;
pub mod registration;
pub mod template;

pub use error::GeneratorError;
pub use generator::{GenerationReport, Generator};
pub use layout::OutputLayout;
pub use manifest::{Manifest, ManifestSource, OrganizationSpec};
pub use ports::{derive_ports, PortAssignment};
pub use template::{TemplateKind, TemplateSet};
