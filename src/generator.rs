//! The generation pass.
//!
//! Every template is rendered for every organization before anything touches
//! the output tree, so a render failure leaves no output behind. Writing then
//! proceeds strictly in manifest order. For each organization the
//! `configtx/<name>` directory is created first (an existing directory aborts
//! the run, so a second run never overwrites a previous tree) and the rendered
//! files are written to their fixed paths. A write failure stops the run;
//! files written for earlier organizations stay on disk.

use crate::error::{GeneratorError, Result};
use crate::layout::OutputLayout;
use crate::manifest::{Manifest, OrganizationSpec};
use crate::ports::port_range_warning;
use crate::template::{TemplateKind, TemplateSet};
use log::{debug, info, warn};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

/// What a completed run wrote
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct GenerationReport {
    pub organizations: Vec<String>,
    pub directories: Vec<PathBuf>,
    pub files: Vec<PathBuf>,
}

/// Renders a manifest's organizations into an output layout
#[derive(Debug)]
pub struct Generator<'a> {
    templates: &'a TemplateSet,
    layout: &'a OutputLayout,
}

impl<'a> Generator<'a> {
    pub fn new(templates: &'a TemplateSet, layout: &'a OutputLayout) -> Self {
        Self { templates, layout }
    }

    /// Generate every organization in the manifest
    pub fn run(&self, manifest: &Manifest) -> Result<GenerationReport> {
        self.layout.check_roots()?;

        for org in manifest {
            if let Some(warning) = port_range_warning(org.index()) {
                warn!("{}: {}", org.name(), warning);
            }
        }

        let rendered = manifest
            .iter()
            .map(|org| self.render_organization(org).map(|files| (org, files)))
            .collect::<Result<Vec<_>>>()?;

        let mut report = GenerationReport::default();
        for (org, files) in &rendered {
            self.write_organization(org, files, &mut report)?;
        }

        info!(
            "Generated {} organizations ({} files)",
            report.organizations.len(),
            report.files.len()
        );
        Ok(report)
    }

    fn render_organization(&self, org: &OrganizationSpec) -> Result<Vec<(TemplateKind, String)>> {
        self.templates
            .kinds()
            .iter()
            .map(|&kind| Ok((kind, self.templates.render(kind, org)?)))
            .collect()
    }

    fn write_organization(
        &self,
        org: &OrganizationSpec,
        files: &[(TemplateKind, String)],
        report: &mut GenerationReport,
    ) -> Result<()> {
        info!(
            "Generating organization {} (index {}, peer port {}, couch port {})",
            org.name(),
            org.index(),
            org.peer_port(),
            org.couch_port()
        );

        let org_dir = self.layout.org_dir(org.name());
        std::fs::create_dir(&org_dir).map_err(|e| GeneratorError::io(&org_dir, e))?;
        report.directories.push(org_dir);

        for (kind, content) in files {
            let path = self.layout.output_path(*kind, org.name());
            write_file(&path, content)?;
            debug!("Wrote {:?}", path);
            report.files.push(path);
        }

        report.organizations.push(org.name().to_string());
        Ok(())
    }
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    let mut file = File::create(path).map_err(|e| GeneratorError::io(path, e))?;
    file.write_all(content.as_bytes())
        .map_err(|e| GeneratorError::io(path, e))?;
    file.flush().map_err(|e| GeneratorError::io(path, e))
}
