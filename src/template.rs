//! Template loading and rendering.
//!
//! The four template families are read and parsed once per run into a
//! [`TemplateSet`], then rendered for every organization. Templates use Tera
//! syntax and see the organization through the keys `Organization`,
//! `Domain`, `Port`, `Couch` and `Index`, e.g.
//!
//! ```yaml
//! PeerOrgs:
//!   - Name: {{ Organization }}
//!     Domain: {{ Organization }}{{ Domain }}.com
//! ```

use crate::error::{GeneratorError, Result};
use crate::manifest::OrganizationSpec;
use log::{debug, info};
use std::path::Path;
use tera::{Context, Tera};

/// The template families rendered for each organization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemplateKind {
    /// Identity / cryptogen configuration
    CryptoConfig,
    /// Channel configuration
    Configtx,
    /// Peer compose manifest
    DockerCompose,
    /// CouchDB compose manifest
    DockerComposeCouch,
}

impl TemplateKind {
    pub const ALL: [TemplateKind; 4] = [
        TemplateKind::CryptoConfig,
        TemplateKind::Configtx,
        TemplateKind::DockerCompose,
        TemplateKind::DockerComposeCouch,
    ];

    /// File name of the template source inside the template directory
    pub fn source_file(self) -> &'static str {
        match self {
            TemplateKind::CryptoConfig => "crypto-config.yaml",
            TemplateKind::Configtx => "configtx.yaml",
            TemplateKind::DockerCompose => "docker-compose.yaml",
            TemplateKind::DockerComposeCouch => "docker-compose-couch.yaml",
        }
    }

    /// Container manifests are optional and switched on or off for a whole run
    pub fn is_container_manifest(self) -> bool {
        matches!(
            self,
            TemplateKind::DockerCompose | TemplateKind::DockerComposeCouch
        )
    }

    /// Template kinds rendered for a run
    pub fn enabled(include_compose: bool) -> impl Iterator<Item = TemplateKind> {
        Self::ALL
            .into_iter()
            .filter(move |kind| include_compose || !kind.is_container_manifest())
    }
}

/// Parsed templates, shared read-only across every organization of a run
#[derive(Debug)]
pub struct TemplateSet {
    tera: Tera,
    kinds: Vec<TemplateKind>,
}

impl TemplateSet {
    /// Load every template required for the run from `dir`.
    ///
    /// Fails on the first template that is missing or does not parse.
    pub fn load(dir: &Path, include_compose: bool) -> Result<Self> {
        let mut tera = Tera::default();
        tera.autoescape_on(vec![]);

        let mut kinds = Vec::new();
        for kind in TemplateKind::enabled(include_compose) {
            let path = dir.join(kind.source_file());
            let source = std::fs::read_to_string(&path).map_err(|e| GeneratorError::TemplateLoad {
                template: kind.source_file().to_string(),
                reason: format!("cannot read {}: {}", path.display(), e),
            })?;
            Self::add(&mut tera, kind, &source)?;
            debug!("Loaded template {:?}", path);
            kinds.push(kind);
        }

        info!("Loaded {} templates from {:?}", kinds.len(), dir);
        Ok(Self { tera, kinds })
    }

    /// Build a set from in-memory template sources
    pub fn from_sources<'a, I>(sources: I) -> Result<Self>
    where
        I: IntoIterator<Item = (TemplateKind, &'a str)>,
    {
        let mut tera = Tera::default();
        tera.autoescape_on(vec![]);

        let mut kinds = Vec::new();
        for (kind, source) in sources {
            Self::add(&mut tera, kind, source)?;
            kinds.push(kind);
        }
        Ok(Self { tera, kinds })
    }

    fn add(tera: &mut Tera, kind: TemplateKind, source: &str) -> Result<()> {
        tera.add_raw_template(kind.source_file(), source)
            .map_err(|e| GeneratorError::TemplateLoad {
                template: kind.source_file().to_string(),
                reason: error_chain(&e),
            })
    }

    /// Template kinds this set can render, in render order
    pub fn kinds(&self) -> &[TemplateKind] {
        &self.kinds
    }

    pub fn contains(&self, kind: TemplateKind) -> bool {
        self.kinds.contains(&kind)
    }

    /// Render one template for one organization
    pub fn render(&self, kind: TemplateKind, org: &OrganizationSpec) -> Result<String> {
        if !self.contains(kind) {
            return Err(GeneratorError::TemplateLoad {
                template: kind.source_file().to_string(),
                reason: "template was not loaded for this run".to_string(),
            });
        }
        let context = Context::from_serialize(org.template_params()).map_err(|e| {
            GeneratorError::TemplateLoad {
                template: kind.source_file().to_string(),
                reason: error_chain(&e),
            }
        })?;
        self.tera
            .render(kind.source_file(), &context)
            .map_err(|e| GeneratorError::TemplateLoad {
                template: kind.source_file().to_string(),
                reason: format!("rendering {} failed: {}", org.name(), error_chain(&e)),
            })
    }
}

/// Tera keeps the useful detail in the error source chain
fn error_chain(err: &tera::Error) -> String {
    let mut message = err.to_string();
    let mut source = std::error::Error::source(err);
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
