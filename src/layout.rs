//! Output directory layout.
//!
//! Rendered files land under three sibling roots that the deployment
//! scripts read from:
//!
//! ```text
//! <root>/
//! |-- organizations/crypto-config-<name>.yaml
//! |-- configtx/<name>/configtx.yaml
//! \-- docker/
//!     |-- docker-compose-<name>.yaml
//!     \-- docker-compose-couch-<name>.yaml
//! ```
//!
//! The root defaults to two levels above the working directory.

use crate::error::{GeneratorError, Result};
use crate::template::TemplateKind;
use std::path::{Path, PathBuf};

/// Default output root, relative to the generator's working directory
pub const DEFAULT_OUTPUT_ROOT: &str = "../..";

pub const ORGANIZATIONS_DIR: &str = "organizations";
pub const CONFIGTX_DIR: &str = "configtx";
pub const DOCKER_DIR: &str = "docker";

/// Maps organizations and template kinds to output paths
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLayout {
    root: PathBuf,
}

impl Default for OutputLayout {
    fn default() -> Self {
        Self::new(DEFAULT_OUTPUT_ROOT)
    }
}

impl OutputLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The output roots that must exist before anything is written
    pub fn roots(&self) -> [PathBuf; 3] {
        [
            self.root.join(ORGANIZATIONS_DIR),
            self.root.join(CONFIGTX_DIR),
            self.root.join(DOCKER_DIR),
        ]
    }

    /// Per-organization directory holding the channel config
    pub fn org_dir(&self, name: &str) -> PathBuf {
        self.root.join(CONFIGTX_DIR).join(name)
    }

    /// Output path of `kind` rendered for organization `name`
    pub fn output_path(&self, kind: TemplateKind, name: &str) -> PathBuf {
        match kind {
            TemplateKind::CryptoConfig => self
                .root
                .join(ORGANIZATIONS_DIR)
                .join(format!("crypto-config-{}.yaml", name)),
            TemplateKind::Configtx => self.org_dir(name).join("configtx.yaml"),
            TemplateKind::DockerCompose => self
                .root
                .join(DOCKER_DIR)
                .join(format!("docker-compose-{}.yaml", name)),
            TemplateKind::DockerComposeCouch => self
                .root
                .join(DOCKER_DIR)
                .join(format!("docker-compose-couch-{}.yaml", name)),
        }
    }

    /// Check that the output roots exist; missing roots are reported as not-found I/O errors
    pub fn check_roots(&self) -> Result<()> {
        for dir in self.roots() {
            if !dir.is_dir() {
                return Err(GeneratorError::io(
                    &dir,
                    std::io::Error::new(
                        std::io::ErrorKind::NotFound,
                        "output directory does not exist",
                    ),
                ));
            }
        }
        Ok(())
    }

    /// Create the three output roots (used by `--init-roots` and tests)
    pub fn create_roots(&self) -> Result<()> {
        for dir in self.roots() {
            std::fs::create_dir_all(&dir).map_err(|e| GeneratorError::io(&dir, e))?;
        }
        Ok(())
    }
}
