use crate::error::{GeneratorError, Result};
use crate::layout::DEFAULT_OUTPUT_ROOT;
use crate::manifest::{ManifestSource, DEFAULT_MANIFEST_FILE, GENERATED_DOMAIN};
use log::info;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::{Path, PathBuf};

/// Generator settings, optionally loaded from a YAML file and then
/// overridden from the command line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorSettings {
    /// Directory holding the four template sources
    pub template_dir: PathBuf,
    /// Parent of the `organizations/`, `configtx/` and `docker/` roots
    pub output_root: PathBuf,
    /// Explicit organization manifest
    pub manifest_path: PathBuf,
    /// Read `manifest_path` instead of generating `count` organizations
    pub use_manifest: bool,
    /// Number of generated organizations when no manifest is used
    pub count: i64,
    /// Domain suffix given to generated organizations
    pub default_domain: String,
    /// Render the two docker-compose variants
    pub render_compose: bool,
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self {
            template_dir: PathBuf::from("."),
            output_root: PathBuf::from(DEFAULT_OUTPUT_ROOT),
            manifest_path: PathBuf::from(DEFAULT_MANIFEST_FILE),
            use_manifest: false,
            count: 1,
            default_domain: GENERATED_DOMAIN.to_string(),
            render_compose: true,
        }
    }
}

impl GeneratorSettings {
    /// Where this run's organizations come from
    pub fn manifest_source(&self) -> ManifestSource {
        if self.use_manifest {
            ManifestSource::File(self.manifest_path.clone())
        } else {
            ManifestSource::Count {
                count: self.count,
                domain: self.default_domain.clone(),
            }
        }
    }
}

/// Load and parse generator settings from a YAML file
pub fn load_settings(path: &Path) -> Result<GeneratorSettings> {
    info!("Loading generator settings from: {:?}", path);

    let file = File::open(path).map_err(|e| {
        GeneratorError::Config(format!("cannot open settings {}: {}", path.display(), e))
    })?;

    let settings: GeneratorSettings = serde_yaml::from_reader(file).map_err(|e| {
        GeneratorError::Config(format!("malformed settings {}: {}", path.display(), e))
    })?;

    Ok(settings)
}

/// CLI arguments that take precedence over YAML settings
#[derive(Debug, Clone, Default)]
pub struct SettingsOverrides {
    pub count: Option<i64>,
    pub use_manifest: bool,
    pub manifest_path: Option<PathBuf>,
    pub disable_compose: bool,
    pub template_dir: Option<PathBuf>,
    pub output_root: Option<PathBuf>,
}

/// Apply CLI overrides to loaded settings.
///
/// An explicit count without `use_manifest` switches back to count mode.
pub fn apply_overrides(settings: &mut GeneratorSettings, overrides: &SettingsOverrides) {
    if let Some(count) = overrides.count {
        settings.count = count;
        if !overrides.use_manifest {
            settings.use_manifest = false;
        }
    }
    if overrides.use_manifest {
        settings.use_manifest = true;
    }
    if let Some(path) = &overrides.manifest_path {
        settings.manifest_path = path.clone();
    }
    if overrides.disable_compose {
        settings.render_compose = false;
    }
    if let Some(dir) = &overrides.template_dir {
        settings.template_dir = dir.clone();
    }
    if let Some(root) = &overrides.output_root {
        settings.output_root = root.clone();
    }
}
