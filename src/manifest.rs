//! Organization manifest resolution.
//!
//! A run is driven either by an explicit list of organization names read
//! from a JSON manifest file (`{"orgs": ["alpha", "beta"]}`) or by a count,
//! in which case organizations are named `org1..orgN`. Either way the result
//! is an ordered, immutable [`Manifest`] of [`OrganizationSpec`]s with
//! 1-based indices, resolved before any output is written.

use crate::error::{GeneratorError, Result};
use crate::ports::{derive_ports, PortAssignment};
use log::{debug, info};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// Domain marker given to generated organizations
pub const GENERATED_DOMAIN: &str = ".example";

/// Default manifest file name, relative to the working directory
pub const DEFAULT_MANIFEST_FILE: &str = "orgs.json";

/// One organization to generate configuration for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrganizationSpec {
    name: String,
    domain: String,
    index: usize,
    ports: PortAssignment,
}

impl OrganizationSpec {
    /// Derive an organization from its name, domain and 1-based index
    pub fn new(name: impl Into<String>, domain: impl Into<String>, index: usize) -> Self {
        Self {
            name: name.into(),
            domain: domain.into(),
            index,
            ports: derive_ports(index),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn peer_port(&self) -> u32 {
        self.ports.peer
    }

    pub fn couch_port(&self) -> u32 {
        self.ports.couch
    }

    /// Parameter record handed to the templates
    pub fn template_params(&self) -> TemplateParams<'_> {
        TemplateParams {
            organization: &self.name,
            domain: &self.domain,
            port: self.ports.peer,
            couch: self.ports.couch,
            index: self.index,
        }
    }
}

/// Values substituted into every template, under the names the templates use
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct TemplateParams<'a> {
    pub organization: &'a str,
    pub domain: &'a str,
    pub port: u32,
    pub couch: u32,
    pub index: usize,
}

/// On-disk manifest file format
#[derive(Debug, Deserialize)]
struct ManifestFile {
    orgs: Vec<String>,
}

/// Where the organization list comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManifestSource {
    /// Explicit names read from a manifest file; any count is ignored
    File(PathBuf),
    /// `org1..orgN`, each with `domain`
    Count { count: i64, domain: String },
}

impl ManifestSource {
    /// Count source using the generated-domain marker
    pub fn count(count: i64) -> Self {
        ManifestSource::Count {
            count,
            domain: GENERATED_DOMAIN.to_string(),
        }
    }
}

/// Ordered list of organizations for a single run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    organizations: Vec<OrganizationSpec>,
}

impl Manifest {
    /// Resolve a manifest from either source
    pub fn resolve(source: &ManifestSource) -> Result<Self> {
        match source {
            ManifestSource::File(path) => Self::load_file(path),
            ManifestSource::Count { count, domain } => Self::from_count_with_domain(*count, domain),
        }
    }

    /// Generate `org1..orgN` with the generated-domain marker
    pub fn from_count(count: i64) -> Result<Self> {
        Self::from_count_with_domain(count, GENERATED_DOMAIN)
    }

    /// Generate `org1..orgN`, each with `domain`
    pub fn from_count_with_domain(count: i64, domain: &str) -> Result<Self> {
        if count <= 0 {
            return Err(GeneratorError::Validation(format!(
                "organization count must be positive, got {}",
                count
            )));
        }
        let count = usize::try_from(count).map_err(|_| {
            GeneratorError::Validation(format!("organization count {} is too large", count))
        })?;

        let organizations = (1..=count)
            .map(|index| OrganizationSpec::new(format!("org{}", index), domain, index))
            .collect();
        info!("Generated manifest with {} organizations", count);
        Ok(Self { organizations })
    }

    /// Take names verbatim, in order, with an empty domain
    pub fn from_names<I, S>(names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        if names.is_empty() {
            return Err(GeneratorError::Config(
                "organization manifest is empty".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for name in &names {
            validate_name(name)?;
            if !seen.insert(name.as_str()) {
                return Err(GeneratorError::Validation(format!(
                    "organization '{}' appears more than once in the manifest",
                    name
                )));
            }
        }

        let organizations = names
            .into_iter()
            .enumerate()
            .map(|(i, name)| OrganizationSpec::new(name, "", i + 1))
            .collect();
        Ok(Self { organizations })
    }

    /// Read an explicit manifest file
    pub fn load_file(path: &Path) -> Result<Self> {
        info!("Loading organization manifest from: {:?}", path);
        let content = std::fs::read_to_string(path).map_err(|e| {
            GeneratorError::Config(format!("cannot read manifest {}: {}", path.display(), e))
        })?;
        Self::parse(&content).map_err(|e| match e {
            GeneratorError::Config(msg) => {
                GeneratorError::Config(format!("{} ({})", msg, path.display()))
            }
            other => other,
        })
    }

    /// Parse manifest JSON text
    pub fn parse(content: &str) -> Result<Self> {
        let file: ManifestFile = serde_json::from_str(content).map_err(|e| {
            GeneratorError::Config(format!("malformed organization manifest: {}", e))
        })?;
        debug!("Manifest lists {} organizations", file.orgs.len());
        Self::from_names(file.orgs)
    }

    pub fn organizations(&self) -> &[OrganizationSpec] {
        &self.organizations
    }

    pub fn len(&self) -> usize {
        self.organizations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.organizations.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, OrganizationSpec> {
        self.organizations.iter()
    }
}

impl<'a> IntoIterator for &'a Manifest {
    type Item = &'a OrganizationSpec;
    type IntoIter = std::slice::Iter<'a, OrganizationSpec>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

fn name_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9_-][A-Za-z0-9._-]*$").expect("organization name pattern is valid")
    })
}

/// Names become file and directory names, so keep them to a single safe path component
fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(GeneratorError::Validation(
            "organization name cannot be empty".to_string(),
        ));
    }
    if !name_pattern().is_match(name) {
        return Err(GeneratorError::Validation(format!(
            "organization name '{}' may only contain letters, digits, '.', '_' and '-' \
             and must not start with '.'",
            name
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn names(manifest: &Manifest) -> Vec<&str> {
        manifest.iter().map(|o| o.name()).collect()
    }

    #[test]
    fn test_count_generates_sequential_names() {
        let manifest = Manifest::from_count(3).unwrap();
        assert_eq!(names(&manifest), vec!["org1", "org2", "org3"]);
        for (i, org) in manifest.iter().enumerate() {
            assert_eq!(org.index(), i + 1);
            assert_eq!(org.domain(), GENERATED_DOMAIN);
        }
    }

    #[test]
    fn test_count_source_carries_domain() {
        let source = ManifestSource::Count {
            count: 2,
            domain: ".org.internal".to_string(),
        };
        let manifest = Manifest::resolve(&source).unwrap();
        assert_eq!(names(&manifest), vec!["org1", "org2"]);
        assert!(manifest.iter().all(|org| org.domain() == ".org.internal"));

        let default = Manifest::resolve(&ManifestSource::count(1)).unwrap();
        assert_eq!(default.organizations()[0].domain(), GENERATED_DOMAIN);
    }

    #[test]
    fn test_count_must_be_positive() {
        assert!(matches!(Manifest::from_count(0), Err(GeneratorError::Validation(_))));
        assert!(matches!(Manifest::from_count(-4), Err(GeneratorError::Validation(_))));
    }

    #[test]
    fn test_explicit_names_keep_order() {
        let manifest = Manifest::parse(r#"{"orgs": ["alpha", "beta"]}"#).unwrap();
        assert_eq!(names(&manifest), vec!["alpha", "beta"]);

        let alpha = &manifest.organizations()[0];
        assert_eq!(alpha.index(), 1);
        assert_eq!(alpha.domain(), "");
        assert_eq!(alpha.peer_port(), 8051);
        assert_eq!(alpha.couch_port(), 4984);

        let beta = &manifest.organizations()[1];
        assert_eq!(beta.index(), 2);
        assert_eq!(beta.peer_port(), 9051);
        assert_eq!(beta.couch_port(), 5984);
    }

    #[test]
    fn test_file_source_ignores_count() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"orgs": ["alpha", "beta"]}}"#).unwrap();

        let source = ManifestSource::File(file.path().to_path_buf());
        let manifest = Manifest::resolve(&source).unwrap();
        assert_eq!(manifest.len(), 2);
        assert_eq!(names(&manifest), vec!["alpha", "beta"]);
    }

    #[test]
    fn test_malformed_manifest_is_config_error() {
        let malformed = [
            "not json",
            r#"{"organizations": ["a"]}"#,
            r#"{"orgs": "alpha"}"#,
            r#"["alpha"]"#,
        ];
        for content in malformed {
            assert!(
                matches!(Manifest::parse(content), Err(GeneratorError::Config(_))),
                "expected config error for {}",
                content
            );
        }
    }

    #[test]
    fn test_empty_manifest_is_config_error() {
        assert!(matches!(
            Manifest::parse(r#"{"orgs": []}"#),
            Err(GeneratorError::Config(_))
        ));
    }

    #[test]
    fn test_missing_manifest_file_is_config_error() {
        let source = ManifestSource::File(PathBuf::from("/nonexistent/orgs.json"));
        let result = Manifest::resolve(&source);
        assert!(matches!(result, Err(GeneratorError::Config(_))));
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let result = Manifest::from_names(["alpha", "beta", "alpha"]);
        assert!(matches!(result, Err(GeneratorError::Validation(_))));
    }

    #[test]
    fn test_unsafe_names_rejected() {
        for bad in ["", "../escape", "a/b", ".hidden", "has space"] {
            assert!(
                matches!(Manifest::from_names([bad]), Err(GeneratorError::Validation(_))),
                "expected '{}' to be rejected",
                bad
            );
        }
        assert!(Manifest::from_names(["Org_1", "org-2.east"]).is_ok());
    }

    #[test]
    fn test_template_params_use_template_keys() {
        let org = OrganizationSpec::new("org1", GENERATED_DOMAIN, 1);
        let value = serde_json::to_value(org.template_params()).unwrap();
        assert_eq!(value["Organization"], "org1");
        assert_eq!(value["Domain"], ".example");
        assert_eq!(value["Port"], 8051);
        assert_eq!(value["Couch"], 4984);
        assert_eq!(value["Index"], 1);
    }
}
