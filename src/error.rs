//! Error taxonomy shared by the generator, the inspector and the
//! registration contract.
//!
//! Every variant is fatal to the run that produced it.

use std::path::{Path, PathBuf};

/// Errors that can occur while resolving, rendering or writing organizations
#[derive(Debug, thiserror::Error)]
pub enum GeneratorError {
    /// Malformed or missing input (manifest file, settings file, channel config)
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Input parsed but violates a constraint (count, names)
    #[error("Validation failed: {0}")]
    Validation(String),

    /// A required template is missing or does not parse
    #[error("Failed to load template '{template}': {reason}")]
    TemplateLoad { template: String, reason: String },

    /// Directory or file creation/write failure
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl GeneratorError {
    /// Wrap an I/O error together with the path it happened on
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        GeneratorError::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// True for directory-already-exists failures
    pub fn is_already_exists(&self) -> bool {
        matches!(
            self,
            GeneratorError::Io { source, .. }
                if source.kind() == std::io::ErrorKind::AlreadyExists
        )
    }
}

pub type Result<T> = std::result::Result<T, GeneratorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_display_includes_path() {
        let err = GeneratorError::io(
            "configtx/org1",
            std::io::Error::new(std::io::ErrorKind::AlreadyExists, "exists"),
        );
        let msg = err.to_string();
        assert!(msg.contains("configtx/org1"));
        assert!(err.is_already_exists());
    }

    #[test]
    fn test_template_error_names_template() {
        let err = GeneratorError::TemplateLoad {
            template: "configtx.yaml".to_string(),
            reason: "not found".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Failed to load template 'configtx.yaml': not found"
        );
        assert!(!err.is_already_exists());
    }
}
