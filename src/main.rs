use clap::Parser;
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use env_logger::Env;
use log::info;
use std::path::PathBuf;

use orggen::config::{self, GeneratorSettings, SettingsOverrides};
use orggen::{Generator, Manifest, OutputLayout, TemplateSet};

/// Generate per-organization crypto, channel and compose configuration
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Number of organizations to generate (org1..orgN)
    #[arg(long, allow_negative_numbers = true)]
    count: Option<i64>,

    /// Read organization names from the manifest file instead of using --count
    #[arg(long)]
    file: bool,

    /// Path to the organization manifest ({"orgs": [...]})
    #[arg(long)]
    manifest: Option<PathBuf>,

    /// Skip the docker-compose manifests
    #[arg(long)]
    no_compose: bool,

    /// Directory containing the template files. Templates use Tera syntax
    /// (`{{ Organization }}`); Go-style `{{.Organization}}` templates must be
    /// converted first
    #[arg(long)]
    templates: Option<PathBuf>,

    /// Parent directory of organizations/, configtx/ and docker/
    #[arg(long)]
    output_root: Option<PathBuf>,

    /// Create the output roots if they are missing
    #[arg(long)]
    init_roots: bool,

    /// Optional YAML settings file; flags override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

impl Args {
    fn overrides(&self) -> SettingsOverrides {
        SettingsOverrides {
            count: self.count,
            use_manifest: self.file,
            manifest_path: self.manifest.clone(),
            disable_compose: self.no_compose,
            template_dir: self.templates.clone(),
            output_root: self.output_root.clone(),
        }
    }
}

fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    let args = Args::parse();

    env_logger::Builder::from_env(Env::default().default_filter_or(args.log_level.as_str())).init();

    let mut settings = match &args.config {
        Some(path) => config::load_settings(path)?,
        None => GeneratorSettings::default(),
    };
    config::apply_overrides(&mut settings, &args.overrides());

    info!("Template directory: {:?}", settings.template_dir);
    info!("Output root: {:?}", settings.output_root);

    // Everything that can fail without touching the output tree happens first
    let manifest = Manifest::resolve(&settings.manifest_source())
        .wrap_err("Failed to resolve organization manifest")?;
    let templates = TemplateSet::load(&settings.template_dir, settings.render_compose)
        .wrap_err("Failed to load templates")?;

    let layout = OutputLayout::new(&settings.output_root);
    if args.init_roots {
        layout.create_roots()?;
    }

    let report = Generator::new(&templates, &layout)
        .run(&manifest)
        .wrap_err_with(|| {
            format!("Generation aborted under '{}'", settings.output_root.display())
        })?;

    info!(
        "Generated configuration for {} organizations: {}",
        report.organizations.len(),
        report.organizations.join(", ")
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use orggen::ManifestSource;

    #[test]
    fn test_cli_defaults() {
        let args = Args::parse_from(["orggen"]);
        let mut settings = GeneratorSettings::default();
        config::apply_overrides(&mut settings, &args.overrides());

        assert_eq!(settings.manifest_source(), ManifestSource::count(1));
        assert!(settings.render_compose);
        assert_eq!(settings.output_root, PathBuf::from("../.."));
    }

    #[test]
    fn test_cli_file_mode() {
        let args = Args::parse_from(["orggen", "--count", "5", "--file", "--no-compose"]);
        let mut settings = GeneratorSettings::default();
        config::apply_overrides(&mut settings, &args.overrides());

        assert_eq!(
            settings.manifest_source(),
            ManifestSource::File(PathBuf::from("orgs.json"))
        );
        assert!(!settings.render_compose);
    }

    #[test]
    fn test_cli_negative_count_reaches_validation() {
        let args = Args::parse_from(["orggen", "--count", "-2"]);
        assert_eq!(args.count, Some(-2));
    }

    #[test]
    fn test_templates_help_names_tera_syntax() {
        let command = Args::command();
        let templates = command
            .get_arguments()
            .find(|arg| arg.get_id() == "templates")
            .unwrap();
        let help = templates.get_help().unwrap().to_string();
        assert!(help.contains("Tera"));
        assert!(help.contains("{{.Organization}}"));
    }

    #[test]
    fn test_cli_count_overrides_manifest_settings() {
        let args = Args::parse_from(["orggen", "--count", "3"]);
        let mut settings = GeneratorSettings {
            use_manifest: true,
            ..Default::default()
        };
        config::apply_overrides(&mut settings, &args.overrides());

        assert_eq!(settings.manifest_source(), ManifestSource::count(3));
    }
}
