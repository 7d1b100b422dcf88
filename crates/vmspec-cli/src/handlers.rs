//! Command handlers for CLI subcommands
//!
//! This module contains the implementation logic for each CLI subcommand.

mod normalize;
mod validate;

pub use normalize::handle_normalize;
pub use validate::handle_validate;

use crate::cli::SpecArgs;
use crate::config::Config;
use crate::error::{Error, Result};
use std::path::Path;
use tracing::debug;
use vmspec_core::{Arch, Format, InstanceSpec, NormalizeOptions, SpecLoader};

/// Read a spec file. Files without a recognised extension are sniffed.
pub(crate) fn load_spec(path: &Path) -> Result<InstanceSpec> {
    if !path.exists() {
        return Err(Error::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let loader = SpecLoader::new();
    if Format::from_path(path).is_ok() {
        return Ok(loader.load(path)?);
    }

    let content = std::fs::read_to_string(path)?;
    let (spec, format) = loader.parse_with_fallback(&content, path)?;
    debug!(path = %path.display(), ?format, "Detected spec format from content");
    Ok(spec)
}

/// Pipeline options from the config file and command-line overrides
pub(crate) fn normalize_options(args: &SpecArgs, config: &Config) -> NormalizeOptions {
    NormalizeOptions {
        host_arch: args.arch.or_else(Arch::host),
        defaults: config.defaults.clone(),
        mode: args.validation_mode(config.validation.mode),
    }
}


#[cfg(test)]
mod tests {
    use super::testing::*;
    use super::*;
    use vmspec_core::ValidationMode;

    #[test]
    fn test_missing_file() {
        let err = load_spec(Path::new("/nonexistent/lima.yaml")).unwrap_err();
        assert!(matches!(err, Error::FileNotFound { .. }));
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn test_sniffs_unknown_extension() {
        let file = spec_file(".spec", "{\"images\": [{\"location\": \"x.img\"}]}");
        let spec = load_spec(file.path()).unwrap();
        assert_eq!(spec.images[0].location, "x.img");
    }

    #[test]
    fn test_parse_error_is_a_loader_error() {
        let file = spec_file(".yaml", "images: [unterminated\n");
        let err = load_spec(file.path()).unwrap_err();
        assert!(matches!(err, Error::Loader(_)));
    }

    #[test]
    fn test_options_merge_config_and_args() {
        let mut config = Config::default();
        config.defaults.cpus = 2;
        config.validation.mode = ValidationMode::Strict;

        let args = SpecArgs {
            spec: "lima.yaml".into(),
            strict: false,
            arch: Some(Arch::Aarch64),
        };
        let options = normalize_options(&args, &config);
        assert_eq!(options.host_arch, Some(Arch::Aarch64));
        assert_eq!(options.defaults.cpus, 2);
        assert_eq!(options.mode, ValidationMode::Strict);
    }
}
