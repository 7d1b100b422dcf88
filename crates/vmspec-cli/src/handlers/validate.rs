//! Validate command handler

use crate::cli::{OutputFormat, SpecArgs};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::handlers::{load_spec, normalize_options};
use crate::output::OutputWriter;
use serde::Serialize;
use tracing::{info, instrument, warn};
use vmspec_core::{MigrationWarning, Pipeline, ValidationError};

/// Machine-readable result of `vmspec validate`
#[derive(Debug, Serialize)]
struct ValidationReport<'a> {
    valid: bool,
    warnings: &'a [MigrationWarning],
    errors: &'a [ValidationError],
}

/// Handle the validate command
#[instrument(skip(config, output), fields(file = %args.spec.display(), strict = args.strict))]
pub fn handle_validate(args: SpecArgs, config: &Config, output: &mut OutputWriter) -> Result<()> {
    output.info(&format!("Validating specification: {}", args.spec.display()))?;

    let spec = load_spec(&args.spec)?;
    let pipeline = Pipeline::new(normalize_options(&args, config));

    match pipeline.normalize(spec) {
        Ok(normalized) => {
            info!(warnings = normalized.warnings.len(), "Validation completed successfully");
            if output.format() == OutputFormat::Human {
                output.migration_warnings(&normalized.warnings)?;
                output.success("✓ Specification is valid")
            } else {
                output.data(&ValidationReport {
                    valid: true,
                    warnings: &normalized.warnings,
                    errors: &[],
                })
            }
        }
        Err(errors) => {
            warn!(violations = errors.len(), "Validation failed");
            if output.format() == OutputFormat::Human {
                output.validation_errors(&errors)?;
            } else {
                output.data(&ValidationReport {
                    valid: false,
                    warnings: &[],
                    errors: &errors.errors,
                })?;
            }
            Err(Error::ValidationFailed { count: errors.len() })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::testing::{spec_args, spec_file, writer};

    const LEGACY: &str = r#"
images:
  - location: x.img
network:
  vde:
    - vnl: vde:///tmp/sw
      name: eth1
"#;

    const INVALID: &str = r#"
images:
  - location: x.img
cpus: 0
networks:
  - lima: shared
    vnl: vde:///tmp/sw
"#;

    #[test]
    fn test_valid_spec_human() {
        let file = spec_file(".yaml", LEGACY);
        let (mut output, out, err) = writer(OutputFormat::Human);
        handle_validate(spec_args(file.path()), &Config::default(), &mut output).unwrap();

        assert!(out.contents().is_empty());
        let text = err.contents();
        assert!(text.contains("Specification is valid"));
        assert!(text.contains("$.network.vde[0].name"));
    }

    #[test]
    fn test_valid_spec_json_report() {
        let file = spec_file(".yaml", LEGACY);
        let (mut output, out, _) = writer(OutputFormat::Json);
        handle_validate(spec_args(file.path()), &Config::default(), &mut output).unwrap();

        let report: serde_json::Value = serde_json::from_str(&out.contents()).unwrap();
        assert_eq!(report["valid"], true);
        assert_eq!(report["warnings"].as_array().unwrap().len(), 2);
        assert!(report["errors"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_invalid_spec_reports_every_violation() {
        let file = spec_file(".yaml", INVALID);
        let (mut output, out, _) = writer(OutputFormat::Json);
        let err = handle_validate(spec_args(file.path()), &Config::default(), &mut output)
            .unwrap_err();

        assert!(matches!(err, Error::ValidationFailed { count: 2 }));
        let report: serde_json::Value = serde_json::from_str(&out.contents()).unwrap();
        assert_eq!(report["valid"], false);
        let paths: Vec<_> = report["errors"]
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e["path"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(paths, vec!["$.cpus", "$.networks[0]"]);
    }

    #[test]
    fn test_strict_flag_requires_ssh_port() {
        let file = spec_file(".yaml", "images:\n  - location: x.img\n");
        let mut args = spec_args(file.path());
        args.strict = true;
        let (mut output, _, err) = writer(OutputFormat::Human);
        let result = handle_validate(args, &Config::default(), &mut output);

        assert!(matches!(result, Err(Error::ValidationFailed { count: 1 })));
        assert!(err.contents().contains("$.ssh.localPort"));
    }
}
