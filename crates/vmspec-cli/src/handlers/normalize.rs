//! Normalize command handler

use crate::cli::NormalizeArgs;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::handlers::{load_spec, normalize_options};
use crate::output::OutputWriter;
use tracing::{info, instrument, warn};
use vmspec_core::{Format, Pipeline, SpecLoader};

/// Handle the normalize command
#[instrument(skip(config, output), fields(file = %args.spec.spec.display()))]
pub fn handle_normalize(
    args: NormalizeArgs,
    config: &Config,
    output: &mut OutputWriter,
) -> Result<()> {
    let spec = load_spec(&args.spec.spec)?;
    let pipeline = Pipeline::new(normalize_options(&args.spec, config));

    let normalized = match pipeline.normalize(spec) {
        Ok(normalized) => normalized,
        Err(errors) => {
            warn!(violations = errors.len(), "Normalization failed");
            output.validation_errors(&errors)?;
            return Err(Error::ValidationFailed { count: errors.len() });
        }
    };
    output.migration_warnings(&normalized.warnings)?;

    match &args.output_file {
        Some(path) => {
            let format = Format::from_path(path)?;
            let encoded = SpecLoader::new().serialize(&normalized.spec, format)?;
            std::fs::write(path, encoded)?;
            info!(path = %path.display(), "Normalized specification written");
            output.success(&format!(
                "✓ Normalized specification written to {}",
                path.display()
            ))
        }
        None => output.data(&normalized.spec),
    }
}
