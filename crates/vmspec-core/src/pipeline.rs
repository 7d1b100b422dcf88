//! Normalization pipeline: migrate, fill defaults, validate
//!
//! Copyright (c) 2026 vmspec developers
//! Licensed under the Apache-2.0 license

use crate::defaults::{fill_defaults, Defaults};
use crate::migrate::{migrate_legacy_networks, MigrationWarning};
use crate::model::{Arch, InstanceSpec};
use crate::validation::{validate_spec, ValidationErrors, ValidationMode};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, debug_span, info};

/// Pipeline stages, run in declaration order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Migrate,
    Default,
    Validate,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Migrate => write!(f, "migrate"),
            Stage::Default => write!(f, "default"),
            Stage::Validate => write!(f, "validate"),
        }
    }
}

/// Inputs the pipeline takes from its caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NormalizeOptions {
    /// Used for an unset `arch`. `None` leaves it unset.
    pub host_arch: Option<Arch>,
    pub defaults: Defaults,
    pub mode: ValidationMode,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            host_arch: Arch::host(),
            defaults: Defaults::default(),
            mode: ValidationMode::Standard,
        }
    }
}

impl NormalizeOptions {
    pub fn with_host_arch(mut self, arch: Arch) -> Self {
        self.host_arch = Some(arch);
        self
    }

    pub fn with_mode(mut self, mode: ValidationMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_defaults(mut self, defaults: Defaults) -> Self {
        self.defaults = defaults;
        self
    }
}

/// A fully normalized spec plus anything migration had to drop
#[derive(Debug, Clone, PartialEq)]
pub struct Normalized {
    pub spec: InstanceSpec,
    pub warnings: Vec<MigrationWarning>,
}

/// Stateless normalizer; every call is independent of the previous ones
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    options: NormalizeOptions,
}

impl Pipeline {
    pub fn new(options: NormalizeOptions) -> Self {
        Self { options }
    }

    /// Normalize an owned spec. On failure the spec is discarded and only
    /// the violations are returned.
    pub fn normalize(&self, mut spec: InstanceSpec) -> Result<Normalized, ValidationErrors> {
        let warnings = self.normalize_in_place(&mut spec)?;
        Ok(Normalized { spec, warnings })
    }

    /// Normalize `spec` in place. Running this again on the same spec is a
    /// no-op apart from re-validation.
    pub fn normalize_in_place(
        &self,
        spec: &mut InstanceSpec,
    ) -> Result<Vec<MigrationWarning>, ValidationErrors> {
        let span = debug_span!("normalize", mode = ?self.options.mode);
        let _guard = span.enter();

        debug!(stage = %Stage::Migrate, "Running stage");
        let warnings = migrate_legacy_networks(spec);

        debug!(stage = %Stage::Default, "Running stage");
        fill_defaults(spec, self.options.host_arch, &self.options.defaults);

        debug!(stage = %Stage::Validate, "Running stage");
        match validate_spec(spec, self.options.mode) {
            Ok(()) => {
                info!(warnings = warnings.len(), "Specification normalized");
                Ok(warnings)
            }
            Err(errors) => {
                info!(violations = errors.len(), "Specification rejected");
                Err(errors)
            }
        }
    }
}

/// Normalize with default options
pub fn normalize(spec: InstanceSpec) -> Result<Normalized, ValidationErrors> {
    Pipeline::default().normalize(spec)
}
