//! Legacy field migration
//!
//! Rewrites the deprecated `network.vde` block into `networks`. Migration
//! never rejects input; anything without a current equivalent is dropped and
//! reported as a [`MigrationWarning`].
//!
//! Copyright (c) 2026 vmspec developers
//! Licensed under the Apache-2.0 license

use crate::model::{InstanceSpec, Network};
use serde::Serialize;
use std::fmt;
use tracing::{debug, warn};

/// Kind of change applied while migrating a legacy field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ChangeType {
    /// Field has no current equivalent and was discarded
    FieldDropped,
    /// Field was moved to its replacement
    Deprecated { replacement: Option<String> },
}

impl fmt::Display for ChangeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChangeType::FieldDropped => write!(f, "Field dropped"),
            ChangeType::Deprecated { replacement } => {
                if let Some(repl) = replacement {
                    write!(f, "Deprecated (use '{}' instead)", repl)
                } else {
                    write!(f, "Deprecated")
                }
            }
        }
    }
}

/// Something the caller should know about a migrated spec
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MigrationWarning {
    pub field_path: String,
    pub change_type: ChangeType,
    pub description: String,
}

impl fmt::Display for MigrationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}: {}", self.field_path, self.change_type, self.description)
    }
}

/// Copy legacy VDE networks into `networks`, at most once per spec.
///
/// Returns the warnings produced by this call; an already-migrated or empty
/// legacy block yields none.
pub fn migrate_legacy_networks(spec: &mut InstanceSpec) -> Vec<MigrationWarning> {
    let mut warnings = Vec::new();

    if spec.network.is_migrated() || spec.network.vde_deprecated.is_empty() {
        return warnings;
    }

    warnings.push(MigrationWarning {
        field_path: "$.network".to_string(),
        change_type: ChangeType::Deprecated {
            replacement: Some("networks".to_string()),
        },
        description: format!(
            "{} legacy VDE network(s) copied to networks",
            spec.network.vde_deprecated.len()
        ),
    });

    for (i, vde) in spec.network.vde_deprecated.iter().enumerate() {
        if let Some(name) = vde.name.as_deref().filter(|n| !n.is_empty()) {
            let warning = MigrationWarning {
                field_path: format!("$.network.vde[{}].name", i),
                change_type: ChangeType::FieldDropped,
                description: format!(
                    "name '{}' has no equivalent in networks and was ignored",
                    name
                ),
            };
            warn!(path = %warning.field_path, "{}", warning.description);
            warnings.push(warning);
        }

        spec.networks.push(Network {
            lima: None,
            vnl: vde.vnl.clone(),
            switch_port: vde.switch_port,
            mac_address: vde.mac_address.clone(),
            interface: None,
        });
    }

    debug!(
        migrated = spec.network.vde_deprecated.len(),
        networks = spec.networks.len(),
        "Migrated legacy network block"
    );
    spec.network.mark_migrated();

    warnings
}
