//! Network attachment rules
//!
//! Copyright (c) 2026 vmspec developers
//! Licensed under the Apache-2.0 license

use crate::model::Network;
use crate::validation::base::{SchemaValidator, ValidationContext, ValidationHelpers};
use crate::validation::error::{ValidationError, ValidationErrors};
use std::collections::HashMap;

/// Validates the `networks` list
#[derive(Debug, Default)]
pub struct NetworksValidator;

impl SchemaValidator for NetworksValidator {
    type Input = [Network];

    fn collect(
        &self,
        networks: &[Network],
        ctx: &ValidationContext,
        errors: &mut ValidationErrors,
    ) {
        let mut interfaces: HashMap<&str, usize> = HashMap::new();

        for (i, network) in networks.iter().enumerate() {
            let entry = ctx.child_index(i);

            // One error per entry, at the entry itself.
            errors.record(ValidationHelpers::validate_exactly_one(
                ("lima", network.lima_name().is_some()),
                ("vnl", network.locator().is_some()),
                &entry,
            ));

            if let Some(mac) = network.mac_address.as_deref().filter(|m| !m.is_empty()) {
                errors.record(ValidationHelpers::validate_mac_address(
                    mac,
                    &entry.child("macAddress"),
                ));
            }

            if let Some(name) = network.interface.as_deref() {
                let iface = entry.child("interface");
                if name.is_empty() {
                    errors.record(ValidationHelpers::validate_non_empty(name, "interface", &iface));
                } else if let Some(first) = interfaces.get(name) {
                    errors.add(ValidationError::with_violations(
                        iface.path,
                        format!("interface '{}' is already used by networks[{}]", name, first),
                        vec![ValidationError::create_violation(
                            "unique_interface",
                            "unique interface name",
                            name,
                        )],
                    ));
                } else {
                    interfaces.insert(name, i);
                }
            }
        }
    }
}
