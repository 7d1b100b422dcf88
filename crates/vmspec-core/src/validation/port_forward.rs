//! Port forwarding rules
//!
//! Copyright (c) 2026 vmspec developers
//! Licensed under the Apache-2.0 license

use crate::model::PortForward;
use crate::validation::base::{SchemaValidator, ValidationContext, ValidationHelpers};
use crate::validation::error::ValidationErrors;

/// Validates a single `portForwards` entry
#[derive(Debug, Default)]
pub struct PortForwardValidator;

impl PortForwardValidator {
    /// One side (guest or host): a port XOR a well-formed range
    fn collect_side(
        side: &str,
        port: Option<u16>,
        range: Option<&[u16]>,
        ctx: &ValidationContext,
        errors: &mut ValidationErrors,
    ) {
        let port_field = format!("{}Port", side);
        let range_field = format!("{}PortRange", side);

        errors.record(ValidationHelpers::validate_exactly_one(
            (port_field.as_str(), port.is_some()),
            (range_field.as_str(), range.is_some()),
            ctx,
        ));

        if let Some(port) = port {
            errors.record(ValidationHelpers::validate_port(port, &ctx.child(&port_field)));
        }
        if let Some(range) = range {
            errors.record(ValidationHelpers::validate_port_range(range, &ctx.child(&range_field)));
        }
    }
}

impl SchemaValidator for PortForwardValidator {
    type Input = PortForward;

    fn collect(&self, rule: &PortForward, ctx: &ValidationContext, errors: &mut ValidationErrors) {
        Self::collect_side(
            "guest",
            rule.guest_port,
            rule.guest_port_range.as_deref(),
            ctx,
            errors,
        );
        Self::collect_side(
            "host",
            rule.host_port,
            rule.host_port_range.as_deref(),
            ctx,
            errors,
        );
    }
}
