//! Constraint validation for instance specifications
//!
//! Validators walk the whole spec and collect every violation as a
//! `(path, message)` pair; nothing stops at the first failure and nothing
//! mutates the spec.
//!
//! - **Standard**: structural rules
//! - **Strict**: structural rules plus required `ssh.localPort`
//!
//! Copyright (c) 2026 vmspec developers
//! Licensed under the Apache-2.0 license

pub mod base;
pub mod error;
pub mod instance;
pub mod network;
pub mod port_forward;

pub use base::{SchemaValidator, ValidationContext, ValidationHelpers, ValidationMode};
pub use error::{ValidationError, ValidationErrors, ValidationResult, Violation};
pub use instance::InstanceSpecValidator;
pub use network::NetworksValidator;
pub use port_forward::PortForwardValidator;

/// Validate `spec` under `mode`, returning every violation
///
/// # Examples
///
/// ```rust
/// use vmspec_core::model::{Arch, File, InstanceSpec};
/// use vmspec_core::validation::{validate_spec, ValidationMode};
///
/// let spec = InstanceSpec {
///     arch: Some(Arch::X86_64),
///     images: vec![File::new("x.img")],
///     ..InstanceSpec::default()
/// };
/// assert!(validate_spec(&spec, ValidationMode::Standard).is_ok());
/// ```
pub fn validate_spec(
    spec: &crate::model::InstanceSpec,
    mode: ValidationMode,
) -> Result<(), ValidationErrors> {
    InstanceSpecValidator::new().validate_with_context(spec, &ValidationContext::new(mode))
}
