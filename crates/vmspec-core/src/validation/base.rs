//! Base validation trait and common checks
//!
//! Copyright (c) 2026 vmspec developers
//! Licensed under the Apache-2.0 license

use crate::units;
use crate::validation::error::{ValidationError, ValidationErrors, ValidationResult};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

static DIGEST_REGEX: OnceLock<Regex> = OnceLock::new();
static MAC_REGEX: OnceLock<Regex> = OnceLock::new();

/// Validation mode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationMode {
    /// Structural rules only
    #[default]
    Standard,
    /// Also requires `ssh.localPort` to be set
    Strict,
}

/// Current location in the spec tree
#[derive(Debug, Clone)]
pub struct ValidationContext {
    pub path: String,
    pub mode: ValidationMode,
}

impl ValidationContext {
    pub fn new(mode: ValidationMode) -> Self {
        Self {
            path: "$".to_string(),
            mode,
        }
    }

    /// Child context for a named field
    pub fn child<P: AsRef<str>>(&self, path_segment: P) -> Self {
        Self {
            path: format!("{}.{}", self.path, path_segment.as_ref()),
            mode: self.mode,
        }
    }

    /// Child context for a list element
    pub fn child_index(&self, index: usize) -> Self {
        Self {
            path: format!("{}[{}]", self.path, index),
            mode: self.mode,
        }
    }

    pub fn is_strict(&self) -> bool {
        self.mode == ValidationMode::Strict
    }
}

/// A read-only check over some part of the spec.
///
/// Implementors push every violation they find into the collector; they
/// never stop at the first one.
pub trait SchemaValidator {
    /// The type being validated
    type Input: ?Sized;

    /// Record all violations of `input` found under `context`
    fn collect(
        &self,
        input: &Self::Input,
        context: &ValidationContext,
        errors: &mut ValidationErrors,
    );

    /// Validate with the standard rule set
    fn validate(&self, input: &Self::Input) -> Result<(), ValidationErrors> {
        let context = ValidationContext::new(ValidationMode::Standard);
        self.validate_with_context(input, &context)
    }

    /// Validate with the strict rule set
    fn validate_strict(&self, input: &Self::Input) -> Result<(), ValidationErrors> {
        let context = ValidationContext::new(ValidationMode::Strict);
        self.validate_with_context(input, &context)
    }

    fn validate_with_context(
        &self,
        input: &Self::Input,
        context: &ValidationContext,
    ) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        self.collect(input, context, &mut errors);
        errors.into_result()
    }
}

/// Shared single-field checks
pub struct ValidationHelpers;

impl ValidationHelpers {
    pub fn validate_non_empty(
        value: &str,
        field_name: &str,
        context: &ValidationContext,
    ) -> ValidationResult<()> {
        if value.is_empty() {
            Err(ValidationError::with_violations(
                &context.path,
                format!("{} must not be empty", field_name),
                vec![ValidationError::create_violation(
                    "non_empty",
                    format!("non-empty {}", field_name),
                    "empty string",
                )],
            ))
        } else {
            Ok(())
        }
    }

    /// Exactly one of two mutually exclusive fields must be set
    pub fn validate_exactly_one(
        first: (&str, bool),
        second: (&str, bool),
        context: &ValidationContext,
    ) -> ValidationResult<()> {
        let (first_name, first_set) = first;
        let (second_name, second_set) = second;
        let actual = match (first_set, second_set) {
            (true, false) | (false, true) => return Ok(()),
            (true, true) => "both set",
            (false, false) => "neither set",
        };
        Err(ValidationError::with_violations(
            &context.path,
            format!(
                "exactly one of {} and {} must be set, found {}",
                first_name, second_name, actual
            ),
            vec![ValidationError::create_violation(
                "mutually_exclusive",
                format!("exactly one of {}, {}", first_name, second_name),
                actual,
            )],
        ))
    }

    pub fn validate_port(port: u16, context: &ValidationContext) -> ValidationResult<()> {
        if port == 0 {
            Err(ValidationError::with_violations(
                &context.path,
                "port must be between 1 and 65535",
                vec![ValidationError::create_violation("port_range", "1..=65535", "0")],
            ))
        } else {
            Ok(())
        }
    }

    /// A port range is exactly `[low, high]` with valid ports and low <= high
    pub fn validate_port_range(range: &[u16], context: &ValidationContext) -> ValidationResult<()> {
        if range.len() != 2 {
            return Err(ValidationError::with_violations(
                &context.path,
                format!("port range must have exactly 2 elements, found {}", range.len()),
                vec![ValidationError::create_violation(
                    "port_range_length",
                    "2 elements",
                    range.len().to_string(),
                )],
            ));
        }
        let (low, high) = (range[0], range[1]);
        if low == 0 {
            return Self::validate_port(low, context);
        }
        if low > high {
            return Err(ValidationError::with_violations(
                &context.path,
                format!("port range start {} is greater than end {}", low, high),
                vec![ValidationError::create_violation(
                    "port_range_order",
                    "start <= end",
                    format!("[{}, {}]", low, high),
                )],
            ));
        }
        Ok(())
    }

    /// `algorithm:hex` with a known algorithm and matching hex length
    pub fn validate_digest(digest: &str, context: &ValidationContext) -> ValidationResult<()> {
        let regex = DIGEST_REGEX.get_or_init(|| {
            Regex::new(r"^(sha256|sha384|sha512):([0-9a-f]+)$").expect("digest pattern is valid")
        });
        let expected_len = regex.captures(digest).map(|caps| {
            let len = match &caps[1] {
                "sha256" => 64,
                "sha384" => 96,
                _ => 128,
            };
            (len, caps[2].len())
        });
        match expected_len {
            Some((want, got)) if want == got => Ok(()),
            Some((want, got)) => Err(ValidationError::with_violations(
                &context.path,
                format!("digest has {} hex characters, expected {}", got, want),
                vec![ValidationError::create_violation(
                    "digest_format",
                    format!("{} hex characters", want),
                    digest,
                )],
            )),
            None => Err(ValidationError::with_violations(
                &context.path,
                format!("invalid digest: {}", digest),
                vec![ValidationError::create_violation(
                    "digest_format",
                    "sha256:<hex>, sha384:<hex> or sha512:<hex>",
                    digest,
                )],
            )),
        }
    }

    pub fn validate_mac_address(mac: &str, context: &ValidationContext) -> ValidationResult<()> {
        let regex = MAC_REGEX.get_or_init(|| {
            Regex::new(r"^[0-9a-fA-F]{2}(:[0-9a-fA-F]{2}){5}$").expect("mac pattern is valid")
        });
        if regex.is_match(mac) {
            Ok(())
        } else {
            Err(ValidationError::with_violations(
                &context.path,
                format!("invalid MAC address: {}", mac),
                vec![ValidationError::create_violation(
                    "mac_address",
                    "six colon-separated hex octets",
                    mac,
                )],
            ))
        }
    }

    /// A byte quantity that parses and is non-zero
    pub fn validate_byte_size(
        value: &str,
        field_name: &str,
        context: &ValidationContext,
    ) -> ValidationResult<()> {
        match units::ram_in_bytes(value) {
            Ok(0) => Err(ValidationError::with_violations(
                &context.path,
                format!("{} must be greater than zero", field_name),
                vec![ValidationError::create_violation("positive_size", "> 0 bytes", value)],
            )),
            Ok(_) => Ok(()),
            Err(e) => Err(ValidationError::with_violations(
                &context.path,
                format!("{}: {}", field_name, e),
                vec![ValidationError::create_violation(
                    "byte_size",
                    "size such as 4GiB or 512MiB",
                    value,
                )],
            )),
        }
    }
}
