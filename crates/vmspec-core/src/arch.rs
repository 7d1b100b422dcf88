//! Host architecture detection
//!
//! Copyright (c) 2026 vmspec developers
//! Licensed under the Apache-2.0 license

use crate::model::Arch;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Unsupported architecture '{0}', expected x86_64 or aarch64")]
pub struct ArchParseError(pub String);

impl Arch {
    pub fn as_str(&self) -> &'static str {
        match self {
            Arch::X86_64 => "x86_64",
            Arch::Aarch64 => "aarch64",
        }
    }

    /// The architecture this binary was built for, if it can host a guest
    pub fn host() -> Option<Arch> {
        host_arch_from(std::env::consts::ARCH)
    }
}

impl fmt::Display for Arch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Arch {
    type Err = ArchParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "x86_64" | "amd64" => Ok(Arch::X86_64),
            "aarch64" | "arm64" => Ok(Arch::Aarch64),
            other => Err(ArchParseError(other.to_string())),
        }
    }
}

fn host_arch_from(target: &str) -> Option<Arch> {
    match target {
        "x86_64" => Some(Arch::X86_64),
        "aarch64" => Some(Arch::Aarch64),
        _ => None,
    }
}
