//! Byte-quantity parsing for `memory` and `disk`
//!
//! Sizes use binary multipliers regardless of suffix spelling, so `4G`,
//! `4GB` and `4GiB` all mean 4 * 1024^3 bytes.
//!
//! Copyright (c) 2026 vmspec developers
//! Licensed under the Apache-2.0 license

use regex::Regex;
use std::sync::OnceLock;
use thiserror::Error;

static SIZE_REGEX: OnceLock<Regex> = OnceLock::new();

const KIB: u64 = 1 << 10;
const MIB: u64 = 1 << 20;
const GIB: u64 = 1 << 30;
const TIB: u64 = 1 << 40;
const PIB: u64 = 1 << 50;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum UnitError {
    #[error("invalid size: '{0}'")]
    InvalidSize(String),

    #[error("size '{0}' does not fit in 64 bits")]
    Overflow(String),
}

fn size_regex() -> &'static Regex {
    SIZE_REGEX.get_or_init(|| {
        Regex::new(r"^(\d+(?:\.\d+)*) ?([kKmMgGtTpP])?[iI]?[bB]?$").expect("size pattern is valid")
    })
}

/// Parse a human-readable size such as `4GiB` or `512M` into bytes
pub fn ram_in_bytes(size: &str) -> Result<u64, UnitError> {
    let caps = size_regex()
        .captures(size)
        .ok_or_else(|| UnitError::InvalidSize(size.to_string()))?;

    let number: f64 = caps[1]
        .parse()
        .map_err(|_| UnitError::InvalidSize(size.to_string()))?;

    let multiplier = match caps.get(2).map(|m| m.as_str().to_ascii_lowercase()) {
        None => 1,
        Some(unit) => match unit.as_str() {
            "k" => KIB,
            "m" => MIB,
            "g" => GIB,
            "t" => TIB,
            "p" => PIB,
            _ => return Err(UnitError::InvalidSize(size.to_string())),
        },
    };

    let bytes = number * multiplier as f64;
    if !bytes.is_finite() || bytes >= u64::MAX as f64 {
        return Err(UnitError::Overflow(size.to_string()));
    }
    Ok(bytes as u64)
}
