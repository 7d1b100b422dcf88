//! YAML and JSON decoding of instance specs
//!
//! Copyright (c) 2026 vmspec developers
//! Licensed under the Apache-2.0 license

use crate::loader::error::{LoaderError, LoaderResult};
use crate::model::InstanceSpec;
use std::path::Path;
use tracing::debug;

/// Supported document formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// YAML format (.yaml, .yml)
    Yaml,
    /// JSON format (.json)
    Json,
}

impl Format {
    /// Detect format from file extension
    pub fn from_path(path: &Path) -> LoaderResult<Self> {
        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_lowercase())
            .as_deref()
        {
            Some("yaml") | Some("yml") => Ok(Format::Yaml),
            Some("json") => Ok(Format::Json),
            _ => Err(LoaderError::unsupported_format(path.to_path_buf())),
        }
    }
}

/// Decodes and encodes [`InstanceSpec`] documents
#[derive(Debug, Default)]
pub struct SpecLoader;

impl SpecLoader {
    pub fn new() -> Self {
        Self
    }

    /// Load a spec file, detecting format from its extension
    pub fn load(&self, path: &Path) -> LoaderResult<InstanceSpec> {
        let format = Format::from_path(path)?;
        let content = std::fs::read_to_string(path)
            .map_err(|e| LoaderError::io_error(path.to_path_buf(), e))?;
        debug!(path = %path.display(), bytes = content.len(), ?format, "Read spec file");

        self.parse_content(&content, format, path)
    }

    /// Parse content with an explicit format. `path` is only used for errors.
    pub fn parse_content(
        &self,
        content: &str,
        format: Format,
        path: &Path,
    ) -> LoaderResult<InstanceSpec> {
        match format {
            Format::Yaml => serde_yaml::from_str(content)
                .map_err(|e| LoaderError::yaml_parse_error(path.to_path_buf(), e)),
            Format::Json => serde_json::from_str(content)
                .map_err(|e| LoaderError::json_parse_error(path.to_path_buf(), e)),
        }
    }

    /// Parse content whose format is unknown, trying the extension first,
    /// then JSON (the stricter format), then YAML
    pub fn parse_with_fallback(
        &self,
        content: &str,
        path: &Path,
    ) -> LoaderResult<(InstanceSpec, Format)> {
        if let Ok(format) = Format::from_path(path) {
            if let Ok(spec) = self.parse_content(content, format, path) {
                return Ok((spec, format));
            }
        }

        if let Ok(spec) = self.parse_content(content, Format::Json, path) {
            return Ok((spec, Format::Json));
        }

        self.parse_content(content, Format::Yaml, path)
            .map(|spec| (spec, Format::Yaml))
    }

    /// Encode a spec back into `format`
    pub fn serialize(&self, spec: &InstanceSpec, format: Format) -> LoaderResult<String> {
        match format {
            Format::Json => {
                serde_json::to_string_pretty(spec).map_err(|e| LoaderError::encode_error("json", e))
            }
            Format::Yaml => {
                serde_yaml::to_string(spec).map_err(|e| LoaderError::encode_error("yaml", e))
            }
        }
    }
}
