//! vmspec core - virtual-machine instance specification engine
//!
//! This crate turns a possibly incomplete, possibly legacy instance
//! specification into a complete and validated one:
//!
//! 1. **Migrate**: the deprecated `network.vde` block is copied into
//!    `networks`, at most once per spec
//! 2. **Default**: every unset optional field gets its documented default
//! 3. **Validate**: every structural violation is collected and reported
//!
//! ## Quick Start
//!
//! ```rust
//! use vmspec_core::{Arch, File, InstanceSpec, NormalizeOptions, Pipeline};
//!
//! let spec = InstanceSpec {
//!     images: vec![File::new("x.img")],
//!     ..InstanceSpec::default()
//! };
//!
//! let pipeline = Pipeline::new(NormalizeOptions::default().with_host_arch(Arch::X86_64));
//! let normalized = pipeline.normalize(spec).unwrap();
//! assert_eq!(normalized.spec.use_host_resolver, Some(true));
//! ```
//!
//! Copyright (c) 2026 vmspec developers
//! Licensed under the Apache-2.0 license

pub mod arch;
pub mod defaults;
pub mod loader;
pub mod migrate;
pub mod model;
pub mod pipeline;
pub mod units;
pub mod validation;

// Re-export commonly used types for convenience
pub use defaults::Defaults;
pub use loader::{Format, LoaderError, SpecLoader};
pub use migrate::MigrationWarning;
pub use model::{Arch, File, InstanceSpec, Network, PortForward};
pub use pipeline::{normalize, NormalizeOptions, Normalized, Pipeline};
pub use validation::{ValidationError, ValidationErrors, ValidationMode};
