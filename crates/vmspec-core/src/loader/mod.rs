//! Spec document loading
//!
//! Decodes YAML or JSON documents into [`InstanceSpec`](crate::model::InstanceSpec)
//! and encodes them back. Format is taken from the file extension, with a
//! JSON-then-YAML fallback for content of unknown origin.
//!
//! # Example Usage
//!
//! ```rust,no_run
//! use vmspec_core::loader::SpecLoader;
//! use std::path::Path;
//!
//! let spec = SpecLoader::new().load(Path::new("instance.yaml"))?;
//! println!("{} image(s)", spec.images.len());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! Copyright (c) 2026 vmspec developers
//! Licensed under the Apache-2.0 license

pub mod error;
pub mod parser;

pub use error::{LoaderError, LoaderResult};
pub use parser::{Format, SpecLoader};
