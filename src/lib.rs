#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

pub mod bundle;
pub mod canonical;
pub mod config;
pub mod environment;
pub mod error;
pub mod expand;
pub mod fs;
pub mod minify;
pub mod packages;
pub mod pattern;
pub mod rebase;
pub mod registry;
pub mod variant;

#[cfg(test)]
mod test_support;

pub use bundle::{Bundle, BundleKind, BundleServices, MinifiedBundle};
pub use config::BundlerConfig;
pub use environment::{Environment, RenderContext};
pub use error::{BundleError, Result};
pub use registry::BundleRegistry;
