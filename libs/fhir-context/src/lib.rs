//! Resource store for validating SUSHI projects.
//!
//! [`ProjectResources::load`] collects the resources a project's output is validated
//! against: everything under `fsh-generated`, plus every resource of every package the
//! project depends on, directly or transitively, read from the local package cache.

pub mod config;
pub mod error;
pub mod generated;
pub mod project;
pub mod resolver;
pub mod store;

pub use config::{ProjectConfig, GENERATED_DIR};
pub use error::{Error, ErrorKind, Result};
pub use generated::{json_files, preload_generated};
pub use project::ProjectResources;
pub use resolver::{resolve, DependencyResolver};
pub use store::ResourceStore;
