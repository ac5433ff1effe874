//! Shared test utilities for the rainmeas workspace.
//!
//! This crate provides standardised fixtures so crate test suites do not
//! each hand-roll registries and projects. It is a dev-dependency only and
//! never published.
//!
//! # Modules
//!
//! - [`archive`]: zip archive builders
//! - [`project`]: [`TestProject`] temporary skin project with assertions
//! - [`registry`]: [`RegistryFixture`] on-disk registry with real archives

pub mod archive;
pub mod project;
pub mod registry;

pub use project::TestProject;
pub use registry::RegistryFixture;
