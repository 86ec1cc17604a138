//! Rockety - frontend project scaffolding
//!
//! Resolves the latest template release, caches it under the home
//! directory, materializes it as a new project and installs its
//! dependencies. Inside a project, other commands are forwarded to gulp.

pub mod cli;
pub mod config;
pub mod error;
pub mod github;
pub mod paths;
pub mod project;
pub mod proxy;
pub mod release;
pub mod ui;
pub mod update;

pub use error::{RocketyError, RocketyResult};
