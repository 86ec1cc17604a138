//! Turning a release tree into a ready-to-use project

pub mod install;
pub mod materialize;

pub use install::{
    install, plan_jobs, select_primary, InstallJob, InstallReport, InstallTool, JobStatus,
};
pub use materialize::{
    materialize, remove_template_files, validate_destination, CleanupFailure, Collision,
    Placement, ScaffoldRequest,
};
