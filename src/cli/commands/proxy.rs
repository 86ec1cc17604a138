//! Proxy command - run gulp tasks inside a project

use crate::config::Config;
use crate::error::{RocketyError, RocketyResult};
use crate::proxy;
use std::env;

/// Forward `command` to the task runner, returning its exit code
pub async fn execute(command: Vec<String>, config: &Config) -> RocketyResult<i32> {
    let cwd = env::current_dir().map_err(|e| RocketyError::io("getting current directory", e))?;
    if proxy::requires_project(&command) {
        proxy::ensure_project_dir(&cwd, &config.proxy.markers)?;
    }

    let args = proxy::runner_args(&command);
    proxy::forward(&config.proxy.runner, &args, &cwd).await
}
