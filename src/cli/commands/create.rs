//! Create command - scaffold a new project from a template release

use crate::cli::args::CreateArgs;
use crate::config::{Config, OnExisting};
use crate::error::{RocketyError, RocketyResult};
use crate::github::GithubClient;
use crate::project::{
    self, materialize, remove_template_files, validate_destination, Collision, InstallReport,
    Placement, ScaffoldRequest,
};
use crate::release::{self, Release, ReleaseCache};
use crate::ui::{self, DownloadProgress, TaskSpinner, UiContext};
use crate::update;
use std::cell::Cell;
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::TempDir;
use tracing::{debug, info};

/// Execute the create command
pub async fn execute(args: CreateArgs, config: &Config) -> RocketyResult<()> {
    let ctx = UiContext::detect().with_auto_yes(args.yes);
    let cwd = env::current_dir().map_err(|e| RocketyError::io("getting current directory", e))?;

    let on_existing = if args.yes {
        OnExisting::Overwrite
    } else {
        config.create.on_existing
    };
    let request =
        ScaffoldRequest::new(args.name.as_deref(), &cwd, args.dev, args.noupdate, on_existing)?;

    scaffold(&request, config, &ctx).await
}

/// Run a validated request through resolve, fetch, place and install
pub async fn scaffold(
    request: &ScaffoldRequest,
    config: &Config,
    ctx: &UiContext,
) -> RocketyResult<()> {
    let collision = validate_destination(request, ctx).await?;

    ui::intro(ctx, &format!("Rockety: {}", request.project_name));

    let client = GithubClient::new(&config.template);

    if request.skip_version_check || !config.update.check {
        debug!("Skipping version check");
    } else {
        let (client, settings) = (client.clone(), config.update.clone());
        blocking(move || update::check(&client, &settings, env!("CARGO_PKG_VERSION"))).await?;
    }

    let release = {
        let (client, template) = (client.clone(), config.template.clone());
        let development = request.development_mode;
        blocking(move || release::resolve(&client, &template, development)).await?
    };

    let cache = ReleaseCache::new(
        config
            .cache
            .root
            .clone()
            .unwrap_or_else(ReleaseCache::default_root),
    );
    let use_cache = config.cache.enabled && release.is_cacheable();

    let cached = if use_cache {
        cache.lookup(&release.identifier)?
    } else {
        None
    };

    // Keeps the scratch extraction alive until placement is done
    let staging: Option<TempDir>;
    let (source, placement) = match cached {
        Some(path) => {
            staging = None;
            ui::step_info(ctx, &format!("Using cached Rockety {}", release));
            (path, Placement::Copy)
        }
        None => {
            ui::step_info(ctx, &format!("Downloading Rockety {}", release));
            let dir = cache.staging_dir()?;
            let extracted = download(ctx, &client, &release, dir.path().to_path_buf()).await?;
            staging = Some(dir);

            if use_cache {
                let stored = cache.store(&release.identifier, &extracted)?;
                (stored, Placement::Copy)
            } else {
                (extracted, Placement::Move)
            }
        }
    };

    place(&source, request, placement, collision).await?;
    drop(staging);
    ui::step_ok_detail(
        ctx,
        "Project created",
        &request.destination.display().to_string(),
    );

    let patterns = config.template.cleanup.clone();
    let project_dir = request.destination.clone();
    let failures = blocking(move || Ok(remove_template_files(&project_dir, &patterns))).await?;
    for failure in failures {
        ui::step_warn(
            ctx,
            &format!("Could not remove {}: {}", failure.path.display(), failure.reason),
        );
    }

    let report = install_dependencies(ctx, config, &request.destination).await;
    report_install(ctx, &report);

    ui::outro_success(ctx, "Done!");
    ui::remark(ctx, &format!("cd {}", request.project_name));
    Ok(())
}

async fn download(
    ctx: &UiContext,
    client: &GithubClient,
    release: &Release,
    staging: PathBuf,
) -> RocketyResult<PathBuf> {
    let progress = DownloadProgress::new(ctx, &format!("Rockety {}", release));
    let (client, release) = (client.clone(), release.clone());

    blocking(move || {
        let received = Cell::new(0u64);
        let report = |done: u64, total: Option<u64>| {
            received.set(done);
            progress.update(done, total);
        };

        let result = release::fetch(&client, &release, &staging, Some(&report));
        match &result {
            Ok(_) => progress.finish(received.get()),
            Err(_) => progress.abandon(),
        }
        result
    })
    .await
}

async fn place(
    source: &Path,
    request: &ScaffoldRequest,
    placement: Placement,
    collision: Collision,
) -> RocketyResult<()> {
    let source = source.to_path_buf();
    let destination = request.destination.clone();
    info!(
        "Placing {} at {} ({:?})",
        source.display(),
        destination.display(),
        placement
    );
    blocking(move || materialize(&source, &destination, placement, collision)).await
}

async fn install_dependencies(ctx: &UiContext, config: &Config, project: &Path) -> InstallReport {
    let settings = &config.install;
    let primary = project::select_primary(settings).await;
    if primary == settings.alternate {
        ui::step_info(ctx, &format!("Selecting {}", primary));
    } else {
        ui::step_info(
            ctx,
            &format!("{} not available, falling back to {}", settings.alternate, primary),
        );
    }

    let jobs = project::plan_jobs(settings, project, &primary);
    let timeout = (settings.timeout_secs > 0).then(|| Duration::from_secs(settings.timeout_secs));

    let mut spinner = TaskSpinner::new(ctx);
    spinner.start("Installing dependencies...");
    let report = project::install(jobs, timeout).await;
    if report.all_succeeded() {
        spinner.stop("Dependencies installed");
    } else {
        spinner.stop_warn("Dependencies installed with warnings");
    }
    report
}

fn report_install(ctx: &UiContext, report: &InstallReport) {
    for (job, reason) in report.failures() {
        ui::step_warn_hint(
            ctx,
            &format!("{} failed: {}", job, reason),
            &format!(
                "run `{}` in {}",
                job.command_line(),
                job.working_directory.display()
            ),
        );
    }
}

/// Run blocking network or filesystem work off the async runtime
async fn blocking<T, F>(work: F) -> RocketyResult<T>
where
    F: FnOnce() -> RocketyResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| RocketyError::Internal(format!("background task failed: {}", e)))?
}
