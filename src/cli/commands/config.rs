//! Config command - show or initialize configuration

use crate::cli::args::{ConfigAction, ConfigArgs};
use crate::config::{Config, ConfigManager};
use crate::error::RocketyResult;
use crate::ui::{self, UiContext};

/// Execute the config command
pub async fn execute(args: ConfigArgs, config: &Config, manager: &ConfigManager) -> RocketyResult<()> {
    match args.action {
        None | Some(ConfigAction::Show) => show_config(config)?,
        Some(ConfigAction::Path) => println!("{}", manager.path().display()),
        Some(ConfigAction::Init { force }) => init_config(manager, force).await?,
    }

    Ok(())
}

fn show_config(config: &Config) -> RocketyResult<()> {
    println!("{}", toml::to_string_pretty(config)?);
    Ok(())
}

async fn init_config(manager: &ConfigManager, force: bool) -> RocketyResult<()> {
    let ctx = UiContext::detect();
    let path = manager.path();

    if path.exists() && !force {
        ui::step_warn_hint(
            &ctx,
            &format!("Config already exists at {}", path.display()),
            "Use --force to overwrite",
        );
        return Ok(());
    }

    manager.save(&Config::default()).await?;
    ui::step_ok_detail(&ctx, "Configuration initialized", &path.display().to_string());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn init_writes_defaults_once() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("rockety").join("config.toml");
        let manager = ConfigManager::with_path(path.clone());

        let init = |force| ConfigArgs {
            action: Some(ConfigAction::Init { force }),
        };

        execute(init(false), &Config::default(), &manager)
            .await
            .unwrap();
        assert!(path.is_file());

        std::fs::write(&path, "[cache]\nenabled = false\n").unwrap();
        execute(init(false), &Config::default(), &manager)
            .await
            .unwrap();
        assert!(!manager.load().await.unwrap().cache.enabled);

        execute(init(true), &Config::default(), &manager)
            .await
            .unwrap();
        assert!(manager.load().await.unwrap().cache.enabled);
    }
}
