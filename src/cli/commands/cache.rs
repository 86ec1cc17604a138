//! Cache command - list or clear cached releases

use crate::cli::args::{CacheAction, CacheArgs, OutputFormat};
use crate::config::Config;
use crate::error::RocketyResult;
use crate::release::{CacheEntry, ReleaseCache};
use crate::ui::{self, UiContext};
use console::style;

/// Execute the cache command
pub async fn execute(args: CacheArgs, config: &Config) -> RocketyResult<()> {
    let cache = ReleaseCache::new(
        config
            .cache
            .root
            .clone()
            .unwrap_or_else(ReleaseCache::default_root),
    );

    match args.action {
        CacheAction::List { format } => list_entries(&cache, format),
        CacheAction::Clear { yes } => {
            let ctx = UiContext::detect().with_auto_yes(yes);
            clear_entries(&cache, &ctx).await
        }
    }
}

fn list_entries(cache: &ReleaseCache, format: OutputFormat) -> RocketyResult<()> {
    let entries = cache.entries()?;

    if entries.is_empty() {
        if !matches!(format, OutputFormat::Json) {
            println!("No cached releases in {}", cache.root().display());
        } else {
            println!("[]");
        }
        return Ok(());
    }

    match format {
        OutputFormat::Table => print_table(&entries),
        OutputFormat::Json => print_json(&entries)?,
        OutputFormat::Plain => {
            for entry in &entries {
                println!("{}", entry.identifier);
            }
        }
    }

    Ok(())
}

fn print_table(entries: &[CacheEntry]) {
    println!("{:<20} {:<18} {}", "RELEASE", "STORED", "PATH");
    println!("{}", "-".repeat(80));

    for entry in entries {
        let stored = entry
            .stored_at
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:<20} {:<18} {}",
            style(&entry.identifier).cyan(),
            stored,
            style(entry.path.display()).dim()
        );
    }

    println!();
    println!("Total: {} release(s)", entries.len());
}

fn print_json(entries: &[CacheEntry]) -> RocketyResult<()> {
    #[derive(serde::Serialize)]
    struct EntryJson<'a> {
        release: &'a str,
        path: String,
        stored_at: Option<String>,
    }

    let json: Vec<EntryJson> = entries
        .iter()
        .map(|e| EntryJson {
            release: &e.identifier,
            path: e.path.display().to_string(),
            stored_at: e.stored_at.map(|t| t.to_rfc3339()),
        })
        .collect();

    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}

async fn clear_entries(cache: &ReleaseCache, ctx: &UiContext) -> RocketyResult<()> {
    let count = cache.entries()?.len();

    if count == 0 {
        ui::step_info(ctx, "No cached releases to remove");
        return Ok(());
    }

    let question = format!(
        "Remove {} cached release(s) from {}?",
        count,
        cache.root().display()
    );
    if !ui::confirm(ctx, &question, false).await? {
        ui::step_warn_hint(ctx, "Nothing removed", "Use --yes to skip the prompt");
        return Ok(());
    }

    let removed = cache.clear()?;
    ui::step_ok(ctx, &format!("Removed {} cached release(s)", removed));
    Ok(())
}
