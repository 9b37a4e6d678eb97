use super::{find_page, open_gateway};
use crate::config::Config;
use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use pagecraft_blocks::Registry;
use pagecraft_editor::{BuilderStore, EditOp};
use pagecraft_gateway::SaveCoordinator;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Args)]
pub struct EditArgs {
    /// Slug of the page to edit
    pub slug: String,

    /// JSON file holding an array of edit operations
    #[arg(long)]
    pub ops: PathBuf,
}

fn load_ops(path: &Path) -> Result<Vec<EditOp>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("cannot read {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("{} is not a list of edit operations", path.display()))
}

/// Apply every operation as one undo step, then save. Nothing is saved if
/// any operation fails.
pub async fn edit(args: EditArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;
    let ops = load_ops(&args.ops)?;
    let gateway = Arc::new(open_gateway(&config, cwd).await?);
    let page = find_page(&gateway, &args.slug).await?;

    let mut store =
        BuilderStore::with_history_limit(page, Registry::builtin(), config.history_limit)
            .with_context(|| format!("page '{}' cannot be opened for editing", args.slug))?;

    store.begin_batch();
    for (index, op) in ops.into_iter().enumerate() {
        let name = op.name();
        store
            .apply(op)
            .with_context(|| format!("operation {} ({}) failed", index + 1, name))?;
        println!("  {} {}", "✓".green(), name);
    }
    store.end_batch(Some("scripted edit"));

    if !store.is_dirty() {
        println!("{}", "Nothing to save".yellow());
        return Ok(());
    }

    let (version, snapshot) = store.snapshot_for_save();
    let saver = SaveCoordinator::new(gateway);
    let saved = saver.save(store.save_key(), snapshot).await?;
    store.acknowledge_save(version, &saved);
    debug!(version, dirty = store.is_dirty(), "Acknowledged save");

    println!(
        "{} Saved {} ({} blocks)",
        "✅".green(),
        saved.slug.as_str().bright_white(),
        saved.block_count()
    );
    Ok(())
}
