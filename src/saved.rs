//! `jobs saved`, `jobs save` and `jobs unsave`.

use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use job_searcher_core::{SavedItemsController, SearchItem, SearchProvider};
use tracing::info;

use crate::api::{Resource, RestProvider};
use crate::config::Config;
use crate::render::{print_items, Listing, OutputFormat};

/// Load the saved collection through `controller`, failing on error.
pub async fn load_saved<P: SearchProvider>(
    controller: &SavedItemsController<P>,
) -> Result<Vec<P::Item>> {
    controller.load().await;
    if let Some(message) = controller.error_message() {
        bail!("could not load saved items: {}", message);
    }
    Ok(controller.items())
}

/// Read one item from a JSON file.
pub fn read_item<R: Resource>(path: &Path) -> Result<R> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read item file: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse item JSON: {}", path.display()))
}

fn controller<R: Resource>(config: &Config) -> Result<SavedItemsController<RestProvider<R>>> {
    let provider = RestProvider::<R>::from_config(&config.api)?;
    Ok(SavedItemsController::new(Arc::new(provider)))
}

pub async fn run_list<R: Resource + Listing>(config: &Config, format: OutputFormat) -> Result<()> {
    let saved = controller::<R>(config)?;
    let items = load_saved(&saved).await?;
    info!(count = items.len(), "saved items loaded");
    print_items(&items, format)
}

pub async fn run_save<R: Resource + Listing>(config: &Config, path: &Path) -> Result<()> {
    let item: R = read_item(path)?;
    let saved = controller::<R>(config)?;
    let stored = saved
        .save(&item)
        .await
        .with_context(|| format!("Failed to save {}", item.id()))?;
    println!("saved: {}", stored.headline());
    println!("    id: {}", stored.id());
    Ok(())
}

pub async fn run_unsave<R: Resource>(config: &Config, id: &str) -> Result<()> {
    let id = id.trim();
    if id.is_empty() {
        bail!("an item id is required");
    }
    let saved = controller::<R>(config)?;
    saved
        .remove_by_id(id)
        .await
        .with_context(|| format!("Failed to remove saved item {}", id))?;
    println!("removed: {}", id);
    Ok(())
}
