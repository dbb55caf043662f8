//! Categories command: list anomaly categories and their state.

use clap::Args;
use owo_colors::OwoColorize;
use serde::Serialize;
use tracing::{debug, instrument};

use weblang_core::Category;
use weblang_core::config::Config;
use weblang_core::engine::required_layer;
use weblang_core::layers::LayerKind;

/// Arguments for the `categories` subcommand.
#[derive(Args, Debug, Default)]
pub struct CategoriesArgs {
    /// Only list enabled categories.
    #[arg(long)]
    pub enabled: bool,
}

#[derive(Debug, Serialize)]
struct CategoryInfo {
    name: Category,
    enabled: bool,
    kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    requires: Option<LayerKind>,
    description: &'static str,
}

fn collect(config: &Config, enabled_only: bool) -> Vec<CategoryInfo> {
    Category::ALL
        .into_iter()
        .map(|category| CategoryInfo {
            name: category,
            enabled: config.categories.get(category),
            kind: category.kind(),
            requires: required_layer(category),
            description: category.description(),
        })
        .filter(|info| !enabled_only || info.enabled)
        .collect()
}

/// List categories with their enabled state from configuration.
#[instrument(name = "cmd_categories", skip_all)]
pub fn cmd_categories(
    args: CategoriesArgs,
    global_json: bool,
    config: &Config,
) -> anyhow::Result<()> {
    debug!(enabled_only = args.enabled, "executing categories command");
    let infos = collect(config, args.enabled);

    if global_json {
        println!("{}", serde_json::to_string_pretty(&infos)?);
        return Ok(());
    }

    for info in &infos {
        let state = if info.enabled {
            "on ".green().to_string()
        } else {
            "off".dimmed().to_string()
        };
        let requires = info
            .requires
            .map(|layer| format!(" (needs {layer})"))
            .unwrap_or_default();
        println!(
            "{state}  {:<17} {}{}",
            info.name.as_str().bold(),
            info.description,
            requires.dimmed()
        );
    }
    Ok(())
}
