//! Serve command: run the MCP server on stdio.

use anyhow::Context;
use clap::Args;
use rmcp::ServiceExt;
use rmcp::transport::stdio;
use tracing::{info, instrument};

use weblang_core::config::{Config, ConfigSources};

use super::build_annotator;
use crate::server::WeblangServer;

/// Arguments for the `serve` subcommand.
#[derive(Args, Debug, Default)]
pub struct ServeArgs {}

/// Build the annotator once and serve it until the client disconnects.
#[instrument(name = "cmd_serve", skip_all)]
pub async fn cmd_serve(
    _args: ServeArgs,
    max_input_bytes: Option<usize>,
    config: &Config,
    sources: &ConfigSources,
) -> anyhow::Result<()> {
    let annotator = build_annotator(config, sources)?;
    info!(unit = %annotator.unit(), ?max_input_bytes, "starting MCP server on stdio");

    let service = WeblangServer::new(annotator, max_input_bytes)
        .serve(stdio())
        .await
        .context("failed to start MCP server")?;
    let reason = service.waiting().await.context("MCP server task failed")?;

    info!(?reason, "MCP server stopped");
    Ok(())
}
