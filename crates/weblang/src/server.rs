//! MCP (Model Context Protocol) server implementation.
//!
//! This module exposes the annotator over the MCP protocol, making it
//! available to AI assistants via stdio transport.
//!
//! # Architecture
//!
//! The MCP server is a presentation layer: it wraps the same [`Annotator`]
//! the CLI commands use, built once at startup and shared by every call.
//! Each `#[tool]` method delegates to the core library rather than
//! implementing business logic directly.

use std::sync::Arc;

use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{CallToolResult, Content, Implementation, ServerCapabilities, ServerInfo};
use rmcp::schemars;
use rmcp::{ErrorData as McpError, ServerHandler, tool, tool_handler, tool_router};

use weblang_core::engine::required_layer;
use weblang_core::text::plain_document;
use weblang_core::{Annotator, Category, Document, UnitMode};

/// Parameters for the `get_info` tool.
#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct GetInfoParams {
    /// Output format: "text" or "json"
    #[serde(default = "default_format")]
    pub format: String,
}

fn default_format() -> String {
    "text".to_string()
}

/// Parameters for the `annotate_text` tool.
#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct AnnotateTextParams {
    /// Plain text to annotate. Segmented on whitespace and blank lines;
    /// categories that need clause or morph layers are skipped.
    pub text: Option<String>,
    /// A full document with upstream layers. Takes precedence over `text`.
    pub document: Option<Document>,
    /// Categories to run. Omit for the configured set.
    pub categories: Option<Vec<Category>>,
    /// Analysis unit. Omit for the configured unit.
    pub unit: Option<UnitMode>,
}

/// Parameters for the `list_categories` tool.
#[derive(Debug, Default, serde::Deserialize, schemars::JsonSchema)]
pub struct ListCategoriesParams {}

/// MCP server exposing the annotator to AI assistants.
///
/// Each `#[tool]` method in the `#[tool_router]` impl block is automatically
/// registered and callable via the MCP protocol.
#[derive(Clone)]
pub struct WeblangServer {
    annotator: Arc<Annotator>,
    max_input_bytes: Option<usize>,
    tool_router: rmcp::handler::server::router::tool::ToolRouter<Self>,
}

impl Default for WeblangServer {
    fn default() -> Self {
        Self::new(Annotator::default(), Some(weblang_core::DEFAULT_MAX_INPUT_BYTES))
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, McpError> {
    serde_json::to_string_pretty(value)
        .map_err(|e| McpError::internal_error(format!("serialization error: {e}"), None))
}

#[tool_router]
impl WeblangServer {
    /// Create a new MCP server instance around a built annotator.
    pub fn new(annotator: Annotator, max_input_bytes: Option<usize>) -> Self {
        Self {
            annotator: Arc::new(annotator),
            max_input_bytes,
            tool_router: Self::tool_router(),
        }
    }

    /// Get project information.
    #[tool(description = "Get project name, version, and description")]
    #[tracing::instrument(skip(self), fields(otel.kind = "server"))]
    fn get_info(
        &self,
        Parameters(params): Parameters<GetInfoParams>,
    ) -> Result<CallToolResult, McpError> {
        tracing::debug!(tool = "get_info", format = %params.format, "executing MCP tool");

        let enabled: Vec<&str> = self.annotator.enabled().iter().map(|c| c.as_str()).collect();
        let info = serde_json::json!({
            "name": env!("CARGO_PKG_NAME"),
            "version": env!("CARGO_PKG_VERSION"),
            "description": env!("CARGO_PKG_DESCRIPTION"),
            "unit": self.annotator.unit(),
            "enabled_categories": enabled,
        });

        let text = if params.format == "json" {
            to_json(&info)?
        } else {
            format!(
                "{} v{}\n{}\nunit: {}\ncategories: {}",
                env!("CARGO_PKG_NAME"),
                env!("CARGO_PKG_VERSION"),
                env!("CARGO_PKG_DESCRIPTION"),
                self.annotator.unit(),
                enabled.join(", "),
            )
        };

        tracing::info!(tool = "get_info", "MCP tool completed");
        Ok(CallToolResult::success(vec![Content::text(text)]))
    }

    /// List the anomaly categories.
    #[tool(description = "List anomaly categories with descriptions, required layers and enabled state.")]
    #[tracing::instrument(skip(self, _params), fields(otel.kind = "server"))]
    fn list_categories(
        &self,
        Parameters(_params): Parameters<ListCategoriesParams>,
    ) -> Result<CallToolResult, McpError> {
        let enabled = self.annotator.enabled();
        let categories: Vec<serde_json::Value> = Category::ALL
            .into_iter()
            .map(|c| {
                serde_json::json!({
                    "name": c,
                    "enabled": enabled.contains(c),
                    "kind": c.kind(),
                    "requires": required_layer(c),
                    "description": c.description(),
                })
            })
            .collect();

        Ok(CallToolResult::success(vec![Content::text(to_json(
            &categories,
        )?)]))
    }

    /// Annotate text or a layered document.
    #[tool(
        description = "Annotate web-language anomalies (repeated punctuation and letters, missing spaces, shouting, foreign letters, emojis, emoticons, missing commas, unknown words). Returns annotations with character offsets, per-unit counts and the anomaly-per-word score."
    )]
    #[tracing::instrument(skip(self, params), fields(otel.kind = "server"))]
    fn annotate_text(
        &self,
        Parameters(params): Parameters<AnnotateTextParams>,
    ) -> Result<CallToolResult, McpError> {
        let (doc, plain) = match (params.document, params.text) {
            (Some(doc), _) => {
                self.check_input_size(doc.text.len())?;
                (doc, false)
            }
            (None, Some(text)) => {
                self.check_input_size(text.len())?;
                (plain_document(&text), true)
            }
            (None, None) => {
                return Err(McpError::invalid_params(
                    "either `text` or `document` is required",
                    None,
                ));
            }
        };
        tracing::debug!(
            tool = "annotate_text",
            plain,
            bytes = doc.text.len(),
            "executing MCP tool"
        );

        let mut enabled = params
            .categories
            .map_or_else(|| self.annotator.enabled(), |list| list.into_iter().collect());
        let skipped = if plain {
            weblang_core::engine::unsupported_categories(&doc, enabled)
        } else {
            Vec::new()
        };
        for category in &skipped {
            enabled.remove(*category);
        }
        if !skipped.is_empty() {
            let names: Vec<&str> = skipped.iter().map(|c| c.as_str()).collect();
            tracing::warn!(
                tool = "annotate_text",
                skipped = %names.join(","),
                "plain text has no clause or morph layers; categories not scored"
            );
        }

        let unit = params.unit.unwrap_or_else(|| self.annotator.unit());
        let report = self
            .annotator
            .annotate_with(&doc, enabled, unit)
            .map_err(|e| McpError::invalid_params(e.to_string(), None))?;

        tracing::info!(
            tool = "annotate_text",
            annotations = report.annotations.len(),
            score = ?report.score,
            "MCP tool completed"
        );
        let mut content = vec![Content::text(to_json(&report)?)];
        if !skipped.is_empty() {
            content.push(Content::text(skipped_note(&skipped)));
        }
        Ok(CallToolResult::success(content))
    }
}

impl WeblangServer {
    fn check_input_size(&self, len: usize) -> Result<(), McpError> {
        match self.max_input_bytes {
            Some(max) if len > max => Err(McpError::invalid_params(
                format!("input too large: {len} bytes (limit: {max} bytes)"),
                None,
            )),
            _ => Ok(()),
        }
    }
}

fn skipped_note(skipped: &[Category]) -> String {
    let names: Vec<&str> = skipped.iter().map(|c| c.as_str()).collect();
    format!(
        "not scored (plain text has no clause or morph layers): {}",
        names.join(", ")
    )
}

#[tool_handler]
impl ServerHandler for WeblangServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: Default::default(),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: env!("CARGO_PKG_NAME").to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                ..Default::default()
            },
            instructions: Some(format!(
                "{} MCP server. Use annotate_text to find web-language anomalies in Estonian text.",
                env!("CARGO_PKG_NAME"),
            )),
        }
    }
}
