//! Pokemon Builder MCP Server
//!
//! A Model Context Protocol server (rmcp) that exposes the character
//! builder engine to an LLM client over stdio.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use pokemon_builder::mcp_interface;
use pokemon_builder::{BuilderConfig, Catalog, GenerationOptions};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rmcp::{
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{ErrorData as McpError, *},
    schemars, tool, tool_handler, tool_router, ServerHandler, ServiceExt,
};
use serde::Deserialize;
use tokio::io::{stdin, stdout};
use tracing::info;
use tracing_subscriber::EnvFilter;

const CONFIG_FILE: &str = "builder.ron";

#[derive(Debug, Clone)]
pub struct PokemonBuilderService {
    tool_router: ToolRouter<PokemonBuilderService>,
    catalog: Arc<Catalog>,
    options: GenerationOptions,
    data_dir: PathBuf,
    rng: Arc<Mutex<StdRng>>,
}

// Tool request structures
#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GeneratePokemonRequest {
    #[schemars(description = "Pokemon id to generate (e.g. 'bulbasaur'); omit for a random one")]
    pub pokemon_id: Option<String>,
    #[schemars(description = "Level 1-20; defaults to the configured level")]
    pub level: Option<i64>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct CalculateHpRequest {
    #[schemars(description = "Pokemon id")]
    pub pokemon_id: String,
    #[schemars(description = "Level 1-20")]
    pub level: i64,
    #[schemars(description = "'average' or 'roll'")]
    pub hp_method: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct PokemonMovesRequest {
    #[schemars(description = "Pokemon id")]
    pub pokemon_id: String,
    #[schemars(description = "Level 1-20")]
    pub level: i64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ListStartersRequest {
    #[schemars(description = "Types every listed starter must carry (e.g. ['grass', 'poison'])")]
    pub types: Option<Vec<String>>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct LookupRequest {
    #[schemars(description = "Record id to look up")]
    pub id: String,
}

#[tool_router]
impl PokemonBuilderService {
    pub fn new(catalog: Catalog, config: &BuilderConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self {
            tool_router: Self::tool_router(),
            catalog: Arc::new(catalog),
            options: GenerationOptions::from(config),
            data_dir: config.data_dir.clone(),
            rng: Arc::new(Mutex::new(rng)),
        }
    }

    fn with_rng<T>(&self, f: impl FnOnce(&mut StdRng) -> T) -> Result<T, McpError> {
        let mut rng = self
            .rng
            .lock()
            .map_err(|_| McpError::internal_error("random source is poisoned", None))?;
        Ok(f(&mut rng))
    }

    #[tool(description = "Generate a Pokemon with random moves, ability and nature")]
    async fn generate_pokemon(
        &self,
        Parameters(request): Parameters<GeneratePokemonRequest>,
    ) -> Result<CallToolResult, McpError> {
        let text = self.with_rng(|rng| {
            mcp_interface::generate_pokemon(
                self.catalog.as_ref(),
                &self.options,
                request.pokemon_id,
                request.level,
                rng,
            )
        })?;
        Ok(CallToolResult::success(vec![Content::text(text)]))
    }

    #[tool(description = "Calculate hit points by average or by rolling; call again to re-roll")]
    async fn calculate_hp(
        &self,
        Parameters(request): Parameters<CalculateHpRequest>,
    ) -> Result<CallToolResult, McpError> {
        let text = self.with_rng(|rng| {
            mcp_interface::calculate_hp(
                self.catalog.as_ref(),
                &request.pokemon_id,
                request.level,
                &request.hp_method,
                rng,
            )
        })?;
        Ok(CallToolResult::success(vec![Content::text(text)]))
    }

    #[tool(description = "List the moves a Pokemon can know at a level")]
    async fn pokemon_moves(
        &self,
        Parameters(request): Parameters<PokemonMovesRequest>,
    ) -> Result<CallToolResult, McpError> {
        let text = mcp_interface::pokemon_moves(self.catalog.as_ref(), &request.pokemon_id, request.level);
        Ok(CallToolResult::success(vec![Content::text(text)]))
    }

    #[tool(description = "List starter-eligible Pokemon, optionally filtered by type")]
    async fn list_starters(
        &self,
        Parameters(request): Parameters<ListStartersRequest>,
    ) -> Result<CallToolResult, McpError> {
        let text = mcp_interface::list_starters(
            self.catalog.as_ref(),
            &self.options.sprite_base_url,
            request.types.as_deref(),
        );
        Ok(CallToolResult::success(vec![Content::text(text)]))
    }

    #[tool(description = "Look up detailed information about a move")]
    async fn lookup_move(
        &self,
        Parameters(request): Parameters<LookupRequest>,
    ) -> Result<CallToolResult, McpError> {
        let text = mcp_interface::lookup_move(self.catalog.as_ref(), &request.id);
        Ok(CallToolResult::success(vec![Content::text(text)]))
    }

    #[tool(description = "Look up detailed information about an ability")]
    async fn lookup_ability(
        &self,
        Parameters(request): Parameters<LookupRequest>,
    ) -> Result<CallToolResult, McpError> {
        let text = mcp_interface::lookup_ability(self.catalog.as_ref(), &request.id);
        Ok(CallToolResult::success(vec![Content::text(text)]))
    }

    #[tool(description = "Report whether the reference data source is available")]
    async fn health(&self) -> Result<CallToolResult, McpError> {
        let text = mcp_interface::health(&self.catalog, &self.data_dir);
        Ok(CallToolResult::success(vec![Content::text(text)]))
    }
}

#[tool_handler]
impl ServerHandler for PokemonBuilderService {}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // stdout carries the protocol, so logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .with_writer(std::io::stderr)
        .init();

    let config = BuilderConfig::load(Some(Path::new(CONFIG_FILE)))?;
    let catalog = Catalog::load(&config.data_dir)?;

    let service = PokemonBuilderService::new(catalog, &config);
    let transport = (stdin(), stdout());

    info!(data_dir = %config.data_dir.display(), "starting MCP server");
    let server = service.serve(transport).await?;

    let quit_reason = server.waiting().await?;
    info!(?quit_reason, "MCP server exiting");
    Ok(())
}
