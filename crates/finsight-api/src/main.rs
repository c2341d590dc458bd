use std::net::SocketAddr;
use std::sync::Arc;

use finsight_api::{build_router, config::Config, state::AppState};
use finsight_auth::LogMailer;
use finsight_llm::{ClientFactory, ProviderConfig};
use finsight_persist::StoresBuilder;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Load configuration
    let config = Config::load()
        .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?;

    // Initialize logging
    init_logging(&config);

    tracing::info!("Starting Finsight API server");
    tracing::info!("Config loaded: {}:{}", config.server.host, config.server.port);

    // Language model is optional; chat degrades to an apology without it
    let llm_client = match &config.openai_api_key {
        Some(key) => {
            tracing::info!(model = %config.llm.model, "Initializing LLM client");
            Some(ClientFactory::create_chat_client(ProviderConfig::openai(key.clone()))?)
        }
        None => {
            tracing::warn!("OPENAI_API_KEY not set, chat will reply with a configuration notice");
            None
        }
    };

    // Stores: MongoDB when MONGODB_URI is set, otherwise in-memory
    let persistence = if cfg!(feature = "mongodb") && config.mongodb_uri.is_some() {
        "mongodb"
    } else {
        "memory"
    };
    let stores = StoresBuilder::new()
        .mongodb_uri(config.mongodb_uri.clone())
        .database(config.mongodb.database.clone())
        .build()
        .await?;

    // Create application state
    let state = Arc::new(AppState::new(
        config.clone(),
        llm_client,
        stores,
        Arc::new(LogMailer),
        persistence,
    ));

    // Build router
    let app = build_router(state);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Server listening on {}", addr);
    tracing::info!("Health check: http://{}/health", addr);
    tracing::info!("API docs: http://{}/api/docs", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

fn init_logging(config: &Config) {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(env_filter);

    match config.logging.format.as_str() {
        "json" => {
            registry
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            registry
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
    }
}
