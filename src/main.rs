use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use vault_picks::{
    api::{create_router, AppState},
    config::Config,
    core::NumberRange,
    db::{create_pool, create_redis_client, Cache, PgStore},
    services::{
        providers::{claude::ClaudeSource, openai::OpenAiSource, NumberSource},
        Recommender,
    },
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = Config::from_env()?;

    let pool = create_pool(&config.database_url).await?;
    let redis_client = create_redis_client(&config.redis_url)?;
    let cache = Cache::new(redis_client);
    let store = Arc::new(PgStore::new(pool, cache));

    let claude: Arc<dyn NumberSource> = Arc::new(ClaudeSource::new(
        config.anthropic_api_key.clone(),
        config.anthropic_api_url.clone(),
        config.anthropic_model.clone(),
    ));
    let gpt: Arc<dyn NumberSource> = Arc::new(OpenAiSource::new(
        config.openai_api_key.clone(),
        config.openai_api_url.clone(),
        config.openai_model.clone(),
    ));

    let range = NumberRange::new(config.number_min, config.number_max);
    let recommender = Arc::new(Recommender::new(claude, gpt, range));

    let addr = format!("{}:{}", config.host, config.port);
    let state = AppState::new(Arc::new(config), store, recommender);
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(addr = %addr, "Server listening");
    axum::serve(listener, app).await?;

    Ok(())
}
