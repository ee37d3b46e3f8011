use anyhow::Context;
use api::build_app;
use config::{ApiConfig, LoggingConfig};
use services::content::ContentServiceFactory;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration first to get logging settings
    let config = ApiConfig::load_or_env().unwrap_or_else(|e| {
        eprintln!("Failed to load configuration: {}", e);
        eprintln!("Set SANITY_PROJECT_ID or provide a config file.");
        std::process::exit(1);
    });

    init_tracing(&config.logging);

    let factory = ContentServiceFactory::from_config(&config).unwrap_or_else(|e| {
        tracing::error!(error = %e, "Failed to create CMS client");
        std::process::exit(1);
    });

    tracing::info!(
        project_id = %config.sanity.project_id,
        dataset = %config.sanity.dataset,
        cache_mode = ?config.cache.mode,
        preview = config.sanity.preview_available(),
        "Content service configured"
    );

    let app = build_app(Arc::new(factory));

    let bind_address = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("failed to bind {bind_address}"))?;

    tracing::info!(address = %bind_address, "Server started successfully");
    tracing::info!("Content Endpoints (prefix with /en for English):");
    tracing::info!("  - GET /api/homepage");
    tracing::info!("  - GET /api/pages/{{slug}}");
    tracing::info!("  - GET /api/program, /api/artists, /api/artists/{{slug}}");
    tracing::info!("  - GET /api/events?date=YYYY-MM-DD, /api/events/dates, /api/events/{{slug}}");
    tracing::info!("  - GET /api/articles, /api/articles/{{slug}}");
    tracing::info!("  - GET /api/slugs/{{type}}, /api/search?q=");
    tracing::info!("  - GET /api/cache/stats, POST /api/cache/clear");

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}

fn init_tracing(logging_config: &LoggingConfig) {
    // Build the filter string from the logging configuration
    let mut filter = logging_config.level.clone();

    for (module, level) in &logging_config.modules {
        filter.push_str(&format!(",{}={}", module, level));
    }

    match logging_config.format.as_str() {
        "json" => {
            tracing_subscriber::fmt()
                .json()
                .with_env_filter(filter)
                .init();
        }
        "compact" => {
            tracing_subscriber::fmt()
                .compact()
                .with_env_filter(filter)
                .init();
        }
        _ => {
            tracing_subscriber::fmt()
                .pretty()
                .with_env_filter(filter)
                .init();
        }
    }
}
