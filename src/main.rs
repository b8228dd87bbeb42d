use anyhow::Context;
use multitool::server::build_router;
use multitool::util::{init_tracing, AppState};
use multitool::AppConfig;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = AppConfig::from_env();
    tracing::debug!(?config, "configuration loaded");

    let template = config.template_dir.join(multitool::render::RESULT_TEMPLATE);
    if !template.is_file() {
        tracing::warn!(
            path = %template.display(),
            "HTML template not found; output=html requests will fail until it is deployed"
        );
    }

    if config.joke.api_key.is_some() {
        tracing::info!(upstream = %config.joke.base_url, model = %config.joke.model, "Joke upstream configured");
    } else {
        tracing::warn!("OPENAI_API_KEY not set; /random-joke will answer 503");
    }
    if !config.escape_output {
        tracing::warn!("Output escaping disabled; message text is inserted into envelopes verbatim");
    }

    let state = AppState::from_config(&config);
    let app = build_router(state);

    let listener = TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;
    tracing::info!("MultiTool listening on http://{}", config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("MultiTool stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
