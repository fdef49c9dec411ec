use clinrag_config::load_settings;
use clinrag_server::{create_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter(tracing_subscriber::EnvFilter::from_default_env()).json().init();

    let config_path = std::env::var("CLINRAG_CONFIG_FILE").ok();
    let settings = load_settings(config_path.as_deref())?;
    let bind_addr = settings.server.bind_addr.clone();

    let state = AppState::build(settings).await?;
    let router = create_router(state);

    tracing::info!(%bind_addr, "starting clinrag-server");
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
