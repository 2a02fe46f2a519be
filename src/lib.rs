pub mod api_client;
pub mod config;
pub mod flow;
pub mod guide;
pub mod location;
pub mod models;
pub mod session;
pub mod shell;

use tracing_subscriber::EnvFilter;

pub async fn run() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let api = api_client::TriageClient::from_env();
    tracing::info!(backend = api.base_url(), "Using triage backend");

    if let Err(e) = shell::run_shell(api).await {
        tracing::error!(error = %e, "Shell terminated with an I/O error");
    }
}
