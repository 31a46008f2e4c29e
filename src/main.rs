use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use courier::actions::{ActionRegistry, Workspace};
use courier::config::Settings;
use courier::consts::{
    DEFAULT_BIND, DEFAULT_DATA_ROOT, DEFAULT_DATAGEN_URL, DEFAULT_FORMATTER, DEFAULT_MODEL,
};
use courier::dispatch::Dispatcher;
use courier::extractor::anthropic::AnthropicExtractor;
use courier::reader::FileReader;
use courier::server::{AppState, router};

#[derive(Parser)]
#[command(
    name = "courier",
    version,
    about = "Routes plain-English tasks to file-processing actions."
)]
struct Cli {
    /// Address to listen on
    #[arg(long, env = "COURIER_BIND", default_value = DEFAULT_BIND)]
    bind: SocketAddr,

    /// Directory housing task inputs and outputs
    #[arg(long, env = "DATA_ROOT", default_value = DEFAULT_DATA_ROOT)]
    data_root: PathBuf,

    /// Identity passed to the data-generation script
    #[arg(long, env = "USER_EMAIL")]
    user_email: Option<String>,

    /// Formatter invoked as `<formatter> --write <file>`
    #[arg(long, env = "COURIER_FORMATTER", default_value = DEFAULT_FORMATTER)]
    formatter: String,

    /// URL of the data-generation script
    #[arg(long, env = "COURIER_DATAGEN_URL", default_value = DEFAULT_DATAGEN_URL)]
    datagen_url: String,

    /// Anthropic model used for extraction
    #[arg(long, env = "COURIER_MODEL", default_value = DEFAULT_MODEL)]
    model: String,

    /// Anthropic API key
    #[arg(long, env = "ANTHROPIC_API_KEY", hide_env_values = true)]
    anthropic_api_key: Option<String>,

    /// Confine `/read` to this directory (unconfined when omitted)
    #[arg(long, env = "COURIER_READ_ROOT")]
    read_root: Option<PathBuf>,
}

impl From<Cli> for Settings {
    fn from(cli: Cli) -> Self {
        Settings {
            bind: cli.bind,
            data_root: cli.data_root,
            user_email: cli.user_email,
            formatter: cli.formatter,
            datagen_url: cli.datagen_url,
            model: cli.model,
            anthropic_api_key: cli.anthropic_api_key,
            read_root: cli.read_root,
        }
        .normalize()
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let settings = Settings::from(Cli::parse());

    if settings.user_email.is_none() {
        warn!("USER_EMAIL not set; `install uv` tasks will fail");
    }
    if settings.anthropic_api_key.is_none() {
        warn!("ANTHROPIC_API_KEY not set; extraction tasks will fail");
    }

    let extractor = Arc::new(AnthropicExtractor::new(
        settings.model.clone(),
        settings.anthropic_api_key.clone(),
    ));
    let registry = ActionRegistry::standard(&settings, extractor);
    let dispatcher = Dispatcher::new(registry, Workspace::new(&settings.data_root));
    let action_count = dispatcher.registry().len();
    let reader = FileReader::new(settings.read_root.clone());

    let app = router(AppState::new(dispatcher, reader));

    let listener = tokio::net::TcpListener::bind(settings.bind)
        .await
        .with_context(|| format!("failed to bind {}", settings.bind))?;
    info!(
        addr = %settings.bind,
        data_root = %settings.data_root.display(),
        read_root = ?settings.read_root,
        actions = action_count,
        "courier listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("shutting down");
        })
        .await
        .context("server error")
}
