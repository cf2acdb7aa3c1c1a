use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio_util::sync::CancellationToken;

use nook_core::completer::{Completer, CompletionRequest};
use nook_core::errors::CompleterError;
use nook_llm::OpenAiCompleter;
use nook_server::{ChatService, ServerConfig};
use nook_store::{run_flush_loop, ChannelRegistry, FlushSignal, VaultSink};
use nook_telemetry::TelemetryConfig;
use nook_vault::{load_or_create_key, Vault};

const REGISTRY_FILE: &str = "chat.enc";

#[derive(Parser)]
#[command(name = "nook", about = "Personal web server with persistent chat channels")]
struct Cli {
    /// Port to listen on.
    #[arg(long, default_value_t = 8080)]
    port: u16,

    /// Home directory (defaults to ~/nook).
    #[arg(long)]
    home: Option<PathBuf>,
}

/// Stand-in completer when no credential is configured; every prompt
/// surfaces the missing-credential error as its reply.
struct UnconfiguredCompleter;

#[async_trait::async_trait]
impl Completer for UnconfiguredCompleter {
    fn name(&self) -> &str {
        "unconfigured"
    }

    async fn complete(&self, _request: &CompletionRequest) -> Result<String, CompleterError> {
        Err(CompleterError::MissingCredential)
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    nook_telemetry::init_telemetry(&TelemetryConfig::default());
    tracing::info!("starting nook");

    // Home and cache directories. Failure here is fatal: nothing can
    // be persisted without them.
    let home = cli.home.unwrap_or_else(|| dirs_home().join("nook"));
    std::fs::create_dir_all(&home).expect("failed to create home directory");
    let cache = home.join("cache");
    std::fs::create_dir_all(&cache).expect("failed to create cache directory");

    // The process key: generated once, then loaded forever after.
    let key = load_or_create_key(&home.join("key")).expect("failed to load or create key");
    let vault = Vault::new(key, cache);
    let sink = VaultSink::new(vault, REGISTRY_FILE);

    let (flush, flush_rx) = FlushSignal::new();
    let registry = Arc::new(ChannelRegistry::new(flush));

    // Load the persisted registry before any request is served. A
    // corrupt snapshot aborts startup rather than serving partial data.
    match sink.load().expect("failed to load channel snapshot") {
        Some(channels) => {
            tracing::info!(channels = channels.len(), "registry restored");
            registry.restore(channels);
        }
        None => tracing::info!("no snapshot found, starting empty"),
    }

    let completer: Arc<dyn Completer> = match OpenAiCompleter::from_env() {
        Ok(c) => Arc::new(c),
        Err(e) => {
            tracing::warn!(error = %e, "no completion credential; replies will carry the error");
            Arc::new(UnconfiguredCompleter)
        }
    };

    let service = Arc::new(ChatService::new(Arc::clone(&registry), completer));
    service.seed_default_channels();

    let cancel = CancellationToken::new();
    let flush_task = tokio::spawn(run_flush_loop(
        Arc::clone(&registry),
        Arc::new(sink),
        flush_rx,
        cancel.clone(),
    ));

    let config = ServerConfig { port: cli.port };
    let handle = nook_server::start(config, service)
        .await
        .expect("failed to start server");
    tracing::info!(port = handle.port, "nook ready");

    tokio::signal::ctrl_c()
        .await
        .expect("failed to listen for ctrl+c");

    tracing::info!("shutting down");
    cancel.cancel();
    let _ = flush_task.await;
}

fn dirs_home() -> PathBuf {
    std::env::var("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/tmp"))
}
