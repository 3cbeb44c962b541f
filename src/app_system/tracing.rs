use tracing::{info, Subscriber};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::config::AppConfig;

/// Installs the global subscriber, then reports the loaded configuration.
/// `RUST_LOG` wins over the configured filter.
///
/// ```text
/// RUST_LOG=debug cargo run
/// RUST_LOG=delivery_orders::clients=debug,info cargo run
/// ```
pub fn setup_tracing(config: &AppConfig) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_filter));
    subscriber(env_filter, true, std::io::stdout).init();
    log_config(config);
}

fn subscriber<W>(env_filter: EnvFilter, ansi: bool, writer: W) -> impl Subscriber + Send + Sync
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_timer(tracing_subscriber::fmt::time::uptime())
        .with_ansi(ansi)
        .with_writer(writer)
        .compact()
        .finish()
}

fn log_config(config: &AppConfig) {
    info!(?config, "Configuration loaded");
}
