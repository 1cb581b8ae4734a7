use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use distcalc::agent::{run_worker, CoordinatorClient};
use distcalc::config::Config;

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    tracing::info!(
        "Starting agent: {} workers against {}",
        config.computing_power,
        config.orchestrator_url
    );

    let client = Arc::new(CoordinatorClient::new(&config.orchestrator_url));

    let mut handles = Vec::new();
    for worker_id in 0..config.computing_power {
        let client = client.clone();
        let poll_interval = config.worker_poll_interval;
        handles.push(tokio::spawn(async move {
            run_worker(worker_id, client, poll_interval).await;
        }));
    }

    // Worker loops never return; park here for process lifetime.
    for handle in handles {
        let _ = handle.await;
    }
}
