use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use distcalc::api::{self, AppState};
use distcalc::config::Config;
use distcalc::producer;
use distcalc::queue::TaskQueue;
use distcalc::registry::ExpressionRegistry;

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    tracing::info!("Starting orchestrator...");

    let registry = Arc::new(ExpressionRegistry::new());
    let queue = TaskQueue::new(config.queue_capacity);

    let producer_registry = registry.clone();
    let producer_queue = queue.clone();
    let period = config.producer_interval;
    tokio::spawn(async move {
        producer::run_producer(producer_registry, producer_queue, period).await;
    });

    let state = AppState {
        registry,
        queue,
        task_wait_timeout: config.task_wait_timeout,
    };
    let app = api::router(state);

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("Orchestrator listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind listener");
    axum::serve(listener, app).await.expect("server error");
}
