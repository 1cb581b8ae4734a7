use std::time::Duration;

/// Runtime configuration for both binaries, read once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Orchestrator bind port (`PORT`).
    pub port: u16,
    /// Producer emission interval (`TIME_ADDITION_MS`).
    pub producer_interval: Duration,
    /// Task queue capacity (`TASK_QUEUE_CAPACITY`).
    pub queue_capacity: usize,
    /// How long a task fetch may wait before giving up (`TASK_WAIT_TIMEOUT_MS`).
    pub task_wait_timeout: Duration,
    /// Number of agent workers (`COMPUTING_POWER`).
    pub computing_power: usize,
    /// Base URL the agent talks to (`ORCHESTRATOR_URL`).
    pub orchestrator_url: String,
    /// Worker sleep between iterations, also the retry backoff (`WORKER_POLL_MS`).
    pub worker_poll_interval: Duration,
}

impl Config {
    pub fn from_env() -> Self {
        Config {
            port: env_u64("PORT", 8080) as u16,
            producer_interval: Duration::from_millis(env_u64("TIME_ADDITION_MS", 500)),
            queue_capacity: env_u64("TASK_QUEUE_CAPACITY", 100) as usize,
            task_wait_timeout: Duration::from_millis(env_u64("TASK_WAIT_TIMEOUT_MS", 10_000)),
            computing_power: env_u64("COMPUTING_POWER", 2) as usize,
            orchestrator_url: std::env::var("ORCHESTRATOR_URL")
                .unwrap_or_else(|_| "http://localhost:8080".to_string()),
            worker_poll_interval: Duration::from_millis(env_u64("WORKER_POLL_MS", 1000)),
        }
    }
}

/// Unset or unparsable values fall back to the default.
fn env_u64(key: &str, default: u64) -> u64 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
