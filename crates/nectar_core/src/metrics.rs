//! Episode statistics and structured logging.

use std::time::{Duration, Instant};

/// Running totals over the episodes driven by one environment.
#[derive(Debug, Clone)]
pub struct EpisodeMetrics {
    episodes: u64,
    steps: u64,
    total_nectar: f64,
    total_reward: f64,
    best_reward: Option<f32>,
    start_time: Instant,
}

impl Default for EpisodeMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl EpisodeMetrics {
    #[must_use]
    pub fn new() -> Self {
        Self {
            episodes: 0,
            steps: 0,
            total_nectar: 0.0,
            total_reward: 0.0,
            best_reward: None,
            start_time: Instant::now(),
        }
    }

    /// Records a finished episode and logs its summary.
    pub fn record_episode(&mut self, steps: u32, nectar: f32, reward: f32) {
        self.episodes += 1;
        self.steps += u64::from(steps);
        self.total_nectar += f64::from(nectar);
        self.total_reward += f64::from(reward);
        self.best_reward = Some(self.best_reward.map_or(reward, |b| b.max(reward)));

        tracing::info!(
            episode = self.episodes,
            steps = steps,
            nectar = nectar,
            reward = reward,
            "Episode finished"
        );
    }

    #[must_use]
    pub fn episodes(&self) -> u64 {
        self.episodes
    }

    #[must_use]
    pub fn steps(&self) -> u64 {
        self.steps
    }

    #[must_use]
    pub fn best_reward(&self) -> Option<f32> {
        self.best_reward
    }

    /// Mean reward per finished episode, zero before the first one.
    #[must_use]
    pub fn mean_reward(&self) -> f64 {
        if self.episodes == 0 {
            0.0
        } else {
            self.total_reward / self.episodes as f64
        }
    }

    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Logs the totals collected so far.
    pub fn log_summary(&self) {
        tracing::info!(
            episodes = self.episodes,
            steps = self.steps,
            total_nectar = self.total_nectar,
            mean_reward = self.mean_reward(),
            elapsed_ms = self.elapsed().as_millis() as u64,
            "Run summary"
        );
    }
}

/// Initialize tracing subscriber for logging.
///
/// `RUST_LOG` overrides the default `info` level.
pub fn init_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing::subscriber::set_global_default(
        tracing_subscriber::FmtSubscriber::builder()
            .with_env_filter(filter)
            .finish(),
    )
    .ok();
}
