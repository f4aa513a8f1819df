use async_trait::async_trait;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::config::LlmConfig;
use crate::error::InsightError;

/// Time source for the call gate.
#[async_trait]
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
    async fn sleep(&self, duration: Duration);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

#[async_trait]
impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Spacing and bounded backoff for outbound provider calls.
///
/// Every attempt waits until at least `min_interval` has passed since the
/// previous one. A rate-limited attempt sleeps `backoff_base * 2^(n-1)`
/// before attempt n+1; after `max_attempts` the gate gives up with
/// `Exhausted`. Any other error is returned as-is on the first occurrence.
pub struct CallGate {
    clock: Arc<dyn Clock>,
    min_interval: Duration,
    max_attempts: u32,
    backoff_base: Duration,
    last_call: Mutex<Option<Instant>>,
}

impl CallGate {
    pub fn new(cfg: &LlmConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            min_interval: cfg.min_request_interval,
            max_attempts: cfg.max_attempts.max(1),
            backoff_base: cfg.backoff_base,
            last_call: Mutex::new(None),
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Delay after the given 1-based rate-limited attempt.
    pub fn backoff(&self, attempt: u32) -> Duration {
        self.backoff_base
            .checked_mul(2u32.saturating_pow(attempt.saturating_sub(1)))
            .unwrap_or(Duration::MAX)
    }

    /// Block until the spacing rule allows another call, then stamp it.
    pub async fn wait_turn(&self) {
        let mut last = self.last_call.lock().await;
        if let Some(prev) = *last {
            let elapsed = self.clock.now().saturating_duration_since(prev);
            if elapsed < self.min_interval {
                let wait = self.min_interval - elapsed;
                debug!("Spacing provider call by {:?}", wait);
                self.clock.sleep(wait).await;
            }
        }
        *last = Some(self.clock.now());
    }

    pub async fn run<T, F, Fut>(&self, mut call: F) -> Result<T, InsightError>
    where
        F: FnMut() -> Fut + Send,
        Fut: Future<Output = Result<T, InsightError>> + Send,
    {
        let mut attempt = 1;
        loop {
            self.wait_turn().await;
            match call().await {
                Err(InsightError::RateLimited) if attempt < self.max_attempts => {
                    let delay = self.backoff(attempt);
                    warn!(
                        "Rate limited (attempt {}/{}), retrying in {:?}",
                        attempt, self.max_attempts, delay
                    );
                    self.clock.sleep(delay).await;
                    attempt += 1;
                }
                Err(InsightError::RateLimited) => {
                    warn!("Rate limited on all {} attempts", self.max_attempts);
                    return Err(InsightError::Exhausted {
                        attempts: self.max_attempts,
                    });
                }
                other => return other,
            }
        }
    }
}
