use std::time::Duration;

use async_trait::async_trait;

/// Sleep abstraction so poll pacing and retry backoff can be tested without
/// wall-clock waits.
#[async_trait]
pub trait Clock: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

pub struct TokioClock;

#[async_trait]
impl Clock for TokioClock {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}
