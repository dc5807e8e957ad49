use std::error::Error;
use std::sync::Arc;
use std::time::Duration;

use log::info;
use reqwest::ClientBuilder;

use crate::client::{RetryPolicy, TaskClient, TaskClientHttp};
use crate::clock::{Clock, TokioClock};
use crate::worker::Worker;

mod client;
mod clock;
mod config;
mod error;
mod worker;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let config = config::Config::from_env().expect("Failed to load agent configuration");

    let http_client = ClientBuilder::new()
        .timeout(Duration::from_secs(5))
        .build()
        .expect("Failed to build HTTP Client");

    let clock: Arc<dyn Clock> = Arc::new(TokioClock);
    let retry = RetryPolicy {
        attempts: config.push_retries,
        delay: Duration::from_millis(config.push_retry_delay_ms),
    };
    let client: Arc<dyn TaskClient> = Arc::new(TaskClientHttp::new(
        http_client,
        &config.orchestrator,
        retry,
        clock.clone(),
    ));

    info!("Starting {} workers", config.computing_power);

    let mut handles = Vec::with_capacity(config.computing_power);
    for id in 0..config.computing_power {
        let worker = Worker::new(
            id,
            client.clone(),
            clock.clone(),
            Duration::from_millis(config.poll_interval_ms),
        );
        handles.push(tokio::spawn(async move { worker.run().await }));

        // Stagger startup so a fresh pool does not stampede the orchestrator
        clock.sleep(Duration::from_millis(100)).await;
    }

    futures::future::join_all(handles).await;

    Ok(())
}
