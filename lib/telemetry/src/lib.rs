#[macro_use]
extern crate lazy_static;
#[macro_use]
extern crate prometheus;

use std::convert::Infallible;
use std::future::Future;

use prometheus::{Encoder, Histogram, HistogramVec, IntCounter, IntCounterVec, TextEncoder};

lazy_static! {
    static ref HANDLED: IntCounterVec = register_int_counter_vec!(
        "handled_total",
        "Operations that completed successfully",
        &["component", "operation"]
    )
    .unwrap();
    static ref FAILED: IntCounterVec = register_int_counter_vec!(
        "failed_total",
        "Operations that failed",
        &["component", "operation"]
    )
    .unwrap();
    static ref DURATION: HistogramVec = register_histogram_vec!(
        "duration_seconds",
        "Operation duration in seconds",
        &["component", "operation"]
    )
    .unwrap();
}

// Lets routine rejections (no task available, duplicate submission) opt out
// of being counted as failures
pub trait IsErr {
    fn is_err(&self) -> bool {
        true
    }
}

impl IsErr for Infallible {
    fn is_err(&self) -> bool {
        false
    }
}

impl IsErr for () {
    fn is_err(&self) -> bool {
        false
    }
}

impl IsErr for Box<dyn std::error::Error> {}

#[derive(Clone)]
pub struct Measure {
    handled: IntCounter,
    failed: IntCounter,
    duration: Histogram,
}

impl Measure {
    pub fn new(component: &str, operation: &str) -> Measure {
        Measure {
            handled: HANDLED.with_label_values(&[component, operation]),
            failed: FAILED.with_label_values(&[component, operation]),
            duration: DURATION.with_label_values(&[component, operation]),
        }
    }

    pub async fn stats<F, T, E>(&self, inner: F) -> Result<T, E>
    where
        F: Future<Output = Result<T, E>>,
        E: IsErr,
    {
        let timer = self.duration.start_timer();
        let r = inner.await;
        timer.observe_duration();
        match &r {
            Ok(_) => self.handled.inc(),
            Err(e) if !e.is_err() => self.handled.inc(),
            Err(_) => self.failed.inc(),
        }
        r
    }
}

pub fn encode() -> Result<String, Box<dyn std::error::Error>> {
    let mut buffer = Vec::new();
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    encoder.encode(&metric_families, &mut buffer)?;
    Ok(String::from_utf8(buffer)?)
}

#[cfg(test)]
mod tests {
    use std::convert::Infallible;

    use tokio::time::Duration;

    use super::*;

    enum TestError {
        Fatal,
        Recoverable,
    }

    impl IsErr for TestError {
        fn is_err(&self) -> bool {
            match self {
                Self::Fatal => true,
                Self::Recoverable => false,
            }
        }
    }

    #[tokio::test]
    async fn test_success() {
        let component = "component";
        let operation = "test_success";

        let m = Measure::new(component, operation);

        let f = async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            Ok::<_, Infallible>("")
        };

        let _ = m.stats(f).await;

        assert_eq!(HANDLED.with_label_values(&[component, operation]).get(), 1);
        assert_eq!(FAILED.with_label_values(&[component, operation]).get(), 0);
        assert_eq!(
            DURATION
                .with_label_values(&[component, operation])
                .get_sample_count(),
            1
        );
    }

    #[tokio::test]
    async fn test_failure() {
        let component = "component";
        let operation = "test_failure";

        let m = Measure::new(component, operation);

        let f = async move { Err::<(), _>(TestError::Fatal) };

        let _ = m.stats(f).await;

        assert_eq!(HANDLED.with_label_values(&[component, operation]).get(), 0);
        assert_eq!(FAILED.with_label_values(&[component, operation]).get(), 1);
    }

    #[tokio::test]
    async fn test_recoverable() {
        let component = "component";
        let operation = "test_recoverable";

        let m = Measure::new(component, operation);

        let f = async move { Err::<(), _>(TestError::Recoverable) };

        let _ = m.stats(f).await;

        assert_eq!(HANDLED.with_label_values(&[component, operation]).get(), 1);
        assert_eq!(FAILED.with_label_values(&[component, operation]).get(), 0);
    }

    #[tokio::test]
    async fn test_encode() {
        let m = Measure::new("component", "test_encode");
        let _ = m.stats(async { Ok::<_, Infallible>(()) }).await;

        let encoded = encode().unwrap();
        assert!(encoded.contains("handled_total"));
    }
}
