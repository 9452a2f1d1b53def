//! Sensor capture delay.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

/// Time the sensor needs to capture a fingerprint.
pub const DEFAULT_SENSOR_LATENCY: Duration = Duration::from_secs(10);

/// Wait that models physical capture before the bind request is sent.
#[async_trait]
pub trait Latency: Send + Sync {
    async fn wait(&self);
}

#[async_trait]
impl<T: Latency + ?Sized> Latency for Arc<T> {
    async fn wait(&self) {
        (**self).wait().await
    }
}

/// Fixed delay on the tokio timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedLatency(pub Duration);

impl FixedLatency {
    /// The default sensor delay.
    pub fn sensor() -> Self {
        Self(DEFAULT_SENSOR_LATENCY)
    }

    /// No delay.
    pub fn none() -> Self {
        Self(Duration::ZERO)
    }
}

impl Default for FixedLatency {
    fn default() -> Self {
        Self::sensor()
    }
}

#[async_trait]
impl Latency for FixedLatency {
    async fn wait(&self) {
        if !self.0.is_zero() {
            tokio::time::sleep(self.0).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_fixed_latency_waits_full_duration() {
        let start = tokio::time::Instant::now();
        FixedLatency::sensor().wait().await;
        assert!(start.elapsed() >= DEFAULT_SENSOR_LATENCY);
    }

    #[tokio::test]
    async fn test_zero_latency_returns_immediately() {
        FixedLatency::none().wait().await;
    }
}
