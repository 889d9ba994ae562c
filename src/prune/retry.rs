//! Throttle-aware wrapper for remote provider calls
//!
//! A call rejected with the provider's throttle status is retried after a
//! fixed delay, without limit. Any other failure is returned to the caller
//! untouched.

use crate::provider::ProviderError;
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tracing::debug;

/// Delay between attempts after a throttle response
pub const DEFAULT_THROTTLE_DELAY: Duration = Duration::from_secs(5);

/// Retries remote operations for as long as the provider throttles them
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThrottleRetry {
    delay: Duration,
}

impl ThrottleRetry {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    /// Run `op` until it succeeds or fails with a non-throttle error
    ///
    /// `description` is only used for logging.
    pub async fn call<T, F, Fut>(&self, description: &str, mut op: F) -> Result<T, ProviderError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, ProviderError>>,
    {
        let mut throttled = 0u32;
        loop {
            match op().await {
                Ok(value) => {
                    if throttled > 0 {
                        debug!("{} succeeded after {} throttled attempts", description, throttled);
                    }
                    return Ok(value);
                }
                Err(err) if err.is_throttle() => {
                    throttled += 1;
                    debug!(
                        "'Too many requests' received for {}, sleeping {:?}",
                        description, self.delay
                    );
                    sleep(self.delay).await;
                }
                Err(err) => return Err(err),
            }
        }
    }
}

impl Default for ThrottleRetry {
    fn default() -> Self {
        Self::new(DEFAULT_THROTTLE_DELAY)
    }
}
