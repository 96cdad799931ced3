use std::time::Duration;

/// Default pause after each bill detail request
pub const DEFAULT_DETAIL_DELAY: Duration = Duration::from_millis(500);

/// Default pause between two jurisdictions
pub const DEFAULT_JURISDICTION_DELAY: Duration = Duration::from_millis(1000);

/// Fixed pauses between sequential requests, keeping the fetch loop under the
/// API's rate limit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PacingPolicy {
    pub detail_delay: Duration,
    pub jurisdiction_delay: Duration,
}

impl PacingPolicy {
    pub fn new(detail_delay: Duration, jurisdiction_delay: Duration) -> Self {
        Self {
            detail_delay,
            jurisdiction_delay,
        }
    }

    /// No pauses at all
    pub fn none() -> Self {
        Self::new(Duration::ZERO, Duration::ZERO)
    }

    pub async fn after_detail(&self) {
        pause(self.detail_delay).await;
    }

    pub async fn after_jurisdiction(&self) {
        pause(self.jurisdiction_delay).await;
    }
}

impl Default for PacingPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_DETAIL_DELAY, DEFAULT_JURISDICTION_DELAY)
    }
}

async fn pause(delay: Duration) {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}
