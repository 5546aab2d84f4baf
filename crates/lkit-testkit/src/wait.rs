use std::time::Duration;

use tokio::time::{sleep, Instant};
use tracing::debug;

use crate::client::LedgerClient;
use crate::error::{TestkitError, TestkitResult};

/// Polling behaviour for [`wait_blocks`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WaitOptions {
    pub poll_interval: Duration,
    pub timeout: Duration,
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(100),
            timeout: Duration::from_secs(60),
        }
    }
}

/// Wait until the chain is `count` blocks past its current height.
///
/// Returns the block number observed when the target was reached.
pub async fn wait_blocks<C>(client: &C, count: u64, options: WaitOptions) -> TestkitResult<u64>
where
    C: LedgerClient + ?Sized,
{
    let start = client.block_number().await?;
    let target = start.saturating_add(count);
    wait_to_block(client, target, options).await
}

/// Wait until the chain reaches block `target`.
pub async fn wait_to_block<C>(client: &C, target: u64, options: WaitOptions) -> TestkitResult<u64>
where
    C: LedgerClient + ?Sized,
{
    let deadline = Instant::now() + options.timeout;
    loop {
        let current = client.block_number().await?;
        if current >= target {
            debug!(target, current, "reached block");
            return Ok(current);
        }
        if Instant::now() >= deadline {
            return Err(TestkitError::Timeout {
                target,
                reached: current,
            });
        }
        debug!(target, current, "waiting for block");
        sleep(options.poll_interval).await;
    }
}
