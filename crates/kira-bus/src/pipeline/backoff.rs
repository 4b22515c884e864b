// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared exponential-backoff-with-jitter retry loop used by every
//! pipeline and by the LLM Router (C10).

use std::future::Future;
use std::time::Duration;

/// Retries `f` up to `max_retries` additional times after the first
/// attempt, doubling `base` each time and adding up to 50ms of jitter.
/// Returns the last error once retries are exhausted.
pub async fn retry_with_backoff<T, E, F, Fut>(max_retries: u32, base: Duration, mut f: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let mut attempt = 0;
    loop {
        match f().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if attempt >= max_retries {
                    return Err(err);
                }
                let exp = base.saturating_mul(1u32 << attempt.min(16));
                let jitter = Duration::from_millis(rand::random::<u64>() % 50);
                tokio::time::sleep(exp + jitter).await;
                attempt += 1;
            }
        }
    }
}

#[cfg(test)]
#[path = "backoff_tests.rs"]
mod tests;
