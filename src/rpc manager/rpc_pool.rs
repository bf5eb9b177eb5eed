//! Pooled RPC access for checkpoint anchors
//!
//! - Round-robin over configured endpoints
//! - Endpoints that fail repeatedly are cooled down for a fixed period
//! - Load shedding once too many fetches are in flight
//! - Every fetch is bounded by the configured timeout
//!
//! There is no retry inside the pool. A failed fetch fails the request and
//! the next request starts on the next endpoint.
use async_trait::async_trait;
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::{commitment_config::CommitmentConfig, hash::Hash};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::{debug, instrument, warn};

use super::{AnchorSource, RpcManagerConfig, RpcManagerError};

/// Endpoint with failure tracking
struct TrackedEndpoint {
    url: String,
    client: Arc<RpcClient>,
    consecutive_failures: AtomicU64,
    total_requests: AtomicU64,
    successful_requests: AtomicU64,
    cooldown_until: RwLock<Option<Instant>>,
}

impl std::fmt::Debug for TrackedEndpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrackedEndpoint")
            .field("url", &self.url)
            .field("consecutive_failures", &self.consecutive_failures)
            .field("total_requests", &self.total_requests)
            .field("successful_requests", &self.successful_requests)
            .finish_non_exhaustive()
    }
}

impl TrackedEndpoint {
    fn new(url: String, timeout: Duration, commitment: CommitmentConfig) -> Self {
        let client = Arc::new(RpcClient::new_with_timeout_and_commitment(
            url.clone(),
            timeout,
            commitment,
        ));
        Self {
            url,
            client,
            consecutive_failures: AtomicU64::new(0),
            total_requests: AtomicU64::new(0),
            successful_requests: AtomicU64::new(0),
            cooldown_until: RwLock::new(None),
        }
    }

    async fn is_in_cooldown(&self) -> bool {
        match *self.cooldown_until.read().await {
            Some(until) => Instant::now() < until,
            None => false,
        }
    }

    async fn record_success(&self) {
        self.total_requests.fetch_add(1, Ordering::Relaxed);
        self.successful_requests.fetch_add(1, Ordering::Relaxed);
        self.consecutive_failures.store(0, Ordering::Relaxed);
        *self.cooldown_until.write().await = None;
    }

    async fn record_failure(&self, threshold: u64, cooldown: Duration) {
        self.total_requests.fetch_add(1, Ordering::Relaxed);
        let failures = self.consecutive_failures.fetch_add(1, Ordering::Relaxed) + 1;
        if failures >= threshold {
            warn!(
                url = %self.url,
                failures = failures,
                cooldown_secs = cooldown.as_secs(),
                "Endpoint entering cooldown"
            );
            *self.cooldown_until.write().await = Some(Instant::now() + cooldown);
        }
    }
}

/// Decrements the in-flight counter when dropped
struct InFlight<'a>(&'a AtomicU64);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::Relaxed);
    }
}

/// Pooled network client
#[derive(Debug)]
pub struct RpcPool {
    endpoints: Vec<Arc<TrackedEndpoint>>,
    current_index: AtomicU64,
    request_timeout: Duration,
    failure_threshold: u64,
    cooldown_period: Duration,
    active_requests: AtomicU64,
    max_concurrent_requests: u64,
}

impl RpcPool {
    pub fn new(config: &RpcManagerConfig) -> Result<Self, RpcManagerError> {
        config.validate()?;
        let commitment = config.commitment_config()?;
        let request_timeout = Duration::from_millis(config.timeout_ms);

        let endpoints = config
            .endpoints
            .iter()
            .map(|url| Arc::new(TrackedEndpoint::new(url.clone(), request_timeout, commitment)))
            .collect();

        Ok(Self {
            endpoints,
            current_index: AtomicU64::new(0),
            request_timeout,
            failure_threshold: config.failure_threshold.max(1),
            cooldown_period: Duration::from_secs(config.cooldown_secs),
            active_requests: AtomicU64::new(0),
            max_concurrent_requests: config.max_concurrent_requests,
        })
    }

    pub fn endpoint_count(&self) -> usize {
        self.endpoints.len()
    }

    pub fn get_active_requests(&self) -> u64 {
        self.active_requests.load(Ordering::Relaxed)
    }

    /// Next endpoint in round-robin order that is not cooling down
    async fn select_endpoint(&self) -> Result<Arc<TrackedEndpoint>, RpcManagerError> {
        let total = self.endpoints.len();
        let start = self.current_index.fetch_add(1, Ordering::Relaxed) as usize;
        let mut cooling_down = 0;

        for offset in 0..total {
            let endpoint = &self.endpoints[(start + offset) % total];
            if endpoint.is_in_cooldown().await {
                cooling_down += 1;
                debug!(url = %endpoint.url, "Skipping endpoint in cooldown");
                continue;
            }
            return Ok(Arc::clone(endpoint));
        }

        Err(RpcManagerError::NoHealthyEndpoints {
            total,
            cooling_down,
        })
    }
}

#[async_trait]
impl AnchorSource for RpcPool {
    #[instrument(skip(self))]
    async fn latest_anchor(&self, commitment: CommitmentConfig) -> Result<Hash, RpcManagerError> {
        let active = self.active_requests.fetch_add(1, Ordering::Relaxed) + 1;
        let _in_flight = InFlight(&self.active_requests);
        if active > self.max_concurrent_requests {
            warn!(
                active = active,
                max = self.max_concurrent_requests,
                "Load shedding: rejecting anchor fetch"
            );
            return Err(RpcManagerError::Overloaded { active });
        }

        let endpoint = self.select_endpoint().await?;
        let started = Instant::now();

        let result = tokio::time::timeout(
            self.request_timeout,
            endpoint
                .client
                .get_latest_blockhash_with_commitment(commitment),
        )
        .await;

        crate::metrics::metrics()
            .anchor_fetch_latency
            .observe(started.elapsed().as_secs_f64());

        let outcome = match result {
            Ok(Ok((hash, last_valid_block_height))) => {
                endpoint.record_success().await;
                debug!(
                    url = %endpoint.url,
                    anchor = %hash,
                    last_valid_block_height = last_valid_block_height,
                    "Fetched checkpoint anchor"
                );
                Ok(hash)
            }
            Ok(Err(e)) => {
                endpoint
                    .record_failure(self.failure_threshold, self.cooldown_period)
                    .await;
                Err(RpcManagerError::from_client_error(e, &endpoint.url))
            }
            Err(_) => {
                endpoint
                    .record_failure(self.failure_threshold, self.cooldown_period)
                    .await;
                Err(RpcManagerError::Timeout {
                    endpoint: endpoint.url.clone(),
                    timeout_ms: self.request_timeout.as_millis() as u64,
                })
            }
        };

        if let Err(e) = &outcome {
            warn!(
                endpoint = e.endpoint().unwrap_or(&endpoint.url),
                error = %e,
                "Anchor fetch failed"
            );
        }
        outcome
    }
}
