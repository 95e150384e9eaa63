use crate::extender::Extender;
use crate::{ExtenderError, Result};
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Default time between purge passes.
///
/// Only the cadence of the sweep; how long a promise lives is `promise_ttl`,
/// which has no default.
pub const DEFAULT_REAP_INTERVAL: Duration = Duration::from_secs(15);

/// Configuration for the promise reaper
#[derive(Debug, Clone)]
pub struct ReaperConfig {
    /// Age after which a promise is considered stale
    pub promise_ttl: Duration,
    /// Interval between purge passes
    pub reap_interval: Duration,
}

impl ReaperConfig {
    /// Create a config with the given TTL and the default interval
    pub fn new(promise_ttl: Duration) -> Self {
        Self {
            promise_ttl,
            reap_interval: DEFAULT_REAP_INTERVAL,
        }
    }
}

/// Periodically drops promises the scheduler never turned into a binding
pub struct PromiseReaper {
    extender: Arc<Extender>,
    config: ReaperConfig,
    ttl: chrono::Duration,
}

impl PromiseReaper {
    pub fn new(extender: Arc<Extender>, config: ReaperConfig) -> Result<Self> {
        if config.promise_ttl.is_zero() {
            return Err(ExtenderError::invalid_config(
                "promise TTL must be greater than zero",
                "Set --promise-ttl to how long a scheduling decision may take, in seconds",
            ));
        }
        if config.reap_interval.is_zero() {
            return Err(ExtenderError::invalid_config(
                "reap interval must be greater than zero",
                "Set --reap-interval to a positive number of seconds",
            ));
        }

        let ttl = chrono::Duration::from_std(config.promise_ttl).map_err(|e| {
            ExtenderError::invalid_config(
                format!("promise TTL {:?} is out of range: {}", config.promise_ttl, e),
                "Use a TTL of at most a few hours",
            )
        })?;

        Ok(Self {
            extender,
            config,
            ttl,
        })
    }

    /// Run the reaper loop until cancelled
    pub async fn run(&self, token: CancellationToken) -> Result<()> {
        info!(
            "Starting promise reaper (interval: {:?}, ttl: {:?})",
            self.config.reap_interval, self.config.promise_ttl
        );

        let mut interval = tokio::time::interval(self.config.reap_interval);
        // Consume the first immediate tick, nothing can be stale yet
        interval.tick().await;

        loop {
            tokio::select! {
                _ = token.cancelled() => {
                    info!("Promise reaper shutting down");
                    return Ok(());
                }
                _ = interval.tick() => {
                    self.reap_once();
                }
            }
        }
    }

    /// Purge promises older than the TTL, returning how many were removed
    pub fn reap_once(&self) -> usize {
        let cutoff = Utc::now() - self.ttl;
        let removed = self.extender.purge_expired(cutoff);

        if removed > 0 {
            info!(
                "Released {} stale VF promises (older than {}), {} outstanding",
                removed,
                cutoff,
                self.extender.global_promised_count()
            );
        } else {
            debug!("No stale VF promises");
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sriov_core::{ExtenderArgs, Node, Pod, Quantity, TOTAL_VFS_RESOURCE};
    use std::collections::BTreeMap;

    fn promise_once(extender: &Extender) {
        let mut pod = Pod::default();
        pod.metadata.name = Some("test-pod".to_string());
        pod.metadata.annotations = Some(BTreeMap::from([(
            "networks".to_string(),
            "sriov".to_string(),
        )]));

        let mut node = Node::default();
        node.metadata.name = Some("node1".to_string());
        node.status = Some(Default::default());
        node.status.as_mut().unwrap().allocatable = Some(BTreeMap::from([(
            TOTAL_VFS_RESOURCE.to_string(),
            Quantity("100".to_string()),
        )]));

        let outcome = extender.filter(&ExtenderArgs::new(pod, vec![node]));
        assert_eq!(outcome.into_result().unwrap().accepted().len(), 1);
    }

    #[test]
    fn test_rejects_zero_durations() {
        let extender = Arc::new(Extender::default());

        assert!(PromiseReaper::new(extender.clone(), ReaperConfig::new(Duration::ZERO)).is_err());

        let config = ReaperConfig {
            promise_ttl: Duration::from_secs(30),
            reap_interval: Duration::ZERO,
        };
        assert!(PromiseReaper::new(extender, config).is_err());
    }

    #[test]
    fn test_default_interval() {
        let config = ReaperConfig::new(Duration::from_secs(30));
        assert_eq!(config.reap_interval, DEFAULT_REAP_INTERVAL);
    }

    #[test]
    fn test_fresh_promises_survive() {
        let extender = Arc::new(Extender::default());
        promise_once(&extender);

        let reaper =
            PromiseReaper::new(extender.clone(), ReaperConfig::new(Duration::from_secs(3600)))
                .unwrap();

        assert_eq!(reaper.reap_once(), 0);
        assert_eq!(extender.global_promised_count(), 1);
    }

    #[tokio::test]
    async fn test_stale_promises_are_released() {
        let extender = Arc::new(Extender::default());
        promise_once(&extender);
        promise_once(&extender);

        let reaper =
            PromiseReaper::new(extender.clone(), ReaperConfig::new(Duration::from_millis(10)))
                .unwrap();

        tokio::time::sleep(Duration::from_millis(50)).await;

        assert_eq!(reaper.reap_once(), 2);
        assert_eq!(extender.global_promised_count(), 0);
        assert_eq!(extender.promise_count(), 0);
    }

    #[tokio::test]
    async fn test_run_stops_on_cancel() {
        let extender = Arc::new(Extender::default());
        let config = ReaperConfig {
            promise_ttl: Duration::from_millis(10),
            reap_interval: Duration::from_millis(20),
        };
        let reaper = PromiseReaper::new(extender.clone(), config).unwrap();
        promise_once(&extender);

        let token = CancellationToken::new();
        let run_token = token.clone();
        let handle = tokio::spawn(async move { reaper.run(run_token).await });

        tokio::time::sleep(Duration::from_millis(200)).await;
        token.cancel();

        let result = tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .unwrap()
            .unwrap();
        assert!(result.is_ok());
        assert_eq!(extender.global_promised_count(), 0);
    }
}
