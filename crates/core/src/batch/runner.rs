//! Batch runner: bounded worker pool over independent request descriptors
//!
//! Descriptors have no ordering dependency, so the runner spawns one task
//! per descriptor and bounds parallelism with a semaphore sized to the
//! configured worker count. `run` is a synchronization barrier - it returns
//! only once every descriptor is terminal, and every descriptor lands in
//! exactly one of the two result collections.

use std::collections::HashMap;
use std::sync::Arc;

use cohora_domain::{ApiError, BatchConfig, BatchRequest, HttpResponse, Progress, RetryConfig};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, warn};

use super::executor::RequestExecutor;
use super::ports::Transport;
use super::progress::{ProgressCallback, ProgressTracker};

/// Everything a batch run produced, partitioned by terminal outcome
///
/// Each collection is ordered by completion, not submission; the descriptor
/// travels with its outcome so callers can correlate. Failures are data -
/// a batch with failures still returns normally.
#[derive(Debug, Default)]
pub struct BatchOutcome {
    /// Descriptors that reached a 2xx response
    pub successes: Vec<(BatchRequest, HttpResponse)>,
    /// Descriptors that ended in a fatal or exhausted error
    pub failures: Vec<(BatchRequest, ApiError)>,
}

impl BatchOutcome {
    /// Total number of descriptors accounted for
    pub fn len(&self) -> usize {
        self.successes.len() + self.failures.len()
    }

    /// True when the batch produced no outcomes at all
    pub fn is_empty(&self) -> bool {
        self.successes.is_empty() && self.failures.is_empty()
    }
}

/// Orchestrates concurrent execution of a batch of request descriptors
pub struct BatchRunner {
    transport: Arc<dyn Transport>,
    retry_config: RetryConfig,
    batch_config: BatchConfig,
    callback: Option<ProgressCallback>,
}

impl BatchRunner {
    /// Create a runner over the given transport with default configuration
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            retry_config: RetryConfig::default(),
            batch_config: BatchConfig::default(),
            callback: None,
        }
    }

    /// Use a validated retry configuration
    pub fn retry_config(mut self, config: RetryConfig) -> Self {
        self.retry_config = config;
        self
    }

    /// Use a validated batch configuration
    pub fn batch_config(mut self, config: BatchConfig) -> Self {
        self.batch_config = config;
        self
    }

    /// Register a progress callback, invoked once per terminal outcome
    pub fn on_progress<F>(mut self, callback: F) -> Self
    where
        F: Fn(Progress) + Send + Sync + 'static,
    {
        self.callback = Some(Arc::new(callback));
        self
    }

    /// Execute every descriptor and return once all are terminal.
    ///
    /// An empty input returns immediately with two empty collections; no
    /// worker is started and neither the transport nor the progress
    /// callback is touched. Each `run` owns its own aggregator and result
    /// collections - nothing persists across runs.
    pub async fn run(&self, requests: Vec<BatchRequest>) -> BatchOutcome {
        if requests.is_empty() {
            return BatchOutcome::default();
        }

        let total = requests.len();
        let workers = self.batch_config.worker_count();
        debug!(total, workers, "starting batch run");

        let tracker = Arc::new(match &self.callback {
            Some(callback) => ProgressTracker::with_callback(total, Arc::clone(callback)),
            None => ProgressTracker::new(total),
        });
        let executor = Arc::new(RequestExecutor::new(
            Arc::clone(&self.transport),
            self.retry_config,
            self.batch_config.default_timeout,
        ));
        let semaphore = Arc::new(Semaphore::new(workers));

        // Descriptors stay owned here so a worker that dies without
        // returning (a panicking transport) still has its descriptor
        // available for the failures collection.
        let requests: Arc<[BatchRequest]> = requests.into();
        let mut tasks = JoinSet::new();
        let mut task_index = HashMap::with_capacity(total);
        for index in 0..total {
            let requests = Arc::clone(&requests);
            let executor = Arc::clone(&executor);
            let semaphore = Arc::clone(&semaphore);
            let tracker = Arc::clone(&tracker);
            let handle = tasks.spawn(async move {
                let _permit = match semaphore.acquire_owned().await {
                    Ok(permit) => permit,
                    // The semaphore is never closed while tasks hold a clone;
                    // surface it as a failure rather than dropping the
                    // descriptor if that ever changes.
                    Err(_) => {
                        let error = ApiError::Transport("worker pool unavailable".to_string());
                        tracker.record(true);
                        return (index, Err(error));
                    }
                };
                let result = executor.execute(&requests[index]).await;
                // The tracker sees the terminal outcome before the
                // descriptor is placed into a result collection.
                tracker.record(result.is_err());
                (index, result)
            });
            task_index.insert(handle.id(), index);
        }

        let mut outcome = BatchOutcome::default();
        while let Some(joined) = tasks.join_next_with_id().await {
            match joined {
                Ok((_, (index, Ok(response)))) => {
                    outcome.successes.push((requests[index].clone(), response));
                }
                Ok((_, (index, Err(error)))) => {
                    outcome.failures.push((requests[index].clone(), error));
                }
                // A worker only dies without returning when the transport
                // implementation panicked; its descriptor still counts as a
                // failure so the partition stays complete.
                Err(join_error) => {
                    warn!(error = %join_error, "batch worker aborted");
                    if let Some(&index) = task_index.get(&join_error.id()) {
                        tracker.record(true);
                        let error = ApiError::Transport(format!(
                            "worker terminated abnormally: {join_error}"
                        ));
                        outcome.failures.push((requests[index].clone(), error));
                    }
                }
            }
        }

        let progress = tracker.snapshot();
        debug!(
            completed = progress.completed,
            errors = progress.errors,
            elapsed = ?progress.elapsed,
            "batch run finished"
        );
        outcome
    }
}

/// Run a batch with default retry and batch configuration.
///
/// Convenience wrapper over [`BatchRunner`] for callers that do not need
/// custom configuration or progress reporting.
pub async fn run_batch(transport: Arc<dyn Transport>, requests: Vec<BatchRequest>) -> BatchOutcome {
    BatchRunner::new(transport).run(requests).await
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    use async_trait::async_trait;
    use cohora_domain::ErrorCategory;

    use super::super::ports::TransportError;
    use super::*;

    /// Stub that succeeds or fails by URL suffix and counts peak concurrency
    struct CountingTransport {
        calls: AtomicUsize,
        in_flight: AtomicUsize,
        peak_in_flight: AtomicUsize,
    }

    impl CountingTransport {
        fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                in_flight: AtomicUsize::new(0),
                peak_in_flight: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl Transport for CountingTransport {
        async fn send(
            &self,
            request: &BatchRequest,
            _timeout: Duration,
        ) -> Result<HttpResponse, TransportError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak_in_flight.fetch_max(current, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(2)).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);

            if request.url.ends_with("/fail") {
                Ok(HttpResponse { status: 400, body: "bad request".to_string() })
            } else {
                Ok(HttpResponse { status: 200, body: "ok".to_string() })
            }
        }
    }

    #[tokio::test]
    async fn empty_batch_returns_immediately_without_transport_or_callback() {
        let transport = Arc::new(CountingTransport::new());
        let callbacks = Arc::new(AtomicUsize::new(0));
        let callbacks_clone = Arc::clone(&callbacks);

        let outcome = BatchRunner::new(transport.clone())
            .on_progress(move |_| {
                callbacks_clone.fetch_add(1, Ordering::SeqCst);
            })
            .run(Vec::new())
            .await;

        assert!(outcome.is_empty());
        assert_eq!(transport.calls.load(Ordering::SeqCst), 0);
        assert_eq!(callbacks.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn partitions_every_descriptor_exactly_once() {
        let transport = Arc::new(CountingTransport::new());
        let requests: Vec<_> = (0..20)
            .map(|i| {
                if i % 4 == 0 {
                    BatchRequest::get(format!("http://test/{i}/fail"))
                } else {
                    BatchRequest::get(format!("http://test/{i}"))
                }
            })
            .collect();
        let submitted: std::collections::HashSet<_> =
            requests.iter().map(|r| r.url.clone()).collect();

        let outcome = BatchRunner::new(transport).run(requests).await;

        assert_eq!(outcome.len(), 20);
        assert_eq!(outcome.successes.len(), 15);
        assert_eq!(outcome.failures.len(), 5);

        let mut returned = std::collections::HashSet::new();
        for (request, _) in &outcome.successes {
            assert!(returned.insert(request.url.clone()), "duplicate {}", request.url);
        }
        for (request, error) in &outcome.failures {
            assert!(returned.insert(request.url.clone()), "duplicate {}", request.url);
            assert_eq!(error.category(), ErrorCategory::Client);
        }
        assert_eq!(returned, submitted);
    }

    #[tokio::test]
    async fn worker_pool_is_bounded_by_configuration() {
        let transport = Arc::new(CountingTransport::new());
        let config = BatchConfig::new(Some(3), Duration::from_secs(10)).expect("valid config");
        let requests: Vec<_> =
            (0..30).map(|i| BatchRequest::get(format!("http://test/{i}"))).collect();

        let outcome =
            BatchRunner::new(transport.clone()).batch_config(config).run(requests).await;

        assert_eq!(outcome.successes.len(), 30);
        assert!(
            transport.peak_in_flight.load(Ordering::SeqCst) <= 3,
            "no more than max_workers requests in flight"
        );
    }

    #[tokio::test]
    async fn progress_callback_observes_monotonic_completion() {
        let transport = Arc::new(CountingTransport::new());
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = Arc::clone(&seen);

        let requests: Vec<_> =
            (0..10).map(|i| BatchRequest::get(format!("http://test/{i}"))).collect();

        let outcome = BatchRunner::new(transport)
            .on_progress(move |progress| {
                seen_clone.lock().expect("test lock").push(progress);
            })
            .run(requests)
            .await;

        assert_eq!(outcome.len(), 10);
        let snapshots = seen.lock().expect("test lock");
        assert_eq!(snapshots.len(), 10);
        for (index, snapshot) in snapshots.iter().enumerate() {
            assert_eq!(snapshot.completed, index + 1, "completion order, no lost updates");
            assert_eq!(snapshot.total, 10);
            assert!(snapshot.completed <= snapshot.total);
            assert!(snapshot.average_per_thousand_seconds.is_some());
        }
    }

    /// Transport with a bug: panics outright for certain URLs
    struct PanickingTransport;

    #[async_trait]
    impl Transport for PanickingTransport {
        async fn send(
            &self,
            request: &BatchRequest,
            _timeout: Duration,
        ) -> Result<HttpResponse, TransportError> {
            assert!(!request.url.ends_with("/boom"), "transport bug");
            Ok(HttpResponse { status: 200, body: String::new() })
        }
    }

    #[tokio::test]
    async fn panicking_transport_still_accounts_for_its_descriptor() {
        let completions = Arc::new(AtomicUsize::new(0));
        let completions_clone = Arc::clone(&completions);
        let requests = vec![
            BatchRequest::get("http://test/1"),
            BatchRequest::get("http://test/2/boom"),
            BatchRequest::get("http://test/3"),
        ];

        let outcome = BatchRunner::new(Arc::new(PanickingTransport))
            .on_progress(move |_| {
                completions_clone.fetch_add(1, Ordering::SeqCst);
            })
            .run(requests)
            .await;

        assert_eq!(outcome.len(), 3, "the dead worker's descriptor is not dropped");
        assert_eq!(outcome.successes.len(), 2);
        assert_eq!(outcome.failures.len(), 1);
        assert_eq!(completions.load(Ordering::SeqCst), 3);

        let (request, error) = &outcome.failures[0];
        assert!(request.url.ends_with("/boom"));
        // A mid-batch breakdown is a transport failure, never a
        // configuration error
        assert_eq!(error.category(), ErrorCategory::Transport);
    }

    #[tokio::test]
    async fn run_batch_convenience_uses_defaults() {
        let transport = Arc::new(CountingTransport::new());
        let outcome =
            run_batch(transport, vec![BatchRequest::get("http://test/one")]).await;
        assert_eq!(outcome.successes.len(), 1);
        assert!(outcome.failures.is_empty());
    }
}
