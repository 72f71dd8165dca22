use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::{Duration, Instant};

use log::warn;
use tokio::task::JoinHandle;

/// Periodic background work owned by a feature.
///
/// The window loop is synchronous, so finished jobs are collected by polling
/// the task handle with a no-op waker on each tick instead of awaiting it.
pub(crate) struct PeriodicJob<T> {
    interval: Duration,
    last_started: Option<Instant>,
    pending: Option<JoinHandle<T>>,
}

impl<T: Send + 'static> PeriodicJob<T> {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_started: None,
            pending: None,
        }
    }

    /// True when no job is running and the interval has elapsed.
    pub fn is_due(&self) -> bool {
        self.pending.is_none()
            && self
                .last_started
                .map_or(true, |started| started.elapsed() >= self.interval)
    }

    /// Record that a run began now, optionally tracking its task.
    pub fn started(&mut self, handle: Option<JoinHandle<T>>) {
        self.last_started = Some(Instant::now());
        self.pending = handle;
    }

    pub fn is_running(&self) -> bool {
        self.pending.is_some()
    }

    /// Take the result of a finished run without blocking.
    pub fn poll_finished(&mut self) -> Option<T> {
        let handle = self.pending.as_mut()?;

        let waker = futures::task::noop_waker();
        let mut cx = Context::from_waker(&waker);

        match Pin::new(handle).poll(&mut cx) {
            Poll::Pending => None,
            Poll::Ready(result) => {
                self.pending = None;
                match result {
                    Ok(value) => Some(value),
                    Err(e) => {
                        warn!("Background refresh task failed: {}", e);
                        None
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_job_is_due() {
        let job: PeriodicJob<()> = PeriodicJob::new(Duration::from_secs(30));
        assert!(job.is_due());
        assert!(!job.is_running());
    }

    #[test]
    fn test_started_job_waits_for_interval() {
        let mut job: PeriodicJob<()> = PeriodicJob::new(Duration::from_secs(30));
        job.started(None);
        assert!(!job.is_due());
        assert_eq!(job.poll_finished(), None);
    }

    #[tokio::test]
    async fn test_finished_task_is_collected_once() {
        let mut job = PeriodicJob::new(Duration::ZERO);
        job.started(Some(tokio::spawn(async { 7 })));

        let mut result = None;
        for _ in 0..100 {
            result = job.poll_finished();
            if result.is_some() {
                break;
            }
            tokio::task::yield_now().await;
        }

        assert_eq!(result, Some(7));
        assert!(!job.is_running());
        assert!(job.is_due());
    }
}
