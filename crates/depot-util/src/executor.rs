//! Bounded pool for fallible provider tasks.
//!
//! The expansion engine runs a single sequential coordinator; everything
//! that touches external I/O (dependency lists, artifact paths) goes
//! through this pool. Width is bounded by a semaphore, each submission
//! yields a single-use handle, and `shutdown` aborts all in-flight work
//! so the first failure surfaces without waiting for the rest.

use std::sync::{Arc, Mutex};

use tokio::sync::Semaphore;
use tokio::task::{AbortHandle, JoinHandle};

use crate::errors::{DepotError, DepotResult};

/// Default pool width: one worker per host core.
pub fn default_threads() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4)
}

/// A bounded pool of fallible tasks.
pub struct Executor {
    semaphore: Arc<Semaphore>,
    aborts: Mutex<Vec<AbortHandle>>,
}

impl Executor {
    pub fn new(threads: usize) -> Self {
        Self {
            semaphore: Arc::new(Semaphore::new(threads.max(1))),
            aborts: Mutex::new(Vec::new()),
        }
    }

    /// Submit a blocking, fallible task and receive its single-use handle.
    ///
    /// The task waits for a pool permit before running. Tasks submitted
    /// after `shutdown`, or still waiting when it fires, resolve to
    /// [`DepotError::Canceled`].
    pub fn submit<T, F>(&self, task: F) -> TaskHandle<T>
    where
        T: Send + 'static,
        F: FnOnce() -> DepotResult<T> + Send + 'static,
    {
        let semaphore = self.semaphore.clone();
        let handle = tokio::spawn(async move {
            let _permit = semaphore.acquire_owned().await.map_err(|_| {
                DepotError::Canceled {
                    message: "worker pool shut down before the task started".to_string(),
                }
            })?;
            match tokio::task::spawn_blocking(task).await {
                Ok(result) => result,
                Err(err) => Err(DepotError::Canceled {
                    message: format!("worker task did not complete: {err}"),
                }),
            }
        });
        if let Ok(mut aborts) = self.aborts.lock() {
            aborts.push(handle.abort_handle());
        }
        TaskHandle { inner: handle }
    }

    /// Abort all in-flight tasks and refuse new ones.
    ///
    /// Already-running blocking sections finish on their own thread but
    /// their results are discarded; pending handles resolve to
    /// [`DepotError::Canceled`].
    pub fn shutdown(&self) {
        tracing::debug!("shutting down worker pool");
        self.semaphore.close();
        let handles = match self.aborts.lock() {
            Ok(mut aborts) => std::mem::take(&mut *aborts),
            Err(_) => Vec::new(),
        };
        for handle in handles {
            handle.abort();
        }
    }
}

/// Single-use handle to a submitted task's result.
pub struct TaskHandle<T> {
    inner: JoinHandle<DepotResult<T>>,
}

impl<T> TaskHandle<T> {
    /// Wait for the task to complete and take its result.
    pub async fn join(self) -> DepotResult<T> {
        match self.inner.await {
            Ok(result) => result,
            Err(err) if err.is_cancelled() => Err(DepotError::Canceled {
                message: "task aborted by pool shutdown".to_string(),
            }),
            Err(err) => Err(DepotError::Canceled {
                message: format!("worker panicked: {err}"),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn submit_returns_value() {
        let pool = Executor::new(2);
        let handle = pool.submit(|| Ok(41 + 1));
        assert_eq!(handle.join().await.unwrap(), 42);
    }

    #[tokio::test]
    async fn submit_propagates_error() {
        let pool = Executor::new(2);
        let handle = pool.submit::<(), _>(|| {
            Err(DepotError::Config {
                message: "boom".to_string(),
            })
        });
        let err = handle.join().await.unwrap_err();
        assert!(matches!(err, DepotError::Config { .. }));
    }

    #[tokio::test]
    async fn shutdown_cancels_queued_tasks() {
        let pool = Executor::new(1);
        let slow = pool.submit(|| {
            std::thread::sleep(std::time::Duration::from_millis(200));
            Ok(())
        });
        // The single permit is held by `slow`; this one waits in the queue.
        let queued = pool.submit(|| Ok(()));
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        pool.shutdown();
        let err = queued.join().await.unwrap_err();
        assert!(matches!(err, DepotError::Canceled { .. }));
        drop(slow);
    }

    #[tokio::test]
    async fn submit_after_shutdown_is_canceled() {
        let pool = Executor::new(1);
        pool.shutdown();
        let handle = pool.submit(|| Ok(1));
        let err = handle.join().await.unwrap_err();
        assert!(matches!(err, DepotError::Canceled { .. }));
    }
}
