//! Bounded worker pool for platform calls

use std::future::Future;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;

/// Runs submitted futures on the Tokio runtime, at most `size` at a time
///
/// [`submit`](WorkerPool::submit) spawns immediately; the spawned task waits
/// for a permit before polling the submitted future, so excess submissions
/// queue in FIFO order. Dropping the returned handle detaches the task, it
/// does not cancel it.
#[derive(Clone, Debug)]
pub struct WorkerPool {
    semaphore: Arc<Semaphore>,
    size: usize,
}

impl WorkerPool {
    /// Create a pool with `size` workers (at least one)
    pub fn new(size: usize) -> Self {
        let size = size.max(1);
        Self {
            semaphore: Arc::new(Semaphore::new(size)),
            size,
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Workers currently idle
    pub fn available_workers(&self) -> usize {
        self.semaphore.available_permits()
    }

    /// Submit a future and get a handle to its output
    pub fn submit<F, T>(&self, future: F) -> JoinHandle<T>
    where
        F: Future<Output = T> + Send + 'static,
        T: Send + 'static,
    {
        let semaphore = Arc::clone(&self.semaphore);

        tokio::spawn(async move {
            // The semaphore is never closed, so this always yields a permit
            let _permit = semaphore.acquire_owned().await;
            future.await
        })
    }
}

impl Default for WorkerPool {
    fn default() -> Self {
        Self::new(core_runtime::config::DEFAULT_WORKER_POOL_SIZE)
    }
}
