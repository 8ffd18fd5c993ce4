//! Bounded concurrency harness
//!
//! Fans a batch of independent async tasks out across a worker pool bounded
//! by a caller-supplied cap, returning results index-aligned to the inputs
//! regardless of completion order. One task's failure is confined to its own
//! result slot; siblings run to completion. Retrying is not this layer's
//! job; see [`crate::retry::RetryPolicy`].

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// Failure of one unit of work, attached to its result slot
#[derive(Error, Debug)]
pub enum TaskFailure {
    #[error("Task panicked: {0}")]
    Panicked(String),

    #[error("Task was cancelled")]
    Cancelled,
}

/// Worker pool executing a batch of independent tasks
///
/// # Example
///
/// ```
/// use clinicsim_application::Harness;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let tasks: Vec<_> = (0..4).map(|i| async move { i * 10 }).collect();
/// let results = Harness::bounded(2).run(tasks).await;
/// let values: Vec<_> = results.into_iter().map(Result::unwrap).collect();
/// assert_eq!(values, vec![0, 10, 20, 30]);
/// # }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Harness {
    max_workers: Option<usize>,
}

impl Harness {
    /// Run every task concurrently (worker cap = batch size).
    pub fn full_fanout() -> Self {
        Self { max_workers: None }
    }

    /// Run at most `max_workers` tasks at a time.
    pub fn bounded(max_workers: usize) -> Self {
        Self {
            max_workers: Some(max_workers.max(1)),
        }
    }

    /// Execute the batch; `results[i]` belongs to `tasks[i]`.
    pub async fn run<T, F>(&self, tasks: Vec<F>) -> Vec<Result<T, TaskFailure>>
    where
        F: Future<Output = T> + Send + 'static,
        T: Send + 'static,
    {
        let total = tasks.len();
        let cap = self.max_workers.unwrap_or(total).max(1);
        let semaphore = Arc::new(Semaphore::new(cap));

        let mut join_set = JoinSet::new();
        let mut slot_of = HashMap::with_capacity(total);
        for (index, task) in tasks.into_iter().enumerate() {
            let semaphore = Arc::clone(&semaphore);
            let handle = join_set.spawn(async move {
                // The semaphore is never closed, so acquisition only fails
                // if this task is dropped first.
                let _permit = semaphore.acquire_owned().await.expect("semaphore open");
                (index, task.await)
            });
            slot_of.insert(handle.id(), index);
        }

        let mut slots: Vec<Option<Result<T, TaskFailure>>> = (0..total).map(|_| None).collect();
        while let Some(joined) = join_set.join_next_with_id().await {
            match joined {
                Ok((_, (index, value))) => slots[index] = Some(Ok(value)),
                Err(join_error) => {
                    let index = slot_of[&join_error.id()];
                    let failure = if join_error.is_panic() {
                        TaskFailure::Panicked(join_error.to_string())
                    } else {
                        TaskFailure::Cancelled
                    };
                    slots[index] = Some(Err(failure));
                }
            }
        }

        slots
            .into_iter()
            .map(|slot| slot.expect("every spawned task reports exactly once"))
            .collect()
    }
}
