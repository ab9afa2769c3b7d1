//! Ordered fan-out/fan-in
//!
//! Runs a fixed set of futures cooperatively inside the calling task and
//! joins them in input order. Used for both the unbounded page fan-out and
//! the bounded detail fan-out.

use crate::error::{Error, Result};
use futures::future::try_join_all;
use std::future::Future;
use tokio::sync::Semaphore;

/// Await every task, returning results in input order.
///
/// `limit = None` polls all tasks at once. `Some(n)` keeps at most `n`
/// in flight (`0` is treated as `1`). The first error aborts the join and
/// drops the remaining tasks; completed results are discarded.
pub async fn join_ordered<F, T>(tasks: Vec<F>, limit: Option<usize>) -> Result<Vec<T>>
where
    F: Future<Output = Result<T>>,
{
    match limit {
        None => try_join_all(tasks).await,
        Some(n) => {
            let semaphore = Semaphore::new(n.max(1));
            let semaphore = &semaphore;
            try_join_all(tasks.into_iter().map(|task| async move {
                let _permit = semaphore
                    .acquire()
                    .await
                    .map_err(|e| Error::Other(format!("Concurrency limiter closed: {e}")))?;
                task.await
            }))
            .await
        }
    }
}
