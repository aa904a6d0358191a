// Transaction Coordinator
//
// Runs a sequence of repository calls as one atomic unit of work on the write
// handle: commit on success, rollback and surface the original error on failure.

use crate::error::Result;
use crate::port::{RepositoryTransaction, TransactionalRepository};
use futures::future::BoxFuture;
use tracing::{debug, warn};

/// Execute `work` inside a single transaction.
///
/// A rollback failure is logged as a secondary error and never replaces the
/// error returned by `work`. Dropping the returned future before it completes
/// drops the open transaction, which rolls it back.
///
/// # Example
///
/// ```text
/// let project = run_atomic(repo, |tx| Box::pin(async move {
///     tx.get_project("p1").await
/// })).await?;
/// ```
pub async fn run_atomic<T, F>(repo: &dyn TransactionalRepository, work: F) -> Result<T>
where
    T: Send,
    F: for<'t> FnOnce(&'t mut dyn RepositoryTransaction) -> BoxFuture<'t, Result<T>> + Send,
{
    let mut tx = repo.begin_transaction().await?;

    match work(tx.as_mut()).await {
        Ok(value) => {
            tx.commit().await?;
            debug!("Transaction committed");
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback_err) = tx.rollback().await {
                warn!(
                    error = %err,
                    rollback_error = %rollback_err,
                    "Transaction rollback failed"
                );
            } else {
                debug!(error = %err, "Transaction rolled back");
            }
            Err(err)
        }
    }
}
