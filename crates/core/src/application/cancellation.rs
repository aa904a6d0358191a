// Cancellation and deadlines for store operations
//
// Both helpers drop the in-flight future on expiry. Dropping a future that owns
// an open transaction rolls that transaction back.

use crate::error::{Result, StoreError};
use std::future::Future;
use std::time::Duration;
use tokio::sync::watch;
use tracing::warn;

/// Cancellation signal observed by running operations
#[derive(Clone)]
pub struct CancelToken {
    rx: watch::Receiver<bool>,
}

impl CancelToken {
    /// Check if cancellation was requested
    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }

    /// Wait for the cancellation signal.
    ///
    /// Never resolves if the sender is dropped without cancelling.
    pub async fn cancelled(&mut self) {
        loop {
            if *self.rx.borrow_and_update() {
                return;
            }
            if self.rx.changed().await.is_err() {
                std::future::pending::<()>().await;
            }
        }
    }
}

/// Cancellation sender
pub struct CancelSender {
    tx: watch::Sender<bool>,
}

impl CancelSender {
    /// Signal cancellation to every token
    pub fn cancel(&self) {
        let _ = self.tx.send(true);
    }
}

/// Create a cancellation channel
pub fn cancel_channel() -> (CancelSender, CancelToken) {
    let (tx, rx) = watch::channel(false);
    (CancelSender { tx }, CancelToken { rx })
}

/// Run `operation`, aborting it once `deadline` elapses
pub async fn with_deadline<T, F>(deadline: Duration, operation: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match tokio::time::timeout(deadline, operation).await {
        Ok(result) => result,
        Err(_) => {
            warn!(deadline_ms = deadline.as_millis() as u64, "Store operation exceeded its deadline");
            Err(StoreError::Cancelled(format!(
                "deadline of {}ms exceeded",
                deadline.as_millis()
            )))
        }
    }
}

/// Run `operation`, aborting it as soon as `token` is cancelled
pub async fn with_cancellation<T, F>(mut token: CancelToken, operation: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    if token.is_cancelled() {
        return Err(StoreError::Cancelled("cancelled before start".into()));
    }

    tokio::select! {
        result = operation => result,
        _ = token.cancelled() => {
            warn!("Store operation cancelled by caller");
            Err(StoreError::Cancelled("cancelled by caller".into()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    #[tokio::test]
    async fn test_deadline_passes_through_fast_operations() {
        let value = with_deadline(Duration::from_secs(1), async { Ok(7) })
            .await
            .unwrap();
        assert_eq!(value, 7);
    }

    #[tokio::test]
    async fn test_deadline_expiry_is_cancelled() {
        let err = with_deadline(Duration::from_millis(10), async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(())
        })
        .await
        .unwrap_err();

        assert_eq!(err.code(), ErrorCode::Cancelled);
        assert!(!err.is_retryable());
    }

    #[tokio::test]
    async fn test_cancel_token_aborts_operation() {
        let (sender, token) = cancel_channel();

        let handle = tokio::spawn(with_cancellation(token, async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(())
        }));
        sender.cancel();

        let err = handle.await.unwrap().unwrap_err();
        assert_eq!(err.code(), ErrorCode::Cancelled);
    }

    #[tokio::test]
    async fn test_already_cancelled_token_skips_operation() {
        let (sender, token) = cancel_channel();
        sender.cancel();

        let err = with_cancellation(token, async { Ok(()) }).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::Cancelled);
    }

    #[tokio::test]
    async fn test_dropped_sender_does_not_cancel() {
        let (sender, token) = cancel_channel();
        drop(sender);

        let value = with_cancellation(token, async { Ok(3) }).await.unwrap();
        assert_eq!(value, 3);
    }
}
