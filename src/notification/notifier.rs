use async_trait::async_trait;
use tracing::{error, info, warn};

use super::notice::{ConfirmPrompt, Notice, Severity};

/// Port for telling the user something.
///
/// Implementations may show a dialog, push a toast, or simply log.
/// Delivery is best-effort: a notifier must not fail the action that
/// raised the notice.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, notice: Notice);
}

/// Port for asking the user a yes/no question before a destructive action.
#[async_trait]
pub trait Confirmer: Send + Sync {
    /// Returns `true` when the user accepted.
    async fn confirm(&self, prompt: ConfirmPrompt) -> bool;
}

/// A [`Notifier`] that writes notices to the `tracing` log.
///
/// Useful for headless hosts and as a default in development.
#[derive(Debug, Default, Clone)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, notice: Notice) {
        let message = notice.message();
        match notice.severity() {
            Severity::Info => info!(?notice, %message, "user notice"),
            Severity::Warning => warn!(?notice, %message, "user notice"),
            Severity::Error => error!(?notice, %message, "user notice"),
        }
    }
}

/// A [`Confirmer`] that always gives the same answer.
///
/// Hosts without an interactive surface use `AutoConfirm(true)`.
#[derive(Debug, Clone, Copy)]
pub struct AutoConfirm(pub bool);

#[async_trait]
impl Confirmer for AutoConfirm {
    async fn confirm(&self, prompt: ConfirmPrompt) -> bool {
        info!(prompt = prompt.message(), answer = self.0, "auto-confirm");
        self.0
    }
}


#[cfg(test)]
mod tests {
    use super::testing::RecordingNotifier;
    use super::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn notifier_trait_object_records_notices() {
        let rec = Arc::new(RecordingNotifier::default());
        let n: Arc<dyn Notifier> = rec.clone();

        n.notify(Notice::EmptyAlbum).await;
        n.notify(Notice::StorageFull).await;

        assert_eq!(
            rec.seen.lock().unwrap().as_slice(),
            &[Notice::EmptyAlbum, Notice::StorageFull]
        );
    }

    #[tokio::test]
    async fn log_notifier_does_not_fail() {
        LogNotifier.notify(Notice::CompatibilityMode).await;
        LogNotifier.notify(Notice::RenderFailed).await;
    }

    #[tokio::test]
    async fn auto_confirm_returns_fixed_answer() {
        assert!(AutoConfirm(true).confirm(ConfirmPrompt::ClearAlbum).await);
        assert!(!AutoConfirm(false).confirm(ConfirmPrompt::RemovePhoto).await);
    }

    fn assert_send_sync<T: ?Sized + Send + Sync>() {}

    #[test]
    fn ports_are_send_sync() {
        assert_send_sync::<dyn Notifier>();
        assert_send_sync::<dyn Confirmer>();
    }
}
