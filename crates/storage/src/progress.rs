//! Upload progress signal.
//!
//! Observers watch a percentage that is monotonically non-decreasing for
//! the lifetime of one upload: it resets to 0 when an upload starts and is
//! cleared (back to idle) after completion or failure, never left stale.

use tokio::sync::watch;

/// Progress state shared between an uploader and its observers.
///
/// `None` means idle (no upload in flight); `Some(pct)` is the current
/// percentage of the active upload.
#[derive(Debug)]
pub struct UploadProgress {
    tx: watch::Sender<Option<u8>>,
}

impl UploadProgress {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(None);
        Self { tx }
    }

    /// Obtain a receiver for observing progress changes.
    pub fn watch(&self) -> watch::Receiver<Option<u8>> {
        self.tx.subscribe()
    }

    /// Current value, for polling observers.
    pub fn current(&self) -> Option<u8> {
        *self.tx.borrow()
    }

    /// Begin a new upload: progress resets to 0.
    pub fn start(&self) {
        self.tx.send_replace(Some(0));
    }

    /// Report progress for the active upload.
    ///
    /// Values are capped at 100 and never move backwards; a report lower
    /// than the current percentage is ignored. Reports while idle are
    /// ignored too -- only [`start`](Self::start) opens a window.
    pub fn report(&self, pct: u8) {
        let pct = pct.min(100);
        self.tx.send_if_modified(|current| match current {
            Some(existing) if pct > *existing => {
                *current = Some(pct);
                true
            }
            _ => false,
        });
    }

    /// End the window: back to idle after completion or failure.
    pub fn clear(&self) {
        self.tx.send_replace(None);
    }
}

impl Default for UploadProgress {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_idle() {
        let progress = UploadProgress::new();
        assert_eq!(progress.current(), None);
    }

    #[test]
    fn start_resets_to_zero() {
        let progress = UploadProgress::new();
        progress.start();
        progress.report(60);
        progress.clear();

        progress.start();
        assert_eq!(progress.current(), Some(0));
    }

    #[test]
    fn progress_is_monotonic() {
        let progress = UploadProgress::new();
        progress.start();

        progress.report(40);
        assert_eq!(progress.current(), Some(40));

        // A lower report never moves the needle backwards.
        progress.report(10);
        assert_eq!(progress.current(), Some(40));

        progress.report(90);
        assert_eq!(progress.current(), Some(90));
    }

    #[test]
    fn reports_cap_at_one_hundred() {
        let progress = UploadProgress::new();
        progress.start();
        progress.report(250);
        assert_eq!(progress.current(), Some(100));
    }

    #[test]
    fn reports_while_idle_are_ignored() {
        let progress = UploadProgress::new();
        progress.report(50);
        assert_eq!(progress.current(), None);
    }

    #[test]
    fn clear_returns_to_idle() {
        let progress = UploadProgress::new();
        progress.start();
        progress.report(100);
        progress.clear();
        assert_eq!(progress.current(), None);
    }

    #[tokio::test]
    async fn watchers_observe_updates() {
        let progress = UploadProgress::new();
        let mut rx = progress.watch();

        progress.start();
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow_and_update(), Some(0));

        progress.report(100);
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow_and_update(), Some(100));
    }
}
