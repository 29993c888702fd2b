//! Tracks the single in-flight inference request of a session.

use std::sync::Mutex;
use tokio_util::sync::CancellationToken;

/// Hands out one cancellation token per request.
///
/// Starting a request cancels the one before it. Closing cancels the current
/// request and every request started afterwards.
#[derive(Debug, Default)]
pub(crate) struct InFlight {
    root: CancellationToken,
    current: Mutex<Option<CancellationToken>>,
}

impl InFlight {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Cancels the previous request (if still running) and returns the token
    /// for a new one.
    pub(crate) fn begin(&self) -> CancellationToken {
        let token = self.root.child_token();
        let previous = self
            .current
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .replace(token.clone());

        if let Some(previous) = previous {
            if !previous.is_cancelled() {
                tracing::info!("Cancelling superseded inference request");
                previous.cancel();
            }
        }
        token
    }

    pub(crate) fn close(&self) {
        self.root.cancel();
    }

    pub(crate) fn is_closed(&self) -> bool {
        self.root.is_cancelled()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_begin_cancels_previous() {
        let in_flight = InFlight::new();
        let first = in_flight.begin();
        let second = in_flight.begin();

        assert!(first.is_cancelled());
        assert!(!second.is_cancelled());
    }

    #[test]
    fn test_close_cancels_current_and_future() {
        let in_flight = InFlight::new();
        let current = in_flight.begin();
        in_flight.close();

        assert!(current.is_cancelled());
        assert!(in_flight.is_closed());
        assert!(in_flight.begin().is_cancelled());
    }
}
