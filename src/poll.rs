use std::future::Future;
use std::time::Duration;

use tokio::time::sleep;
use tokio_util::sync::CancellationToken;

use crate::error::Result;

/// What one poll tick decided.
pub enum PollStep<T> {
    /// Not terminal yet, keep polling.
    Continue,
    /// Terminal, stop with this value.
    Done(T),
}

/// Fixed-interval poller for backend task status. Replaces the repeating
/// timers of the browser client with a cancellable loop whose clock tests
/// can pause.
///
/// There is deliberately no attempt cap or backoff: the loop runs until the
/// backend reports a terminal state, the token is cancelled, or a transport
/// error ends it. Under a backend that never terminates a task this polls
/// forever; that matches the behavior being reimplemented and is a known
/// risk, not a feature.
pub struct Poller {
    interval: Duration,
    cancel: CancellationToken,
}

impl Poller {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            cancel: CancellationToken::new(),
        }
    }

    /// Token that stops the loop from outside. Cancellation is cooperative;
    /// an in-flight status request still completes first.
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Drive `tick` every interval until it reports a terminal value.
    /// Returns `Ok(None)` when cancelled, and propagates the first transport
    /// error (polling fails open: one failed status request ends the loop).
    pub async fn run<T, F, Fut>(&self, mut tick: F) -> Result<Option<T>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<PollStep<T>>>,
    {
        loop {
            tokio::select! {
                _ = self.cancel.cancelled() => return Ok(None),
                _ = sleep(self.interval) => {}
            }
            match tick().await? {
                PollStep::Continue => {}
                PollStep::Done(value) => return Ok(Some(value)),
            }
        }
    }
}
