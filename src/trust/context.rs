use std::time::Duration;

use tokio_util::sync::CancellationToken;

/// Cancellation and deadline scope for a single trust resolution.
///
/// Cloning shares the underlying token, so cancelling any clone cancels them all.
#[derive(Debug, Clone)]
pub struct ResolveContext {
    token: CancellationToken,
    timeout: Option<Duration>,
}

impl ResolveContext {
    pub fn new(token: CancellationToken) -> Self {
        Self { token, timeout: None }
    }

    /// A context that is never cancelled and has no timeout.
    pub fn background() -> Self {
        Self::new(CancellationToken::new())
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Apply `timeout` only when no timeout has been set yet.
    pub fn or_timeout(mut self, timeout: Duration) -> Self {
        self.timeout.get_or_insert(timeout);
        self
    }

    /// A context cancelled together with this one, but cancellable on its own.
    pub fn child(&self) -> Self {
        Self { token: self.token.child_token(), timeout: self.timeout }
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Resolves once the context is cancelled.
    pub async fn cancelled(&self) {
        self.token.cancelled().await
    }
}

impl Default for ResolveContext {
    fn default() -> Self {
        Self::background()
    }
}
