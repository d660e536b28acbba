use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Bounds for external process invocations.
///
/// Cloning shares the cancellation token, so cancelling any clone cancels
/// every operation that was handed one. The timeout applies to each process
/// invocation individually.
#[derive(Debug, Clone)]
pub struct ExecContext {
    token: CancellationToken,
    timeout: Option<Duration>,
}

impl Default for ExecContext {
    fn default() -> Self {
        Self::new()
    }
}

impl ExecContext {
    pub fn new() -> Self {
        Self {
            token: CancellationToken::new(),
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_token(mut self, token: CancellationToken) -> Self {
        self.token = token;
        self
    }

    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}
