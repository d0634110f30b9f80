use std::time::Duration;

use crate::consts::consts::DEFAULT_STORE_TIMEOUT;

#[derive(Debug, Clone)]
pub struct RepositoryOptions {
    pub timeout: Duration,
}

// Implements: https://rust-unofficial.github.io/patterns/patterns/creational/builder.html
impl RepositoryOptions {
    /// Deadline applied to every individual store call. A call that runs over it is abandoned
    /// and reported as `StoreError::Timeout`.
    pub fn set_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for RepositoryOptions {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_STORE_TIMEOUT,
        }
    }
}
