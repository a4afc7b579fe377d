//! Single-retry policy for failures that never reached the service.

use log::{debug, warn};
use std::future::Future;

use super::error::TransportFailure;

/// Which try of a logical request is in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Attempt(u8);

impl Attempt {
    pub const FIRST: Attempt = Attempt(0);
    pub const RETRY: Attempt = Attempt(1);

    pub fn number(self) -> u8 {
        self.0
    }

    pub fn is_retry(self) -> bool {
        self.0 > 0
    }

    /// The attempt after this one, if the policy allows another.
    pub fn next(self) -> Option<Attempt> {
        if self.is_retry() {
            None
        } else {
            Some(Attempt::RETRY)
        }
    }
}

/// Runs `operation`, repeating it once when the first try fails transiently.
///
/// The same operation is invoked again unmodified except for the [`Attempt`]
/// it receives. Server-responded and non-transport failures return at once.
pub async fn with_single_retry<F, Fut, T>(
    operation_name: &str,
    operation: F,
) -> Result<T, TransportFailure>
where
    F: Fn(Attempt) -> Fut,
    Fut: Future<Output = Result<T, TransportFailure>>,
{
    let mut attempt = Attempt::FIRST;

    loop {
        match operation(attempt).await {
            Ok(result) => return Ok(result),
            Err(failure) => {
                let next = match attempt.next() {
                    Some(next) if failure.is_transient() => next,
                    _ => {
                        debug!(
                            "{}: giving up on attempt {}: {:?}",
                            operation_name,
                            attempt.number(),
                            failure
                        );
                        return Err(failure);
                    }
                };

                warn!(
                    "{}: attempt {} failed ({:?}), retrying once...",
                    operation_name,
                    attempt.number(),
                    failure
                );
                attempt = next;
            }
        }
    }
}
