use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use serde_json::Value;
use tokio::task::JoinHandle;

use crate::error::ApiError;

/// Single-resolution result of one endpoint call.
///
/// The request is already in flight when a `Deferred` is returned: the work
/// runs on a spawned tokio task, so it completes even if the `Deferred` is
/// dropped. Awaiting yields the parsed response or the rejection reason,
/// exactly once.
///
/// Rejections decided before any I/O (such as a missing argument-name
/// configuration) are ready immediately and can be awaited on any executor.
/// Sending a request needs a tokio runtime; without one the result resolves
/// to [`ApiError::Transport`] instead of sending.
///
/// # Example
///
/// ```ignore
/// let pending = client.api().at("user.login").unwrap().call(vec![json!("alice"), json!("pw")]);
/// // ...other work while the request is in flight...
/// let session = pending.await?;
/// ```
#[derive(Debug)]
#[must_use = "the request still runs, but its outcome is lost unless the Deferred is awaited"]
pub struct Deferred {
    state: State,
}

#[derive(Debug)]
enum State {
    /// Outcome known up front; taken on first completion.
    Ready(Option<Result<Value, ApiError>>),
    Spawned(JoinHandle<Result<Value, ApiError>>),
}

impl Deferred {
    /// Run `work` on the current tokio runtime.
    pub(crate) fn spawn<F>(work: F) -> Self
    where
        F: Future<Output = Result<Value, ApiError>> + Send + 'static,
    {
        match tokio::runtime::Handle::try_current() {
            Ok(runtime) => Self {
                state: State::Spawned(runtime.spawn(work)),
            },
            Err(err) => {
                tracing::warn!(error = %err, "endpoint call made outside a tokio runtime");
                Self::rejected(ApiError::Transport(Box::new(err)))
            }
        }
    }

    /// Already-rejected result. Needs no runtime.
    pub(crate) fn rejected(err: ApiError) -> Self {
        Self {
            state: State::Ready(Some(Err(err))),
        }
    }

    /// True once the outcome is available without waiting.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        match &self.state {
            State::Ready(_) => true,
            State::Spawned(handle) => handle.is_finished(),
        }
    }
}

impl Future for Deferred {
    type Output = Result<Value, ApiError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match &mut self.state {
            State::Ready(outcome) => Poll::Ready(outcome.take().unwrap_or_else(|| {
                Err(ApiError::Transport("Deferred polled after completion".into()))
            })),
            State::Spawned(handle) => match Pin::new(handle).poll(cx) {
                Poll::Ready(Ok(outcome)) => Poll::Ready(outcome),
                // Task panicked or the runtime shut down underneath it.
                Poll::Ready(Err(join_err)) => {
                    Poll::Ready(Err(ApiError::Transport(Box::new(join_err))))
                }
                Poll::Pending => Poll::Pending,
            },
        }
    }
}
