//! Dispatch
//!
//! Handler-based execution. A request built with `success`, `failure` or
//! `transport_failure` handlers is routed to them; anything no handler claims
//! comes back as [`Outcome::Unhandled`].

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::trace;

use crate::core::request::HttpRequest;
use crate::core::transport::{HttpResponse, HttpTransport};
use crate::error::{RedditAuthError, TransportError};

/// Result of dispatching a request.
#[must_use = "unhandled failures must be handled or explicitly ignored"]
#[derive(Debug)]
pub enum Outcome {
    /// A handler ran, or the request succeeded without a success handler.
    Handled,
    /// No handler was registered for what happened.
    Unhandled(Unhandled),
}

/// Failure that no handler claimed.
#[derive(Debug)]
pub enum Unhandled {
    /// Non-2xx response and no failure handler.
    Failure(HttpResponse),
    /// Transport error and no transport-failure handler.
    TransportFailure(RedditAuthError),
}

impl Outcome {
    pub fn is_handled(&self) -> bool {
        matches!(self, Self::Handled)
    }

    /// Convert an unhandled failure into an error.
    pub fn into_result(self) -> Result<(), RedditAuthError> {
        match self {
            Self::Handled => Ok(()),
            Self::Unhandled(Unhandled::Failure(response)) => {
                Err(RedditAuthError::Transport(TransportError::Status {
                    status: response.status,
                    body: response.body,
                }))
            }
            Self::Unhandled(Unhandled::TransportFailure(error)) => Err(error),
        }
    }

    /// Drop an unhandled failure on purpose.
    pub fn ignore(self) {}
}

/// Execute a request and route the result to its handlers.
pub async fn dispatch<T>(transport: &T, request: HttpRequest) -> Outcome
where
    T: HttpTransport + ?Sized,
{
    let handlers = request.handlers().clone();

    match transport.send(&request).await {
        Ok(response) if response.is_success() => {
            trace!(status = response.status, url = request.url(), "dispatch success");
            if let Some(handler) = handlers.success {
                handler(&response);
            }
            Outcome::Handled
        }
        Ok(response) => {
            trace!(status = response.status, url = request.url(), "dispatch failure");
            match handlers.failure {
                Some(handler) => {
                    handler(&response);
                    Outcome::Handled
                }
                None => Outcome::Unhandled(Unhandled::Failure(response)),
            }
        }
        Err(error) => match handlers.transport_failure {
            Some(handler) => {
                handler(&request, &error);
                Outcome::Handled
            }
            None => Outcome::Unhandled(Unhandled::TransportFailure(error)),
        },
    }
}

/// Dispatch on the tokio runtime without waiting for the result.
pub fn spawn_dispatch<T>(transport: Arc<T>, request: HttpRequest) -> JoinHandle<Outcome>
where
    T: HttpTransport + ?Sized + 'static,
{
    tokio::spawn(async move { dispatch(transport.as_ref(), request).await })
}
