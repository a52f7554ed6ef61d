use std::error::Error;
use std::pin::Pin;
use std::task::{self, Poll};

use crate::error::ErrorKind;
use crate::message::MessageEvent;
use crate::options::AgentOptions;

/// The error type for an agent client.
pub trait AgentClientError: Error + Send + Sync + 'static {
    /// Returns the kind of this error.
    fn kind(&self) -> ErrorKind;
}

/// A type that represents an agent client, which is an entry for
/// creating sessions against the agent runtime.
///
/// Once the client is created, it should behave like a stateless
/// object. It can still have internal state, but callers should not
/// rely on it, and the client should be prepared for being dropped
/// anytime.
pub trait AgentClient: Send + Sync {
    /// The error type that may be returned by the client.
    type Error: AgentClientError;

    /// The session type for this client.
    type Session: AgentSession<Error = Self::Error>;

    /// Opens a session configured with the given options.
    fn connect(
        &self,
        options: AgentOptions,
    ) -> impl Future<Output = Result<Self::Session, Self::Error>> + Send + 'static;
}

/// A stateful connection to the agent runtime, scoped to one query
/// exchange.
///
/// Dropping a session must release the underlying connection, on every
/// exit path including failure. This is the only resource under the
/// caller's lifecycle control.
pub trait AgentSession: Send + 'static {
    /// The error type that may be returned by the session.
    type Error: AgentClientError;

    /// Submits a query to the session.
    ///
    /// The response to the query is then consumed by repeatedly calling
    /// [`AgentSession::poll_next_message`].
    fn submit_query(
        &mut self,
        query: &str,
    ) -> impl Future<Output = Result<(), Self::Error>> + Send;

    /// Attempts to pull out the next message event from the session.
    ///
    /// # Return value
    ///
    /// There are several possible return values, each indicating a
    /// distinct session state:
    ///
    /// - `Poll::Pending` means that the session is still waiting for
    ///   the next event. Implementations will ensure that the current
    ///   task will be notified when the next event may be ready.
    /// - `Poll::Ready(Ok(Some(event)))` means the session has an event
    ///   to deliver, and may produce further events on subsequent
    ///   `poll_next_message` calls.
    /// - `Poll::Ready(Ok(None))` means the response has completed,
    ///   either naturally or because the turn limit was reached.
    /// - `Poll::Ready(Err(error))` means an error occurred while
    ///   processing the response.
    ///
    /// Calling this method after completion should always return
    /// `None`.
    fn poll_next_message(
        self: Pin<&mut Self>,
        cx: &mut task::Context<'_>,
    ) -> Poll<Result<Option<MessageEvent>, Self::Error>>;
}
