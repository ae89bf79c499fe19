//! Transport seams used by the transfer drivers.
//!
//! The drivers only need "send one request, get one reply" and "open a
//! connection to this endpoint". Keeping those behind traits keeps the block
//! loops decoupled from WebSocket details and testable with mocks.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use portal_protocol::envelope::{Request, Response};
use portal_protocol::types::Endpoint;

use crate::SchedulerError;

/// A live connection to one scheduler.
///
/// Calls are strictly sequential: the `&mut self` receiver guarantees a
/// single outstanding request per connection.
pub trait SchedulerConnection: Send {
    /// Sends `request` and waits up to `timeout` for its reply.
    fn call(
        &mut self,
        request: Request,
        timeout: Duration,
    ) -> Pin<Box<dyn Future<Output = Result<Response, SchedulerError>> + Send + '_>>;

    /// Gracefully closes the connection.
    fn close(&mut self) -> Pin<Box<dyn Future<Output = ()> + Send + '_>>;

    /// The endpoint this connection is attached to.
    fn endpoint(&self) -> &Endpoint;
}

/// Opens connections to scheduler endpoints.
pub trait Dialer: Send + Sync {
    type Connection: SchedulerConnection;

    /// Dials a single endpoint. The caller bounds the attempt with a timeout.
    fn dial<'a>(
        &'a self,
        endpoint: &'a Endpoint,
    ) -> Pin<Box<dyn Future<Output = Result<Self::Connection, SchedulerError>> + Send + 'a>>;
}
