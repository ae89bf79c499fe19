//! WebSocket client for scheduler communication.
//!
//! Implements a strictly sequential request-response exchange: one JSON
//! text frame out, wait for the reply carrying the same id. Pings from the
//! scheduler are answered inline while waiting.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use futures_util::{Sink, SinkExt, Stream, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::protocol::WebSocketConfig;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, tungstenite};
use tracing::{debug, trace, warn};

use portal_protocol::constants::WS_MAX_MESSAGE_SIZE;
use portal_protocol::envelope::{Request, Response};
use portal_protocol::types::Endpoint;

use crate::connection::{Dialer, SchedulerConnection};
use crate::SchedulerError;

/// WebSocket stream produced by [`SchedulerClient::connect`].
pub type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Sequential request/response client attached to a single scheduler.
pub struct SchedulerClient<S = WsStream> {
    stream: S,
    endpoint: Endpoint,
    next_id: u64,
}

impl SchedulerClient<WsStream> {
    /// Opens a WebSocket to `endpoint`.
    ///
    /// No timeout is applied here; the failover selector bounds each attempt.
    pub async fn connect(endpoint: &Endpoint) -> Result<Self, SchedulerError> {
        let mut ws_config = WebSocketConfig::default();
        ws_config.max_message_size = Some(WS_MAX_MESSAGE_SIZE);
        ws_config.max_frame_size = Some(WS_MAX_MESSAGE_SIZE);
        let (stream, _) =
            tokio_tungstenite::connect_async_with_config(endpoint.ws_url(), Some(ws_config), false)
                .await?;
        debug!(%endpoint, "scheduler WebSocket open");
        Ok(Self::from_stream(stream, endpoint.clone()))
    }
}

impl<S> SchedulerClient<S>
where
    S: Stream<Item = Result<tungstenite::Message, tungstenite::Error>>
        + Sink<tungstenite::Message, Error = tungstenite::Error>
        + Unpin
        + Send,
{
    /// Wraps an already-open WebSocket stream.
    pub fn from_stream(stream: S, endpoint: Endpoint) -> Self {
        Self {
            stream,
            endpoint,
            next_id: 0,
        }
    }

    /// Sends a request and waits up to `timeout` for the matching response.
    ///
    /// The request id is overwritten with the next per-connection id.
    pub async fn send_request(
        &mut self,
        mut request: Request,
        timeout: Duration,
    ) -> Result<Response, SchedulerError> {
        self.next_id += 1;
        request.id = self.next_id;
        let json = serde_json::to_string(&request)?;

        match tokio::time::timeout(timeout, self.round_trip(request.id, json)).await {
            Ok(result) => result,
            Err(_) => Err(SchedulerError::Timeout),
        }
    }

    async fn round_trip(&mut self, id: u64, json: String) -> Result<Response, SchedulerError> {
        self.stream
            .send(tungstenite::Message::Text(json.into()))
            .await?;

        loop {
            match self.stream.next().await {
                Some(Ok(tungstenite::Message::Text(text))) => {
                    let resp: Response = serde_json::from_str(&text)?;
                    // Schedulers that do not echo ids reply with 0.
                    if resp.id != id && resp.id != 0 {
                        warn!(expected = id, got = resp.id, "dropping reply for another request");
                        continue;
                    }
                    trace!(id, code = resp.code, "received reply");
                    return Ok(resp);
                }
                Some(Ok(tungstenite::Message::Ping(data))) => {
                    trace!("received ping, sending pong");
                    self.stream.send(tungstenite::Message::Pong(data)).await?;
                }
                Some(Ok(tungstenite::Message::Close(_))) => {
                    debug!(endpoint = %self.endpoint, "received close frame");
                    return Err(SchedulerError::Closed);
                }
                Some(Ok(_)) => {} // Pong / Binary: ignored
                Some(Err(e)) => return Err(e.into()),
                None => return Err(SchedulerError::Closed),
            }
        }
    }

    /// Gracefully closes the connection.
    pub async fn shutdown(&mut self) {
        if let Err(e) = self.stream.close().await {
            trace!("close failed: {e}");
        }
    }
}

impl<S> SchedulerConnection for SchedulerClient<S>
where
    S: Stream<Item = Result<tungstenite::Message, tungstenite::Error>>
        + Sink<tungstenite::Message, Error = tungstenite::Error>
        + Unpin
        + Send,
{
    fn call(
        &mut self,
        request: Request,
        timeout: Duration,
    ) -> Pin<Box<dyn Future<Output = Result<Response, SchedulerError>> + Send + '_>> {
        Box::pin(self.send_request(request, timeout))
    }

    fn close(&mut self) -> Pin<Box<dyn Future<Output = ()> + Send + '_>> {
        Box::pin(self.shutdown())
    }

    fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }
}

/// Dials schedulers over plain or TLS WebSockets.
#[derive(Debug, Clone, Copy, Default)]
pub struct WsDialer;

impl Dialer for WsDialer {
    type Connection = SchedulerClient;

    fn dial<'a>(
        &'a self,
        endpoint: &'a Endpoint,
    ) -> Pin<Box<dyn Future<Output = Result<Self::Connection, SchedulerError>> + Send + 'a>> {
        Box::pin(SchedulerClient::connect(endpoint))
    }
}
