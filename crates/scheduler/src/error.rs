//! Scheduler transport errors.

use tokio_tungstenite::tungstenite;

/// Errors from dialing or talking to a scheduler.
#[derive(Debug, thiserror::Error)]
pub enum SchedulerError {
    #[error("WebSocket error: {0}")]
    Ws(#[from] tungstenite::Error),

    #[error("malformed scheduler message: {0}")]
    Json(#[from] serde_json::Error),

    #[error("request timed out")]
    Timeout,

    #[error("connection closed")]
    Closed,

    #[error("all {attempted} scheduler endpoints are unreachable")]
    AllEndpointsUnreachable { attempted: usize },
}

impl SchedulerError {
    /// Returns `true` for errors caused by the peer sending something that
    /// does not follow the wire protocol (as opposed to the link failing).
    pub fn is_protocol(&self) -> bool {
        matches!(self, SchedulerError::Json(_))
    }
}
