//! Ordered scheduler failover.

use std::time::Duration;

use tracing::{info, warn};

use portal_protocol::types::Endpoint;

use crate::SchedulerError;
use crate::connection::Dialer;

/// Dials `endpoints` in order and returns the first connection that opens
/// within `per_attempt`.
///
/// Each failed or timed-out attempt is logged and the next endpoint is
/// tried; worst case latency is `endpoints.len() * per_attempt`.
pub async fn connect_first<D: Dialer>(
    dialer: &D,
    endpoints: &[Endpoint],
    per_attempt: Duration,
) -> Result<D::Connection, SchedulerError> {
    for (i, endpoint) in endpoints.iter().enumerate() {
        match tokio::time::timeout(per_attempt, dialer.dial(endpoint)).await {
            Ok(Ok(conn)) => {
                info!(%endpoint, attempt = i + 1, "connected to scheduler");
                return Ok(conn);
            }
            Ok(Err(e)) => {
                warn!(%endpoint, error = %e, "scheduler unreachable, trying next");
            }
            Err(_) => {
                warn!(%endpoint, timeout_ms = per_attempt.as_millis() as u64, "scheduler dial timed out, trying next");
            }
        }
    }

    Err(SchedulerError::AllEndpointsUnreachable {
        attempted: endpoints.len(),
    })
}
