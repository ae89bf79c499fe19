//! Scheduler transport: a request/response WebSocket connection and the
//! ordered failover that picks the first reachable scheduler.

pub mod connection;
pub mod error;
pub mod selector;
pub mod ws_client;

pub use connection::{Dialer, SchedulerConnection};
pub use error::SchedulerError;
pub use selector::connect_first;
pub use ws_client::{SchedulerClient, WsDialer};
