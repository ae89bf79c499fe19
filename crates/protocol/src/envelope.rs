use serde::{Deserialize, Serialize};

use crate::constants::{CODE_OK, Method, SCHEDULER_SERVICE};

/// Envelope for every request sent to a scheduler.
///
/// `body` holds the serialized payload and travels as base64 in JSON,
/// like every byte field on the wire. `id` is assigned by the
/// connection right before sending and is echoed back in the response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Request {
    #[serde(default)]
    pub id: u64,
    pub service: String,
    pub method: Method,
    #[serde(default, with = "crate::base64_bytes")]
    pub body: Vec<u8>,
}

impl Request {
    /// Creates a request for the scheduler service with the given payload.
    pub fn new<T: Serialize>(method: Method, payload: &T) -> Result<Self, serde_json::Error> {
        Ok(Self {
            id: 0,
            service: SCHEDULER_SERVICE.into(),
            method,
            body: serde_json::to_vec(payload)?,
        })
    }

    /// Deserializes the body into the given type.
    pub fn parse_body<T: for<'de> Deserialize<'de>>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }
}

/// Envelope for every scheduler reply.
///
/// `code == 0` means success; any other value is an application-level
/// failure whose `message` is shown to the operator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    #[serde(default)]
    pub id: u64,
    pub code: i32,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub message: String,
    #[serde(default, with = "crate::base64_bytes")]
    pub data: Vec<u8>,
}

impl Response {
    /// Creates a success response carrying `payload`.
    pub fn ok<T: Serialize>(id: u64, payload: &T) -> Result<Self, serde_json::Error> {
        Ok(Self {
            id,
            code: CODE_OK,
            message: String::new(),
            data: serde_json::to_vec(payload)?,
        })
    }

    /// Creates a failure response.
    pub fn error(id: u64, code: i32, message: impl Into<String>) -> Self {
        Self {
            id,
            code,
            message: message.into(),
            data: Vec::new(),
        }
    }

    /// Returns `true` if the scheduler accepted the request.
    pub fn is_ok(&self) -> bool {
        self.code == CODE_OK
    }

    /// Deserializes the data field into the given type.
    pub fn parse_data<T: for<'de> Deserialize<'de>>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.data)
    }
}
