//! JSON envelope for the device's `/command` endpoint.

use serde::{Deserialize, Serialize};

use crate::{COMMAND_FAILED, FLAG_BASE64_DATA};

/// One command as posted to the device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandRequest {
    pub flags: u32,
    pub command: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
}

impl CommandRequest {
    /// A command with no payload and no flags set.
    pub fn bare(command: impl Into<String>) -> Self {
        Self {
            flags: 0,
            command: command.into(),
            data: None,
        }
    }

    /// A command carrying a base64-encoded payload.
    ///
    /// Sets [`FLAG_BASE64_DATA`] so the device decodes `data` before
    /// writing it.
    pub fn with_data(command: impl Into<String>, data: String) -> Self {
        Self {
            flags: FLAG_BASE64_DATA,
            command: command.into(),
            data: Some(data),
        }
    }
}

/// A parsed device response body.
///
/// Most commands answer `{"response": "...\r\n"}`, but some failure
/// paths reply with a bare JSON string, so the raw value is kept and
/// interpreted lazily.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommandResponse {
    pub body: serde_json::Value,
}

impl CommandResponse {
    pub fn from_body(body: serde_json::Value) -> Self {
        Self { body }
    }

    /// The `response` field with the trailing CRLF stripped, or the
    /// top-level string for bare-string replies. `None` when the body
    /// has neither shape.
    pub fn response_text(&self) -> Option<&str> {
        let text = match &self.body {
            serde_json::Value::String(s) => s.as_str(),
            other => other.get("response")?.as_str()?,
        };
        Some(text.trim_end_matches("\r\n"))
    }

    /// Whether the body carries the device's rejection sentinel.
    pub fn is_command_failed(&self) -> bool {
        self.response_text() == Some(COMMAND_FAILED)
    }

    /// The numeric stream token from an open response.
    ///
    /// A non-numeric or missing token yields `None`; callers treat that
    /// as a retryable protocol violation, not a distinct fatal error.
    pub fn session_token(&self) -> Option<u32> {
        self.response_text()?.trim().parse().ok()
    }
}
