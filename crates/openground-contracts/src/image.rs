//! Self-describing encoded images.
//!
//! Photos travel through the runtime as strings, usually data URLs
//! (`data:image/jpeg;base64,...`). The mission agent never looks inside them;
//! only planning-service adapters call `mime_type()` and `payload()`.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EncodedImage(pub String);

impl EncodedImage {
    /// MIME type assumed for bare payloads without a data URL prefix.
    pub const DEFAULT_MIME_TYPE: &'static str = "image/jpeg";

    pub fn new(encoded: impl Into<String>) -> Self {
        Self(encoded.into())
    }

    /// Build a data URL from a MIME type and an already-encoded payload.
    pub fn from_parts(mime_type: &str, base64_payload: &str) -> Self {
        Self(format!("data:{mime_type};base64,{base64_payload}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The declared MIME type, or `image/jpeg` for bare payloads.
    pub fn mime_type(&self) -> &str {
        self.0
            .strip_prefix("data:")
            .and_then(|rest| rest.split(';').next())
            .filter(|m| !m.is_empty() && !m.contains(','))
            .unwrap_or(Self::DEFAULT_MIME_TYPE)
    }

    /// The encoded payload with any data URL header removed.
    pub fn payload(&self) -> &str {
        match self.0.split_once(',') {
            Some((header, data)) if header.starts_with("data:") => data,
            _ => &self.0,
        }
    }
}

impl From<String> for EncodedImage {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for EncodedImage {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}
