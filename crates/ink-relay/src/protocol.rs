//! Viewer-facing wire protocol.
//!
//! Every frame sent to a viewer is a JSON text frame `{"type": <kind>, "data": <payload>}`.
//! Image bytes travel as a standard (padded) base64 string. The relay only
//! ever encodes envelopes; decoding is the viewer's job.

use std::borrow::Cow;

use base64::Engine;
use serde::Serialize;

/// Envelope tag the viewer dispatches on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum EnvelopeKind {
    Error = 0,
    Message = 1,
    Image = 2,
}

/// A payload destined for the viewer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    Error(String),
    Message(String),
    /// Raw drawing bytes as submitted by the peer.
    Image(Vec<u8>),
}

#[derive(Serialize)]
struct Envelope<'a> {
    #[serde(rename = "type")]
    kind: u8,
    data: Cow<'a, str>,
}

impl Payload {
    pub fn error(text: impl Into<String>) -> Self {
        Payload::Error(text.into())
    }

    pub fn message(text: impl Into<String>) -> Self {
        Payload::Message(text.into())
    }

    pub fn kind(&self) -> EnvelopeKind {
        match self {
            Payload::Error(_) => EnvelopeKind::Error,
            Payload::Message(_) => EnvelopeKind::Message,
            Payload::Image(_) => EnvelopeKind::Image,
        }
    }

    /// Serialize into a single text frame.
    pub fn encode(&self) -> String {
        let data = match self {
            Payload::Error(text) | Payload::Message(text) => Cow::Borrowed(text.as_str()),
            Payload::Image(bytes) => {
                Cow::Owned(base64::engine::general_purpose::STANDARD.encode(bytes))
            }
        };
        let envelope = Envelope {
            kind: self.kind() as u8,
            data,
        };
        serde_json::to_string(&envelope).unwrap_or_else(|e| {
            format!(
                "{{\"type\":{},\"data\":\"failed to encode envelope: {e}\"}}",
                EnvelopeKind::Error as u8
            )
        })
    }
}

/// Parse a viewer frame back into a payload. Only tests and clients need this.
#[cfg(test)]
pub(crate) fn decode(frame: &str) -> Option<Payload> {
    #[derive(serde::Deserialize)]
    struct Raw {
        #[serde(rename = "type")]
        kind: u8,
        data: String,
    }

    let raw: Raw = serde_json::from_str(frame).ok()?;
    match raw.kind {
        0 => Some(Payload::Error(raw.data)),
        1 => Some(Payload::Message(raw.data)),
        2 => base64::engine::general_purpose::STANDARD
            .decode(raw.data)
            .ok()
            .map(Payload::Image),
        _ => None,
    }
}
