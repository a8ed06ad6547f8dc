use std::fmt;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum DataUrlError {
    #[error("data URL must start with 'data:'")]
    MissingScheme,
    #[error("data URL has no ',' separating header and payload")]
    MissingPayload,
    #[error("only base64 data URLs are supported")]
    NotBase64,
    #[error("invalid base64 payload: {0}")]
    InvalidBase64(#[from] base64::DecodeError),
}

/// A `data:<mime>;base64,<payload>` string, validated on construction.
///
/// Used for previews, captured webcam frames and the backend's annotated
/// image. The full string is kept so it can be sent or displayed as-is.
#[derive(Clone, PartialEq, Eq)]
pub struct DataUrl {
    raw: String,
    payload_start: usize,
}

impl DataUrl {
    /// Encodes raw bytes as a base64 data URL with the given MIME type.
    pub fn encode(mime_type: &str, bytes: &[u8]) -> Self {
        let header = format!("data:{mime_type};base64,");
        let payload_start = header.len();
        let mut raw = header;
        STANDARD.encode_string(bytes, &mut raw);
        Self { raw, payload_start }
    }

    pub fn parse(raw: impl Into<String>) -> Result<Self, DataUrlError> {
        let raw = raw.into();
        let rest = raw
            .strip_prefix("data:")
            .ok_or(DataUrlError::MissingScheme)?;
        let comma = rest.find(',').ok_or(DataUrlError::MissingPayload)?;
        if !rest[..comma].ends_with(";base64") {
            return Err(DataUrlError::NotBase64);
        }
        let payload_start = "data:".len() + comma + 1;
        Ok(Self { raw, payload_start })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn mime_type(&self) -> &str {
        let header = &self.raw["data:".len()..self.payload_start - 1];
        header.split(';').next().unwrap_or_default()
    }

    pub fn base64_payload(&self) -> &str {
        &self.raw[self.payload_start..]
    }

    pub fn decode(&self) -> Result<Vec<u8>, DataUrlError> {
        Ok(STANDARD.decode(self.base64_payload())?)
    }
}

impl fmt::Debug for DataUrl {
    // Payloads run to megabytes; keep logs readable.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "DataUrl({}, {} base64 bytes)",
            self.mime_type(),
            self.base64_payload().len()
        )
    }
}
