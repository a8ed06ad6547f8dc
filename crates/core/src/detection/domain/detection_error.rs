use thiserror::Error;

use crate::shared::constants::GENERIC_ERROR_MESSAGE;

#[derive(Error, Debug)]
pub enum DetectionError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("backend returned HTTP {status}{}", detail_suffix(.detail))]
    Backend { status: u16, detail: Option<String> },
    #[error("backend response could not be decoded: {0}")]
    InvalidResponse(String),
}

fn detail_suffix(detail: &Option<String>) -> String {
    match detail {
        Some(d) if !d.is_empty() => format!(": {d}"),
        _ => String::new(),
    }
}

impl DetectionError {
    /// The single string shown to the user for this failure.
    ///
    /// Only a non-empty `detail` from the backend's error body is surfaced
    /// verbatim; everything else collapses to the generic message.
    pub fn user_message(&self) -> String {
        match self {
            DetectionError::Backend {
                detail: Some(detail),
                ..
            } if !detail.is_empty() => detail.clone(),
            _ => GENERIC_ERROR_MESSAGE.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detail_is_surfaced_verbatim() {
        let err = DetectionError::Backend {
            status: 400,
            detail: Some("bad image".into()),
        };
        assert_eq!(err.user_message(), "bad image");
        assert_eq!(err.to_string(), "backend returned HTTP 400: bad image");
    }

    #[test]
    fn test_missing_detail_uses_fallback() {
        let err = DetectionError::Backend {
            status: 500,
            detail: None,
        };
        assert_eq!(err.user_message(), GENERIC_ERROR_MESSAGE);
        assert_eq!(err.to_string(), "backend returned HTTP 500");
    }

    #[test]
    fn test_empty_detail_uses_fallback() {
        let err = DetectionError::Backend {
            status: 500,
            detail: Some(String::new()),
        };
        assert_eq!(err.user_message(), GENERIC_ERROR_MESSAGE);
    }

    #[test]
    fn test_invalid_response_uses_fallback() {
        let err = DetectionError::InvalidResponse("missing field `faces`".into());
        assert_eq!(err.user_message(), GENERIC_ERROR_MESSAGE);
    }
}
