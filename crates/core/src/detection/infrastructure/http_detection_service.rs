use reqwest::blocking::{multipart, Client, Response};

use crate::capture::domain::selected_image::ImageFile;
use crate::detection::domain::detection_error::DetectionError;
use crate::detection::domain::detection_service::{DetectionService, HealthStatus};
use crate::shared::backend_config::BackendConfig;
use crate::shared::constants::{
    DETECT_BASE64_PATH, DETECT_UPLOAD_PATH, HEALTH_PATH, UPLOAD_FIELD_NAME,
};
use crate::shared::data_url::DataUrl;
use crate::shared::detection_result::DetectionResult;

use super::wire::{Base64RequestDto, DetectResponseDto, ErrorBodyDto, HealthDto};

/// [`DetectionService`] backed by the FastAPI detection server over HTTP.
///
/// Uses the blocking reqwest client; callers run it off the UI thread.
pub struct HttpDetectionService {
    client: Client,
    config: BackendConfig,
}

impl HttpDetectionService {
    pub fn new(config: BackendConfig) -> Result<Self, DetectionError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| transport(config.base_url(), e))?;
        Ok(Self { client, config })
    }
}

impl DetectionService for HttpDetectionService {
    fn detect_file(&self, image: &ImageFile) -> Result<DetectionResult, DetectionError> {
        let url = self.config.endpoint(DETECT_UPLOAD_PATH);
        log::debug!(
            "POST {url} ({}, {} bytes)",
            image.file_name(),
            image.bytes().len()
        );

        let part = multipart::Part::bytes(image.bytes().to_vec())
            .file_name(image.file_name().to_string())
            .mime_str(image.mime_type())
            .map_err(|e| transport(&url, e))?;
        let form = multipart::Form::new().part(UPLOAD_FIELD_NAME, part);

        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .map_err(|e| transport(&url, e))?;
        read_detection(&url, response)
    }

    fn detect_data_url(&self, image: &DataUrl) -> Result<DetectionResult, DetectionError> {
        let url = self.config.endpoint(DETECT_BASE64_PATH);
        log::debug!("POST {url} ({image:?})");

        let response = self
            .client
            .post(&url)
            .json(&Base64RequestDto {
                image: image.as_str(),
            })
            .send()
            .map_err(|e| transport(&url, e))?;
        read_detection(&url, response)
    }

    fn health(&self) -> Result<HealthStatus, DetectionError> {
        let url = self.config.endpoint(HEALTH_PATH);
        let response = self.client.get(&url).send().map_err(|e| transport(&url, e))?;
        let status = response.status().as_u16();
        let body = response.bytes().map_err(|e| transport(&url, e))?;
        if !(200..300).contains(&status) {
            return Err(backend_error(status, &body));
        }
        let dto: HealthDto = serde_json::from_slice(&body)
            .map_err(|e| DetectionError::InvalidResponse(e.to_string()))?;
        Ok(dto.into())
    }
}

fn read_detection(url: &str, response: Response) -> Result<DetectionResult, DetectionError> {
    let status = response.status().as_u16();
    let body = response.bytes().map_err(|e| transport(url, e))?;
    decode_detection(status, &body)
}

/// Maps a raw status + body to the domain result or error.
fn decode_detection(status: u16, body: &[u8]) -> Result<DetectionResult, DetectionError> {
    if !(200..300).contains(&status) {
        return Err(backend_error(status, body));
    }
    let dto: DetectResponseDto = serde_json::from_slice(body)
        .map_err(|e| DetectionError::InvalidResponse(e.to_string()))?;
    let result = dto.into_domain();
    if result.faces_detected as usize != result.faces.len() {
        log::warn!(
            "Backend reported {} faces but returned {}",
            result.faces_detected,
            result.faces.len()
        );
    }
    Ok(result)
}

fn backend_error(status: u16, body: &[u8]) -> DetectionError {
    let detail = serde_json::from_slice::<ErrorBodyDto>(body)
        .ok()
        .and_then(ErrorBodyDto::into_detail);
    DetectionError::Backend { status, detail }
}

fn transport(url: &str, source: reqwest::Error) -> DetectionError {
    DetectionError::Transport {
        url: url.to_string(),
        source,
    }
}
