use std::thread;

use crossbeam_channel::Receiver;

use facelens_core::detection::domain::detection_service::{DetectionService, HealthStatus};
use facelens_core::detection::infrastructure::http_detection_service::HttpDetectionService;
use facelens_core::shared::backend_config::BackendConfig;

/// What the status footer shows about the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendHealth {
    Unknown,
    Checking,
    Healthy(HealthStatus),
    Unhealthy(String),
}

impl BackendHealth {
    pub fn label(&self) -> String {
        match self {
            BackendHealth::Unknown => "Backend not checked".to_string(),
            BackendHealth::Checking => "Checking backend\u{2026}".to_string(),
            BackendHealth::Healthy(status) => match &status.timestamp {
                Some(ts) => format!("Backend {} ({ts})", status.status),
                None => format!("Backend {}", status.status),
            },
            BackendHealth::Unhealthy(reason) => format!("Backend unavailable: {reason}"),
        }
    }
}

/// Probes the backend's health endpoint on a background thread.
pub fn spawn(config: BackendConfig) -> Receiver<BackendHealth> {
    let (tx, rx) = crossbeam_channel::bounded(1);
    thread::spawn(move || {
        let url = config.base_url().to_string();
        let health = match HttpDetectionService::new(config).and_then(|s| s.health()) {
            Ok(status) if status.is_healthy() => BackendHealth::Healthy(status),
            Ok(status) => BackendHealth::Unhealthy(format!("status '{}'", status.status)),
            Err(e) => {
                log::warn!("Health check against {url} failed: {e}");
                BackendHealth::Unhealthy(e.to_string())
            }
        };
        let _ = tx.send(health);
    });
    rx
}
