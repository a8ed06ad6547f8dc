use std::thread;

use crossbeam_channel::Sender;

use facelens_core::detection::infrastructure::http_detection_service::HttpDetectionService;
use facelens_core::session::pending_detection::{DetectionOutcome, PendingDetection};
use facelens_core::shared::backend_config::BackendConfig;

/// Sends `pending` to the backend on a background thread.
///
/// The outcome always arrives on `tx`, even when no HTTP client could be
/// built, so the session never stays stuck in Loading. The client is created
/// on the worker thread because the blocking client must not live inside the
/// UI's async runtime.
pub fn spawn(pending: PendingDetection, config: BackendConfig, tx: Sender<DetectionOutcome>) {
    let token = pending.token();
    thread::spawn(move || {
        let outcome = match HttpDetectionService::new(config) {
            Ok(service) => pending.execute(&service),
            Err(e) => {
                log::error!("Could not create HTTP client for {token:?}: {e}");
                pending.reject(e)
            }
        };
        if tx.send(outcome).is_err() {
            log::debug!("Detection {token:?} finished after the window closed");
        }
    });
}
