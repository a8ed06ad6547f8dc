//! V4L2 webcam capture for Linux device nodes such as `/dev/video0`.

use std::io;

use ouroboros::self_referencing;
use v4l::buffer::Type;
use v4l::io::traits::CaptureStream;
use v4l::prelude::MmapStream;
use v4l::video::Capture;
use v4l::FourCC;

use crate::capture::domain::camera::{Camera, CameraStream};
use crate::capture::domain::capture_error::CaptureError;
use crate::shared::frame::Frame;

const BUFFER_COUNT: u32 = 4;

/// Formats we can turn into RGB, in order of preference.
const PREFERRED_FORMATS: &[&[u8; 4]] = &[b"MJPG", b"YUYV", b"RGB3"];

pub struct V4l2Camera {
    device: String,
}

impl V4l2Camera {
    pub fn new(device: impl Into<String>) -> Self {
        Self {
            device: device.into(),
        }
    }

    fn map_io(&self, err: io::Error) -> CaptureError {
        if err.kind() == io::ErrorKind::PermissionDenied {
            CaptureError::PermissionDenied {
                device: self.device.clone(),
            }
        } else {
            CaptureError::Unavailable {
                device: self.device.clone(),
                reason: err.to_string(),
            }
        }
    }
}

impl Camera for V4l2Camera {
    fn open(&mut self) -> Result<Box<dyn CameraStream>, CaptureError> {
        let device = v4l::Device::with_path(&self.device).map_err(|e| self.map_io(e))?;

        let mut format = device.format().map_err(|e| self.map_io(e))?;
        let mut negotiated = None;
        for fourcc in PREFERRED_FORMATS {
            format.fourcc = FourCC::new(fourcc);
            match device.set_format(&format) {
                Ok(applied) if applied.fourcc == FourCC::new(fourcc) => {
                    negotiated = Some(applied);
                    break;
                }
                Ok(_) => continue,
                Err(err) => {
                    log::warn!(
                        "V4l2Camera: {} rejected {}: {err}",
                        self.device,
                        String::from_utf8_lossy(*fourcc)
                    );
                }
            }
        }
        let format = negotiated.ok_or_else(|| CaptureError::Unavailable {
            device: self.device.clone(),
            reason: "no supported pixel format (MJPG, YUYV or RGB3)".into(),
        })?;

        let state = V4l2StateTryBuilder {
            device,
            stream_builder: |device| MmapStream::with_buffers(device, Type::VideoCapture, BUFFER_COUNT),
        }
        .try_build()
        .map_err(|e| self.map_io(e))?;

        log::info!(
            "V4l2Camera: streaming {} at {}x{} ({})",
            self.device,
            format.width,
            format.height,
            format.fourcc
        );

        Ok(Box::new(V4l2Stream {
            state: Some(state),
            fourcc: format.fourcc,
            width: format.width,
            height: format.height,
            frame_count: 0,
        }))
    }

    fn device(&self) -> &str {
        &self.device
    }
}

#[self_referencing]
struct V4l2State {
    device: v4l::Device,
    #[borrows(mut device)]
    #[covariant]
    stream: MmapStream<'this, v4l::Device>,
}

struct V4l2Stream {
    state: Option<V4l2State>,
    fourcc: FourCC,
    width: u32,
    height: u32,
    frame_count: u64,
}

impl CameraStream for V4l2Stream {
    fn next_frame(&mut self) -> Result<Frame, CaptureError> {
        let (width, height, fourcc) = (self.width, self.height, self.fourcc);
        let state = self.state.as_mut().ok_or(CaptureError::Stopped)?;
        let rgb = state
            .with_mut(|fields| {
                let (buf, _meta) = fields.stream.next()?;
                to_rgb(buf, fourcc, width, height)
            })
            .map_err(|e| CaptureError::Unavailable {
                device: "v4l2".into(),
                reason: e.to_string(),
            })?;

        let frame = Frame::new(rgb.pixels, rgb.width, rgb.height, self.frame_count);
        self.frame_count += 1;
        Ok(frame)
    }

    fn stop(&mut self) {
        // Dropping the mmap stream issues STREAMOFF and unmaps the buffers.
        if self.state.take().is_some() {
            log::info!("V4l2Camera: stream stopped");
        }
    }

    fn is_stopped(&self) -> bool {
        self.state.is_none()
    }
}

impl Drop for V4l2Stream {
    fn drop(&mut self) {
        self.stop();
    }
}

struct RgbImage {
    pixels: Vec<u8>,
    width: u32,
    height: u32,
}

fn to_rgb(buf: &[u8], fourcc: FourCC, width: u32, height: u32) -> io::Result<RgbImage> {
    match &fourcc.repr {
        b"MJPG" => {
            let img = image::load_from_memory_with_format(buf, image::ImageFormat::Jpeg)
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?
                .into_rgb8();
            let (width, height) = img.dimensions();
            Ok(RgbImage {
                pixels: img.into_raw(),
                width,
                height,
            })
        }
        b"YUYV" => Ok(RgbImage {
            pixels: yuyv_to_rgb(buf, width, height),
            width,
            height,
        }),
        _ => {
            let len = (width * height * 3) as usize;
            if buf.len() < len {
                return Err(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    "short RGB3 buffer",
                ));
            }
            Ok(RgbImage {
                pixels: buf[..len].to_vec(),
                width,
                height,
            })
        }
    }
}

/// Converts packed YUYV 4:2:2 to RGB24 (BT.601, limited range).
fn yuyv_to_rgb(buf: &[u8], width: u32, height: u32) -> Vec<u8> {
    let pixel_count = (width * height) as usize;
    let mut rgb = Vec::with_capacity(pixel_count * 3);
    for chunk in buf.chunks_exact(4).take(pixel_count / 2) {
        let (y0, u, y1, v) = (chunk[0], chunk[1], chunk[2], chunk[3]);
        for y in [y0, y1] {
            rgb.extend_from_slice(&yuv_to_rgb(y, u, v));
        }
    }
    rgb.resize(pixel_count * 3, 0);
    rgb
}

fn yuv_to_rgb(y: u8, u: u8, v: u8) -> [u8; 3] {
    let c = y as f32 - 16.0;
    let d = u as f32 - 128.0;
    let e = v as f32 - 128.0;
    let clamp = |x: f32| x.round().clamp(0.0, 255.0) as u8;
    [
        clamp(1.164 * c + 1.596 * e),
        clamp(1.164 * c - 0.392 * d - 0.813 * e),
        clamp(1.164 * c + 2.017 * d),
    ]
}
