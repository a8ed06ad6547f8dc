use image::codecs::jpeg::JpegEncoder;
use image::ExtendedColorType;

use crate::capture::domain::capture_error::CaptureError;
use crate::shared::constants::CAPTURE_JPEG_QUALITY;
use crate::shared::data_url::DataUrl;
use crate::shared::frame::Frame;

/// Encodes a frame at its native resolution into a JPEG data URL.
pub fn encode_frame(frame: &Frame) -> Result<DataUrl, CaptureError> {
    encode_frame_with_quality(frame, CAPTURE_JPEG_QUALITY)
}

pub fn encode_frame_with_quality(frame: &Frame, quality: u8) -> Result<DataUrl, CaptureError> {
    let mut jpeg = Vec::new();
    JpegEncoder::new_with_quality(&mut jpeg, quality).encode(
        frame.data(),
        frame.width(),
        frame.height(),
        ExtendedColorType::Rgb8,
    )?;
    Ok(DataUrl::encode("image/jpeg", &jpeg))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_frame(width: u32, height: u32) -> Frame {
        let data = (0..width * height)
            .flat_map(|i| [(i % 256) as u8, 100, 200])
            .collect();
        Frame::new(data, width, height, 0)
    }

    #[test]
    fn test_encodes_jpeg_data_url() {
        let url = encode_frame(&make_frame(64, 48)).unwrap();
        assert_eq!(url.mime_type(), "image/jpeg");
        let bytes = url.decode().unwrap();
        assert_eq!(&bytes[..2], &[0xff, 0xd8]);
    }

    #[test]
    fn test_preserves_native_resolution() {
        let url = encode_frame(&make_frame(64, 48)).unwrap();
        let img = image::load_from_memory(&url.decode().unwrap()).unwrap();
        assert_eq!(img.width(), 64);
        assert_eq!(img.height(), 48);
    }

    #[test]
    fn test_lower_quality_is_smaller() {
        let frame = make_frame(128, 128);
        let high = encode_frame_with_quality(&frame, 95).unwrap();
        let low = encode_frame_with_quality(&frame, 10).unwrap();
        assert!(low.base64_payload().len() < high.base64_payload().len());
    }
}
