/// Axis-aligned box in pixel units with a top-left origin.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn from_xywh([x, y, width, height]: [f64; 4]) -> Self {
        Self::new(x, y, width, height)
    }
}

/// One detected face as reported by the backend.
#[derive(Clone, Debug, PartialEq)]
pub struct Face {
    pub bbox: BoundingBox,
    /// Detector score in `[0, 1]`.
    pub confidence: f64,
}

impl Face {
    pub fn new(bbox: BoundingBox, confidence: f64) -> Self {
        Self { bbox, confidence }
    }

    pub fn confidence_percent(&self) -> f64 {
        self.confidence * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_from_xywh_orders_fields() {
        let bbox = BoundingBox::from_xywh([10.0, 20.0, 30.0, 40.0]);
        assert_eq!(bbox, BoundingBox::new(10.0, 20.0, 30.0, 40.0));
    }

    #[test]
    fn test_confidence_percent() {
        let face = Face::new(BoundingBox::new(0.0, 0.0, 1.0, 1.0), 0.8567);
        assert_relative_eq!(face.confidence_percent(), 85.67, epsilon = 1e-9);
    }
}
