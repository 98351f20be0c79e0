use ndarray::ArrayView3;

use crate::shared::bounding_box::BoundingBox;

/// Decoded photo: contiguous RGB bytes in row-major order.
///
/// Decoding happens once at the provider boundary; everything downstream
/// works on this buffer.
#[derive(Clone, Debug)]
pub struct RgbPhoto {
    data: Vec<u8>,
    width: u32,
    height: u32,
}

impl RgbPhoto {
    pub fn new(data: Vec<u8>, width: u32, height: u32) -> Self {
        debug_assert_eq!(
            data.len(),
            (width as usize) * (height as usize) * 3,
            "data length must equal width * height * 3"
        );
        Self {
            data,
            width,
            height,
        }
    }

    /// Decodes any format the `image` crate understands into RGB.
    pub fn decode(bytes: &[u8]) -> Result<Self, image::ImageError> {
        let rgb = image::load_from_memory(bytes)?.to_rgb8();
        let (width, height) = rgb.dimensions();
        Ok(Self::new(rgb.into_raw(), width, height))
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn as_ndarray(&self) -> ArrayView3<'_, u8> {
        ArrayView3::from_shape(
            (self.height as usize, self.width as usize, 3),
            &self.data,
        )
        .expect("photo data length must match dimensions")
    }

    /// Copies the pixels inside `bbox` (clamped to the photo) into a new photo.
    pub fn crop(&self, bbox: &BoundingBox) -> RgbPhoto {
        let w = self.width as i32;
        let h = self.height as i32;
        let x1 = bbox.x.clamp(0, w) as usize;
        let y1 = bbox.y.clamp(0, h) as usize;
        let x2 = (bbox.x + bbox.width).clamp(0, w) as usize;
        let y2 = (bbox.y + bbox.height).clamp(0, h) as usize;

        let crop_w = x2.saturating_sub(x1);
        let crop_h = y2.saturating_sub(y1);
        let stride = self.width as usize * 3;

        let mut data = Vec::with_capacity(crop_w * crop_h * 3);
        for row in y1..y1 + crop_h {
            let start = row * stride + x1 * 3;
            data.extend_from_slice(&self.data[start..start + crop_w * 3]);
        }
        RgbPhoto::new(data, crop_w as u32, crop_h as u32)
    }
}
