//! Image normalization for the classifier.
//!
//! Turns arbitrary uploaded bytes into the fixed-size tensor the classifier
//! expects: decode, force RGB, resize without preserving aspect ratio, then
//! scale channel values from `0..=255` to `[0, 1]`.

use crate::core::constants::{DEFAULT_INPUT_SIZE, INPUT_CHANNELS};
use crate::core::errors::SimpleError;
use crate::core::{FoodError, ProcessingStage};
use crate::domain::{NormalizedTensor, RawImage};
use crate::processors::types::ChannelOrder;
use image::imageops::FilterType;
use image::{DynamicImage, RgbImage};
use ndarray::Array4;

/// Normalizes uploaded images for classification.
///
/// The normalizer is a pure function of its input and is shared freely
/// between concurrent requests.
#[derive(Debug, Clone)]
pub struct ImageNormalizer {
    /// Side length of the square output.
    size: u32,
    /// Divisor applied to each 8-bit channel value.
    max_value: f32,
    /// Tensor layout.
    order: ChannelOrder,
}

impl ImageNormalizer {
    /// Creates a normalizer producing `size`×`size` tensors.
    ///
    /// # Errors
    ///
    /// Returns `FoodError::InvalidInput` if `size` is zero.
    pub fn new(size: u32, order: ChannelOrder) -> Result<Self, FoodError> {
        if size == 0 {
            return Err(FoodError::invalid_input(
                "normalizer target size must be greater than 0",
            ));
        }
        Ok(Self {
            size,
            max_value: 255.0,
            order,
        })
    }

    /// Side length of the produced tensor.
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Channel layout of the produced tensor.
    pub fn order(&self) -> ChannelOrder {
        self.order
    }

    /// Decodes raw bytes into an image.
    ///
    /// Uses the declared format when present and sniffs otherwise.
    pub fn decode(&self, raw: &RawImage) -> Result<DynamicImage, FoodError> {
        let decoded = match raw.format() {
            Some(format) => image::load_from_memory_with_format(raw.bytes(), format),
            None => image::load_from_memory(raw.bytes()),
        };
        decoded.map_err(FoodError::ImageDecode)
    }

    /// Full normalization: decode, RGB, resize, scale.
    pub fn normalize(&self, raw: &RawImage) -> Result<NormalizedTensor, FoodError> {
        let img = self.decode(raw)?;
        self.normalize_image(&img)
    }

    /// Normalizes an already decoded image.
    pub fn normalize_image(&self, img: &DynamicImage) -> Result<NormalizedTensor, FoodError> {
        // Alpha is dropped, grayscale is expanded.
        let rgb = img.to_rgb8();
        let resized = self.resize(&rgb);
        self.to_tensor(&resized)
    }

    /// Resizes directly to the target square with bilinear filtering.
    fn resize(&self, rgb: &RgbImage) -> RgbImage {
        if rgb.dimensions() == (self.size, self.size) {
            return rgb.clone();
        }
        image::imageops::resize(rgb, self.size, self.size, FilterType::Triangle)
    }

    fn to_tensor(&self, rgb: &RgbImage) -> Result<NormalizedTensor, FoodError> {
        let size = self.size as usize;
        let shape = self.order.batch_shape(size, INPUT_CHANNELS);
        let mut data = Array4::<f32>::zeros(shape);

        for (x, y, pixel) in rgb.enumerate_pixels() {
            let (x, y) = (x as usize, y as usize);
            for c in 0..INPUT_CHANNELS {
                let value = pixel[c] as f32 / self.max_value;
                match self.order {
                    ChannelOrder::HWC => data[[0, y, x, c]] = value,
                    ChannelOrder::CHW => data[[0, c, y, x]] = value,
                }
            }
        }

        NormalizedTensor::new(data, self.order).map_err(|e| {
            FoodError::processing(
                ProcessingStage::Normalization,
                format!("normalized tensor rejected: {e}"),
                SimpleError::new("normalization produced an invalid tensor"),
            )
        })
    }
}

impl Default for ImageNormalizer {
    fn default() -> Self {
        Self {
            size: DEFAULT_INPUT_SIZE,
            max_value: 255.0,
            order: ChannelOrder::HWC,
        }
    }
}
