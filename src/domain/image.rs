//! Image inputs and the model-ready tensor.

use crate::core::FoodError;
use crate::core::constants::INPUT_CHANNELS;
use crate::core::errors::SimpleError;
use crate::processors::ChannelOrder;
use image::ImageFormat;
use ndarray::{Array4, ArrayView4};
use std::path::Path;
use std::sync::Arc;

/// Raw bytes of an uploaded image together with its declared or sniffed format.
#[derive(Debug, Clone)]
pub struct RawImage {
    bytes: Arc<[u8]>,
    format: Option<ImageFormat>,
}

impl RawImage {
    /// Wraps bytes, sniffing the format from their magic number.
    pub fn from_bytes(bytes: impl Into<Arc<[u8]>>) -> Self {
        let bytes = bytes.into();
        let format = image::guess_format(&bytes).ok();
        Self { bytes, format }
    }

    /// Wraps bytes with a format declared by the caller (e.g. from a MIME type).
    pub fn with_format(bytes: impl Into<Arc<[u8]>>, format: ImageFormat) -> Self {
        Self {
            bytes: bytes.into(),
            format: Some(format),
        }
    }

    /// Reads a file into memory.
    pub fn from_path(path: &Path) -> Result<Self, FoodError> {
        let bytes = std::fs::read(path)?;
        Ok(Self::from_bytes(bytes))
    }

    /// The raw bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Declared or sniffed format, if any.
    pub fn format(&self) -> Option<ImageFormat> {
        self.format
    }

    /// Byte length of the upload.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns true for an empty upload.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Single-image batch ready for the classifier.
///
/// Shape is `[1, size, size, 3]` (HWC) or `[1, 3, size, size]` (CHW) and every
/// value lies in `[0, 1]`. Both are checked on construction.
#[derive(Debug, Clone)]
pub struct NormalizedTensor {
    data: Array4<f32>,
    order: ChannelOrder,
}

impl NormalizedTensor {
    /// Wraps an array after checking layout and value range.
    ///
    /// # Errors
    ///
    /// Returns `FoodError::Processing` if the batch size is not 1, the image
    /// is not square with 3 channels in the given order, or a value falls
    /// outside `[0, 1]`.
    pub fn new(data: Array4<f32>, order: ChannelOrder) -> Result<Self, FoodError> {
        let shape = data.shape();
        let (channels, height, width) = match order {
            ChannelOrder::CHW => (shape[1], shape[2], shape[3]),
            ChannelOrder::HWC => (shape[3], shape[1], shape[2]),
        };
        if shape[0] != 1 || channels != INPUT_CHANNELS || height != width || height == 0 {
            return Err(FoodError::tensor_operation(
                format!("unexpected tensor shape {:?} for {:?} layout", shape, order),
                SimpleError::new("invalid normalized tensor shape"),
            ));
        }
        if let Some(value) = data.iter().find(|v| !(0.0..=1.0).contains(*v)) {
            return Err(FoodError::tensor_operation(
                format!("tensor value {value} outside [0, 1]"),
                SimpleError::new("invalid normalized tensor range"),
            ));
        }
        Ok(Self { data, order })
    }

    /// Side length of the square image.
    pub fn size(&self) -> usize {
        self.data.shape()[2]
    }

    /// Full tensor shape.
    pub fn shape(&self) -> &[usize] {
        self.data.shape()
    }

    /// Channel layout.
    pub fn order(&self) -> ChannelOrder {
        self.order
    }

    /// Borrowed view for inference.
    pub fn view(&self) -> ArrayView4<'_, f32> {
        self.data.view()
    }

    /// Consumes the tensor, returning the array.
    pub fn into_inner(self) -> Array4<f32> {
        self.data
    }
}
