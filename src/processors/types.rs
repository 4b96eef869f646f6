//! Types used in image processing operations.

use serde::{Deserialize, Serialize};

/// Specifies the order of channels in an image tensor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChannelOrder {
    /// Channel, Height, Width order (common in PyTorch)
    CHW,
    /// Height, Width, Channel order (common in TensorFlow/Keras)
    #[default]
    HWC,
}

impl ChannelOrder {
    /// Shape of a single-image batch of the given side length.
    pub fn batch_shape(&self, size: usize, channels: usize) -> [usize; 4] {
        match self {
            ChannelOrder::CHW => [1, channels, size, size],
            ChannelOrder::HWC => [1, size, size, channels],
        }
    }
}

/// Region of an image selected for cropping, in pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropWindow {
    /// Left edge (inclusive).
    pub x: u32,
    /// Top edge (inclusive).
    pub y: u32,
    /// Window width.
    pub width: u32,
    /// Window height.
    pub height: u32,
}

impl CropWindow {
    /// Right edge (exclusive).
    pub fn right(&self) -> u32 {
        self.x + self.width
    }

    /// Bottom edge (exclusive).
    pub fn bottom(&self) -> u32 {
        self.y + self.height
    }
}
