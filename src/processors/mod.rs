//! Image processing and post-processing stages.
//!
//! * [`normalization`] - bytes to model-ready tensor
//! * [`confidence`] - classifier output to recognized category
//! * [`crop`] - center square crops for the training corpus
//! * [`types`] - shared enums and geometry

pub mod confidence;
pub mod crop;
pub mod normalization;
pub mod types;

pub use confidence::ConfidenceGate;
pub use crop::{center_square, center_square_window, crop_window};
pub use normalization::ImageNormalizer;
pub use types::{ChannelOrder, CropWindow};
