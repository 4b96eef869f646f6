//! Offline preparation of the training corpus.
//!
//! The corpus is laid out as `<root>/<class_name>/<image>`. [`reencode`]
//! square-crops every image and re-encodes it as JPEG under a byte budget,
//! keeping the class directory structure in the output.

pub mod reencode;

pub use reencode::{
    BatchReport, ReencodeOptions, ReencodeOutcome, crop_and_resize, crop_and_resize_with,
    reencode_directory,
};
