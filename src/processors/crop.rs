//! Center square cropping.

use crate::core::errors::SimpleError;
use crate::core::{FoodError, ProcessingStage};
use crate::processors::types::CropWindow;
use image::RgbImage;

/// Computes the centered square window of side `min(width, height)`.
///
/// Offsets on each axis are `(dim / 2) - (side / 2)` with integer division,
/// so odd remainders shift the window toward the top-left.
///
/// # Examples
///
/// ```rust
/// use foodlens::processors::center_square_window;
///
/// let window = center_square_window(300, 500).unwrap();
/// assert_eq!((window.x, window.y, window.width), (0, 100, 300));
/// assert_eq!(window.bottom(), 400);
/// ```
pub fn center_square_window(width: u32, height: u32) -> Result<CropWindow, FoodError> {
    if width == 0 || height == 0 {
        return Err(FoodError::processing(
            ProcessingStage::Crop,
            format!("cannot crop an empty {width}x{height} image"),
            SimpleError::new("image has a zero dimension"),
        ));
    }

    let side = width.min(height);
    Ok(CropWindow {
        x: width / 2 - side / 2,
        y: height / 2 - side / 2,
        width: side,
        height: side,
    })
}

/// Copies a window out of an image.
pub fn crop_window(img: &RgbImage, window: CropWindow) -> Result<RgbImage, FoodError> {
    let (img_width, img_height) = img.dimensions();
    if window.width == 0 || window.height == 0 {
        return Err(FoodError::processing(
            ProcessingStage::Crop,
            "crop window is empty",
            SimpleError::new("invalid crop coordinates"),
        ));
    }
    if window.right() > img_width || window.bottom() > img_height {
        return Err(FoodError::processing(
            ProcessingStage::Crop,
            format!(
                "crop window {:?} exceeds {}x{} image",
                window, img_width, img_height
            ),
            SimpleError::new("crop out of bounds"),
        ));
    }

    Ok(image::imageops::crop_imm(img, window.x, window.y, window.width, window.height).to_image())
}

/// Center-crops to a square; square images are returned unchanged.
pub fn center_square(img: RgbImage) -> Result<RgbImage, FoodError> {
    let (width, height) = img.dimensions();
    if width == height {
        return Ok(img);
    }
    let window = center_square_window(width, height)?;
    crop_window(&img, window)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn test_portrait_window() {
        let window = center_square_window(300, 500).unwrap();
        assert_eq!(
            window,
            CropWindow {
                x: 0,
                y: 100,
                width: 300,
                height: 300
            }
        );
        assert_eq!(window.bottom(), 400);
    }

    #[test]
    fn test_landscape_window() {
        let window = center_square_window(640, 480).unwrap();
        assert_eq!((window.x, window.y, window.width), (80, 0, 480));
    }

    #[test]
    fn test_odd_sides_stay_in_bounds() {
        for (w, h) in [(301, 500), (500, 301), (7, 4), (4, 7), (1, 2)] {
            let window = center_square_window(w, h).unwrap();
            assert_eq!(window.width, w.min(h));
            assert!(window.right() <= w);
            assert!(window.bottom() <= h);
        }
    }

    #[test]
    fn test_center_square_takes_middle_rows() {
        // Rows 100..400 are white, everything else black.
        let img = RgbImage::from_fn(300, 500, |_, y| {
            if (100..400).contains(&y) {
                Rgb([255, 255, 255])
            } else {
                Rgb([0, 0, 0])
            }
        });
        let cropped = center_square(img).unwrap();
        assert_eq!(cropped.dimensions(), (300, 300));
        assert!(cropped.pixels().all(|p| p.0 == [255, 255, 255]));
    }

    #[test]
    fn test_square_image_untouched() {
        let img = RgbImage::from_pixel(64, 64, Rgb([9, 9, 9]));
        let cropped = center_square(img.clone()).unwrap();
        assert_eq!(cropped, img);
    }

    #[test]
    fn test_out_of_bounds_window_rejected() {
        let img = RgbImage::new(10, 10);
        let window = CropWindow {
            x: 5,
            y: 5,
            width: 10,
            height: 10,
        };
        assert!(crop_window(&img, window).is_err());
        assert!(center_square_window(0, 10).is_err());
    }
}
