//! Pure calculation functions for image geometry.
//!
//! All functions here are pure and testable without any I/O or images.
//!
//! ## Scale policy
//!
//! The medium output divides both axes by an integer factor chosen from the
//! source width: `2` up to 1000px wide, `width / 1000` beyond. Small originals
//! end up near 500px wide, large ones near 1000px, so output size stays
//! roughly constant across camera resolutions. Thumbnails use twice that
//! factor and are then cropped to a centered square.

use super::params::{CropBox, Dimensions, ParamError};

/// Widths at or below this are halved; wider images are divided by `width / 1000`.
const MEDIUM_WIDTH_STEP: u32 = 1000;

/// Divide both axes by `factor`, rounding down.
///
/// An axis smaller than `factor` comes out as 0; callers check
/// [`Dimensions::is_empty`] before handing the result to a backend.
///
/// # Examples
/// ```
/// # use imagefixer::imaging::{Dimensions, scale_dimensions};
/// let size = Dimensions::new(2000, 1500).unwrap();
/// let scaled = scale_dimensions(size, 2).unwrap();
/// assert_eq!((scaled.width, scaled.height), (1000, 750));
/// ```
pub fn scale_dimensions(size: Dimensions, factor: u32) -> Result<Dimensions, ParamError> {
    if factor == 0 {
        return Err(ParamError::ZeroFactor);
    }
    Ok(Dimensions {
        width: size.width / factor,
        height: size.height / factor,
    })
}

/// Scale factor for the medium output.
pub fn compute_resize_factor(width: u32) -> u32 {
    if width <= MEDIUM_WIDTH_STEP {
        2
    } else {
        width / MEDIUM_WIDTH_STEP
    }
}

/// Scale factor applied before the thumbnail crop: twice the medium factor.
pub fn compute_thumbnail_factor(width: u32) -> u32 {
    compute_resize_factor(width) * 2
}

/// Largest centered square inside `scaled`.
///
/// The side is the shorter axis. Landscape images are cropped horizontally
/// (`top == 0`), portrait images vertically (`left == 0`), square images not
/// at all. Odd leftovers put the extra pixel on the right or bottom.
pub fn compute_center_square_crop(scaled: Dimensions) -> Result<CropBox, ParamError> {
    if scaled.is_empty() {
        return Err(ParamError::EmptyDimensions(scaled));
    }
    let side = scaled.width.min(scaled.height);
    let left = (scaled.width - side) / 2;
    let top = (scaled.height - side) / 2;
    CropBox::new(left, top, left + side, top + side, scaled)
}
