//! Value types for image geometry and encoding.
//!
//! These types describe *what* to produce, not *how*. They flow from the
//! [`calculations`](super::calculations) module (which decides sizes and crop
//! boxes) into the [`backend`](super::backend) (which does the pixel work).
//!
//! ## Types
//!
//! - [`Dimensions`] — Pixel size `(width, height)`. Named fields so width and
//!   height can't be swapped by accident.
//! - [`CropBox`] — Rectangle `(left, top, right, bottom)`, validated against
//!   the image it is cut from.
//! - [`Quality`] — JPEG encoding quality, 1–100. Rejected outside that range.

use serde::Serialize;
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParamError {
    #[error("scale factor must be at least 1")]
    ZeroFactor,
    #[error("image dimensions must be positive, got {width}x{height}")]
    ZeroDimension { width: u32, height: u32 },
    #[error("cannot crop an empty {0} image")]
    EmptyDimensions(Dimensions),
    #[error("crop box ({left}, {top}, {right}, {bottom}) does not fit inside {bounds}")]
    InvalidCropBox {
        left: u32,
        top: u32,
        right: u32,
        bottom: u32,
        bounds: Dimensions,
    },
    #[error("quality must be between 1 and 100, got {0}")]
    QualityOutOfRange(u32),
}

/// Pixel dimensions of an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    /// Dimensions of a real image. Both axes must be positive.
    pub fn new(width: u32, height: u32) -> Result<Self, ParamError> {
        if width == 0 || height == 0 {
            return Err(ParamError::ZeroDimension { width, height });
        }
        Ok(Self { width, height })
    }

    /// True when either axis is zero, e.g. after scaling a tiny image.
    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// A rectangle inside an image, right and bottom exclusive.
///
/// Only constructible through [`CropBox::new`], so every box in the program
/// satisfies `left < right <= width` and `top < bottom <= height` for the
/// image it was built against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropBox {
    left: u32,
    top: u32,
    right: u32,
    bottom: u32,
}

impl CropBox {
    pub fn new(
        left: u32,
        top: u32,
        right: u32,
        bottom: u32,
        bounds: Dimensions,
    ) -> Result<Self, ParamError> {
        if left >= right || top >= bottom || right > bounds.width || bottom > bounds.height {
            return Err(ParamError::InvalidCropBox {
                left,
                top,
                right,
                bottom,
                bounds,
            });
        }
        Ok(Self {
            left,
            top,
            right,
            bottom,
        })
    }

    pub fn left(self) -> u32 {
        self.left
    }

    pub fn top(self) -> u32 {
        self.top
    }

    pub fn right(self) -> u32 {
        self.right
    }

    pub fn bottom(self) -> u32 {
        self.bottom
    }

    pub fn width(self) -> u32 {
        self.right - self.left
    }

    pub fn height(self) -> u32 {
        self.bottom - self.top
    }

    pub fn size(self) -> Dimensions {
        Dimensions {
            width: self.width(),
            height: self.height(),
        }
    }

    pub fn is_square(self) -> bool {
        self.width() == self.height()
    }
}

/// Quality setting for JPEG encoding (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Quality(u8);

impl Quality {
    pub fn new(value: u32) -> Result<Self, ParamError> {
        match u8::try_from(value) {
            Ok(q @ 1..=100) => Ok(Self(q)),
            _ => Err(ParamError::QualityOutOfRange(value)),
        }
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(85)
    }
}
