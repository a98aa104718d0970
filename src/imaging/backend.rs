//! Image codec trait and shared error type.
//!
//! The [`ImageBackend`] trait is the boundary between geometry decisions and
//! pixel work. It defines the four operations every backend must support:
//! decode, resize, crop, and encode. Decoded pixels live in the backend's
//! associated [`Image`](ImageBackend::Image) type; callers only ever look at
//! the [`Dimensions`] returned alongside it.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend), built on the `image`
//! crate.

use super::params::{CropBox, Dimensions, ParamError, Quality};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("failed to decode {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("failed to write {}: {source}", path.display())]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("{} is too small to scale down to {size}", path.display())]
    TooSmall { path: PathBuf, size: Dimensions },
    #[error(transparent)]
    Param(#[from] ParamError),
}

/// Trait for image codec backends.
///
/// `resize` and `crop` are infallible: the caller guarantees a non-empty
/// target size and a crop box validated against the image.
pub trait ImageBackend: Sync {
    /// Decoded pixel data, owned by whoever holds it.
    type Image: Send;

    /// Read and decode an image file.
    fn decode(&self, path: &Path) -> Result<(Self::Image, Dimensions), BackendError>;

    /// Resize to exactly `size`, ignoring aspect ratio.
    fn resize(&self, image: &Self::Image, size: Dimensions) -> Self::Image;

    /// Cut out the region described by `crop`.
    fn crop(&self, image: &Self::Image, crop: CropBox) -> Self::Image;

    /// Encode as JPEG and write to `path`, replacing any existing file.
    fn encode(&self, image: &Self::Image, path: &Path, quality: Quality)
    -> Result<(), BackendError>;
}
