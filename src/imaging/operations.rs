//! High-level image operations.
//!
//! These functions combine calculations with backend execution. The `plan_*`
//! functions are pure and only decide sizes; the `create_*` functions run a
//! plan through a backend and write the result.

use super::backend::{BackendError, ImageBackend};
use super::calculations::{
    compute_center_square_crop, compute_resize_factor, compute_thumbnail_factor,
    scale_dimensions,
};
use super::params::{CropBox, Dimensions, ParamError, Quality};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Result type for image operations.
pub type Result<T> = std::result::Result<T, BackendError>;

/// A file written by one of the operations, with its pixel size.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedImage {
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
}

impl GeneratedImage {
    fn new(path: &Path, size: Dimensions) -> Self {
        Self {
            path: path.to_path_buf(),
            width: size.width,
            height: size.height,
        }
    }
}

/// Target size of the medium copy.
pub fn plan_medium(original: Dimensions) -> Result<Dimensions> {
    let factor = compute_resize_factor(original.width);
    let target = scale_dimensions(original, factor)?;
    if target.is_empty() {
        return Err(ParamError::EmptyDimensions(target).into());
    }
    Ok(target)
}

/// Pre-crop size and crop box for a thumbnail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThumbnailPlan {
    pub scaled: Dimensions,
    pub crop: CropBox,
}

/// Plan a thumbnail without executing it.
pub fn plan_thumbnail(original: Dimensions) -> Result<ThumbnailPlan> {
    let factor = compute_thumbnail_factor(original.width);
    let scaled = scale_dimensions(original, factor)?;
    let crop = compute_center_square_crop(scaled)?;
    Ok(ThumbnailPlan { scaled, crop })
}

/// Name the output that could not be produced when a plan scaled to nothing.
fn attach_output(err: BackendError, output: &Path) -> BackendError {
    match err {
        BackendError::Param(ParamError::EmptyDimensions(size)) => BackendError::TooSmall {
            path: output.to_path_buf(),
            size,
        },
        other => other,
    }
}

/// Write the medium copy of an already decoded image.
pub fn create_medium<B: ImageBackend>(
    backend: &B,
    image: &B::Image,
    original: Dimensions,
    output: &Path,
    quality: Quality,
) -> Result<GeneratedImage> {
    let target = plan_medium(original).map_err(|e| attach_output(e, output))?;
    tracing::debug!(%original, %target, "resizing medium copy");

    let resized = backend.resize(image, target);
    backend.encode(&resized, output, quality)?;
    Ok(GeneratedImage::new(output, target))
}

/// Write the square thumbnail of an already decoded image.
///
/// Scales down by the thumbnail factor, then center-crops to a square.
pub fn create_thumbnail<B: ImageBackend>(
    backend: &B,
    image: &B::Image,
    original: Dimensions,
    output: &Path,
    quality: Quality,
) -> Result<GeneratedImage> {
    let ThumbnailPlan { scaled, crop } =
        plan_thumbnail(original).map_err(|e| attach_output(e, output))?;
    tracing::debug!(%original, %scaled, side = crop.width(), "cropping thumbnail");

    let resized = backend.resize(image, scaled);
    let cropped = backend.crop(&resized, crop);
    backend.encode(&cropped, output, quality)?;
    Ok(GeneratedImage::new(output, crop.size()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::backend::tests::{MockBackend, RecordedOp};

    fn dims(width: u32, height: u32) -> Dimensions {
        Dimensions { width, height }
    }

    #[test]
    fn plan_medium_small_image_halves() {
        assert_eq!(plan_medium(dims(800, 600)).unwrap(), dims(400, 300));
    }

    #[test]
    fn plan_medium_large_image() {
        assert_eq!(plan_medium(dims(2000, 1500)).unwrap(), dims(1000, 750));
        assert_eq!(plan_medium(dims(6000, 4000)).unwrap(), dims(1000, 666));
    }

    #[test]
    fn plan_thumbnail_2000x1500() {
        // factor 2 * 2 = 4 → 500x375, square side 375 centered at x=62
        let plan = plan_thumbnail(dims(2000, 1500)).unwrap();
        assert_eq!(plan.scaled, dims(500, 375));
        assert_eq!(plan.crop.left(), 62);
        assert_eq!(plan.crop.size(), dims(375, 375));
    }

    #[test]
    fn plan_medium_too_small_is_error() {
        // 1 pixel wide halves to 0
        assert!(plan_medium(dims(1, 400)).is_err());
    }

    #[test]
    fn plan_thumbnail_too_small_is_error() {
        // 3x3 with factor 4 scales to 0x0
        assert!(plan_thumbnail(dims(3, 3)).is_err());
    }

    #[test]
    fn create_medium_resizes_then_encodes() {
        let backend = MockBackend::new();
        let original = dims(2000, 1500);

        let generated = create_medium(
            &backend,
            &original,
            original,
            Path::new("/out/photo_md.jpg"),
            Quality::new(85).unwrap(),
        )
        .unwrap();

        assert_eq!((generated.width, generated.height), (1000, 750));
        assert_eq!(
            backend.get_operations(),
            vec![
                RecordedOp::Resize {
                    from: original,
                    to: dims(1000, 750),
                },
                RecordedOp::Encode {
                    output: "/out/photo_md.jpg".to_string(),
                    size: dims(1000, 750),
                    quality: 85,
                },
            ]
        );
    }

    #[test]
    fn create_thumbnail_resizes_crops_encodes() {
        let backend = MockBackend::new();
        let original = dims(2000, 1500);

        let generated = create_thumbnail(
            &backend,
            &original,
            original,
            Path::new("/out/photo_sq_thumb.jpg"),
            Quality::new(70).unwrap(),
        )
        .unwrap();

        assert_eq!((generated.width, generated.height), (375, 375));
        let ops = backend.get_operations();
        assert_eq!(ops.len(), 3);
        assert_eq!(
            ops[0],
            RecordedOp::Resize {
                from: original,
                to: dims(500, 375),
            }
        );
        assert_eq!(
            ops[1],
            RecordedOp::Crop {
                from: dims(500, 375),
                left: 62,
                top: 0,
                right: 437,
                bottom: 375,
            }
        );
        assert!(matches!(
            &ops[2],
            RecordedOp::Encode { size, quality: 70, .. } if *size == dims(375, 375)
        ));
    }

    #[test]
    fn create_thumbnail_too_small_touches_nothing() {
        let backend = MockBackend::new();
        let original = dims(3, 2);

        let result = create_thumbnail(
            &backend,
            &original,
            original,
            Path::new("/out/tiny_sq_thumb.jpg"),
            Quality::default(),
        );

        assert!(matches!(result, Err(BackendError::TooSmall { .. })));
        assert!(backend.get_operations().is_empty());
    }
}
