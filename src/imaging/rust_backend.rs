//! Pure Rust codec backend built on the `image` crate.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode | `image::ImageReader` (format sniffed from file content) |
//! | Resize | `DynamicImage::resize_exact` with `Lanczos3` filter |
//! | Crop | `DynamicImage::crop_imm` |
//! | Encode → JPEG | `image::codecs::jpeg::JpegEncoder::new_with_quality` |

use super::backend::{BackendError, ImageBackend};
use super::params::{CropBox, Dimensions, Quality};
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ExtendedColorType, ImageEncoder, ImageError, ImageReader};
use std::io::BufWriter;
use std::path::Path;

/// Backend using the `image` crate for every operation.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// Load and decode an image from disk.
fn load_image(path: &Path) -> Result<DynamicImage, ImageError> {
    ImageReader::open(path)?.with_guessed_format()?.decode()
}

/// Write `img` as baseline JPEG. Greyscale stays greyscale, everything else
/// goes through RGB8 (JPEG has no alpha channel).
fn save_jpeg(img: &DynamicImage, path: &Path, quality: Quality) -> Result<(), ImageError> {
    let file = std::fs::File::create(path)?;
    let encoder = JpegEncoder::new_with_quality(BufWriter::new(file), quality.value());
    match img {
        DynamicImage::ImageLuma8(luma) => encoder.write_image(
            luma.as_raw(),
            luma.width(),
            luma.height(),
            ExtendedColorType::L8,
        ),
        other => {
            let rgb = other.to_rgb8();
            encoder.write_image(
                rgb.as_raw(),
                rgb.width(),
                rgb.height(),
                ExtendedColorType::Rgb8,
            )
        }
    }
}

impl ImageBackend for RustBackend {
    type Image = DynamicImage;

    fn decode(&self, path: &Path) -> Result<(DynamicImage, Dimensions), BackendError> {
        let decode_err = |source| BackendError::Decode {
            path: path.to_path_buf(),
            source,
        };
        let img = load_image(path).map_err(decode_err)?;
        let dims = Dimensions::new(img.width(), img.height())?;
        Ok((img, dims))
    }

    fn resize(&self, image: &DynamicImage, size: Dimensions) -> DynamicImage {
        if image.width() == size.width && image.height() == size.height {
            return image.clone();
        }
        image.resize_exact(size.width, size.height, FilterType::Lanczos3)
    }

    fn crop(&self, image: &DynamicImage, crop: CropBox) -> DynamicImage {
        image.crop_imm(crop.left(), crop.top(), crop.width(), crop.height())
    }

    fn encode(
        &self,
        image: &DynamicImage,
        path: &Path,
        quality: Quality,
    ) -> Result<(), BackendError> {
        save_jpeg(image, path, quality).map_err(|source| BackendError::Encode {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::create_test_jpeg;
    use tempfile::TempDir;

    fn quality(value: u32) -> Quality {
        Quality::new(value).unwrap()
    }

    #[test]
    fn decode_synthetic_jpeg() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("test.jpg");
        create_test_jpeg(&path, 200, 150);

        let backend = RustBackend::new();
        let (img, dims) = backend.decode(&path).unwrap();
        assert_eq!(dims, Dimensions::new(200, 150).unwrap());
        assert_eq!((img.width(), img.height()), (200, 150));
    }

    #[test]
    fn decode_nonexistent_file_errors() {
        let backend = RustBackend::new();
        let result = backend.decode(Path::new("/nonexistent/image.jpg"));
        assert!(matches!(result, Err(BackendError::Decode { .. })));
    }

    #[test]
    fn decode_garbage_errors() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("broken.jpg");
        std::fs::write(&path, b"definitely not a jpeg").unwrap();

        let backend = RustBackend::new();
        let err = backend.decode(&path).unwrap_err();
        assert!(matches!(err, BackendError::Decode { .. }));
        assert!(err.to_string().contains("broken.jpg"));
    }

    #[test]
    fn resize_to_exact_size() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("source.jpg");
        create_test_jpeg(&path, 400, 300);

        let backend = RustBackend::new();
        let (img, _) = backend.decode(&path).unwrap();
        let resized = backend.resize(&img, Dimensions::new(133, 77).unwrap());
        assert_eq!((resized.width(), resized.height()), (133, 77));
    }

    #[test]
    fn crop_to_box() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("source.jpg");
        create_test_jpeg(&path, 500, 375);

        let backend = RustBackend::new();
        let (img, dims) = backend.decode(&path).unwrap();
        let crop = CropBox::new(62, 0, 437, 375, dims).unwrap();
        let cropped = backend.crop(&img, crop);
        assert_eq!((cropped.width(), cropped.height()), (375, 375));
    }

    #[test]
    fn encode_writes_jpeg_regardless_of_source_format() {
        let tmp = TempDir::new().unwrap();
        let output = tmp.path().join("out.jpg");
        let img = DynamicImage::ImageRgba8(image::RgbaImage::new(32, 16));

        let backend = RustBackend::new();
        backend.encode(&img, &output, quality(70)).unwrap();

        let format = ImageReader::open(&output)
            .unwrap()
            .with_guessed_format()
            .unwrap()
            .format();
        assert_eq!(format, Some(image::ImageFormat::Jpeg));
        assert_eq!(image::image_dimensions(&output).unwrap(), (32, 16));
    }

    #[test]
    fn encode_keeps_greyscale() {
        let tmp = TempDir::new().unwrap();
        let output = tmp.path().join("grey.jpg");
        let img = DynamicImage::ImageLuma8(image::GrayImage::new(20, 20));

        RustBackend::new()
            .encode(&img, &output, quality(85))
            .unwrap();
        let decoded = image::open(&output).unwrap();
        assert_eq!(decoded.color(), image::ColorType::L8);
    }

    #[test]
    fn encode_into_missing_directory_errors() {
        let tmp = TempDir::new().unwrap();
        let output = tmp.path().join("missing/out.jpg");
        let img = DynamicImage::ImageRgb8(image::RgbImage::new(8, 8));

        let result = RustBackend::new().encode(&img, &output, quality(85));
        assert!(matches!(result, Err(BackendError::Encode { .. })));
    }

    #[test]
    fn lower_quality_gives_smaller_file() {
        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("source.jpg");
        create_test_jpeg(&source, 256, 256);

        let backend = RustBackend::new();
        let (img, _) = backend.decode(&source).unwrap();
        let high = tmp.path().join("high.jpg");
        let low = tmp.path().join("low.jpg");
        backend.encode(&img, &high, quality(95)).unwrap();
        backend.encode(&img, &low, quality(10)).unwrap();

        let size = |p: &Path| std::fs::metadata(p).unwrap().len();
        assert!(size(&low) < size(&high));
    }
}
