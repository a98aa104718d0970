//! # imagefixer
//!
//! Batch resizer for JPEG photos. Point it at a file or a directory and every
//! JPEG gets two derived copies next to it (or in a chosen directory):
//!
//! ```text
//! IMG_1316.jpg  →  IMG_1316_md.jpg        medium copy
//!               →  IMG_1316_sq_thumb.jpg  square thumbnail
//! ```
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`process`] | Walks a file or directory, names outputs, collects a [`process::BatchReport`] |
//! | [`imaging`] | Scale-factor and crop-box geometry, plus the [`imaging::ImageBackend`] codec trait |
//! | [`config`] | [`config::ProcessingConfig`]: encoding qualities and worker count, validated up front |
//! | [`output`] | CLI output formatting for progress events and the final summary |
//!
//! # Design Decisions
//!
//! ## Integer Scale Factors
//!
//! Outputs are the original divided by a whole number, never resized to a
//! fixed pixel target. The factor is picked from the source width (halve up
//! to 1000px, divide by `width / 1000` beyond), which keeps medium copies
//! between roughly 500 and 1000px wide whatever camera took the picture.
//! Thumbnails use twice the factor and are then center-cropped to a square
//! along the longer axis, so portrait and landscape shots are treated alike.
//!
//! ## Geometry Separate From Pixels
//!
//! All sizing is pure integer math in [`imaging`] with value types
//! ([`imaging::Dimensions`], [`imaging::CropBox`]) that can't mix up axes.
//! Decoding, resampling and encoding sit behind [`imaging::ImageBackend`], so
//! the orchestration can be tested against a recording mock and the
//! production [`imaging::RustBackend`] stays a thin layer over the `image`
//! crate.
//!
//! ## One Bad File Doesn't Sink a Directory
//!
//! Directory runs process files in parallel and collect per-file failures in
//! the report instead of aborting. A single-file run still fails fast.

pub mod config;
pub mod imaging;
pub mod output;
pub mod process;

#[cfg(test)]
pub(crate) mod test_helpers;
