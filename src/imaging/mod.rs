//! Image geometry and codec access.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Decode** | `image::ImageReader` |
//! | **Medium copy** | integer scale factor + `resize_exact` (Lanczos3) |
//! | **Thumbnail** | doubled factor + centered square `crop_imm` |
//! | **Encode** | `JpegEncoder` at the configured quality |
//!
//! The module is split into:
//! - **Parameters**: value types ([`Dimensions`], [`CropBox`], [`Quality`])
//! - **Calculations**: pure functions for scale factors and crop boxes
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Operations**: functions combining calculations + backend

pub mod backend;
mod calculations;
pub mod operations;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, ImageBackend};
pub use calculations::{
    compute_center_square_crop, compute_resize_factor, compute_thumbnail_factor,
    scale_dimensions,
};
pub use operations::{
    GeneratedImage, ThumbnailPlan, create_medium, create_thumbnail, plan_medium, plan_thumbnail,
};
pub use params::{CropBox, Dimensions, ParamError, Quality};
pub use rust_backend::RustBackend;
