//! Poster Studio Processing Core
//!
//! Pixel-level work that sits underneath the poster pipeline:
//! - **Codec:** Decode encoded handles to pixel surfaces and encode them back as PNG
//! - **Crop Extraction:** Copy a crop rectangle out of a source image at native resolution
//! - **Aspect Fitting:** Produce crop rectangles matching an output aspect mode
//!
//! This crate is pure computation: no file I/O and no async runtime.
//! All inputs are data; all outputs are data.

pub mod codec;
pub mod crop;
pub mod fit;

pub use crop::extract_crop;
pub use fit::{constrain_to_aspect, fit_centered, zoomed};
