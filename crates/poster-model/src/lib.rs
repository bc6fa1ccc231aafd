//! Poster Studio Model
//!
//! Defines the core data contracts for poster composition:
//! - **Images:** Opaque encoded-image handles (source, cropped, poster)
//! - **Crop:** Pixel-space and normalized crop rectangles
//! - **Aspect:** The two supported output shapes and their resolutions
//! - **Templates:** Overlay images bound to an aspect mode
//! - **Work items:** One uploaded image tracked through the session
//! - **Manifest:** Batch job description files
//!
//! Pixel rectangles are expressed in the coordinate space of the source
//! image they were selected on; normalized rectangles use `[0.0, 1.0]`.

pub use poster_common::aspect;

pub mod crop;
pub mod encoded;
pub mod manifest;
pub mod template;
pub mod work_item;

pub use aspect::*;
pub use crop::*;
pub use encoded::*;
pub use manifest::*;
pub use template::*;
pub use work_item::*;
