//! Poster Studio Render Engine
//!
//! Turns committed crops into finished posters and hands them to a
//! download collaborator.
//!
//! # Pipeline Architecture
//!
//! ```text
//! cropped.png ──── decode ──┐
//!                           ├── join ── stretch crop ── overlay template ── PNG
//! template.png ─── decode ──┘                                                │
//!                                                                            ▼
//!                                                        DownloadSink (poster-<n>.png)
//! ```
//!
//! Both decodes run concurrently; drawing starts only once both succeeded.

pub mod compositor;
pub mod export;
pub mod templates;

pub use compositor::{compose_decoded, compose_poster, render_poster};
pub use export::*;
pub use templates::builtin_templates;
