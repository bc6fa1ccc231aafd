//! Poster Studio Edit Session
//!
//! Holds the working set of an editing session and drives the poster
//! pipeline for it.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────┐
//! │                   EditSession                    │
//! │  ┌──────────┐  ┌──────────┐  ┌───────────────┐   │
//! │  │ WorkItem │  │ WorkItem │  │ active, mode, │   │
//! │  │ + feed   │  │ + feed   │  │ templates     │   │
//! │  └────┬─────┘  └────┬─────┘  └───────┬───────┘   │
//! │       │ commit      │                │           │
//! │       ▼             ▼                ▼           │
//! │  extract_crop ──► compose_poster ──► DownloadSink│
//! └──────────────────────────────────────────────────┘
//! ```
//!
//! Crop widgets push rectangles through a [`CropFeed`]; only the latest
//! value is kept.

pub mod feed;
pub mod session;

pub use feed::CropFeed;
pub use session::*;
