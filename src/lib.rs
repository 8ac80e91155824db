//! # Lamina
//!
//! A frame-paced redraw scheduler for layered map views.
//!
//! The crate runs a single background worker that decides when a new frame
//! is needed, computes the visible geographic region, and drives an ordered
//! set of drawable layers into an off-screen surface before handing it to
//! the display. Layer content, tile loading, and rasterization are external
//! collaborators reached through the traits in [`render`] and [`layers`].

pub mod core;
pub mod layers;
pub mod render;
pub mod worker;

// Re-export public API
pub use crate::core::{
    geo::{BoundingBox, Dimension, LatLng, MapPosition, Point},
    viewport::ViewportSnapshot,
};

pub use crate::layers::{base::Layer, registry::LayerRegistry};

pub use crate::render::{
    canvas::{Bitmap, Canvas, Color},
    scheduler::{RedrawScheduler, SchedulerConfig},
    surface::{FrameSurface, ViewportSource},
};

pub use crate::worker::{
    ThreadPriority, WorkCycle, Worker, WorkerHandle, WorkerOptions, WorkerSignals,
};

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Common error types
#[derive(Debug, thiserror::Error)]
pub enum MapError {
    #[error("worker error: {0}")]
    Worker(String),
}

/// Error type alias for convenience
pub type Error = MapError;
