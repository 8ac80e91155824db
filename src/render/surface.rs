//! Contracts to the display side of the pipeline.

use crate::{core::geo::MapPosition, core::viewport::ViewportSnapshot, render::canvas::Bitmap};
use std::sync::Arc;

/// Supplies the current map position on demand.
///
/// Queried once per frame; the scheduler holds no view state of its own.
pub trait ViewportSource: Send + Sync {
    fn current_position(&self) -> MapPosition;
}

/// The double-buffered drawing surface owned by the on-screen widget.
pub trait FrameSurface: Send + Sync {
    /// The bitmap to draw the next frame into, or `None` while the surface
    /// is not yet realized. The scheduler skips rendering for that cycle
    /// but keeps pacing.
    fn drawing_bitmap(&self) -> Option<Arc<dyn Bitmap>>;

    /// Marks the off-screen frame complete, handing over the view state it
    /// was rendered with so the widget can position the buffer.
    fn frame_finished(&self, snapshot: &ViewportSnapshot);

    /// Asks the host widget to repaint from the finished buffer
    fn request_repaint(&self);
}
