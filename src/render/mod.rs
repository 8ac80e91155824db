pub mod canvas;
pub mod scheduler;
pub mod surface;

// Re-export main types
pub use canvas::{Bitmap, Canvas, Color};
pub use scheduler::{RedrawScheduler, SchedulerConfig};
pub use surface::{FrameSurface, ViewportSource};
