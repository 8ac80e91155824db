pub mod geo;
pub mod viewport;

// Re-export main types
pub use geo::{BoundingBox, Dimension, LatLng, MapPosition, Point};
pub use viewport::ViewportSnapshot;
