pub mod base;
pub mod registry;

// Re-export main types
pub use base::Layer;
pub use registry::LayerRegistry;
