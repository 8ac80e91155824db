use crate::{
    core::geo::{BoundingBox, Point},
    render::canvas::Canvas,
    Result,
};

/// A drawable unit contributing visual content to the map.
///
/// Layers are registered with a [`crate::LayerRegistry`] and drawn by the
/// redraw scheduler in registration order. Implementations draw through
/// `&self` because the scheduler shares them across threads; internal
/// mutability is the layer's own concern.
pub trait Layer: Send + Sync {
    /// Whether the layer should be drawn at all. Invisible layers are
    /// skipped but keep their position in the draw order.
    fn is_visible(&self) -> bool {
        true
    }

    /// Renders the layer for the visible region.
    ///
    /// `top_left` is the world-pixel coordinate of the canvas origin; layers
    /// subtract it from projected coordinates to place content on screen.
    /// A returned error is contained by the scheduler: it is logged and the
    /// remaining layers still draw.
    fn draw(
        &self,
        bounds: &BoundingBox,
        zoom: u8,
        canvas: &mut dyn Canvas,
        top_left: Point,
    ) -> Result<()>;

    /// Called exactly once when the scheduler tears down, in registration
    /// order. Layers release their resources here.
    fn on_destroy(&self) {}
}
