//! Drawing-target contracts.
//!
//! The scheduler never rasterizes anything itself; it binds a bitmap
//! borrowed from the surface provider to a canvas, clears it, and hands the
//! canvas to each layer. Concrete bitmap and canvas types live in the
//! graphics back-end embedding this crate.

use crate::{core::geo::Dimension, Result};
use std::sync::Arc;

/// A solid RGBA color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const TRANSPARENT: Color = Color {
        r: 0,
        g: 0,
        b: 0,
        a: 0,
    };

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }
}

/// An off-screen pixel buffer owned by the surface provider.
///
/// The reference handed to the scheduler is only valid for one frame; the
/// provider may swap buffers or resize between frames.
pub trait Bitmap: Send + Sync {
    fn dimension(&self) -> Dimension;
}

/// A drawing context bound to one bitmap at a time
pub trait Canvas: Send {
    /// Binds the canvas to a backing bitmap for the duration of one frame
    fn bind(&mut self, bitmap: Arc<dyn Bitmap>) -> Result<()>;

    /// Fills the whole bound bitmap with a solid color
    fn fill_color(&mut self, color: Color);

    /// Pixel size of the currently bound bitmap
    fn dimension(&self) -> Dimension;
}
