//! Per-frame viewport math.
//!
//! The scheduler never caches view state between frames: every cycle it asks
//! the viewport source for the current position and derives a fresh
//! [`ViewportSnapshot`] from it and the canvas dimensions.

use crate::core::geo::{BoundingBox, Dimension, LatLng, MapPosition, Point, EARTH_RADIUS};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Pixel side length of the square world map at the given zoom level
pub fn map_size(zoom: u8) -> f64 {
    256.0 * 2_f64.powi(zoom as i32)
}

/// Projects a LatLng to world pixel coordinates at the given zoom level.
/// This is the standard Web Mercator projection (EPSG:3857).
pub fn project(lat_lng: &LatLng, zoom: u8) -> Point {
    let scale = map_size(zoom);
    let lat = LatLng::clamp_lat(lat_lng.lat);

    let x = lat_lng.lng.to_radians() * EARTH_RADIUS;
    let y = ((PI / 4.0 + lat.to_radians() / 2.0).tan().ln()) * EARTH_RADIUS;

    let pixel_x = (x + PI * EARTH_RADIUS) / (2.0 * PI * EARTH_RADIUS) * scale;
    let pixel_y = (-y + PI * EARTH_RADIUS) / (2.0 * PI * EARTH_RADIUS) * scale;

    Point::new(pixel_x, pixel_y)
}

/// Unprojects world pixel coordinates back to a LatLng at the given zoom level
pub fn unproject(pixel: &Point, zoom: u8) -> LatLng {
    let scale = map_size(zoom);

    let x = (pixel.x / scale) * (2.0 * PI * EARTH_RADIUS) - PI * EARTH_RADIUS;
    let y = PI * EARTH_RADIUS - (pixel.y / scale) * (2.0 * PI * EARTH_RADIUS);

    let lng = (x / EARTH_RADIUS).to_degrees();
    let lat = (2.0 * (y / EARTH_RADIUS).exp().atan() - PI / 2.0).to_degrees();

    LatLng::new(lat, LatLng::wrap_lng(lng))
}

/// The view state rendered into one frame: the position it was computed
/// from, the canvas dimensions, the visible geographic bounds, and the
/// world-pixel coordinate of the canvas top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportSnapshot {
    pub position: MapPosition,
    pub dimension: Dimension,
    pub bounds: BoundingBox,
    pub top_left: Point,
}

impl ViewportSnapshot {
    /// Derives the visible bounding box and top-left pixel offset for a
    /// canvas of `dimension` pixels centered on `position`.
    pub fn compute(position: MapPosition, dimension: Dimension) -> Self {
        let center_pixel = project(&position.center, position.zoom);
        let half_width = dimension.width as f64 / 2.0;
        let half_height = dimension.height as f64 / 2.0;

        let top_left = Point::new(center_pixel.x - half_width, center_pixel.y - half_height);

        // The visible box is clipped to the world so that unprojecting its
        // corners always yields valid coordinates.
        let world = map_size(position.zoom);
        let pixel_min = Point::new(top_left.x.max(0.0), top_left.y.max(0.0));
        let pixel_max = Point::new(
            (center_pixel.x + half_width).min(world),
            (center_pixel.y + half_height).min(world),
        );

        let north_west = unproject(&pixel_min, position.zoom);
        let south_east = unproject(&pixel_max, position.zoom);
        let bounds = BoundingBox::new(
            LatLng::new(south_east.lat, north_west.lng),
            LatLng::new(north_west.lat, south_east.lng),
        );

        Self {
            position,
            dimension,
            bounds,
            top_left,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_unproject_round_trip() {
        let coord = LatLng::new(52.5200, 13.4050);
        let pixel = project(&coord, 10);
        let back = unproject(&pixel, 10);

        assert!((back.lat - coord.lat).abs() < 1e-9);
        assert!((back.lng - coord.lng).abs() < 1e-9);
    }

    #[test]
    fn test_project_world_center() {
        let pixel = project(&LatLng::new(0.0, 0.0), 0);
        assert!((pixel.x - 128.0).abs() < 1e-9);
        assert!((pixel.y - 128.0).abs() < 1e-9);
    }

    #[test]
    fn test_snapshot_covers_world_at_zoom_zero() {
        let snapshot = ViewportSnapshot::compute(
            MapPosition::new(LatLng::new(0.0, 0.0), 0),
            Dimension::new(256, 256),
        );

        assert!((snapshot.top_left.x - 0.0).abs() < 1e-9);
        assert!((snapshot.top_left.y - 0.0).abs() < 1e-9);
        assert!((snapshot.bounds.south_west.lng - (-180.0)).abs() < 1e-6);
        assert!((snapshot.bounds.north_east.lng - 180.0).abs() < 1e-6);
        assert!(snapshot.bounds.north_east.lat > 85.0);
        assert!(snapshot.bounds.south_west.lat < -85.0);
    }

    #[test]
    fn test_snapshot_top_left_offset() {
        let snapshot = ViewportSnapshot::compute(
            MapPosition::new(LatLng::new(0.0, 0.0), 1),
            Dimension::new(256, 128),
        );

        // World is 512px at zoom 1, center projects to (256, 256).
        assert!((snapshot.top_left.x - 128.0).abs() < 1e-9);
        assert!((snapshot.top_left.y - 192.0).abs() < 1e-9);
    }

    #[test]
    fn test_snapshot_bounds_contain_center() {
        let center = LatLng::new(48.8566, 2.3522);
        let snapshot = ViewportSnapshot::compute(
            MapPosition::new(center, 12),
            Dimension::new(800, 600),
        );

        assert!(snapshot.bounds.contains(&center));
    }
}
