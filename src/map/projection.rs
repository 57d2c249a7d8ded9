//! Geographic bounds, percentage positioning and slippy-map tile math.

use std::f64::consts::PI;

use crate::grid::types::{GeoPosition, GridNode};

/// Axis-aligned latitude/longitude box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoBounds {
    /// Southern edge.
    pub min_lat: f64,
    /// Northern edge.
    pub max_lat: f64,
    /// Western edge.
    pub min_lng: f64,
    /// Eastern edge.
    pub max_lng: f64,
}

impl GeoBounds {
    /// Smallest box containing every node, grown by `pad` of its span on each side.
    ///
    /// Returns `None` for an empty node list.
    pub fn enclosing(nodes: &[GridNode], pad: f64) -> Option<Self> {
        let first = nodes.first()?.position;
        let mut b = Self {
            min_lat: first.lat,
            max_lat: first.lat,
            min_lng: first.lng,
            max_lng: first.lng,
        };
        for n in &nodes[1..] {
            b.min_lat = b.min_lat.min(n.position.lat);
            b.max_lat = b.max_lat.max(n.position.lat);
            b.min_lng = b.min_lng.min(n.position.lng);
            b.max_lng = b.max_lng.max(n.position.lng);
        }
        let dlat = (b.max_lat - b.min_lat) * pad;
        let dlng = (b.max_lng - b.min_lng) * pad;
        b.min_lat -= dlat;
        b.max_lat += dlat;
        b.min_lng -= dlng;
        b.max_lng += dlng;
        Some(b)
    }

    /// Midpoint of the box.
    pub fn center(&self) -> GeoPosition {
        GeoPosition::new(
            (self.min_lat + self.max_lat) / 2.0,
            (self.min_lng + self.max_lng) / 2.0,
        )
    }

    /// Position as `(x, y)` percentages of the box, y growing southwards.
    ///
    /// A degenerate axis maps to 50%.
    pub fn to_percent(&self, pos: GeoPosition) -> (f64, f64) {
        let lng_span = self.max_lng - self.min_lng;
        let lat_span = self.max_lat - self.min_lat;
        let x = if lng_span > 0.0 {
            (pos.lng - self.min_lng) / lng_span * 100.0
        } else {
            50.0
        };
        let y = if lat_span > 0.0 {
            (self.max_lat - pos.lat) / lat_span * 100.0
        } else {
            50.0
        };
        (x, y)
    }
}

/// Web-Mercator tile coordinate containing `pos` at `zoom`.
pub fn tile_for(pos: GeoPosition, zoom: u8) -> (u32, u32) {
    let n = f64::from(1u32 << zoom.min(30));
    let lat_rad = pos.lat.clamp(-85.0511, 85.0511).to_radians();
    let x = ((pos.lng + 180.0) / 360.0 * n).floor();
    let y = ((1.0 - lat_rad.tan().asinh() / PI) / 2.0 * n).floor();
    let max = n - 1.0;
    (x.clamp(0.0, max) as u32, y.clamp(0.0, max) as u32)
}
