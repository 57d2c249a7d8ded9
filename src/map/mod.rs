//! Map rendering support: fallback tiers, tiles, projection and static SVG.

pub mod fallback;
pub mod projection;
/// Static SVG map used by the fallback tier.
pub mod svg;
pub mod tiles;

pub use fallback::{LoadErrorAction, MapFallback, MapMode};
pub use tiles::TileLayer;
