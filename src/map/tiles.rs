//! Raster tile layers for the interactive map tier.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Base layer offered by the grid command map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TileLayer {
    /// Dark basemap.
    #[default]
    Dark,
    /// Satellite imagery.
    Satellite,
    /// Topographic terrain.
    Terrain,
}

impl TileLayer {
    /// All layers in menu order.
    pub const ALL: [TileLayer; 3] = [TileLayer::Dark, TileLayer::Satellite, TileLayer::Terrain];

    /// URL template with `{s}`, `{z}`, `{x}`, `{y}` placeholders.
    pub fn template(self) -> &'static str {
        match self {
            Self::Dark => "https://{s}.basemaps.cartocdn.com/dark_all/{z}/{x}/{y}.png",
            Self::Satellite => {
                "https://server.arcgisonline.com/ArcGIS/rest/services/World_Imagery/MapServer/tile/{z}/{y}/{x}"
            }
            Self::Terrain => "https://{s}.tile.opentopomap.org/{z}/{x}/{y}.png",
        }
    }

    /// Attribution shown beneath the map.
    pub fn attribution(self) -> &'static str {
        match self {
            Self::Dark => "© OpenStreetMap contributors © CARTO",
            Self::Satellite => "Tiles © Esri",
            Self::Terrain => "© OpenStreetMap contributors, SRTM | © OpenTopoMap",
        }
    }

    /// Maximum zoom the provider serves.
    pub fn max_zoom(self) -> u8 {
        match self {
            Self::Dark => 20,
            Self::Satellite => 19,
            Self::Terrain => 17,
        }
    }

    /// Concrete URL of one tile.
    ///
    /// Subdomains rotate over `a`, `b`, `c` by tile position. Zoom is
    /// clamped to [`TileLayer::max_zoom`].
    pub fn tile_url(self, z: u8, x: u32, y: u32) -> String {
        let sub = ["a", "b", "c"][((x % 3 + y % 3) % 3) as usize];
        self.template()
            .replace("{s}", sub)
            .replace("{z}", &z.min(self.max_zoom()).to_string())
            .replace("{x}", &x.to_string())
            .replace("{y}", &y.to_string())
    }
}

impl fmt::Display for TileLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Dark => "dark",
            Self::Satellite => "satellite",
            Self::Terrain => "terrain",
        })
    }
}

impl FromStr for TileLayer {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dark" => Ok(Self::Dark),
            "satellite" => Ok(Self::Satellite),
            "terrain" => Ok(Self::Terrain),
            other => Err(format!(
                "unknown tile layer \"{other}\", expected dark, satellite or terrain"
            )),
        }
    }
}
