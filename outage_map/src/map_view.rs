use serde::Deserialize;
use shared_kernel::location::Location;
use std::f64::consts::PI;

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct TileLayer {
    pub url_template: String,
    #[serde(default = "default_subdomains")]
    pub subdomains: Vec<String>,
    pub max_zoom: u8,
    pub attribution: String,
}

fn default_subdomains() -> Vec<String> {
    vec!["a".to_owned(), "b".to_owned(), "c".to_owned()]
}

impl Default for TileLayer {
    fn default() -> Self {
        Self {
            url_template: "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png".to_owned(),
            subdomains: default_subdomains(),
            max_zoom: 19,
            attribution: "© OpenStreetMap contributors".to_owned(),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct TileId {
    pub z: u8,
    pub x: u32,
    pub y: u32,
}

impl TileId {
    /// Web-Mercator tile holding `location` at zoom `z`.
    pub fn containing(location: Location, z: u8) -> Self {
        let n = 2f64.powi(i32::from(z));
        let lat_rad = location.latitude.to_radians();
        let x = (location.longitude + 180.0) / 360.0 * n;
        let y = (1.0 - (lat_rad.tan() + 1.0 / lat_rad.cos()).ln() / PI) / 2.0 * n;
        let max = n - 1.0;

        Self {
            z,
            x: x.floor().clamp(0.0, max) as u32,
            y: y.floor().clamp(0.0, max) as u32,
        }
    }
}

impl std::fmt::Display for TileId {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}/{}/{}", self.z, self.x, self.y)
    }
}

impl TileLayer {
    pub fn tile_url(&self, tile: TileId) -> String {
        let subdomain = if self.subdomains.is_empty() {
            ""
        } else {
            let index = (tile.x as usize + tile.y as usize) % self.subdomains.len();
            self.subdomains[index].as_str()
        };
        self.url_template
            .replace("{s}", subdomain)
            .replace("{z}", &tile.z.to_string())
            .replace("{x}", &tile.x.to_string())
            .replace("{y}", &tile.y.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub center: Location,
    pub zoom: u8,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Marker {
    pub position: Location,
}

/// The map widget: one viewport, at most one marker.
#[derive(Debug, Clone, PartialEq)]
pub struct MapView {
    viewport: Viewport,
    marker: Option<Marker>,
    marker_zoom: u8,
    tiles: TileLayer,
}

impl MapView {
    pub fn new(center: Location, zoom: u8, marker_zoom: u8, tiles: TileLayer) -> Self {
        let zoom = zoom.min(tiles.max_zoom);
        let marker_zoom = marker_zoom.min(tiles.max_zoom);
        Self {
            viewport: Viewport { center, zoom },
            marker: None,
            marker_zoom,
            tiles,
        }
    }

    /// Replaces any existing marker and recenters on it.
    pub fn set_marker(&mut self, location: Location) {
        if let Some(previous) = self.marker.take() {
            tracing::debug!(position = %previous.position, "marker removed");
        }
        self.marker = Some(Marker { position: location });
        self.viewport = Viewport {
            center: location,
            zoom: self.marker_zoom,
        };
    }

    pub fn marker(&self) -> Option<&Marker> {
        self.marker.as_ref()
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn tiles(&self) -> &TileLayer {
        &self.tiles
    }

    pub fn center_tile_url(&self) -> String {
        self.tiles
            .tile_url(TileId::containing(self.viewport.center, self.viewport.zoom))
    }
}
