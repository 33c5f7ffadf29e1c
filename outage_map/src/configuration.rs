use crate::geolocation::PositionOptions;
use crate::map_view::{MapView, TileLayer};
use crate::state::HandlerOptions;
use location_search::NominatimConfig;
use outages::{OutagesApiConfig, TimeDisplay};
use serde::Deserialize;
use shared_kernel::configuration::config;
use shared_kernel::location::Location;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub outages: OutagesApiConfig,
    pub geocoding: GeocodingSettings,
    pub map: MapSettings,
    #[serde(default)]
    pub display: TimeDisplay,
    pub startup: StartupSettings,
    pub geolocation: GeolocationSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct GeocodingSettings {
    #[serde(flatten)]
    pub nominatim: NominatimConfig,
    pub user_agent: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct MapSettings {
    pub center: Location,
    pub initial_zoom: u8,
    pub marker_zoom: u8,
    #[serde(default)]
    pub tiles: TileLayer,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StartupSettings {
    pub initial_load_delay_ms: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct GeolocationSettings {
    pub high_accuracy: bool,
    pub timeout_ms: u64,
    pub maximum_age_ms: u64,
    /// Position reported by this device. Without it geolocation is unsupported.
    pub fixed_position: Option<Location>,
}

impl GeolocationSettings {
    pub fn options(&self) -> PositionOptions {
        PositionOptions {
            high_accuracy: self.high_accuracy,
            timeout: Duration::from_millis(self.timeout_ms),
            maximum_age: Duration::from_millis(self.maximum_age_ms),
        }
    }
}

impl Settings {
    pub fn parse() -> anyhow::Result<Self> {
        config::<Settings>()
    }

    pub fn map_view(&self) -> MapView {
        MapView::new(
            self.map.center,
            self.map.initial_zoom,
            self.map.marker_zoom,
            self.map.tiles.clone(),
        )
    }

    pub fn handler_options(&self) -> HandlerOptions {
        HandlerOptions {
            default_location: self.map.center,
            initial_load_delay: Duration::from_millis(self.startup.initial_load_delay_ms),
            position_options: self.geolocation.options(),
            time_display: self.display.clone(),
        }
    }
}
