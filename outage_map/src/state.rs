use crate::events::RequestGeneration;
use crate::geolocation::PositionOptions;
use crate::map_view::MapView;
use outages::{OutagePanel, TimeDisplay};
use shared_kernel::location::Location;
use std::time::Duration;

pub const GEOLOCATION_IDLE_LABEL: &str = "📍 Моё местоположение";
pub const GEOLOCATION_BUSY_LABEL: &str = "📍 Определяем...";
pub const SEARCH_IDLE_LABEL: &str = "🔍 Найти";
pub const SEARCH_BUSY_LABEL: &str = "🔍 Поиск...";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    label: String,
    idle_label: String,
    disabled: bool,
}

impl Button {
    pub fn new(label: &str) -> Self {
        Self {
            label: label.to_owned(),
            idle_label: label.to_owned(),
            disabled: false,
        }
    }

    pub(crate) fn start(&mut self, busy_label: &str) {
        self.label = busy_label.to_owned();
        self.disabled = true;
    }

    pub(crate) fn restore(&mut self) {
        self.label = self.idle_label.clone();
        self.disabled = false;
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }
}

/// Knobs the input handlers read but never change.
#[derive(Debug, Clone, PartialEq)]
pub struct HandlerOptions {
    /// Queried on page load, before the user picks anything.
    pub default_location: Location,
    pub initial_load_delay: Duration,
    pub position_options: PositionOptions,
    pub time_display: TimeDisplay,
}

impl Default for HandlerOptions {
    fn default() -> Self {
        Self {
            default_location: Location::new(48.4647, 35.0462),
            initial_load_delay: Duration::from_millis(500),
            position_options: PositionOptions::default(),
            time_display: TimeDisplay::default(),
        }
    }
}

/// Everything the page shows, owned by the controller and changed only by
/// [`crate::update::update`].
#[derive(Debug, Clone)]
pub struct AppState {
    pub map: MapView,
    pub current_location: Option<Location>,
    pub address_input: String,
    pub geolocation_button: Button,
    pub search_button: Button,
    pub panel: OutagePanel,
    pub(crate) latest_generation: RequestGeneration,
    pub(crate) geolocation_supported: bool,
    pub(crate) options: HandlerOptions,
}

impl AppState {
    pub fn new(map: MapView, options: HandlerOptions, geolocation_supported: bool) -> Self {
        Self {
            map,
            current_location: None,
            address_input: String::new(),
            geolocation_button: Button::new(GEOLOCATION_IDLE_LABEL),
            search_button: Button::new(SEARCH_IDLE_LABEL),
            panel: OutagePanel::Idle,
            latest_generation: RequestGeneration::default(),
            geolocation_supported,
            options,
        }
    }

    pub fn latest_generation(&self) -> RequestGeneration {
        self.latest_generation
    }

    pub fn options(&self) -> &HandlerOptions {
        &self.options
    }

    /// Places the marker and remembers the point as the current location.
    pub(crate) fn set_marker(&mut self, location: Location) {
        self.map.set_marker(location);
        self.current_location = Some(location);
    }
}
