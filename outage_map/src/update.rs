use crate::events::{Effect, Event, RequestGeneration};
use crate::state::{AppState, GEOLOCATION_BUSY_LABEL, SEARCH_BUSY_LABEL};
use outages::OutagePanel;
use shared_kernel::location::Location;

pub const GEOLOCATION_UNSUPPORTED: &str = "Геолокация не поддерживается на этом устройстве.";
pub const GEOLOCATION_FAILED: &str = "Не удалось получить геолокацию:";
pub const EMPTY_ADDRESS: &str = "Пожалуйста, введите адрес для поиска";
pub const ADDRESS_NOT_FOUND: &str = "Адрес не найден. Попробуйте уточнить запрос.";
pub const SEARCH_FAILED: &str = "Ошибка поиска:";

/// Applies one event to the state and returns the side effects it requires.
/// Performs no I/O.
#[tracing::instrument(skip(state), level = "debug")]
pub fn update(state: &mut AppState, event: Event) -> Vec<Effect> {
    match event {
        Event::PageLoaded => vec![Effect::ScheduleInitialLoad(
            state.options.initial_load_delay,
        )],
        Event::InitialLoadDue => {
            // The page-load query only fills the panel before the user has
            // picked a point.
            if state.current_location.is_some()
                || state.latest_generation != RequestGeneration::default()
            {
                tracing::debug!("a location was already selected, skipping the initial load");
                return vec![];
            }
            let location = state.options.default_location;
            vec![start_outage_fetch(state, location)]
        }
        Event::MapClicked(location) => select_location(state, location),
        Event::GeolocationRequested => request_position(state),
        Event::PositionResolved(result) => {
            state.geolocation_button.restore();
            match result {
                Ok(location) => select_location(state, location),
                Err(err) => vec![Effect::Alert(format!("{GEOLOCATION_FAILED} {err}"))],
            }
        }
        Event::AddressInputChanged(text) => {
            state.address_input = text;
            vec![]
        }
        Event::AddressEnterPressed => search_address(state),
        Event::SearchRequested => search_address(state),
        Event::AddressResolved(result) => {
            state.search_button.restore();
            match result {
                Ok(Some(location)) => select_location(state, location),
                Ok(None) => vec![Effect::Alert(ADDRESS_NOT_FOUND.to_owned())],
                Err(err) => vec![Effect::Alert(format!("{SEARCH_FAILED} {err}"))],
            }
        }
        Event::OutagesLoaded { generation, result } => {
            if generation != state.latest_generation {
                tracing::debug!(
                    %generation,
                    latest = %state.latest_generation,
                    "discarding outdated outages response"
                );
                return vec![];
            }
            state.panel = match result {
                Ok(records) => OutagePanel::from_records(&records, &state.options.time_display),
                Err(err) => {
                    tracing::error!(error = ?err, "Fetch error");
                    OutagePanel::failed(err)
                }
            };
            vec![]
        }
    }
}

fn select_location(state: &mut AppState, location: Location) -> Vec<Effect> {
    state.set_marker(location);
    vec![start_outage_fetch(state, location)]
}

fn start_outage_fetch(state: &mut AppState, location: Location) -> Effect {
    state.latest_generation = state.latest_generation.next();
    state.panel = OutagePanel::Loading;
    Effect::FetchOutages {
        generation: state.latest_generation,
        location,
    }
}

fn request_position(state: &mut AppState) -> Vec<Effect> {
    if state.geolocation_button.is_disabled() {
        return vec![];
    }
    if !state.geolocation_supported {
        return vec![Effect::Alert(GEOLOCATION_UNSUPPORTED.to_owned())];
    }
    state.geolocation_button.start(GEOLOCATION_BUSY_LABEL);
    vec![Effect::RequestPosition(state.options.position_options)]
}

fn search_address(state: &mut AppState) -> Vec<Effect> {
    if state.search_button.is_disabled() {
        return vec![];
    }
    let query = state.address_input.trim();
    if query.is_empty() {
        return vec![Effect::Alert(EMPTY_ADDRESS.to_owned())];
    }
    let query = query.to_owned();
    state.search_button.start(SEARCH_BUSY_LABEL);
    vec![Effect::SearchAddress(query)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geolocation::{GeolocationError, PositionOptions};
    use crate::map_view::{MapView, TileLayer};
    use crate::state::{HandlerOptions, GEOLOCATION_IDLE_LABEL, SEARCH_IDLE_LABEL};
    use location_search::SearchError;
    use outages::{OutageFetchError, OutageRecord};
    use std::time::Duration;

    fn state(geolocation_supported: bool) -> AppState {
        let map = MapView::new(Location::new(48.4647, 35.0462), 12, 14, TileLayer::default());
        AppState::new(map, HandlerOptions::default(), geolocation_supported)
    }

    fn fetch_generation(effects: &[Effect]) -> RequestGeneration {
        match effects {
            [Effect::FetchOutages { generation, .. }] => *generation,
            other => panic!("expected a single fetch, got {other:?}"),
        }
    }

    #[test]
    fn test_that_a_map_click_places_the_marker_and_fetches() {
        let mut state = state(true);
        let clicked = Location::new(48.45, 35.05);

        let effects = update(&mut state, Event::MapClicked(clicked));

        assert_eq!(
            effects,
            vec![Effect::FetchOutages {
                generation: state.latest_generation(),
                location: clicked
            }]
        );
        assert_eq!(state.map.marker().map(|m| m.position), Some(clicked));
        assert_eq!(state.current_location, Some(clicked));
        assert_eq!(state.panel, OutagePanel::Loading);
    }

    #[test]
    fn test_that_page_load_schedules_a_fetch_for_the_default_location() {
        let mut state = state(true);

        let effects = update(&mut state, Event::PageLoaded);
        assert_eq!(
            effects,
            vec![Effect::ScheduleInitialLoad(Duration::from_millis(500))]
        );

        let effects = update(&mut state, Event::InitialLoadDue);
        assert!(matches!(
            effects.as_slice(),
            [Effect::FetchOutages { location, .. }] if *location == Location::new(48.4647, 35.0462)
        ));
        assert!(state.map.marker().is_none());
    }

    #[test]
    fn test_that_the_initial_load_does_not_replace_a_picked_location() {
        let mut state = state(true);
        update(&mut state, Event::PageLoaded);
        let clicked = Location::new(48.45, 35.05);
        let generation = fetch_generation(&update(&mut state, Event::MapClicked(clicked)));

        let effects = update(&mut state, Event::InitialLoadDue);

        assert!(effects.is_empty());
        assert_eq!(state.latest_generation(), generation);
        assert_eq!(state.current_location, Some(clicked));
        assert_eq!(state.panel, OutagePanel::Loading);
    }

    #[test]
    fn test_that_an_empty_search_alerts_without_a_request() {
        let mut state = state(true);
        update(&mut state, Event::AddressInputChanged("   ".to_owned()));

        let effects = update(&mut state, Event::SearchRequested);

        assert_eq!(effects, vec![Effect::Alert(EMPTY_ADDRESS.to_owned())]);
        assert!(!state.search_button.is_disabled());
    }

    #[test]
    fn test_that_a_search_sends_the_trimmed_query_and_disables_the_button() {
        let mut state = state(true);
        update(&mut state, Event::AddressInputChanged(" Шевченко 1 ".to_owned()));

        let effects = update(&mut state, Event::SearchRequested);

        assert_eq!(effects, vec![Effect::SearchAddress("Шевченко 1".to_owned())]);
        assert!(state.search_button.is_disabled());
        assert_eq!(state.search_button.label(), SEARCH_BUSY_LABEL);
    }

    #[test]
    fn test_that_enter_in_the_address_input_searches() {
        let mut state = state(true);
        update(&mut state, Event::AddressInputChanged("Шевченко 1".to_owned()));

        let effects = update(&mut state, Event::AddressEnterPressed);

        assert_eq!(effects, vec![Effect::SearchAddress("Шевченко 1".to_owned())]);
    }

    #[test]
    fn test_that_a_busy_search_button_ignores_presses() {
        let mut state = state(true);
        update(&mut state, Event::AddressInputChanged("Шевченко 1".to_owned()));
        update(&mut state, Event::SearchRequested);

        assert!(update(&mut state, Event::SearchRequested).is_empty());
        assert!(update(&mut state, Event::AddressEnterPressed).is_empty());
    }

    #[test]
    fn test_that_zero_search_results_alert_and_restore_the_button() {
        let mut state = state(true);
        update(&mut state, Event::AddressInputChanged("nowhere".to_owned()));
        update(&mut state, Event::SearchRequested);

        let effects = update(&mut state, Event::AddressResolved(Ok(None)));

        assert_eq!(effects, vec![Effect::Alert(ADDRESS_NOT_FOUND.to_owned())]);
        assert!(state.map.marker().is_none());
        assert!(!state.search_button.is_disabled());
        assert_eq!(state.search_button.label(), SEARCH_IDLE_LABEL);
    }

    #[test]
    fn test_that_a_found_address_places_the_marker_and_fetches() {
        let mut state = state(true);
        update(&mut state, Event::AddressInputChanged("Шевченко 1".to_owned()));
        update(&mut state, Event::SearchRequested);
        let found = Location::new(48.4647, 35.0462);

        let effects = update(&mut state, Event::AddressResolved(Ok(Some(found))));

        fetch_generation(&effects);
        assert_eq!(state.map.marker().map(|m| m.position), Some(found));
        assert!(!state.search_button.is_disabled());
    }

    #[test]
    fn test_that_search_errors_are_alerted() {
        let mut state = state(true);
        update(&mut state, Event::AddressInputChanged("Шевченко 1".to_owned()));
        update(&mut state, Event::SearchRequested);

        let effects = update(
            &mut state,
            Event::AddressResolved(Err(SearchError::Status(503))),
        );

        assert_eq!(
            effects,
            vec![Effect::Alert(format!(
                "{SEARCH_FAILED} geocoder responded with status 503"
            ))]
        );
        assert!(!state.search_button.is_disabled());
    }

    #[test]
    fn test_that_missing_geolocation_alerts() {
        let mut state = state(false);

        let effects = update(&mut state, Event::GeolocationRequested);

        assert_eq!(
            effects,
            vec![Effect::Alert(GEOLOCATION_UNSUPPORTED.to_owned())]
        );
        assert!(!state.geolocation_button.is_disabled());
    }

    #[test]
    fn test_the_geolocation_round_trip() {
        let mut state = state(true);

        let effects = update(&mut state, Event::GeolocationRequested);
        assert_eq!(
            effects,
            vec![Effect::RequestPosition(PositionOptions::default())]
        );
        assert_eq!(state.geolocation_button.label(), GEOLOCATION_BUSY_LABEL);
        assert!(update(&mut state, Event::GeolocationRequested).is_empty());

        let here = Location::new(48.46, 35.04);
        let effects = update(&mut state, Event::PositionResolved(Ok(here)));
        fetch_generation(&effects);
        assert_eq!(state.current_location, Some(here));
        assert_eq!(state.geolocation_button.label(), GEOLOCATION_IDLE_LABEL);
    }

    #[test]
    fn test_that_geolocation_failures_alert_and_restore_the_button() {
        let mut state = state(true);
        update(&mut state, Event::GeolocationRequested);

        let effects = update(
            &mut state,
            Event::PositionResolved(Err(GeolocationError::Timeout)),
        );

        assert_eq!(
            effects,
            vec![Effect::Alert(format!("{GEOLOCATION_FAILED} Timeout expired"))]
        );
        assert!(!state.geolocation_button.is_disabled());
        assert!(state.map.marker().is_none());
    }

    #[test]
    fn test_that_only_the_latest_outage_response_is_shown() {
        let mut state = state(true);
        let first = fetch_generation(&update(
            &mut state,
            Event::MapClicked(Location::new(1.0, 1.0)),
        ));
        let second = fetch_generation(&update(
            &mut state,
            Event::MapClicked(Location::new(2.0, 2.0)),
        ));
        assert!(second > first);

        update(
            &mut state,
            Event::OutagesLoaded {
                generation: second,
                result: Ok(vec![]),
            },
        );
        update(
            &mut state,
            Event::OutagesLoaded {
                generation: first,
                result: Ok(vec![OutageRecord::default()]),
            },
        );

        assert_eq!(state.panel, OutagePanel::NoOutages);
    }

    #[test]
    fn test_that_fetch_errors_replace_the_panel() {
        let mut state = state(true);
        let generation = fetch_generation(&update(
            &mut state,
            Event::MapClicked(Location::new(1.0, 1.0)),
        ));

        update(
            &mut state,
            Event::OutagesLoaded {
                generation,
                result: Err(OutageFetchError::Server("HTTP error! status: 500".to_owned())),
            },
        );

        assert_eq!(
            state.panel,
            OutagePanel::Failed("HTTP error! status: 500".to_owned())
        );
    }
}
