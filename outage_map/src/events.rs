use crate::geolocation::{GeolocationError, PositionOptions};
use location_search::SearchError;
use outages::{OutageFetchError, OutageRecord};
use shared_kernel::location::Location;
use std::time::Duration;

/// Sequence number of an outage request. Only the newest one may update the
/// panel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestGeneration(u64);

impl RequestGeneration {
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl std::fmt::Display for RequestGeneration {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        std::fmt::Display::fmt(&self.0, f)
    }
}

#[derive(Debug)]
pub enum Event {
    PageLoaded,
    InitialLoadDue,
    MapClicked(Location),
    GeolocationRequested,
    AddressInputChanged(String),
    /// Enter pressed inside the address input.
    AddressEnterPressed,
    SearchRequested,
    PositionResolved(Result<Location, GeolocationError>),
    AddressResolved(Result<Option<Location>, SearchError>),
    OutagesLoaded {
        generation: RequestGeneration,
        result: Result<Vec<OutageRecord>, OutageFetchError>,
    },
}

impl Event {
    /// Events produced by finished background work rather than by the user.
    pub fn is_completion(&self) -> bool {
        matches!(
            self,
            Event::InitialLoadDue
                | Event::PositionResolved(_)
                | Event::AddressResolved(_)
                | Event::OutagesLoaded { .. }
        )
    }
}

/// Work the reducer asks for. Everything except `Alert` runs in the
/// background and reports back with a completion [`Event`].
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    FetchOutages {
        generation: RequestGeneration,
        location: Location,
    },
    RequestPosition(PositionOptions),
    SearchAddress(String),
    Alert(String),
    ScheduleInitialLoad(Duration),
}
