use crate::events::{Effect, Event};
use crate::geolocation::{locate, GeolocationError, GeolocationProvider};
use crate::map_view::MapView;
use crate::state::{AppState, HandlerOptions};
use crate::update::update;
use location_search::Geocoder;
#[cfg(test)]
use mockall::automock;
use outages::OutageFetcher;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};

/// Where blocking user-facing messages go.
#[cfg_attr(test, automock)]
pub trait AlertSink: Send + Sync {
    fn alert(&self, message: &str);
}

pub struct Services {
    pub outages: Arc<dyn OutageFetcher>,
    pub geocoder: Arc<dyn Geocoder>,
    /// `None` when the device cannot report its position.
    pub geolocation: Option<Arc<dyn GeolocationProvider>>,
    pub alerts: Arc<dyn AlertSink>,
}

/// Owns the application state and runs the effects the reducer asks for.
///
/// Background work is spawned on the tokio runtime and reports back over a
/// channel, so user events keep flowing while requests are in flight.
pub struct Controller {
    state: AppState,
    services: Services,
    sender: UnboundedSender<Event>,
    receiver: UnboundedReceiver<Event>,
    in_flight: usize,
}

impl Controller {
    pub fn new(map: MapView, options: HandlerOptions, services: Services) -> Self {
        let (sender, receiver) = unbounded_channel();
        let state = AppState::new(map, options, services.geolocation.is_some());
        Self {
            state,
            services,
            sender,
            receiver,
            in_flight: 0,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    pub fn dispatch(&mut self, event: Event) {
        if event.is_completion() {
            self.in_flight = self.in_flight.saturating_sub(1);
        }
        for effect in update(&mut self.state, event) {
            self.execute(effect);
        }
    }

    /// Waits for the next finished background task. `None` when nothing is
    /// in flight.
    pub async fn completion(&mut self) -> Option<Event> {
        if self.in_flight == 0 {
            return None;
        }
        self.receiver.recv().await
    }

    pub async fn run_until_idle(&mut self) {
        while let Some(event) = self.completion().await {
            self.dispatch(event);
        }
    }

    fn execute(&mut self, effect: Effect) {
        match effect {
            Effect::Alert(message) => {
                tracing::info!(%message, "alert");
                self.services.alerts.alert(&message);
            }
            Effect::ScheduleInitialLoad(delay) => self.spawn(async move {
                tokio::time::sleep(delay).await;
                Event::InitialLoadDue
            }),
            Effect::FetchOutages {
                generation,
                location,
            } => {
                let outages = self.services.outages.clone();
                self.spawn(async move {
                    Event::OutagesLoaded {
                        generation,
                        result: outages.fetch_outages(location).await,
                    }
                })
            }
            Effect::RequestPosition(options) => match self.services.geolocation.clone() {
                Some(provider) => self.spawn(async move {
                    Event::PositionResolved(locate(provider.as_ref(), options).await)
                }),
                None => self.spawn(async {
                    Event::PositionResolved(Err(GeolocationError::Unavailable(
                        "no position source".to_owned(),
                    )))
                }),
            },
            Effect::SearchAddress(query) => {
                let geocoder = self.services.geocoder.clone();
                self.spawn(async move {
                    Event::AddressResolved(geocoder.locate_address(&query).await)
                })
            }
        }
    }

    fn spawn<F>(&mut self, task: F)
    where
        F: Future<Output = Event> + Send + 'static,
    {
        self.in_flight += 1;
        let sender = self.sender.clone();
        tokio::spawn(async move {
            let event = task.await;
            if sender.send(event).is_err() {
                tracing::debug!("controller dropped before the task finished");
            }
        });
    }
}
