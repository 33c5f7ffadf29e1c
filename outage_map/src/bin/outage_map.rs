use std::sync::Arc;

use anyhow::Context;
use location_search::NominatimSearcher;
use outage_map::configuration::Settings;
use outage_map::controller::{Controller, Services};
use outage_map::geolocation::{CachedGeolocation, FixedPosition, GeolocationProvider};
use outage_map::terminal::{self, TerminalAlerts, HELP};
use outages::OutagesApi;
use shared_kernel::http_client::HttpClient;
use tokio::io::BufReader;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    shared_kernel::tracing::config_telemetry("outage_map")?;
    start().await
}

async fn start() -> anyhow::Result<()> {
    let settings = Settings::parse()?;
    let client = HttpClient::new(&settings.geocoding.user_agent)
        .context("Failed to build http client")?;

    let outages = OutagesApi::new(client.clone(), &settings.outages)?;
    let geocoder = NominatimSearcher::new(client, settings.geocoding.nominatim.clone());
    let geolocation = settings.geolocation.fixed_position.map(|position| {
        let device: Arc<dyn GeolocationProvider> = Arc::new(FixedPosition::new(position));
        Arc::new(CachedGeolocation::new(device)) as Arc<dyn GeolocationProvider>
    });

    let (alerts, alert_messages) = TerminalAlerts::channel();
    let controller = Controller::new(
        settings.map_view(),
        settings.handler_options(),
        Services {
            outages: Arc::new(outages),
            geocoder: Arc::new(geocoder),
            geolocation,
            alerts: Arc::new(alerts),
        },
    );

    println!("{HELP}");
    terminal::run(
        controller,
        alert_messages,
        BufReader::new(tokio::io::stdin()),
        tokio::io::stdout(),
    )
    .await
}
