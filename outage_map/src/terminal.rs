use crate::controller::{AlertSink, Controller};
use crate::events::Event;
use anyhow::Context;
use outages::OutagePanel;
use shared_kernel::location::Location;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};

pub const HELP: &str = "\
Commands:
  click <lat> <lon>   pick a point on the map
  locate              use this device's position
  type <address>      fill in the address field
  enter               press Enter in the address field
  search [address]    search for an address
  map                 show marker, viewport and tiles
  html                print the outage list markup
  help                show this message
  quit                exit";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Click(Location),
    Locate,
    Type(String),
    Enter,
    Search(Option<String>),
    Map,
    Html,
    Help,
    Quit,
}

impl Command {
    pub fn parse(line: &str) -> Result<Self, String> {
        let line = line.trim();
        let (name, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let rest = rest.trim();
        match name {
            "click" => {
                let mut parts = rest.split_whitespace();
                let mut coordinate = |what: &str| -> Result<f64, String> {
                    parts
                        .next()
                        .ok_or_else(|| format!("missing {what}"))?
                        .parse::<f64>()
                        .ok()
                        .filter(|value| value.is_finite())
                        .ok_or_else(|| format!("invalid {what}"))
                };
                let latitude = coordinate("latitude")?;
                let longitude = coordinate("longitude")?;
                Ok(Command::Click(Location::new(latitude, longitude)))
            }
            "locate" => Ok(Command::Locate),
            "type" => Ok(Command::Type(rest.to_owned())),
            "enter" => Ok(Command::Enter),
            "search" if rest.is_empty() => Ok(Command::Search(None)),
            "search" => Ok(Command::Search(Some(rest.to_owned()))),
            "map" => Ok(Command::Map),
            "html" => Ok(Command::Html),
            "help" | "?" => Ok(Command::Help),
            "quit" | "exit" => Ok(Command::Quit),
            "" => Err("empty command".to_owned()),
            other => Err(format!("unknown command `{other}`")),
        }
    }

    /// Events a command feeds into the controller. Display-only commands have none.
    pub fn events(self) -> Vec<Event> {
        match self {
            Command::Click(location) => vec![Event::MapClicked(location)],
            Command::Locate => vec![Event::GeolocationRequested],
            Command::Type(text) => vec![Event::AddressInputChanged(text)],
            Command::Enter => vec![Event::AddressEnterPressed],
            Command::Search(Some(text)) => {
                vec![Event::AddressInputChanged(text), Event::SearchRequested]
            }
            Command::Search(None) => vec![Event::SearchRequested],
            Command::Map | Command::Html | Command::Help | Command::Quit => vec![],
        }
    }
}

/// Queues alerts for [`run`], which writes them to its output in order with
/// the outage list.
pub struct TerminalAlerts {
    sender: UnboundedSender<String>,
}

impl TerminalAlerts {
    pub fn channel() -> (Self, UnboundedReceiver<String>) {
        let (sender, receiver) = unbounded_channel();
        (Self { sender }, receiver)
    }
}

impl AlertSink for TerminalAlerts {
    fn alert(&self, message: &str) {
        if self.sender.send(message.to_owned()).is_err() {
            tracing::warn!(%message, "alert dropped, the terminal has stopped");
        }
    }
}

fn describe_map(controller: &Controller) -> String {
    let state = controller.state();
    let viewport = state.map.viewport();
    let marker = state
        .map
        .marker()
        .map(|marker| marker.position.to_string())
        .unwrap_or_else(|| "none".to_owned());
    format!(
        "center: {} (zoom {})\nmarker: {}\ntile: {}\n{}",
        viewport.center,
        viewport.zoom,
        marker,
        state.map.center_tile_url(),
        state.map.tiles().attribution
    )
}

/// Reads commands line by line and prints the outage list whenever it changes.
/// Returns on `quit`, or once input ends and pending requests have settled.
pub async fn run<R, W>(
    mut controller: Controller,
    mut alerts: UnboundedReceiver<String>,
    input: R,
    mut output: W,
) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = input.lines();
    let mut input_open = true;
    let mut shown = OutagePanel::Idle;

    controller.dispatch(Event::PageLoaded);

    loop {
        if !input_open && controller.in_flight() == 0 {
            break;
        }
        tokio::select! {
            line = lines.next_line(), if input_open => {
                let Some(line) = line.context("Failed to read command")? else {
                    input_open = false;
                    continue;
                };
                if line.trim().is_empty() {
                    continue;
                }
                let command = match Command::parse(&line) {
                    Ok(command) => command,
                    Err(err) => {
                        output.write_all(format!("{err}, try `help`\n").as_bytes()).await?;
                        continue;
                    }
                };
                match &command {
                    Command::Quit => break,
                    Command::Help => output.write_all(format!("{HELP}\n").as_bytes()).await?,
                    Command::Map => {
                        output.write_all(format!("{}\n", describe_map(&controller)).as_bytes()).await?
                    }
                    Command::Html => {
                        let html = controller.state().panel.render_html()?;
                        output.write_all(format!("{html}\n").as_bytes()).await?
                    }
                    _ => {}
                }
                for event in command.events() {
                    controller.dispatch(event);
                }
            }
            Some(event) = controller.completion() => controller.dispatch(event),
            else => break,
        }

        while let Ok(message) = alerts.try_recv() {
            output.write_all(format!("⚠ {message}\n").as_bytes()).await?;
        }
        let panel = &controller.state().panel;
        if *panel != shown {
            shown = panel.clone();
            output
                .write_all(format!("{}\n", shown.render_text()).as_bytes())
                .await?;
        }
        output.flush().await?;
    }

    output.flush().await.context("Failed to flush output")
}
