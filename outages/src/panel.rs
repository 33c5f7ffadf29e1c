use crate::record::{non_empty, OutageRecord};
use crate::time_format::TimeDisplay;
use anyhow::Context;
use itertools::Itertools;
use minijinja::{context, Environment};
use serde::Serialize;

pub const LOADING: &str = "⏳ Загрузка данных...";
pub const NO_OUTAGES_TITLE: &str = "✅ Отключений нет";
pub const NO_OUTAGES_DETAILS: &str =
    "В выбранном районе отключений электроэнергии не запланировано";
pub const ERROR_PREFIX: &str = "❌ Ошибка:";
pub const LABEL_PLACEHOLDER: &str = "Район";
pub const TIME_PLACEHOLDER: &str = "Не указано";
pub const DEFAULT_REASON: &str = "Плановые работы";

const PANEL_TEMPLATE: &str = "panel.html";

/// One rendered row of the outage list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutageEntry {
    pub label: String,
    pub from: String,
    pub to: String,
    pub reason: String,
}

impl OutageEntry {
    pub fn new(record: &OutageRecord, display: &TimeDisplay) -> Self {
        let label = non_empty(&record.street)
            .or_else(|| non_empty(&record.area))
            .unwrap_or(LABEL_PLACEHOLDER);
        let time = |value: &Option<String>| {
            non_empty(value)
                .map(|time| display.format(time))
                .unwrap_or_else(|| TIME_PLACEHOLDER.to_owned())
        };

        Self {
            label: label.to_owned(),
            from: time(&record.from),
            to: time(&record.to),
            reason: non_empty(&record.reason)
                .unwrap_or(DEFAULT_REASON)
                .to_owned(),
        }
    }
}

/// Everything the outage list can show. Each state replaces the previous one
/// wholesale.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum OutagePanel {
    #[default]
    Idle,
    Loading,
    NoOutages,
    Outages(Vec<OutageEntry>),
    Failed(String),
}

impl OutagePanel {
    pub fn from_records(records: &[OutageRecord], display: &TimeDisplay) -> Self {
        if records.is_empty() {
            return OutagePanel::NoOutages;
        }
        OutagePanel::Outages(
            records
                .iter()
                .map(|record| OutageEntry::new(record, display))
                .collect_vec(),
        )
    }

    pub fn failed(error: impl std::fmt::Display) -> Self {
        OutagePanel::Failed(error.to_string())
    }

    pub fn render_text(&self) -> String {
        match self {
            OutagePanel::Idle => String::new(),
            OutagePanel::Loading => LOADING.to_owned(),
            OutagePanel::NoOutages => format!("{NO_OUTAGES_TITLE}\n  {NO_OUTAGES_DETAILS}"),
            OutagePanel::Failed(message) => format!("{ERROR_PREFIX} {message}"),
            OutagePanel::Outages(entries) => entries
                .iter()
                .map(|entry| {
                    format!(
                        "📍 {}\n  🕐 Отключение: {}\n  🕐 Включение: {}\n  {}",
                        entry.label, entry.from, entry.to, entry.reason
                    )
                })
                .join("\n\n"),
        }
    }

    /// The list markup of the web widget. Server supplied text is escaped.
    pub fn render_html(&self) -> anyhow::Result<String> {
        let mut env = Environment::new();
        env.add_template(PANEL_TEMPLATE, include_str!("../templates/panel.html"))
            .context("Failed to load the panel template")?;
        let template = env
            .get_template(PANEL_TEMPLATE)
            .context("Failed to find the panel template")?;

        let (kind, entries, message) = match self {
            OutagePanel::Idle => ("idle", &[][..], ""),
            OutagePanel::Loading => ("loading", &[][..], ""),
            OutagePanel::NoOutages => ("empty", &[][..], ""),
            OutagePanel::Outages(entries) => ("outages", entries.as_slice(), ""),
            OutagePanel::Failed(message) => ("failed", &[][..], message.as_str()),
        };

        template
            .render(context! {
                kind => kind,
                entries => entries,
                message => message,
                loading => LOADING,
                no_outages_title => NO_OUTAGES_TITLE,
                no_outages_details => NO_OUTAGES_DETAILS,
                error_prefix => ERROR_PREFIX,
            })
            .context("Failed to render the outage panel")
    }
}
