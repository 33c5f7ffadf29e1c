pub mod api;
pub mod panel;
pub mod record;
pub mod time_format;

pub use api::{OutageFetchError, OutageFetcher, OutagesApi, OutagesApiConfig};
pub use panel::{OutageEntry, OutagePanel};
pub use record::OutageRecord;
pub use time_format::TimeDisplay;
