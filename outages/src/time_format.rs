use serde::Deserialize;

pub const DEFAULT_DATE_PREFIX: &str = "2024-01-";

/// Display settings for outage times.
///
/// Times are not parsed. The first occurrence of `date_prefix` is cut out of the
/// raw string, anything without the prefix is shown unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TimeDisplay {
    #[serde(default = "default_date_prefix")]
    pub date_prefix: String,
}

fn default_date_prefix() -> String {
    DEFAULT_DATE_PREFIX.to_owned()
}

impl Default for TimeDisplay {
    fn default() -> Self {
        Self {
            date_prefix: default_date_prefix(),
        }
    }
}

impl TimeDisplay {
    pub fn format(&self, time: &str) -> String {
        if self.date_prefix.is_empty() {
            return time.to_owned();
        }
        time.replacen(&self.date_prefix, "", 1)
    }
}
