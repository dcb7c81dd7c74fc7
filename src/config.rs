use crate::{
    CONFIG_FILE_PATH, Error, Result, fetcher::FetchWindow, scheduler::SchedulerSettings,
};
use camino::Utf8Path;
use getset::Getters;
use serde::{Deserialize, Serialize};
use std::{
    collections::BTreeSet,
    env,
    fmt::{self, Display},
    fs::{self, DirBuilder, OpenOptions},
    str::FromStr,
    time::Duration as StdDuration,
};
use strum::{EnumIter, IntoEnumIterator};
use time::Duration;

pub const TOKEN_ENV_VAR: &str = "CANVAS_API_TOKEN";
pub const DEFAULT_API_URL: &str = "https://canvas.asu.edu";
pub const DEFAULT_LOOKBACK_DAYS: u32 = 150;
pub const DEFAULT_LOOKAHEAD_DAYS: u32 = 90;
pub const DEFAULT_REFRESH_INTERVAL: u64 = 60 * 60;
/// Shorter refresh intervals are rounded up to this.
pub const MIN_REFRESH_INTERVAL: u64 = 1;

/// How many hours before a due date a notification fires.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, EnumIter,
)]
#[serde(try_from = "u64", into = "u64")]
pub enum Threshold {
    One,
    Three,
    Six,
    Twelve,
    TwentyFour,
}

impl Threshold {
    pub const fn hours(self) -> u64 {
        match self {
            Self::One => 1,
            Self::Three => 3,
            Self::Six => 6,
            Self::Twelve => 12,
            Self::TwentyFour => 24,
        }
    }
}

impl TryFrom<u64> for Threshold {
    type Error = Error;

    fn try_from(hours: u64) -> Result<Self> {
        Self::iter()
            .find(|t| t.hours() == hours)
            .ok_or(Error::InvalidThreshold { hours })
    }
}

impl From<Threshold> for u64 {
    fn from(value: Threshold) -> Self {
        value.hours()
    }
}

impl FromStr for Threshold {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let hours = s
            .trim()
            .trim_end_matches('h')
            .parse::<u64>()
            .map_err(|_| Error::simple(format!("Not a number of hours: {s}")))?;
        Self::try_from(hours)
    }
}

impl Display for Threshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}h", self.hours())
    }
}

#[inline]
fn default_thresholds() -> BTreeSet<Threshold> {
    BTreeSet::from([Threshold::Twelve])
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters)]
#[serde(rename_all = "kebab-case", default)]
#[getset(get = "pub")]
pub struct Config {
    api_url: String,
    #[serde(skip_serializing_if = "std::option::Option::is_none")]
    #[getset(skip)]
    api_token: Option<String>,
    lookback_days: u32,
    lookahead_days: u32,
    /// Seconds between refreshes.
    refresh_interval: u64,
    notification_thresholds: BTreeSet<Threshold>,
}

impl Config {
    pub fn save(&self) -> Result<()> {
        self.save_to(&CONFIG_FILE_PATH)
    }

    pub fn save_to(&self, path: &Utf8Path) -> Result<()> {
        if let Some(dir) = path.parent()
            && !dir.as_str().is_empty()
        {
            DirBuilder::new().recursive(true).create(dir)?;
        }
        let file = OpenOptions::new()
            .create(true)
            .truncate(true)
            .write(true)
            .open(path)?;
        serde_norway::to_writer(file, self)?;
        Ok(())
    }

    pub fn load() -> Result<Self> {
        Self::load_from(&CONFIG_FILE_PATH)
    }

    pub fn load_from(path: &Utf8Path) -> Result<Self> {
        if path.exists() {
            let data = fs::read(path)?;
            Ok(serde_norway::from_slice(&data)?)
        } else {
            log::info!("No config found; writing defaults to {path}");
            let config = Self::default();
            config.save_to(path)?;
            Ok(config)
        }
    }

    /// The API token, preferring the environment over the config file.
    pub fn api_token(&self) -> Result<String> {
        env::var(TOKEN_ENV_VAR)
            .ok()
            .filter(|t| !t.trim().is_empty())
            .or_else(|| self.api_token.clone())
            .ok_or(Error::MissingToken)
    }

    #[inline]
    pub fn has_stored_token(&self) -> bool {
        self.api_token.is_some()
    }

    pub fn set_api_token<S: Into<String>>(&mut self, token: S) {
        self.api_token = Some(token.into());
    }

    pub fn set_api_url<S: Into<String>>(&mut self, url: S) {
        self.api_url = url.into();
    }

    pub fn set_lookback_days(&mut self, days: u32) {
        self.lookback_days = days;
    }

    pub fn set_lookahead_days(&mut self, days: u32) {
        self.lookahead_days = days;
    }

    pub fn set_refresh_interval(&mut self, seconds: u64) {
        self.refresh_interval = seconds;
    }

    pub fn set_notification_thresholds<I>(&mut self, thresholds: I)
    where
        I: IntoIterator<Item = Threshold>,
    {
        self.notification_thresholds = thresholds.into_iter().collect();
    }

    pub fn fetch_window(&self) -> FetchWindow {
        FetchWindow {
            lookback: Duration::days(self.lookback_days.into()),
            lookahead: Duration::days(self.lookahead_days.into()),
        }
    }

    pub fn scheduler_settings(&self) -> SchedulerSettings {
        SchedulerSettings {
            interval: StdDuration::from_secs(self.refresh_interval.max(MIN_REFRESH_INTERVAL)),
            thresholds: self.notification_thresholds.clone(),
        }
    }

    /// A copy that's safe to print.
    pub fn redacted(&self) -> Self {
        let mut config = self.clone();
        if config.api_token.is_some() {
            config.api_token = Some(String::from("<redacted>"));
        }
        config
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: String::from(DEFAULT_API_URL),
            api_token: None,
            lookback_days: DEFAULT_LOOKBACK_DAYS,
            lookahead_days: DEFAULT_LOOKAHEAD_DAYS,
            refresh_interval: DEFAULT_REFRESH_INTERVAL,
            notification_thresholds: default_thresholds(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn threshold_parses_allowed_hours_only() {
        assert_eq!("6".parse::<Threshold>().unwrap(), Threshold::Six);
        assert_eq!("24h".parse::<Threshold>().unwrap(), Threshold::TwentyFour);
        assert!(matches!(
            "5".parse::<Threshold>(),
            Err(Error::InvalidThreshold { hours: 5 })
        ));
        assert!("soon".parse::<Threshold>().is_err());
    }

    #[test]
    fn defaults() {
        let config = Config::default();
        let window = config.fetch_window();
        assert_eq!(window.lookback, Duration::days(150));
        assert_eq!(window.lookahead, Duration::days(90));
        let settings = config.scheduler_settings();
        assert_eq!(settings.interval, StdDuration::from_secs(3600));
        assert_eq!(settings.thresholds, BTreeSet::from([Threshold::Twelve]));
    }

    #[test]
    fn zero_refresh_interval_still_sleeps() {
        let config: Config = serde_norway::from_str("refresh-interval: 0\n").unwrap();
        assert_eq!(
            config.scheduler_settings().interval,
            StdDuration::from_secs(MIN_REFRESH_INTERVAL)
        );
    }

    #[test]
    fn huge_windows_are_accepted() {
        let mut config = Config::default();
        config.set_lookback_days(u32::MAX);
        config.set_lookahead_days(4_000_000);
        let window = config.fetch_window();
        assert_eq!(window.lookahead, Duration::days(4_000_000));
    }

    #[test]
    fn partial_yaml_fills_defaults() {
        let yaml = "lookahead-days: 30\nnotification-thresholds: [1, 24, 6]\n";
        let config: Config = serde_norway::from_str(yaml).unwrap();
        assert_eq!(*config.lookahead_days(), 30);
        assert_eq!(*config.lookback_days(), DEFAULT_LOOKBACK_DAYS);
        assert_eq!(config.api_url(), DEFAULT_API_URL);
        assert_eq!(
            config.notification_thresholds().iter().copied().collect::<Vec<_>>(),
            vec![Threshold::One, Threshold::Six, Threshold::TwentyFour]
        );
    }

    #[test]
    fn yaml_rejects_unknown_threshold() {
        let yaml = "notification-thresholds: [2]\n";
        assert!(serde_norway::from_str::<Config>(yaml).is_err());
    }

    #[test]
    fn redacted_hides_token() {
        let mut config = Config::default();
        config.set_api_token("secret");
        let printed = serde_norway::to_string(&config.redacted()).unwrap();
        assert!(!printed.contains("secret"));
        assert!(printed.contains("api-token"));
    }
}
