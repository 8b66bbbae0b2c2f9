//! Best-effort city lookup for the "📍 City" line.
//!
//! Nothing here asks for permissions or touches the network: the city is read
//! from the configured time zone. Any failure simply yields `None`.

use std::path::{Path, PathBuf};

use tracing::debug;

/// Where to look for the local time zone.
#[derive(Debug, Clone)]
pub struct LocationSources {
    pub tz_env: Option<String>,
    pub timezone_file: PathBuf,
    pub localtime_link: PathBuf,
}

impl LocationSources {
    pub fn system() -> Self {
        Self {
            tz_env: std::env::var("TZ").ok(),
            timezone_file: PathBuf::from("/etc/timezone"),
            localtime_link: PathBuf::from("/etc/localtime"),
        }
    }

    /// Try `TZ`, then the timezone file, then the localtime symlink.
    pub fn detect(&self) -> Option<String> {
        if let Some(city) = self.tz_env.as_deref().and_then(city_from_timezone) {
            debug!("location: city '{}' from TZ", city);
            return Some(city);
        }

        if let Ok(content) = std::fs::read_to_string(&self.timezone_file) {
            if let Some(city) = city_from_timezone(&content) {
                debug!("location: city '{}' from {:?}", city, self.timezone_file);
                return Some(city);
            }
        }

        match std::fs::read_link(&self.localtime_link) {
            Ok(target) => {
                let city = city_from_zoneinfo_path(&target);
                debug!("location: {:?} -> {:?}", target, city);
                city
            }
            Err(e) => {
                debug!("location: no time zone source available ({})", e);
                None
            }
        }
    }
}

/// Detect the city from the system time zone.
pub fn detect_city() -> Option<String> {
    LocationSources::system().detect()
}

/// "America/New_York" -> "New York". Zones without a city part ("UTC",
/// "Etc/GMT+2", "EST5EDT") give `None`.
pub fn city_from_timezone(tz: &str) -> Option<String> {
    let tz = tz.trim().trim_start_matches(':');
    if tz.starts_with("Etc/") || tz.starts_with("posix/Etc/") {
        return None;
    }
    let (_, city) = tz.rsplit_once('/')?;
    let city = city.replace('_', " ");
    if city.is_empty() || !city.chars().next()?.is_alphabetic() {
        return None;
    }
    Some(city)
}

/// Extract the zone name from a path like `/usr/share/zoneinfo/Europe/Lisbon`.
pub fn city_from_zoneinfo_path(path: &Path) -> Option<String> {
    let path = path.to_string_lossy();
    let (_, zone) = path.split_once("zoneinfo/")?;
    city_from_timezone(zone)
}
