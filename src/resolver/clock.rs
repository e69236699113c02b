//! TIME_NOW rendering in a fixed IANA timezone

use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use crate::error::EnvError;

/// `YYYY-MM-DD HH:MM:SS TZ`
pub const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S %Z";

/// Parse an IANA timezone name such as `Asia/Shanghai`
pub fn parse_timezone(name: &str) -> Result<Tz, EnvError> {
    name.trim()
        .parse::<Tz>()
        .map_err(|_| EnvError::InvalidTimezone(name.to_string()))
}

/// Render `now` in `tz`; the host's TZ and locale play no part
pub fn format_time(now: DateTime<Utc>, tz: Tz) -> String {
    now.with_timezone(&tz).format(TIME_FORMAT).to_string()
}
