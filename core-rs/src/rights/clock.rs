//! Embargo and lease clock
//!
//! Date setters accept date-only or date-time input and normalize it to a UTC
//! instant. The `now` used for every check is supplied by the caller.
//!
//! # Example
//!
//! ```rust
//! use hydra_rights::RightsRecord;
//! use chrono::{TimeZone, Utc};
//!
//! let mut record = RightsRecord::new();
//! record.set_embargo_release_date(Some("2010-12-01")).unwrap();
//!
//! let before = Utc.with_ymd_and_hms(2010, 11, 30, 12, 0, 0).unwrap();
//! assert!(record.is_under_embargo(before));
//! ```

use super::record::RightsRecord;
use crate::errors::{Result, RightsError};
use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use tracing::{debug, info};

pub const EMBARGO_RELEASE_DATE: &str = "embargo_release_date";
pub const LEASE_EXPIRATION_DATE: &str = "lease_expiration_date";

const OFFSET_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f%z", "%Y-%m-%d %H:%M:%S%.f%z"];
const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Rewrite an hour-only offset (`+0`, `-05`) as `+HH:MM`
fn pad_short_offset(value: &str) -> Option<String> {
    let sign_at = value.rfind(['+', '-'])?;
    // Only signs after the time part are offsets
    if !value[..sign_at].contains(':') {
        return None;
    }

    let hours = &value[sign_at + 1..];
    if hours.is_empty() || hours.len() > 2 || !hours.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    Some(format!("{}{}{:0>2}:00", &value[..sign_at], &value[sign_at..=sign_at], hours))
}

/// Parse a date or date-time string into a UTC instant
///
/// Accepted forms:
/// - RFC 3339 (`2010-12-01T23:59:59Z`, `2010-12-01T23:59:59.5+02:00`)
/// - numeric offsets without colon (`2010-12-01T23:59:59+0000`)
/// - hour-only offsets (`2010-12-01T23:59:59+0`, `2010-12-01T23:59:59-05`)
/// - naive date-times, read as UTC (`2010-12-01T23:59:59`, `2010-12-01T23:59:59.5`)
/// - dates, read as midnight UTC (`2010-12-01`)
///
/// `field` names the record field in the returned error.
pub fn parse_instant(field: &'static str, value: &str) -> Result<DateTime<Utc>> {
    let trimmed = value.trim();
    let invalid = || RightsError::InvalidDate {
        field,
        value: value.to_string(),
    };

    if trimmed.is_empty() {
        return Err(invalid());
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.with_timezone(&Utc));
    }

    if let Some(padded) = pad_short_offset(trimmed) {
        if let Ok(dt) = DateTime::parse_from_rfc3339(&padded) {
            return Ok(dt.with_timezone(&Utc));
        }
        if let Ok(dt) = DateTime::parse_from_str(&padded, "%Y-%m-%d %H:%M:%S%.f%:z") {
            return Ok(dt.with_timezone(&Utc));
        }
    }

    for format in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(trimmed, format) {
            return Ok(dt.with_timezone(&Utc));
        }
    }

    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(naive.and_utc());
        }
    }

    let date = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").map_err(|_| invalid())?;
    date.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc()).ok_or_else(invalid)
}

/// ISO-8601 UTC form used in index documents and history lines
pub fn format_instant(instant: &DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Secs, true)
}

impl RightsRecord {
    pub fn embargo_release_date(&self) -> Option<DateTime<Utc>> {
        self.embargo_release_date
    }

    /// Set or clear the embargo release date from text input
    ///
    /// Invalid input fails with [`RightsError::InvalidDate`] and leaves the
    /// stored date unchanged.
    pub fn set_embargo_release_date(&mut self, value: Option<&str>) -> Result<()> {
        let instant = value.map(|v| parse_instant(EMBARGO_RELEASE_DATE, v)).transpose()?;
        self.set_embargo_release_at(instant);
        Ok(())
    }

    pub fn set_embargo_release_at(&mut self, instant: Option<DateTime<Utc>>) {
        debug!(release = ?instant, "setting embargo release date");
        self.embargo_release_date = instant;
    }

    /// True while `now` is strictly before the release date
    pub fn is_under_embargo(&self, now: DateTime<Utc>) -> bool {
        self.embargo_release_date.is_some_and(|release| now < release)
    }

    pub fn lease_expiration_date(&self) -> Option<DateTime<Utc>> {
        self.lease_expiration_date
    }

    /// Set or clear the lease expiration date from text input
    pub fn set_lease_expiration_date(&mut self, value: Option<&str>) -> Result<()> {
        let instant = value.map(|v| parse_instant(LEASE_EXPIRATION_DATE, v)).transpose()?;
        self.set_lease_expiration_at(instant);
        Ok(())
    }

    pub fn set_lease_expiration_at(&mut self, instant: Option<DateTime<Utc>>) {
        debug!(expiration = ?instant, "setting lease expiration date");
        self.lease_expiration_date = instant;
    }

    /// True while `now` is strictly before the expiration date
    ///
    /// An expired lease is not active.
    pub fn is_active_lease(&self, now: DateTime<Utc>) -> bool {
        self.lease_expiration_date.is_some_and(|expiration| now < expiration)
    }

    /// Same check as [`is_active_lease`](Self::is_active_lease)
    pub fn is_lease_still_in_force(&self, now: DateTime<Utc>) -> bool {
        self.is_active_lease(now)
    }

    /// Lift the embargo, recording what it was in the embargo history
    ///
    /// Clears the release date and both embargo visibility labels. Returns
    /// `false` when no embargo was set.
    pub fn deactivate_embargo(&mut self, now: DateTime<Utc>) -> bool {
        let Some(release) = self.embargo_release_date else {
            return false;
        };

        let state = if now < release { "An active" } else { "An expired" };
        let entry = format!(
            "{} embargo was deactivated on {}.  Its release date was {}.  Visibility during embargo was {} and intended visibility after embargo was {}",
            state,
            format_instant(&now),
            format_instant(&release),
            self.visibility_during_embargo.as_deref().unwrap_or(""),
            self.visibility_after_embargo.as_deref().unwrap_or(""),
        );
        info!(release = %format_instant(&release), "deactivating embargo");

        self.record_embargo_event(entry);
        self.embargo_release_date = None;
        self.visibility_during_embargo = None;
        self.visibility_after_embargo = None;
        true
    }

    /// Lift the lease, recording what it was in the lease history
    pub fn deactivate_lease(&mut self, now: DateTime<Utc>) -> bool {
        let Some(expiration) = self.lease_expiration_date else {
            return false;
        };

        let state = if now < expiration { "An active" } else { "An expired" };
        let entry = format!(
            "{} lease was deactivated on {}.  Its expiration date was {}.  Visibility during the lease was {} and intended visibility after lease was {}.",
            state,
            format_instant(&now),
            format_instant(&expiration),
            self.visibility_during_lease.as_deref().unwrap_or(""),
            self.visibility_after_lease.as_deref().unwrap_or(""),
        );
        info!(expiration = %format_instant(&expiration), "deactivating lease");

        self.record_lease_event(entry);
        self.lease_expiration_date = None;
        self.visibility_during_lease = None;
        self.visibility_after_lease = None;
        true
    }
}
