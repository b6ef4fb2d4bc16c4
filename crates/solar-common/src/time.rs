//! Observation time parsing.

use chrono::{DateTime, NaiveDateTime, Utc};

use crate::error::{SolarError, SolarResult};

/// Parse a `DATE-OBS` style timestamp into UTC.
///
/// Accepts RFC 3339 strings ("2011-02-15T00:00:00Z", "...+00:00") as well as
/// the offset-less forms written by most solar instruments
/// ("2011-02-15T00:00:00.34", "2011-02-15 00:00:00").
pub fn parse_obstime(s: &str) -> SolarResult<DateTime<Utc>> {
    let trimmed = s.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.with_timezone(&Utc));
    }

    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, fmt) {
            return Ok(naive.and_utc());
        }
    }

    Err(SolarError::InvalidTime(s.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_parse_fits_date() {
        let t = parse_obstime("2011-02-15T00:00:00.34").unwrap();
        assert_eq!(t.year(), 2011);
        assert_eq!(t.month(), 2);
        assert_eq!(t.day(), 15);
    }

    #[test]
    fn test_parse_rfc3339() {
        let t = parse_obstime("2013-11-26T06:42:09+01:00").unwrap();
        assert_eq!(t.hour(), 5);
    }

    #[test]
    fn test_parse_invalid() {
        assert!(matches!(parse_obstime("yesterday"), Err(SolarError::InvalidTime(_))));
    }
}
