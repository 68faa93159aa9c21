//! Speed normalization and travel time cost.
//!
//! `maxspeed` tags come in mixed units and are often missing. Tagged values
//! are converted to km/h; anything unparseable falls back to a per road
//! class default.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::Seconds;

pub const MPH_TO_KMH: f64 = 1.60934;

/// Speed for road classes missing from the default table
pub const FALLBACK_SPEED_KMH: f64 = 40.0;

static MAXSPEED_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d+\.?\d*)\s*(mph|km/h|kmh|kph)?").expect("maxspeed pattern is valid")
});

/// Where a resolved speed came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpeedSource {
    /// Tagged value in km/h (explicit or implied unit)
    Tagged,
    /// Tagged value converted from mph
    TaggedMph,
    /// Road class default
    Default,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedSpeed {
    pub kmh: f64,
    pub source: SpeedSource,
}

/// Parses a raw `maxspeed` value into km/h.
///
/// Only the first number in the text is considered. Values that are not
/// strictly positive are treated as unparseable.
pub fn parse_maxspeed(raw: &str) -> Option<ResolvedSpeed> {
    let captures = MAXSPEED_PATTERN.captures(raw)?;
    let magnitude: f64 = captures.get(1)?.as_str().parse().ok()?;
    if !magnitude.is_finite() || magnitude <= 0.0 {
        return None;
    }

    let is_mph = captures
        .get(2)
        .is_some_and(|unit| unit.as_str().eq_ignore_ascii_case("mph"));

    Some(if is_mph {
        ResolvedSpeed {
            kmh: magnitude * MPH_TO_KMH,
            source: SpeedSource::TaggedMph,
        }
    } else {
        ResolvedSpeed {
            kmh: magnitude,
            source: SpeedSource::Tagged,
        }
    })
}

/// Default speed in km/h for a `highway` value; link roads inherit
/// their parent class
pub fn default_speed(road_class: Option<&str>) -> f64 {
    let Some(class) = road_class else {
        return FALLBACK_SPEED_KMH;
    };
    let class = class.trim().to_ascii_lowercase();
    let parent = class.strip_suffix("_link").unwrap_or(&class);

    match parent {
        "motorway" => 110.0,
        "trunk" => 90.0,
        "primary" => 70.0,
        "secondary" => 60.0,
        "tertiary" => 50.0,
        "residential" | "living_street" => 30.0,
        "service" => 20.0,
        _ => FALLBACK_SPEED_KMH,
    }
}

pub fn resolve_speed(maxspeed: Option<&str>, road_class: Option<&str>) -> ResolvedSpeed {
    maxspeed
        .and_then(parse_maxspeed)
        .unwrap_or_else(|| ResolvedSpeed {
            kmh: default_speed(road_class),
            source: SpeedSource::Default,
        })
}

/// Travel time in seconds for `length_m` meters at `speed_kmh`
pub fn travel_time(length_m: f64, speed_kmh: f64) -> Seconds {
    length_m / (speed_kmh * 1000.0 / 3600.0)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SpeedStats {
    pub tagged: usize,
    pub converted_mph: usize,
    pub defaulted: usize,
}

impl SpeedStats {
    pub fn record(&mut self, source: SpeedSource) {
        match source {
            SpeedSource::Tagged => self.tagged += 1,
            SpeedSource::TaggedMph => self.converted_mph += 1,
            SpeedSource::Default => self.defaulted += 1,
        }
    }
}

impl FromIterator<SpeedSource> for SpeedStats {
    fn from_iter<I: IntoIterator<Item = SpeedSource>>(iter: I) -> Self {
        let mut stats = Self::default();
        for source in iter {
            stats.record(source);
        }
        stats
    }
}

impl fmt::Display for SpeedStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} tagged, {} converted from mph, {} defaulted",
            self.tagged, self.converted_mph, self.defaulted
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-6,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_mph_is_converted() {
        let speed = parse_maxspeed("45 mph").unwrap();
        assert_close(speed.kmh, 45.0 * MPH_TO_KMH);
        assert_eq!(speed.source, SpeedSource::TaggedMph);

        let speed = parse_maxspeed("30MPH").unwrap();
        assert_close(speed.kmh, 30.0 * MPH_TO_KMH);
    }

    #[test]
    fn test_plain_and_kmh_values() {
        assert_eq!(parse_maxspeed("60").map(|s| s.kmh), Some(60.0));
        assert_eq!(parse_maxspeed("50 km/h").map(|s| s.kmh), Some(50.0));
        assert_eq!(parse_maxspeed("80kph").map(|s| s.kmh), Some(80.0));
        assert_eq!(parse_maxspeed("12.5").map(|s| s.kmh), Some(12.5));
        assert_eq!(parse_maxspeed("60").map(|s| s.source), Some(SpeedSource::Tagged));
    }

    #[test]
    fn test_first_value_of_a_list_wins() {
        assert_eq!(parse_maxspeed("['50', '30']").map(|s| s.kmh), Some(50.0));
        assert_eq!(parse_maxspeed("70;50").map(|s| s.kmh), Some(70.0));
    }

    #[test]
    fn test_unparseable_values() {
        assert!(parse_maxspeed("").is_none());
        assert!(parse_maxspeed("signals").is_none());
        assert!(parse_maxspeed("RU:urban").is_none());
        assert!(parse_maxspeed("0").is_none());
    }

    #[test]
    fn test_defaults_by_road_class() {
        assert_eq!(default_speed(Some("motorway")), 110.0);
        assert_eq!(default_speed(Some("motorway_link")), 110.0);
        assert_eq!(default_speed(Some("Trunk_Link")), 90.0);
        assert_eq!(default_speed(Some("tertiary")), 50.0);
        assert_eq!(default_speed(Some("living_street")), 30.0);
        assert_eq!(default_speed(Some("service")), 20.0);
        assert_eq!(default_speed(Some("road")), 40.0);
        assert_eq!(default_speed(Some("track")), FALLBACK_SPEED_KMH);
        assert_eq!(default_speed(None), FALLBACK_SPEED_KMH);
    }

    #[test]
    fn test_missing_speed_uses_class_default() {
        let speed = resolve_speed(None, Some("residential"));
        assert_eq!(speed.kmh, 30.0);
        assert_eq!(speed.source, SpeedSource::Default);

        let speed = resolve_speed(Some("none"), Some("secondary"));
        assert_eq!(speed.kmh, 60.0);
        assert_eq!(speed.source, SpeedSource::Default);
    }

    #[test]
    fn test_travel_time() {
        // 36 km/h = 10 m/s
        assert_close(travel_time(100.0, 36.0), 10.0);
        assert!(travel_time(1.0, 110.0) > 0.0);
    }

    #[test]
    fn test_stats_count_sources() {
        let stats: SpeedStats = [
            SpeedSource::Tagged,
            SpeedSource::Default,
            SpeedSource::Default,
            SpeedSource::TaggedMph,
        ]
        .into_iter()
        .collect();
        assert_eq!(stats.tagged, 1);
        assert_eq!(stats.converted_mph, 1);
        assert_eq!(stats.defaulted, 2);
    }
}
