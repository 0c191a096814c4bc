//! Social follower statistics and the persisted snapshot format.
//!
//! The wire format keeps the historical layout consumed by the static site:
//!
//! ```json
//! {
//!   "updatedAt": "2025-01-01T06:00:00.000Z",
//!   "youtube": { "subscribers": 5000 },
//!   "instagram": { "followers": 0, "error": "connection reset" }
//! }
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::de::Error as _;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

/// A social platform with a public profile page we scrape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Youtube,
    Instagram,
    Tiktok,
    Twitter,
    Linkedin,
}

impl Platform {
    pub const ALL: [Platform; 5] = [
        Platform::Youtube,
        Platform::Instagram,
        Platform::Tiktok,
        Platform::Twitter,
        Platform::Linkedin,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Platform::Youtube => "youtube",
            Platform::Instagram => "instagram",
            Platform::Tiktok => "tiktok",
            Platform::Twitter => "twitter",
            Platform::Linkedin => "linkedin",
        }
    }

    /// JSON field that carries this platform's count.
    #[must_use]
    pub fn count_field(self) -> &'static str {
        match self {
            Platform::Youtube => "subscribers",
            _ => "followers",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Platform::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown platform \"{s}\""))
    }
}

/// One platform's most recent observation.
///
/// `error` may coexist with `count == 0` when the fetch itself failed; a
/// zero count without an error means the page loaded but no pattern matched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlatformStat {
    pub count: u64,
    pub error: Option<String>,
}

impl PlatformStat {
    #[must_use]
    pub fn ok(count: u64) -> Self {
        Self { count, error: None }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            count: 0,
            error: Some(error.into()),
        }
    }

    /// A stat worth keeping over a later zero/error observation.
    #[must_use]
    pub fn is_known_good(&self) -> bool {
        self.count > 0
    }

    fn to_wire(&self, platform: Platform) -> Value {
        let mut obj = Map::new();
        obj.insert(platform.count_field().to_string(), Value::from(self.count));
        if let Some(error) = &self.error {
            obj.insert("error".to_string(), Value::from(error.as_str()));
        }
        Value::Object(obj)
    }

    fn from_wire(platform: Platform, value: &Value) -> Option<Self> {
        let obj = value.as_object()?;
        let count = obj
            .get(platform.count_field())
            .or_else(|| obj.get("followers"))
            .or_else(|| obj.get("subscribers"))
            .and_then(Value::as_u64)
            .unwrap_or(0);
        let error = obj
            .get("error")
            .and_then(Value::as_str)
            .map(ToOwned::to_owned);
        Some(Self { count, error })
    }
}

/// Freshly scraped stats for one refresh cycle, before merge and timestamping.
pub type CandidateSnapshot = BTreeMap<Platform, PlatformStat>;

/// The single persisted record of every platform's latest known count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatsSnapshot {
    pub updated_at: DateTime<Utc>,
    pub stats: BTreeMap<Platform, PlatformStat>,
}

impl StatsSnapshot {
    #[must_use]
    pub fn new(updated_at: DateTime<Utc>, stats: BTreeMap<Platform, PlatformStat>) -> Self {
        Self { updated_at, stats }
    }

    #[must_use]
    pub fn get(&self, platform: Platform) -> Option<&PlatformStat> {
        self.stats.get(&platform)
    }

    /// `updatedAt` as written on the wire: RFC 3339, millisecond precision, `Z`.
    #[must_use]
    pub fn updated_at_iso(&self) -> String {
        self.updated_at.to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    /// Convert to a JSON value for the key/value store.
    #[must_use]
    pub fn to_value(&self) -> Value {
        let mut obj = Map::new();
        obj.insert("updatedAt".to_string(), Value::from(self.updated_at_iso()));
        for (platform, stat) in &self.stats {
            obj.insert(platform.as_str().to_string(), stat.to_wire(*platform));
        }
        Value::Object(obj)
    }

    /// Parse the stored JSON form. Unknown keys are ignored.
    ///
    /// # Errors
    ///
    /// Returns a message when the value is not an object or `updatedAt` is
    /// missing or not RFC 3339.
    pub fn from_value(value: &Value) -> Result<Self, String> {
        let obj = value
            .as_object()
            .ok_or_else(|| "snapshot is not a JSON object".to_string())?;

        let raw_ts = obj
            .get("updatedAt")
            .and_then(Value::as_str)
            .ok_or_else(|| "snapshot is missing updatedAt".to_string())?;
        let updated_at = DateTime::parse_from_rfc3339(raw_ts)
            .map_err(|e| format!("invalid updatedAt \"{raw_ts}\": {e}"))?
            .with_timezone(&Utc);

        let stats = Platform::ALL
            .into_iter()
            .filter_map(|p| {
                obj.get(p.as_str())
                    .and_then(|v| PlatformStat::from_wire(p, v))
                    .map(|s| (p, s))
            })
            .collect();

        Ok(Self { updated_at, stats })
    }
}

impl Serialize for StatsSnapshot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.stats.len() + 1))?;
        map.serialize_entry("updatedAt", &self.updated_at_iso())?;
        for (platform, stat) in &self.stats {
            map.serialize_entry(platform.as_str(), &stat.to_wire(*platform))?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for StatsSnapshot {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        StatsSnapshot::from_value(&value).map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use serde_json::json;

    use super::*;

    fn fixed_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 6, 0, 0).unwrap()
    }

    #[test]
    fn platform_round_trips_through_from_str() {
        for p in Platform::ALL {
            assert_eq!(p.as_str().parse::<Platform>().unwrap(), p);
        }
        assert_eq!("YouTube".parse::<Platform>().unwrap(), Platform::Youtube);
        assert!("myspace".parse::<Platform>().is_err());
    }

    #[test]
    fn youtube_uses_subscribers_field() {
        assert_eq!(Platform::Youtube.count_field(), "subscribers");
        assert_eq!(Platform::Tiktok.count_field(), "followers");
    }

    #[test]
    fn snapshot_serializes_in_legacy_layout() {
        let mut stats = BTreeMap::new();
        stats.insert(Platform::Youtube, PlatformStat::ok(5000));
        stats.insert(Platform::Instagram, PlatformStat::failed("timed out"));
        let snapshot = StatsSnapshot::new(fixed_time(), stats);

        let value = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(
            value,
            json!({
                "updatedAt": "2025-03-01T06:00:00.000Z",
                "youtube": { "subscribers": 5000 },
                "instagram": { "followers": 0, "error": "timed out" }
            })
        );
    }

    #[test]
    fn snapshot_parses_legacy_payload_and_ignores_unknown_keys() {
        let raw = json!({
            "updatedAt": "2025-03-01T06:00:00.000Z",
            "youtube": { "subscribers": 5000 },
            "tiktok": { "followers": 120 },
            "myspace": { "friends": 8 }
        });
        let snapshot: StatsSnapshot = serde_json::from_value(raw).unwrap();
        assert_eq!(snapshot.updated_at, fixed_time());
        assert_eq!(snapshot.stats.len(), 2);
        assert_eq!(snapshot.get(Platform::Tiktok), Some(&PlatformStat::ok(120)));
    }

    #[test]
    fn snapshot_without_count_reads_as_zero() {
        let raw = json!({
            "updatedAt": "2025-03-01T06:00:00.000Z",
            "twitter": { "error": "blocked" }
        });
        let snapshot = StatsSnapshot::from_value(&raw).unwrap();
        assert_eq!(
            snapshot.get(Platform::Twitter),
            Some(&PlatformStat::failed("blocked"))
        );
    }

    #[test]
    fn snapshot_requires_updated_at() {
        let err = StatsSnapshot::from_value(&json!({ "youtube": { "subscribers": 1 } }))
            .unwrap_err();
        assert!(err.contains("updatedAt"), "unexpected error: {err}");
    }

    #[test]
    fn known_good_means_positive_count() {
        assert!(PlatformStat::ok(1).is_known_good());
        assert!(!PlatformStat::ok(0).is_known_good());
        assert!(!PlatformStat::failed("x").is_known_good());
    }
}
