//! Cached GitHub profile statistics.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Key holding the merged [`GithubRecord`].
pub const GITHUB_STATS_KEY: &str = "stats:json";
/// Key holding the rendered stats card.
pub const GITHUB_STATS_SVG_KEY: &str = "svg:stats";
/// Key holding the rendered top-languages card.
pub const GITHUB_LANGUAGES_SVG_KEY: &str = "svg:languages";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GithubUserStats {
    pub stars: u64,
    pub commits: u64,
    pub prs: u64,
}

/// One entry of the top-languages breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageShare {
    pub name: String,
    /// Share of the top-N byte total, one decimal place (`"61.4"`).
    pub percentage: String,
    /// Hex colour, `#rrggbb`.
    pub color: String,
}

/// Merged record; each part is replaced only by a successful fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GithubRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stats: Option<GithubUserStats>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub languages: Option<Vec<LanguageShare>>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_omits_missing_parts() {
        let record = GithubRecord {
            stats: Some(GithubUserStats {
                stars: 12,
                commits: 340,
                prs: 8,
            }),
            languages: None,
            updated_at: Utc::now(),
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["stats"]["commits"], 340);
        assert!(json.get("languages").is_none());
        assert!(json.get("updatedAt").is_some());
    }

    #[test]
    fn record_reads_without_optional_parts() {
        let record: GithubRecord =
            serde_json::from_str(r#"{"updatedAt":"2025-03-01T06:00:00.000Z"}"#).unwrap();
        assert!(record.stats.is_none());
        assert!(record.languages.is_none());
    }
}
