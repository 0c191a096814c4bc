//! GitHub REST client for profile statistics and language breakdowns.

use std::collections::HashMap;

use folio_core::{GithubUserStats, LanguageShare};
use futures::future::{join_all, try_join};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use serde::Deserialize;

use crate::client::HttpClient;
use crate::error::ScraperError;

pub const GITHUB_API_BASE: &str = "https://api.github.com";

const REPOS_PAGE_SIZE: usize = 100;
/// Guard against a cycling paginator.
const MAX_REPO_PAGES: u32 = 50;
const DEFAULT_LANGUAGE_COLOR: &str = "#858585";

/// The subset of a repository record we use.
#[derive(Debug, Clone, Deserialize)]
pub struct GithubRepo {
    pub name: String,
    #[serde(default)]
    pub stargazers_count: u64,
    #[serde(default)]
    pub fork: bool,
    pub language: Option<String>,
    pub languages_url: String,
}

#[derive(Debug, Deserialize)]
struct SearchTotal {
    #[serde(default)]
    total_count: u64,
}

pub struct GithubClient {
    http: HttpClient,
    base_url: String,
}

impl GithubClient {
    #[must_use]
    pub fn new(http: HttpClient) -> Self {
        Self {
            http,
            base_url: GITHUB_API_BASE.to_owned(),
        }
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_owned();
        self
    }

    /// Every public repository owned by `username`, following pages of 100
    /// until a short page.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError`] if any page fails; a partial list would
    /// undercount stars.
    pub async fn fetch_all_repos(&self, username: &str) -> Result<Vec<GithubRepo>, ScraperError> {
        let mut repos = Vec::new();

        for page in 1..=MAX_REPO_PAGES {
            let url = self.url(
                &format!("/users/{username}/repos"),
                &[
                    ("per_page", &REPOS_PAGE_SIZE.to_string()),
                    ("page", &page.to_string()),
                ],
            )?;
            let batch: Vec<GithubRepo> = self
                .http
                .get_json(&url, &api_headers(), &format!("repos page {page} for {username}"))
                .await?;
            let short_page = batch.len() < REPOS_PAGE_SIZE;
            repos.extend(batch);
            if short_page {
                return Ok(repos);
            }
        }

        tracing::warn!(
            username,
            max_pages = MAX_REPO_PAGES,
            "repository pagination limit reached"
        );
        Ok(repos)
    }

    /// Total stars across `repos`, plus commit and pull request counts from
    /// the search API.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError`] if either search request fails.
    pub async fn fetch_user_stats(
        &self,
        username: &str,
        repos: &[GithubRepo],
    ) -> Result<GithubUserStats, ScraperError> {
        let commits_url = self.url(
            "/search/commits",
            &[("q", &format!("author:{username}")), ("per_page", "1")],
        )?;
        let prs_url = self.url(
            "/search/issues",
            &[("q", &format!("author:{username} type:pr")), ("per_page", "1")],
        )?;

        let mut commit_headers = api_headers();
        commit_headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github.cloak-preview+json"),
        );

        let (commits, prs) = try_join(
            self.http
                .get_json::<SearchTotal>(&commits_url, &commit_headers, "commit search"),
            self.http
                .get_json::<SearchTotal>(&prs_url, &api_headers(), "pull request search"),
        )
        .await?;

        Ok(GithubUserStats {
            stars: repos.iter().map(|r| r.stargazers_count).sum(),
            commits: commits.total_count,
            prs: prs.total_count,
        })
    }

    /// Top `top_n` languages by bytes across non-fork repositories.
    ///
    /// Individual repository lookups that fail are skipped. Percentages are
    /// shares of the top-`top_n` total.
    ///
    /// # Errors
    ///
    /// Returns the first lookup error when every lookup failed, so a total
    /// outage does not read as "no languages".
    pub async fn fetch_top_languages(
        &self,
        repos: &[GithubRepo],
        top_n: usize,
    ) -> Result<Vec<LanguageShare>, ScraperError> {
        let lookups = repos
            .iter()
            .filter(|r| !r.fork && r.language.is_some())
            .map(|repo| async move {
                let result = self
                    .http
                    .get_json::<HashMap<String, u64>>(
                        &repo.languages_url,
                        &api_headers(),
                        &format!("languages for {}", repo.name),
                    )
                    .await;
                if let Err(e) = &result {
                    tracing::warn!(repo = %repo.name, error = %e, "language lookup failed; skipping");
                }
                result
            });

        let mut totals: HashMap<String, u64> = HashMap::new();
        let mut first_error = None;
        let mut succeeded = 0usize;
        for result in join_all(lookups).await {
            match result {
                Ok(languages) => {
                    succeeded += 1;
                    for (name, bytes) in languages {
                        *totals.entry(name).or_default() += bytes;
                    }
                }
                Err(e) => {
                    first_error.get_or_insert(e);
                }
            }
        }

        match first_error {
            Some(e) if succeeded == 0 => Err(e),
            _ => Ok(top_languages(totals, top_n)),
        }
    }

    fn url(&self, path: &str, query: &[(&str, &str)]) -> Result<String, ScraperError> {
        let raw = format!("{}{path}", self.base_url);
        let mut url = reqwest::Url::parse(&raw).map_err(|e| ScraperError::InvalidUrl {
            url: raw.clone(),
            reason: e.to_string(),
        })?;
        url.query_pairs_mut().extend_pairs(query);
        Ok(url.to_string())
    }
}

/// Rank language byte totals and convert the top `top_n` to shares.
#[allow(clippy::cast_precision_loss)]
pub(crate) fn top_languages(totals: HashMap<String, u64>, top_n: usize) -> Vec<LanguageShare> {
    let mut ranked: Vec<(String, u64)> = totals.into_iter().filter(|(_, b)| *b > 0).collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked.truncate(top_n);

    let total: u64 = ranked.iter().map(|(_, b)| b).sum();
    if total == 0 {
        return Vec::new();
    }

    ranked
        .into_iter()
        .map(|(name, bytes)| LanguageShare {
            percentage: format!("{:.1}", bytes as f64 / total as f64 * 100.0),
            color: language_color(&name).to_owned(),
            name,
        })
        .collect()
}

/// Linguist colour for `language`, grey for anything unlisted.
#[must_use]
pub fn language_color(language: &str) -> &'static str {
    match language {
        "Dart" => "#00B4AB",
        "JavaScript" => "#f1e05a",
        "TypeScript" => "#3178c6",
        "HTML" => "#e34c26",
        "CSS" => "#563d7c",
        "Python" => "#3572A5",
        "Java" => "#b07219",
        "Kotlin" => "#A97BFF",
        "Swift" => "#F05138",
        "C++" => "#f34b7d",
        "C" => "#555555",
        "C#" => "#178600",
        "Go" => "#00ADD8",
        "Rust" => "#dea584",
        "Ruby" => "#701516",
        "PHP" => "#4F5D95",
        "Shell" => "#89e051",
        "Vue" => "#41b883",
        "SCSS" => "#c6538c",
        "Makefile" => "#427819",
        "CMake" => "#DA3434",
        "Objective-C" => "#438eff",
        _ => DEFAULT_LANGUAGE_COLOR,
    }
}

fn api_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github.v3+json"));
    headers
}
