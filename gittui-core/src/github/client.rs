//! HTTP client for the GitHub REST and GraphQL APIs.

use std::future::Future;
use std::time::Duration;

use chrono::Local;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use serde_json::json;

use crate::config::GitHubConfig;
use crate::error::{Error, Result};
use crate::types::{ActivityEvent, Contribution, Profile, PullRequest, Repository};

use super::parse;

/// Repositories requested per listing. Only the first page is read.
const REPOS_PER_PAGE: u32 = 100;

/// Pull requests shown in the dashboard panel.
const PULL_REQUEST_LIMIT: u32 = 5;

/// Authenticated client for one GitHub host.
pub struct GitHubClient {
    http_client: reqwest::Client,
    api_url: String,
    graphql_url: String,
    max_retries: usize,
}

impl GitHubClient {
    /// Create a client from configuration.
    ///
    /// A token is required: the contribution calendar is only served over
    /// GraphQL, which rejects anonymous requests.
    pub fn new(config: &GitHubConfig) -> Result<Self> {
        config.validate()?;

        let token = config.resolve_token().ok_or_else(|| {
            Error::Auth(
                "no GitHub token found; set GITHUB_TOKEN or GH_TOKEN, or github.token in the config file"
                    .to_string(),
            )
        })?;

        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("gittui/", env!("CARGO_PKG_VERSION"))),
        );
        let mut auth_value = HeaderValue::from_str(&format!("Bearer {}", token))
            .map_err(|e| Error::Auth(format!("invalid token: {}", e)))?;
        auth_value.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth_value);

        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(headers)
            .build()
            .map_err(|e| Error::Config(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            graphql_url: config.graphql_url(),
            max_retries: config.max_retries,
        })
    }

    /// Profile of the token's owner.
    pub async fn fetch_authenticated_user(&self) -> Result<Profile> {
        let body = self.get_text(&format!("{}/user", self.api_url)).await?;
        parse::profile_from_json(&body)
    }

    /// Profile for `username`. With `include_private` the `/user` endpoint is
    /// used, which only makes sense when `username` is the token's owner.
    pub async fn fetch_profile(&self, username: &str, include_private: bool) -> Result<Profile> {
        let body = self.get_text(&self.profile_url(username, include_private)).await?;
        parse::profile_from_json(&body)
    }

    /// Contribution calendar for the last year, oldest day first.
    pub async fn fetch_contributions(&self, username: &str) -> Result<Vec<Contribution>> {
        let request_body = json!({
            "query": parse::CONTRIBUTIONS_QUERY,
            "variables": { "username": username },
        });

        let body = self.post_graphql("contributions", &request_body).await?;

        let contributions = parse::contributions_from_graphql(&body)?;
        tracing::debug!(
            username,
            days = contributions.len(),
            "Fetched contribution calendar"
        );
        Ok(contributions)
    }

    /// First page of repositories, including private and organization
    /// repositories when `include_private` is set.
    pub async fn fetch_repositories(
        &self,
        username: &str,
        include_private: bool,
    ) -> Result<Vec<Repository>> {
        let body = self
            .get_text(&self.repositories_url(username, include_private))
            .await?;
        let repositories = parse::repositories_from_json(&body)?;
        tracing::debug!(username, count = repositories.len(), "Fetched repositories");
        Ok(repositories)
    }

    /// Most recent events, timestamps converted to the local offset.
    pub async fn fetch_events(
        &self,
        username: &str,
        include_private: bool,
        limit: u32,
    ) -> Result<Vec<ActivityEvent>> {
        let body = self
            .get_text(&self.events_url(username, include_private, limit))
            .await?;
        let events = parse::events_from_json(&body, &Local)?;
        tracing::debug!(username, count = events.len(), "Fetched events");
        Ok(events)
    }

    /// Open pull requests authored by `login`, most recently updated first.
    ///
    /// With none open, the most recently updated closed and merged ones are
    /// returned instead.
    pub async fn fetch_pull_requests(
        &self,
        login: &str,
        include_private: bool,
    ) -> Result<Vec<PullRequest>> {
        let open = self
            .search_pull_requests(login, "open", include_private)
            .await?;
        if !open.is_empty() {
            tracing::debug!(login, count = open.len(), "Fetched open pull requests");
            return Ok(open);
        }

        let closed = self
            .search_pull_requests(login, "closed", include_private)
            .await?;
        tracing::debug!(login, count = closed.len(), "Fetched closed pull requests");
        Ok(closed)
    }

    async fn search_pull_requests(
        &self,
        login: &str,
        state: &str,
        include_private: bool,
    ) -> Result<Vec<PullRequest>> {
        let request_body = pull_requests_request(login, state, include_private);
        let body = self.post_graphql("pull requests", &request_body).await?;
        parse::pull_requests_from_graphql(&body)
    }

    fn profile_url(&self, username: &str, include_private: bool) -> String {
        if include_private {
            format!("{}/user", self.api_url)
        } else {
            format!("{}/users/{}", self.api_url, urlencoding::encode(username))
        }
    }

    fn repositories_url(&self, username: &str, include_private: bool) -> String {
        if include_private {
            format!(
                "{}/user/repos?per_page={}&affiliation=owner,collaborator,organization_member",
                self.api_url, REPOS_PER_PAGE
            )
        } else {
            format!(
                "{}/users/{}/repos?per_page={}",
                self.api_url,
                urlencoding::encode(username),
                REPOS_PER_PAGE
            )
        }
    }

    fn events_url(&self, username: &str, include_private: bool, limit: u32) -> String {
        let suffix = if include_private { "" } else { "/public" };
        format!(
            "{}/users/{}/events{}?per_page={}",
            self.api_url,
            urlencoding::encode(username),
            suffix,
            limit
        )
    }

    async fn get_text(&self, url: &str) -> Result<String> {
        let http_client = &self.http_client;
        self.with_retry(url, move || async move {
            let response = http_client.get(url).send().await?;
            read_body(response).await
        })
        .await
    }

    async fn post_graphql(&self, what: &str, request_body: &serde_json::Value) -> Result<String> {
        let http_client = &self.http_client;
        let url = self.graphql_url.as_str();
        self.with_retry(what, move || async move {
            let response = http_client.post(url).json(request_body).send().await?;
            read_body(response).await
        })
        .await
    }

    /// Run `op`, retrying transient failures with exponential backoff.
    async fn with_retry<T, F, Fut>(&self, what: &str, mut op: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut delay = Duration::from_millis(500);
        let mut attempt = 0;

        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(e) if e.is_retryable() && attempt < self.max_retries => {
                    attempt += 1;
                    tracing::warn!(
                        request = what,
                        attempt,
                        max_retries = self.max_retries,
                        error = %e,
                        "Transient GitHub API error, retrying in {:?}",
                        delay
                    );
                    tokio::time::sleep(delay).await;
                    delay = std::cmp::min(delay * 2, Duration::from_secs(8));
                }
                Err(e) => return Err(e),
            }
        }
    }
}

fn pull_requests_request(login: &str, state: &str, include_private: bool) -> serde_json::Value {
    json!({
        "query": parse::PULL_REQUESTS_QUERY,
        "variables": {
            "searchQuery": parse::pull_request_search(login, state, include_private),
            "first": PULL_REQUEST_LIMIT,
        },
    })
}

/// Body of a successful response, or a typed error for any other status.
async fn read_body(response: reqwest::Response) -> Result<String> {
    let status = response.status();
    let body = response.text().await?;

    if status.is_success() {
        return Ok(body);
    }

    let message = parse::api_error_message(&body);
    if status == reqwest::StatusCode::UNAUTHORIZED {
        return Err(Error::Auth(message));
    }
    Err(Error::Api {
        status: status.as_u16(),
        message,
    })
}
