//! Response-body decoding for the REST and GraphQL endpoints.
//!
//! Kept separate from the HTTP client so every shape can be tested against
//! JSON fixtures without a network.

use chrono::{DateTime, NaiveDate, TimeZone};
use serde::Deserialize;

use crate::error::{Error, Result};
use crate::types::{
    ActivityEvent, Contribution, EventKind, Profile, PullRequest, PullRequestState, Repository,
    ReviewDecision,
};

/// Query for one year of the contribution calendar.
pub const CONTRIBUTIONS_QUERY: &str = r#"
query($username: String!) {
  user(login: $username) {
    contributionsCollection {
      contributionCalendar {
        weeks {
          contributionDays {
            contributionCount
            date
          }
        }
      }
    }
  }
}"#;

/// Issue search restricted to pull requests, with review counts.
pub const PULL_REQUESTS_QUERY: &str = r#"
query($searchQuery: String!, $first: Int!) {
  search(query: $searchQuery, type: ISSUE, first: $first) {
    nodes {
      ... on PullRequest {
        title
        state
        isDraft
        reviewDecision
        repository { nameWithOwner }
        comments { totalCount }
        approved: reviews(states: APPROVED) { totalCount }
        changes: reviews(states: CHANGES_REQUESTED) { totalCount }
      }
    }
  }
}"#;

/// Search string for pull requests authored by `login`.
///
/// `state` is a search qualifier value such as `"open"` or `"closed"`.
pub fn pull_request_search(login: &str, state: &str, include_private: bool) -> String {
    let mut query = format!("is:pr author:{} is:{} sort:updated-desc", login, state);
    if !include_private {
        query.push_str(" is:public");
    }
    query
}

// ============================================
// GraphQL
// ============================================

#[derive(Deserialize)]
struct GraphQlResponse<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Vec<GraphQlError>,
}

#[derive(Deserialize)]
struct GraphQlError {
    message: String,
}

#[derive(Deserialize)]
struct ContributionsData {
    user: Option<UserNode>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserNode {
    contributions_collection: CollectionNode,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CollectionNode {
    contribution_calendar: CalendarNode,
}

#[derive(Deserialize)]
struct CalendarNode {
    weeks: Vec<WeekNode>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WeekNode {
    contribution_days: Vec<DayNode>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DayNode {
    contribution_count: u32,
    date: String,
}

/// Flatten the contribution calendar into date-ordered days.
///
/// Days whose date does not parse are skipped.
pub fn contributions_from_graphql(body: &str) -> Result<Vec<Contribution>> {
    let response: GraphQlResponse<ContributionsData> = serde_json::from_str(body)?;

    if !response.errors.is_empty() {
        let messages: Vec<_> = response.errors.into_iter().map(|e| e.message).collect();
        return Err(Error::GraphQl(messages.join("; ")));
    }

    let user = response
        .data
        .and_then(|data| data.user)
        .ok_or_else(|| Error::GraphQl("user not found".to_string()))?;

    let contributions = user
        .contributions_collection
        .contribution_calendar
        .weeks
        .into_iter()
        .flat_map(|week| week.contribution_days)
        .filter_map(|day| match NaiveDate::parse_from_str(&day.date, "%Y-%m-%d") {
            Ok(date) => Some(Contribution::new(date, day.contribution_count)),
            Err(e) => {
                tracing::debug!(date = %day.date, error = %e, "Skipping contribution day");
                None
            }
        })
        .collect();

    Ok(contributions)
}

#[derive(Deserialize)]
struct SearchData {
    search: SearchNode,
}

#[derive(Deserialize)]
struct SearchNode {
    #[serde(default)]
    nodes: Vec<serde_json::Value>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PullRequestNode {
    title: String,
    state: PullRequestState,
    #[serde(default)]
    is_draft: bool,
    review_decision: Option<ReviewDecision>,
    repository: RepositoryName,
    #[serde(default)]
    comments: TotalCount,
    #[serde(default)]
    approved: TotalCount,
    #[serde(default)]
    changes: TotalCount,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RepositoryName {
    name_with_owner: String,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct TotalCount {
    total_count: u32,
}

/// Decode a pull request search, in result order.
///
/// Search hits that are not pull requests come back as empty objects and
/// are skipped.
pub fn pull_requests_from_graphql(body: &str) -> Result<Vec<PullRequest>> {
    let response: GraphQlResponse<SearchData> = serde_json::from_str(body)?;

    if !response.errors.is_empty() {
        let messages: Vec<_> = response.errors.into_iter().map(|e| e.message).collect();
        return Err(Error::GraphQl(messages.join("; ")));
    }

    let search = response
        .data
        .map(|data| data.search)
        .ok_or_else(|| Error::GraphQl("empty search response".to_string()))?;

    let pull_requests = search
        .nodes
        .into_iter()
        .filter_map(|node| match serde_json::from_value::<PullRequestNode>(node) {
            Ok(pr) => Some(PullRequest {
                title: pr.title,
                repository: pr.repository.name_with_owner,
                state: pr.state,
                is_draft: pr.is_draft,
                review_decision: pr.review_decision,
                approved_count: pr.approved.total_count,
                changes_count: pr.changes.total_count,
                comment_count: pr.comments.total_count,
            }),
            Err(e) => {
                tracing::debug!(error = %e, "Skipping search result");
                None
            }
        })
        .collect();

    Ok(pull_requests)
}

// ============================================
// REST
// ============================================

pub fn profile_from_json(body: &str) -> Result<Profile> {
    Ok(serde_json::from_str(body)?)
}

pub fn repositories_from_json(body: &str) -> Result<Vec<Repository>> {
    Ok(serde_json::from_str(body)?)
}

#[derive(Deserialize)]
struct RawEvent {
    #[serde(rename = "type")]
    event_type: String,
    created_at: String,
    #[serde(default)]
    public: bool,
    repo: RawRepo,
    #[serde(default)]
    payload: serde_json::Value,
}

#[derive(Deserialize)]
struct RawRepo {
    name: String,
}

/// Decode an events listing, converting timestamps into `tz`.
///
/// Events with an unparseable `created_at` are dropped.
pub fn events_from_json<Tz: TimeZone>(body: &str, tz: &Tz) -> Result<Vec<ActivityEvent>> {
    let raw: Vec<RawEvent> = serde_json::from_str(body)?;

    let events = raw
        .into_iter()
        .filter_map(|event| {
            let timestamp = match DateTime::parse_from_rfc3339(&event.created_at) {
                Ok(ts) => ts.with_timezone(tz).fixed_offset(),
                Err(e) => {
                    tracing::debug!(created_at = %event.created_at, error = %e, "Skipping event");
                    return None;
                }
            };
            let action = action_description(&event.event_type, &event.payload);
            Some(ActivityEvent {
                kind: EventKind::from_api_type(&event.event_type),
                repository: event.repo.name,
                action,
                timestamp,
                is_public: event.public,
            })
        })
        .collect();

    Ok(events)
}

/// Human-readable summary of an event.
pub fn action_description(event_type: &str, payload: &serde_json::Value) -> String {
    let str_field = |key: &str| payload.get(key).and_then(|v| v.as_str());

    match event_type {
        "PushEvent" => {
            let commits = payload
                .get("commits")
                .and_then(|c| c.as_array())
                .map(|c| c.len() as u64)
                .or_else(|| payload.get("size").and_then(|s| s.as_u64()));
            match commits {
                Some(n) => format!("Pushed {} commit(s)", n),
                None => "Pushed commits".to_string(),
            }
        }
        "CreateEvent" => match str_field("ref_type") {
            Some(ref_type) => format!("Created {}", ref_type),
            None => "Created repository".to_string(),
        },
        "PullRequestEvent" => match str_field("action") {
            Some(action) => format!("Pull request {}", action),
            None => "Pull request activity".to_string(),
        },
        "IssuesEvent" => match str_field("action") {
            Some(action) => format!("Issue {}", action),
            None => "Issue activity".to_string(),
        },
        "WatchEvent" => "Starred repository".to_string(),
        "ForkEvent" => "Forked repository".to_string(),
        other => other.to_string(),
    }
}

/// Pull the `message` field out of an API error body, else the raw body.
pub fn api_error_message(body: &str) -> String {
    #[derive(Deserialize)]
    struct ApiError {
        message: String,
    }

    match serde_json::from_str::<ApiError>(body) {
        Ok(err) => err.message,
        Err(_) if body.trim().is_empty() => "unknown".to_string(),
        Err(_) => body.trim().to_string(),
    }
}
