//! Core domain types for gittui
//!
//! These are the already-fetched records every other module works from.
//!
//! ## Terminology
//!
//! | Term | Definition |
//! |------|------------|
//! | **Contribution** | One calendar day's activity count |
//! | **ActivityEvent** | One entry of a user's public or private event feed |
//! | **Profile** | Account metadata shown in the dashboard header |
//! | **Repository** | A repository owned by or shared with the user |
//! | **LanguageStat** | Share of non-fork repositories using a language |
//! | **PullRequest** | A pull request authored by the user, with its review state |

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::theme::Rgb;

// ============================================
// Contributions
// ============================================

/// One day's contribution count.
///
/// Sequences of contributions are expected in non-decreasing date order;
/// nothing downstream re-sorts them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Contribution {
    pub date: NaiveDate,
    pub count: u32,
}

impl Contribution {
    pub fn new(date: NaiveDate, count: u32) -> Self {
        Self { date, count }
    }
}

// ============================================
// Activity feed
// ============================================

/// Kind of feed event, keyed off the API's `type` string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Push,
    Create,
    PullRequest,
    Issues,
    Watch,
    Fork,
    /// Any other event type, kept verbatim (e.g. `"ReleaseEvent"`)
    Other(String),
}

impl EventKind {
    /// Map an API event type such as `"PushEvent"`.
    pub fn from_api_type(event_type: &str) -> Self {
        match event_type {
            "PushEvent" => EventKind::Push,
            "CreateEvent" => EventKind::Create,
            "PullRequestEvent" => EventKind::PullRequest,
            "IssuesEvent" => EventKind::Issues,
            "WatchEvent" => EventKind::Watch,
            "ForkEvent" => EventKind::Fork,
            other => EventKind::Other(other.to_string()),
        }
    }

    pub fn as_api_type(&self) -> &str {
        match self {
            EventKind::Push => "PushEvent",
            EventKind::Create => "CreateEvent",
            EventKind::PullRequest => "PullRequestEvent",
            EventKind::Issues => "IssuesEvent",
            EventKind::Watch => "WatchEvent",
            EventKind::Fork => "ForkEvent",
            EventKind::Other(raw) => raw,
        }
    }

    pub fn is_push(&self) -> bool {
        matches!(self, EventKind::Push)
    }
}

/// A single activity feed entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityEvent {
    pub kind: EventKind,
    /// `owner/name` of the repository the event happened in
    pub repository: String,
    /// Human-readable description, e.g. "Pushed 3 commit(s)"
    pub action: String,
    /// When the event happened, in the viewer's local offset
    pub timestamp: DateTime<FixedOffset>,
    pub is_public: bool,
}

// ============================================
// Profile
// ============================================

/// Account metadata for the dashboard header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub login: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub avatar_url: String,
    #[serde(default)]
    pub public_repos: u32,
    /// Only present when the profile is fetched for the authenticated user
    #[serde(default)]
    pub total_private_repos: Option<u32>,
    #[serde(default)]
    pub public_gists: u32,
    #[serde(default)]
    pub followers: u32,
    #[serde(default)]
    pub following: u32,
    pub created_at: DateTime<Utc>,
}

impl Profile {
    /// Display name, falling back to the login.
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(&self.login)
    }

    /// Repository count, including private repositories when known.
    pub fn repo_count(&self) -> u32 {
        self.public_repos + self.total_private_repos.unwrap_or(0)
    }

    /// e.g. "Member since January 2006"
    pub fn member_since(&self) -> String {
        format!("Member since {}", self.created_at.format("%B %Y"))
    }
}

// ============================================
// Repositories & languages
// ============================================

/// A repository as listed by the REST API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repository {
    pub name: String,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(rename = "stargazers_count", default)]
    pub stars: u32,
    #[serde(rename = "forks_count", default)]
    pub forks: u32,
    #[serde(rename = "private", default)]
    pub is_private: bool,
    #[serde(rename = "fork", default)]
    pub is_fork: bool,
}

/// Share of repositories written primarily in one language.
#[derive(Debug, Clone, PartialEq)]
pub struct LanguageStat {
    pub name: String,
    /// Fraction in `0.0..=1.0`
    pub percentage: f64,
    pub color: Rgb,
}

// ============================================
// Pull requests
// ============================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PullRequestState {
    Open,
    Closed,
    Merged,
}

/// Aggregate review outcome GitHub reports for an open pull request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReviewDecision {
    Approved,
    ChangesRequested,
    ReviewRequired,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequest {
    pub title: String,
    /// `owner/name`
    pub repository: String,
    pub state: PullRequestState,
    pub is_draft: bool,
    pub review_decision: Option<ReviewDecision>,
    pub approved_count: u32,
    pub changes_count: u32,
    pub comment_count: u32,
}

impl PullRequest {
    pub fn is_open(&self) -> bool {
        self.state == PullRequestState::Open
    }

    /// Single status for display. Closing outranks draft, draft outranks review.
    pub fn status(&self) -> PullRequestStatus {
        match self.state {
            PullRequestState::Merged => PullRequestStatus::Merged,
            PullRequestState::Closed => PullRequestStatus::Closed,
            PullRequestState::Open if self.is_draft => PullRequestStatus::Draft,
            PullRequestState::Open => match self.review_decision {
                Some(ReviewDecision::Approved) => PullRequestStatus::Approved,
                Some(ReviewDecision::ChangesRequested) => PullRequestStatus::ChangesRequested,
                Some(ReviewDecision::ReviewRequired) => PullRequestStatus::ReviewRequired,
                None => PullRequestStatus::NoReviews,
            },
        }
    }

    /// True while an open, non-draft pull request has no review decision yet.
    pub fn awaiting_review(&self) -> bool {
        self.is_open() && !self.is_draft && self.review_decision.is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PullRequestStatus {
    Merged,
    Closed,
    Draft,
    Approved,
    ChangesRequested,
    ReviewRequired,
    NoReviews,
}

impl PullRequestStatus {
    pub fn icon(self) -> &'static str {
        match self {
            PullRequestStatus::Merged | PullRequestStatus::Approved => "✓",
            PullRequestStatus::Closed => "✗",
            PullRequestStatus::Draft => "◐",
            PullRequestStatus::ChangesRequested => "⚠",
            PullRequestStatus::ReviewRequired => "⏳",
            PullRequestStatus::NoReviews => "●",
        }
    }
}
