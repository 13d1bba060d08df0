//! GitHub API access
//!
//! Profile, repository and event listings come from the REST API; the
//! contribution calendar comes from GraphQL. All requests share one
//! authenticated [`GitHubClient`].
//!
//! ## Usage
//!
//! A token is read from `github.token` in `~/.config/gittui/config.toml`,
//! or from `GITHUB_TOKEN` / `GH_TOKEN`:
//!
//! ```toml
//! [github]
//! username = "octocat"
//! timeout_secs = 10
//! ```

mod client;
pub mod parse;

pub use client::GitHubClient;
