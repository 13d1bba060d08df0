//! # gittui-core
//!
//! Core library for gittui - a terminal dashboard for GitHub profiles.
//!
//! This library provides:
//! - Domain types for contributions, events, profiles and repositories
//! - The contribution grid and intensity levels behind the heatmap
//! - Streak, push-rate and peak-hour analytics
//! - Color themes
//! - A GitHub REST/GraphQL client
//! - Configuration management and logging infrastructure
//!
//! ## Example
//!
//! ```rust,no_run
//! use gittui_core::analytics::{ContributionStats, StreakStats};
//! use gittui_core::{Config, GitHubClient};
//!
//! # async fn run() -> gittui_core::Result<()> {
//! let config = Config::load()?;
//! let client = GitHubClient::new(&config.github)?;
//!
//! let contributions = client.fetch_contributions("octocat").await?;
//! println!("{}", ContributionStats::compute(&contributions));
//! println!("longest streak: {}", StreakStats::compute(&contributions).longest);
//! # Ok(())
//! # }
//! ```

// Re-export commonly used items at the crate root
pub use config::Config;
pub use error::{Error, Result};
pub use github::GitHubClient;
pub use theme::{Rgb, Theme, ThemeCycle};
pub use types::*;

// Public modules
pub mod analytics;
pub mod config;
pub mod contrib;
pub mod error;
pub mod format;
pub mod github;
pub mod logging;
pub mod theme;
pub mod types;
