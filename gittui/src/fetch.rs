//! Background data fetching.
//!
//! Each refresh runs on the tokio runtime and reports back over an unbounded
//! channel that the UI loop drains between frames. Every message carries the
//! generation of the refresh that produced it so results from a superseded
//! refresh can be dropped.

use std::future::Future;
use std::sync::Arc;

use gittui_core::{ActivityEvent, Contribution, GitHubClient, Profile, PullRequest, Repository};
use tokio::runtime::Handle;
use tokio::sync::mpsc::UnboundedSender;

/// Result of one background fetch.
#[derive(Debug)]
pub struct FetchMessage {
    pub generation: u64,
    pub payload: FetchPayload,
}

#[derive(Debug)]
pub enum FetchPayload {
    /// Whose profile is being shown, resolved against the token's owner
    Identity { login: String, is_own_profile: bool },
    Profile(gittui_core::Result<Profile>),
    Contributions(gittui_core::Result<Vec<Contribution>>),
    Repositories(gittui_core::Result<Vec<Repository>>),
    Events(gittui_core::Result<Vec<ActivityEvent>>),
    PullRequests(gittui_core::Result<Vec<PullRequest>>),
    /// The refresh could not start at all
    Failed(String),
}

/// Spawns refreshes onto a runtime owned by `main`.
pub struct Fetcher {
    client: Arc<GitHubClient>,
    handle: Handle,
    tx: UnboundedSender<FetchMessage>,
    event_limit: u32,
}

impl Fetcher {
    pub fn new(
        client: GitHubClient,
        handle: Handle,
        tx: UnboundedSender<FetchMessage>,
        event_limit: u32,
    ) -> Self {
        Self {
            client: Arc::new(client),
            handle,
            tx,
            event_limit,
        }
    }

    /// Start loading every dataset for `requested_username`, or for the
    /// token's owner when none was given.
    ///
    /// Private data is only requested for one's own profile, and not at all
    /// when `public_only` is set.
    pub fn spawn_refresh(
        &self,
        generation: u64,
        requested_username: Option<String>,
        public_only: bool,
    ) {
        let client = Arc::clone(&self.client);
        let handle = self.handle.clone();
        let tx = self.tx.clone();
        let event_limit = self.event_limit;

        self.handle.spawn(async move {
            let viewer = match client.fetch_authenticated_user().await {
                Ok(profile) => profile.login,
                Err(e) => {
                    tracing::error!(error = %e, "Failed to resolve authenticated user");
                    let _ = tx.send(FetchMessage {
                        generation,
                        payload: FetchPayload::Failed(e.to_string()),
                    });
                    return;
                }
            };

            let login = requested_username.unwrap_or_else(|| viewer.clone());
            let is_own_profile = login.eq_ignore_ascii_case(&viewer);
            let include_private = is_own_profile && !public_only;

            tracing::info!(
                login = %login,
                is_own_profile,
                include_private,
                generation,
                "Refreshing dashboard"
            );

            let _ = tx.send(FetchMessage {
                generation,
                payload: FetchPayload::Identity {
                    login: login.clone(),
                    is_own_profile,
                },
            });

            let profile = {
                let (client, login) = (Arc::clone(&client), login.clone());
                async move { FetchPayload::Profile(client.fetch_profile(&login, include_private).await) }
            };
            let contributions = {
                let (client, login) = (Arc::clone(&client), login.clone());
                async move { FetchPayload::Contributions(client.fetch_contributions(&login).await) }
            };
            let repositories = {
                let (client, login) = (Arc::clone(&client), login.clone());
                async move {
                    FetchPayload::Repositories(client.fetch_repositories(&login, include_private).await)
                }
            };
            let pull_requests = {
                let (client, login) = (Arc::clone(&client), login.clone());
                async move {
                    FetchPayload::PullRequests(client.fetch_pull_requests(&login, include_private).await)
                }
            };
            let events = async move {
                FetchPayload::Events(client.fetch_events(&login, include_private, event_limit).await)
            };

            spawn_fetch(&handle, &tx, generation, profile);
            spawn_fetch(&handle, &tx, generation, contributions);
            spawn_fetch(&handle, &tx, generation, repositories);
            spawn_fetch(&handle, &tx, generation, pull_requests);
            spawn_fetch(&handle, &tx, generation, events);
        });
    }
}

/// Run one fetch as its own task and forward the result.
fn spawn_fetch<F>(handle: &Handle, tx: &UnboundedSender<FetchMessage>, generation: u64, fetch: F)
where
    F: Future<Output = FetchPayload> + Send + 'static,
{
    let tx = tx.clone();
    handle.spawn(async move {
        let payload = fetch.await;
        // The receiver is gone once the UI has exited
        let _ = tx.send(FetchMessage {
            generation,
            payload,
        });
    });
}
