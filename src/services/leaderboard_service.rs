use crate::{
    dto::public::{LeaderboardEntry, LeaderboardResponse, SettingsView},
    error::ServiceError,
    state::{SharedState, rules},
};

/// Full ranked leaderboard, masked according to the visibility flag.
pub async fn leaderboard(state: &SharedState) -> Result<LeaderboardResponse, ServiceError> {
    build(state, false).await
}

/// Top-three slice of the leaderboard for the podium display.
pub async fn podium(state: &SharedState) -> Result<LeaderboardResponse, ServiceError> {
    build(state, true).await
}

/// Current public game flags.
pub async fn settings(state: &SharedState) -> Result<SettingsView, ServiceError> {
    let store = state.require_hunt_store().await?;
    Ok(store.load_settings().await?.into())
}

async fn build(
    state: &SharedState,
    podium_only: bool,
) -> Result<LeaderboardResponse, ServiceError> {
    let store = state.require_hunt_store().await?;

    let settings = store.load_settings().await?;
    let ranked = rules::rank(store.list_teams().await?);
    let slice = if podium_only {
        rules::top_three(&ranked)
    } else {
        &ranked[..]
    };

    Ok(LeaderboardResponse {
        show_scores: settings.show_scores,
        teams: slice
            .iter()
            .map(|entry| LeaderboardEntry::project(entry, settings.show_scores))
            .collect(),
    })
}
