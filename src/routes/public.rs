use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
};
use axum_valid::Valid;
use uuid::Uuid;

use crate::{
    dto::public::{
        LeaderboardResponse, RegisterTeamRequest, ScanRequest, ScanResponse, SettingsView,
        TeamView,
    },
    error::AppError,
    services::{leaderboard_service, registration_service, scan_service},
    state::SharedState,
};

/// Player-facing routes for registration, scanning, and standings.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/teams/register", post(register_team))
        .route("/teams/{id}", get(get_team))
        .route("/teams/{id}/scan", post(submit_scan))
        .route("/leaderboard", get(leaderboard))
        .route("/leaderboard/top", get(leaderboard_top))
        .route("/settings", get(settings))
}

/// Register a new team with an invitation code.
#[utoipa::path(
    post,
    path = "/teams/register",
    tag = "teams",
    request_body = RegisterTeamRequest,
    responses(
        (status = 201, description = "Team registered", body = TeamView),
        (status = 400, description = "Missing fields or invalid invitation code"),
        (status = 409, description = "Invitation code already used")
    )
)]
pub async fn register_team(
    State(state): State<SharedState>,
    Valid(Json(payload)): Valid<Json<RegisterTeamRequest>>,
) -> Result<(StatusCode, Json<TeamView>), AppError> {
    let team = registration_service::register_team(&state, payload).await?;
    Ok((StatusCode::CREATED, Json(team)))
}

/// Fetch a team's current view for the dashboard.
#[utoipa::path(
    get,
    path = "/teams/{id}",
    tag = "teams",
    params(("id" = String, Path, description = "Team identifier issued at registration")),
    responses(
        (status = 200, description = "Team view", body = TeamView),
        (status = 404, description = "Team not found")
    )
)]
pub async fn get_team(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<TeamView>, AppError> {
    let team = scan_service::get_team(&state, id).await?;
    Ok(Json(team))
}

/// Submit a scanned QR payload for scoring.
#[utoipa::path(
    post,
    path = "/teams/{id}/scan",
    tag = "teams",
    params(("id" = String, Path, description = "Team identifier issued at registration")),
    request_body = ScanRequest,
    responses(
        (status = 200, description = "Scan decision", body = ScanResponse),
        (status = 404, description = "Team not found")
    )
)]
pub async fn submit_scan(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Valid(Json(payload)): Valid<Json<ScanRequest>>,
) -> Result<Json<ScanResponse>, AppError> {
    let decision = scan_service::submit_scan(&state, id, payload).await?;
    Ok(Json(decision))
}

/// Full ranked leaderboard.
#[utoipa::path(
    get,
    path = "/leaderboard",
    tag = "leaderboard",
    responses((status = 200, description = "Ranked standings", body = LeaderboardResponse))
)]
pub async fn leaderboard(
    State(state): State<SharedState>,
) -> Result<Json<LeaderboardResponse>, AppError> {
    Ok(Json(leaderboard_service::leaderboard(&state).await?))
}

/// Top-three podium slice of the leaderboard.
#[utoipa::path(
    get,
    path = "/leaderboard/top",
    tag = "leaderboard",
    responses((status = 200, description = "Podium standings", body = LeaderboardResponse))
)]
pub async fn leaderboard_top(
    State(state): State<SharedState>,
) -> Result<Json<LeaderboardResponse>, AppError> {
    Ok(Json(leaderboard_service::podium(&state).await?))
}

/// Current public game flags.
#[utoipa::path(
    get,
    path = "/settings",
    tag = "leaderboard",
    responses((status = 200, description = "Game flags", body = SettingsView))
)]
pub async fn settings(State(state): State<SharedState>) -> Result<Json<SettingsView>, AppError> {
    Ok(Json(leaderboard_service::settings(&state).await?))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use uuid::Uuid;

    use super::*;
    use crate::{
        config::AppConfig,
        dao::{hunt_store::memory::MemoryHuntStore, models::InviteCodeEntity},
        state::AppState,
    };

    async fn state_with_invite_code(code: &str) -> SharedState {
        let store = MemoryHuntStore::new();
        store.seed_invite_code(InviteCodeEntity {
            id: Uuid::new_v4(),
            code: code.to_owned(),
            used: false,
            created_at: "2025-06-01T09:00:00Z".to_owned(),
            kind: "manual".to_owned(),
        });

        let state = AppState::new(AppConfig::default());
        state.set_hunt_store(Arc::new(store)).await;
        state
    }

    #[tokio::test]
    async fn successful_registration_answers_created() {
        let state = state_with_invite_code("TEAM2025A").await;
        let payload = RegisterTeamRequest {
            invite_code: "team2025a".to_owned(),
            team_name: "Rocketeers".to_owned(),
        };

        let (status, Json(team)) =
            register_team(State(state), axum_valid::Valid(Json(payload)))
                .await
                .expect("registration succeeds");

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(team.name, "Rocketeers");
    }
}
