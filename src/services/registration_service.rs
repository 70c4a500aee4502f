use tracing::info;
use uuid::Uuid;

use crate::{
    dao::{
        hunt_store::TeamInsert,
        models::TeamEntity,
    },
    dto::public::{LeaderboardEntry, RegisterTeamRequest, TeamView},
    error::ServiceError,
    services::{clock, sse_events},
    state::{SharedState, rules},
};

/// Register a new team against a currently valid, unclaimed invitation code.
///
/// The used-code set is read fresh right before the insert, and the store's
/// unique index on the invite code settles any race two concurrent
/// registrations could still produce.
pub async fn register_team(
    state: &SharedState,
    request: RegisterTeamRequest,
) -> Result<TeamView, ServiceError> {
    let store = state.require_hunt_store().await?;

    let valid_codes: Vec<String> = store
        .list_invite_codes()
        .await?
        .into_iter()
        .map(|entity| entity.code)
        .collect();
    let used_codes: Vec<String> = store
        .list_teams()
        .await?
        .into_iter()
        .map(|team| team.invite_code)
        .collect();

    let decision = rules::evaluate_registration(
        &request.invite_code,
        &request.team_name,
        &valid_codes,
        &used_codes,
    );

    let (name, invite_code) = match decision {
        rules::RegistrationDecision::Accepted { name, invite_code } => (name, invite_code),
        rules::RegistrationDecision::MissingFields => {
            return Err(ServiceError::InvalidInput(
                "team name and invitation code are required".into(),
            ));
        }
        rules::RegistrationDecision::InvalidCode => {
            return Err(ServiceError::InvalidInput(
                "invalid invitation code".into(),
            ));
        }
        rules::RegistrationDecision::CodeAlreadyUsed => {
            return Err(ServiceError::Conflict(
                "this invitation code has already been used".into(),
            ));
        }
    };

    let team = TeamEntity {
        id: Uuid::new_v4(),
        name,
        invite_code,
        points: 0,
        scanned_qr_codes: Vec::new(),
        registered_at: clock::now_rfc3339(),
    };

    match store.insert_team(team.clone()).await? {
        TeamInsert::Created => {}
        TeamInsert::InviteCodeTaken => {
            // Lost the race against a concurrent registration.
            return Err(ServiceError::Conflict(
                "this invitation code has already been used".into(),
            ));
        }
    }

    info!(team = %team.name, "team registered");

    let settings = store.load_settings().await?;
    let view = TeamView::project(team, settings.show_scores);
    sse_events::broadcast_team_registered(state, view.clone());

    let ranked = rules::rank(store.list_teams().await?);
    let entries = ranked
        .iter()
        .map(|entry| LeaderboardEntry::project(entry, settings.show_scores))
        .collect();
    sse_events::broadcast_leaderboard_changed(state, entries);

    Ok(view)
}
