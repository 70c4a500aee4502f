use serde::Serialize;
use tracing::warn;
use uuid::Uuid;

use crate::{
    dto::{
        public::{LeaderboardEntry, SettingsView, TeamView},
        sse::{
            ChallengeCodeCreatedEvent, GameResetEvent, InviteCodeCreatedEvent,
            InviteCodeDeletedEvent, LeaderboardChangedEvent, QrCodeCreatedEvent,
            QrCodeDeletedEvent, ServerEvent, SettingsChangedEvent, SystemStatus,
            TeamDeletedEvent, TeamRegisteredEvent, TeamScoredEvent,
        },
    },
    state::SharedState,
};

const EVENT_TEAM_REGISTERED: &str = "team.registered";
const EVENT_TEAM_SCORED: &str = "team.scored";
const EVENT_TEAM_DELETED: &str = "team.deleted";
const EVENT_LEADERBOARD_CHANGED: &str = "leaderboard.changed";
const EVENT_SETTINGS_CHANGED: &str = "settings.changed";
const EVENT_GAME_RESET: &str = "game.reset";
const EVENT_INVITE_CODE_CREATED: &str = "invite_code.created";
const EVENT_INVITE_CODE_DELETED: &str = "invite_code.deleted";
const EVENT_QR_CODE_CREATED: &str = "qr_code.created";
const EVENT_QR_CODE_DELETED: &str = "qr_code.deleted";
const EVENT_CHALLENGE_CODE_CREATED: &str = "challenge_code.created";
const EVENT_SYSTEM_STATUS: &str = "system.status";

/// Broadcast that a new team has joined the hunt.
pub fn broadcast_team_registered(state: &SharedState, team: TeamView) {
    let payload = TeamRegisteredEvent { team };
    send_public_event(state, EVENT_TEAM_REGISTERED, &payload);
    send_admin_event(state, EVENT_TEAM_REGISTERED, &payload);
}

/// Broadcast an accepted scan award.
pub fn broadcast_team_scored(state: &SharedState, team: TeamView, code: &str, awarded: i64) {
    let payload = TeamScoredEvent {
        team,
        code: code.to_owned(),
        awarded,
    };
    send_public_event(state, EVENT_TEAM_SCORED, &payload);
    send_admin_event(state, EVENT_TEAM_SCORED, &payload);
}

/// Broadcast that an admin removed a team.
pub fn broadcast_team_deleted(state: &SharedState, team_id: Uuid) {
    let payload = TeamDeletedEvent { team_id };
    send_public_event(state, EVENT_TEAM_DELETED, &payload);
    send_admin_event(state, EVENT_TEAM_DELETED, &payload);
}

/// Broadcast refreshed standings whenever the ranking may have changed.
pub fn broadcast_leaderboard_changed(state: &SharedState, teams: Vec<LeaderboardEntry>) {
    let payload = LeaderboardChangedEvent { teams };
    send_public_event(state, EVENT_LEADERBOARD_CHANGED, &payload);
    send_admin_event(state, EVENT_LEADERBOARD_CHANGED, &payload);
}

/// Broadcast a change to the pause or score-visibility flags.
pub fn broadcast_settings_changed(state: &SharedState, settings: SettingsView) {
    let payload = SettingsChangedEvent(settings);
    send_public_event(state, EVENT_SETTINGS_CHANGED, &payload);
    send_admin_event(state, EVENT_SETTINGS_CHANGED, &payload);
}

/// Broadcast that the game has been reset.
pub fn broadcast_game_reset(state: &SharedState, teams_deleted: u64, settings: SettingsView) {
    let payload = GameResetEvent {
        teams_deleted,
        settings,
    };
    send_public_event(state, EVENT_GAME_RESET, &payload);
    send_admin_event(state, EVENT_GAME_RESET, &payload);
}

/// Notify admins that an invitation code has been created.
pub fn broadcast_invite_code_created(state: &SharedState, id: Uuid, code: &str) {
    let payload = InviteCodeCreatedEvent {
        id,
        code: code.to_owned(),
    };
    send_admin_event(state, EVENT_INVITE_CODE_CREATED, &payload);
}

/// Notify admins that an invitation code has been deleted.
pub fn broadcast_invite_code_deleted(state: &SharedState, id: Uuid) {
    let payload = InviteCodeDeletedEvent { id };
    send_admin_event(state, EVENT_INVITE_CODE_DELETED, &payload);
}

/// Notify admins that a QR code has been created.
pub fn broadcast_qr_code_created(state: &SharedState, id: Uuid, name: &str, code: &str, points: i64) {
    let payload = QrCodeCreatedEvent {
        id,
        name: name.to_owned(),
        code: code.to_owned(),
        points,
    };
    send_admin_event(state, EVENT_QR_CODE_CREATED, &payload);
}

/// Notify admins that a QR code has been deleted.
pub fn broadcast_qr_code_deleted(state: &SharedState, id: Uuid) {
    let payload = QrCodeDeletedEvent { id };
    send_admin_event(state, EVENT_QR_CODE_DELETED, &payload);
}

/// Notify admins that a challenge code has been generated.
pub fn broadcast_challenge_code_created(state: &SharedState, id: Uuid, code: &str, points: i64) {
    let payload = ChallengeCodeCreatedEvent {
        id,
        code: code.to_owned(),
        points,
    };
    send_admin_event(state, EVENT_CHALLENGE_CODE_CREATED, &payload);
}

/// Broadcast a degraded-mode transition to every connected client.
pub fn broadcast_system_status(state: &SharedState, degraded: bool) {
    let payload = SystemStatus { degraded };
    send_public_event(state, EVENT_SYSTEM_STATUS, &payload);
    send_admin_event(state, EVENT_SYSTEM_STATUS, &payload);
}

fn send_public_event(state: &SharedState, event: &str, payload: &impl Serialize) {
    match ServerEvent::json(Some(event.to_string()), payload) {
        Ok(event) => state.public_sse().broadcast(event),
        Err(err) => warn!(event, error = %err, "failed to serialize public SSE payload"),
    }
}

fn send_admin_event(state: &SharedState, event: &str, payload: &impl Serialize) {
    match ServerEvent::json(Some(event.to_string()), payload) {
        Ok(event) => state.admin_sse().broadcast(event),
        Err(err) => warn!(event, error = %err, "failed to serialize admin SSE payload"),
    }
}
