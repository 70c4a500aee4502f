use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::dto::public::{LeaderboardEntry, SettingsView, TeamView};

#[derive(Clone, Debug)]
/// Dispatched payload carried across SSE channels.
pub struct ServerEvent {
    pub event: Option<String>,
    pub data: String,
}

impl ServerEvent {
    /// Convenience wrapper that serialises `payload` into the SSE data field.
    pub fn json<E, T>(event: E, payload: &T) -> serde_json::Result<Self>
    where
        E: Into<Option<String>>,
        T: Serialize,
    {
        Ok(Self {
            event: event.into(),
            data: serde_json::to_string(payload)?,
        })
    }
}

#[derive(Debug, Serialize, ToSchema)]
/// Initial metadata sent to an SSE client when it connects.
pub struct Handshake {
    /// Identifier of the SSE stream (`public` or `admin`).
    pub stream: String,
    /// Human-readable message confirming the subscription.
    pub message: String,
    /// Whether the backend is running without a storage backend connection.
    pub degraded: bool,
}

#[derive(Debug, Serialize, ToSchema)]
/// Broadcast when the backend enters or leaves degraded mode.
pub struct SystemStatus {
    pub degraded: bool,
}

#[derive(Debug, Serialize, ToSchema)]
/// Broadcast when a new team registers.
pub struct TeamRegisteredEvent {
    pub team: TeamView,
}

#[derive(Debug, Serialize, ToSchema)]
/// Broadcast when a team scores from an accepted scan.
pub struct TeamScoredEvent {
    pub team: TeamView,
    /// The scanned code string.
    pub code: String,
    /// Points the scan awarded; may be negative.
    pub awarded: i64,
}

#[derive(Debug, Serialize, ToSchema)]
/// Broadcast when an admin removes a team.
pub struct TeamDeletedEvent {
    pub team_id: Uuid,
}

#[derive(Debug, Serialize, ToSchema)]
/// Broadcast whenever the ranked standings may have changed.
pub struct LeaderboardChangedEvent {
    pub teams: Vec<LeaderboardEntry>,
}

#[derive(Debug, Serialize, ToSchema)]
/// Broadcast when an admin flips the pause or score-visibility flags.
#[serde(transparent)]
pub struct SettingsChangedEvent(pub SettingsView);

#[derive(Debug, Serialize, ToSchema)]
/// Broadcast when an admin resets the game.
pub struct GameResetEvent {
    /// Number of teams that were deleted.
    pub teams_deleted: u64,
    /// Settings after the reset.
    pub settings: SettingsView,
}

#[derive(Debug, Serialize, ToSchema)]
/// Admin-stream event emitted when an invitation code is created.
pub struct InviteCodeCreatedEvent {
    pub id: Uuid,
    pub code: String,
}

#[derive(Debug, Serialize, ToSchema)]
/// Admin-stream event emitted when an invitation code is deleted.
pub struct InviteCodeDeletedEvent {
    pub id: Uuid,
}

#[derive(Debug, Serialize, ToSchema)]
/// Admin-stream event emitted when a QR code is created.
pub struct QrCodeCreatedEvent {
    pub id: Uuid,
    pub name: String,
    pub code: String,
    pub points: i64,
}

#[derive(Debug, Serialize, ToSchema)]
/// Admin-stream event emitted when a QR code is deleted.
pub struct QrCodeDeletedEvent {
    pub id: Uuid,
}

#[derive(Debug, Serialize, ToSchema)]
/// Admin-stream event emitted when a challenge code is generated.
pub struct ChallengeCodeCreatedEvent {
    pub id: Uuid,
    pub code: String,
    pub points: i64,
}
