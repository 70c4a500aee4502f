//! DTOs exchanged with the player-facing frontend.
//!
//! Wire field names follow the original camelCase collection layout so the
//! frontend can consume responses without a translation layer.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    dao::models::{GameSettingsEntity, TeamEntity},
    state::rules::RankedTeam,
};

/// Registration request submitted from the join screen.
///
/// Emptiness after trimming is checked by the registration rules so that
/// blank submissions surface as a missing-fields rejection rather than a
/// generic validation error; the bounds here only cap pathological input.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterTeamRequest {
    /// Invitation code handed out by the organizers.
    #[serde(rename = "inviteCode")]
    #[validate(length(max = 64))]
    pub invite_code: String,
    /// Display name for the new team.
    #[serde(rename = "teamName")]
    #[validate(length(max = 120))]
    pub team_name: String,
}

/// Scan submission from the in-browser QR scanner.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ScanRequest {
    /// The decoded QR payload.
    #[validate(length(min = 1, max = 256))]
    pub code: String,
}

/// Team view returned to the team itself.
///
/// `points` is `None` when the score-visibility flag is off; the frontend
/// renders a placeholder in that case.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TeamView {
    /// Stable team identifier the client stores locally.
    pub id: Uuid,
    /// Team display name.
    pub name: String,
    /// Current point total, absent while scores are hidden.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub points: Option<i64>,
    /// Codes the team has scanned so far, in scan order.
    #[serde(rename = "scannedQRCodes")]
    pub scanned_qr_codes: Vec<String>,
    /// Registration timestamp (RFC 3339).
    #[serde(rename = "registeredAt")]
    pub registered_at: String,
}

impl TeamView {
    /// Project a stored team into the public view, masking the point total
    /// when scores are hidden.
    pub fn project(team: TeamEntity, show_scores: bool) -> Self {
        Self {
            id: team.id,
            name: team.name,
            points: show_scores.then_some(team.points),
            scanned_qr_codes: team.scanned_qr_codes,
            registered_at: team.registered_at,
        }
    }
}

/// Outcome category of a scan submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ScanStatus {
    /// The scan was accepted and points were awarded.
    Accepted,
    /// The game is paused; nothing was evaluated.
    GamePaused,
    /// The submitted string matches no known QR code.
    InvalidCode,
    /// The team already scanned this code.
    DuplicateScan,
}

/// Response to a scan submission.
///
/// Rejections are part of normal gameplay, so every decision comes back as
/// a 200 with the outcome in the body rather than as an HTTP error.
#[derive(Debug, Serialize, ToSchema)]
pub struct ScanResponse {
    /// Outcome of the scan.
    pub status: ScanStatus,
    /// Human-readable message for the scanner overlay.
    pub message: String,
    /// Points awarded, only present on accepted scans.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub awarded: Option<i64>,
    /// Display name of the matched QR code, only on accepted scans.
    #[serde(rename = "codeName", skip_serializing_if = "Option::is_none")]
    pub code_name: Option<String>,
    /// Refreshed team view after the award, only on accepted scans.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team: Option<TeamView>,
}

impl ScanResponse {
    /// Build a rejection response with no award attached.
    pub fn rejected(status: ScanStatus, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            awarded: None,
            code_name: None,
            team: None,
        }
    }
}

/// One row of the public leaderboard.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LeaderboardEntry {
    /// 1-based rank after sorting by points.
    pub position: usize,
    /// Team display name.
    pub name: String,
    /// Point total, absent while scores are hidden.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub points: Option<i64>,
    /// Number of codes the team has scanned.
    #[serde(rename = "scannedCount")]
    pub scanned_count: usize,
}

impl LeaderboardEntry {
    /// Project a ranked team into a leaderboard row.
    pub fn project(ranked: &RankedTeam, show_scores: bool) -> Self {
        Self {
            position: ranked.position,
            name: ranked.team.name.clone(),
            points: show_scores.then_some(ranked.team.points),
            scanned_count: ranked.scanned_count(),
        }
    }
}

/// Full leaderboard payload.
#[derive(Debug, Serialize, ToSchema)]
pub struct LeaderboardResponse {
    /// Whether point totals are currently visible.
    #[serde(rename = "showScores")]
    pub show_scores: bool,
    /// Ranked teams, highest points first.
    pub teams: Vec<LeaderboardEntry>,
}

/// Public view of the game flags.
#[derive(Debug, Clone, Copy, Serialize, ToSchema)]
pub struct SettingsView {
    /// Whether scanning is currently suspended.
    pub paused: bool,
    /// Whether point totals are visible to players.
    #[serde(rename = "showScores")]
    pub show_scores: bool,
}

impl From<GameSettingsEntity> for SettingsView {
    fn from(settings: GameSettingsEntity) -> Self {
        Self {
            paused: settings.paused,
            show_scores: settings.show_scores,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::rules;
    use uuid::Uuid;

    fn team(points: i64) -> TeamEntity {
        TeamEntity {
            id: Uuid::new_v4(),
            name: "Alpha".to_owned(),
            invite_code: "TEAM2025A".to_owned(),
            points,
            scanned_qr_codes: vec!["QR_1".to_owned()],
            registered_at: "2025-06-01T12:00:00Z".to_owned(),
        }
    }

    #[test]
    fn test_team_view_masks_points_when_scores_hidden() {
        let visible = TeamView::project(team(40), true);
        assert_eq!(visible.points, Some(40));

        let masked = TeamView::project(team(40), false);
        assert_eq!(masked.points, None);
        // The scanned list stays visible either way.
        assert_eq!(masked.scanned_qr_codes, vec!["QR_1".to_owned()]);
    }

    #[test]
    fn test_leaderboard_entry_masking() {
        let ranked = rules::rank(vec![team(40)]);

        let entry = LeaderboardEntry::project(&ranked[0], false);
        assert_eq!(entry.position, 1);
        assert_eq!(entry.points, None);
        assert_eq!(entry.scanned_count, 1);

        let entry = LeaderboardEntry::project(&ranked[0], true);
        assert_eq!(entry.points, Some(40));
    }
}
