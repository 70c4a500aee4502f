//! DTOs for the admin management surface.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    dao::models::{ChallengeCodeEntity, InviteCodeEntity, QrCodeEntity},
    dto::validation::validate_not_blank,
    state::rules::RankedTeam,
};

/// Request to register a new invitation code.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateInviteCodeRequest {
    /// The code string; stored upper-cased.
    #[validate(custom(function = validate_not_blank), length(max = 64))]
    pub code: String,
}

/// One invitation code as listed in the admin panel.
///
/// `used` is derived from the teams collection at read time, not from the
/// stored flag, so a game reset frees every code without extra writes.
#[derive(Debug, Serialize, ToSchema)]
pub struct InviteCodeItem {
    /// Document identifier.
    pub id: Uuid,
    /// The code string (upper-cased).
    pub code: String,
    /// Whether a registered team currently holds this code.
    pub used: bool,
    /// Name of the team holding the code, when used.
    #[serde(rename = "usedBy", skip_serializing_if = "Option::is_none")]
    pub used_by: Option<String>,
    /// Creation timestamp (RFC 3339).
    #[serde(rename = "createdAt")]
    pub created_at: String,
}

impl InviteCodeItem {
    /// Combine a stored code with the team that claimed it, if any.
    pub fn project(entity: InviteCodeEntity, used_by: Option<String>) -> Self {
        Self {
            id: entity.id,
            code: entity.code,
            used: used_by.is_some(),
            used_by,
            created_at: entity.created_at,
        }
    }
}

/// Request to create a scannable QR code.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateQrCodeRequest {
    /// Human-readable label shown in the admin list.
    #[validate(custom(function = validate_not_blank), length(max = 120))]
    pub name: String,
    /// Points awarded on scan; negative values are allowed.
    pub points: i64,
}

/// One QR code as listed in the admin panel.
#[derive(Debug, Serialize, ToSchema)]
pub struct QrCodeItem {
    /// Document identifier.
    pub id: Uuid,
    /// Human-readable label.
    pub name: String,
    /// Points awarded on scan.
    pub points: i64,
    /// The generated code string encoded into the QR image.
    pub code: String,
    /// Creation timestamp (RFC 3339).
    #[serde(rename = "createdAt")]
    pub created_at: String,
}

impl From<QrCodeEntity> for QrCodeItem {
    fn from(entity: QrCodeEntity) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
            points: entity.points,
            code: entity.code,
            created_at: entity.created_at,
        }
    }
}

/// Request to generate a random challenge code.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct GenerateChallengeCodeRequest {
    /// Points associated with the generated code; must be positive.
    #[validate(range(min = 1))]
    pub points: i64,
}

/// One challenge code as listed in the admin panel.
#[derive(Debug, Serialize, ToSchema)]
pub struct ChallengeCodeItem {
    /// Document identifier.
    pub id: Uuid,
    /// The generated code string.
    pub code: String,
    /// Points associated with the code.
    pub points: i64,
    /// Creation timestamp (RFC 3339).
    #[serde(rename = "createdAt")]
    pub created_at: String,
}

impl From<ChallengeCodeEntity> for ChallengeCodeItem {
    fn from(entity: ChallengeCodeEntity) -> Self {
        Self {
            id: entity.id,
            code: entity.code,
            points: entity.points,
            created_at: entity.created_at,
        }
    }
}

/// One team row in the admin table; never masked.
#[derive(Debug, Serialize, ToSchema)]
pub struct TeamAdminItem {
    /// 1-based rank after sorting by points.
    pub position: usize,
    /// Document identifier.
    pub id: Uuid,
    /// Team display name.
    pub name: String,
    /// Invitation code the team registered with.
    #[serde(rename = "inviteCode")]
    pub invite_code: String,
    /// Current point total.
    pub points: i64,
    /// Number of codes the team has scanned.
    #[serde(rename = "scannedCount")]
    pub scanned_count: usize,
    /// Codes the team has scanned, in scan order.
    #[serde(rename = "scannedQRCodes")]
    pub scanned_qr_codes: Vec<String>,
    /// Registration timestamp (RFC 3339).
    #[serde(rename = "registeredAt")]
    pub registered_at: String,
}

impl From<RankedTeam> for TeamAdminItem {
    fn from(ranked: RankedTeam) -> Self {
        let scanned_count = ranked.scanned_count();
        Self {
            position: ranked.position,
            id: ranked.team.id,
            name: ranked.team.name,
            invite_code: ranked.team.invite_code,
            points: ranked.team.points,
            scanned_count,
            scanned_qr_codes: ranked.team.scanned_qr_codes,
            registered_at: ranked.team.registered_at,
        }
    }
}

/// Generic acknowledgement returned by admin mutations.
#[derive(Debug, Serialize, ToSchema)]
pub struct ActionResponse {
    /// Human-readable confirmation message.
    pub message: String,
}

impl ActionResponse {
    /// Build an acknowledgement from any displayable message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Response returned after a full game reset.
#[derive(Debug, Serialize, ToSchema)]
pub struct ResetResponse {
    /// Number of teams that were deleted.
    #[serde(rename = "teamsDeleted")]
    pub teams_deleted: u64,
    /// Settings after the reset (unpaused, scores visible).
    pub settings: crate::dto::public::SettingsView,
}
