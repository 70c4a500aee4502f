use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Representation of a registered team stored in persistence and shared across layers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TeamEntity {
    /// Stable identifier for the team, assigned on registration.
    pub id: Uuid,
    /// Display name chosen for the team.
    pub name: String,
    /// Invitation code the team registered with (upper-cased).
    pub invite_code: String,
    /// Current point total for the team.
    pub points: i64,
    /// Codes the team has already scanned, in scan order.
    pub scanned_qr_codes: Vec<String>,
    /// RFC 3339 timestamp recorded when the team registered.
    pub registered_at: String,
}

/// Invitation code granting the right to register one team.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct InviteCodeEntity {
    /// Stable identifier for the code document.
    pub id: Uuid,
    /// The code string itself (upper-cased).
    pub code: String,
    /// Informational usage flag; actual usage is derived from the teams collection.
    pub used: bool,
    /// RFC 3339 creation timestamp.
    pub created_at: String,
    /// Origin of the code (`manual` for admin-entered codes).
    pub kind: String,
}

/// Scannable QR code record worth a number of points.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct QrCodeEntity {
    /// Stable identifier for the code document.
    pub id: Uuid,
    /// Human-readable label (e.g. "Main Entrance").
    pub name: String,
    /// Points awarded when a team scans this code. May be negative.
    pub points: i64,
    /// Globally unique generated code string encoded into the QR image.
    pub code: String,
    /// RFC 3339 creation timestamp.
    pub created_at: String,
    /// Informational flag, never consulted by the scan path.
    pub used: bool,
}

/// Randomly generated code written by the secondary generator.
///
/// These live in their own collection and are never read back by the scan
/// path; they are kept as a separate, inert store on purpose.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChallengeCodeEntity {
    /// Stable identifier for the code document.
    pub id: Uuid,
    /// The generated code string.
    pub code: String,
    /// Points associated with the code.
    pub points: i64,
    /// RFC 3339 creation timestamp.
    pub created_at: String,
    /// Origin of the code (`random`).
    pub kind: String,
    /// Informational usage flag.
    pub used: bool,
}

/// Singleton document holding the global game flags.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct GameSettingsEntity {
    /// When true, every scan is rejected before any other check.
    pub paused: bool,
    /// Presentation hint controlling whether point values are shown.
    pub show_scores: bool,
}

impl Default for GameSettingsEntity {
    fn default() -> Self {
        Self {
            paused: false,
            show_scores: true,
        }
    }
}
