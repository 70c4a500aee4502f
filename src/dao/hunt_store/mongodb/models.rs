use mongodb::bson::{Binary, Document, doc, spec::BinarySubtype};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::dao::models::{
    ChallengeCodeEntity, GameSettingsEntity, InviteCodeEntity, QrCodeEntity, TeamEntity,
};

/// Document identifier of the settings singleton.
pub const SETTINGS_DOC_ID: &str = "gameStatus";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoTeamDocument {
    #[serde(rename = "_id")]
    id: Uuid,
    name: String,
    #[serde(rename = "inviteCode")]
    invite_code: String,
    points: i64,
    #[serde(rename = "scannedQRCodes", default)]
    scanned_qr_codes: Vec<String>,
    #[serde(rename = "registeredAt")]
    registered_at: String,
}

impl From<TeamEntity> for MongoTeamDocument {
    fn from(value: TeamEntity) -> Self {
        Self {
            id: value.id,
            name: value.name,
            invite_code: value.invite_code,
            points: value.points,
            scanned_qr_codes: value.scanned_qr_codes,
            registered_at: value.registered_at,
        }
    }
}

impl From<MongoTeamDocument> for TeamEntity {
    fn from(value: MongoTeamDocument) -> Self {
        Self {
            id: value.id,
            name: value.name,
            invite_code: value.invite_code,
            points: value.points,
            scanned_qr_codes: value.scanned_qr_codes,
            registered_at: value.registered_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoInviteCodeDocument {
    #[serde(rename = "_id")]
    id: Uuid,
    code: String,
    #[serde(default)]
    used: bool,
    #[serde(rename = "createdAt")]
    created_at: String,
    #[serde(rename = "type")]
    kind: String,
}

impl From<InviteCodeEntity> for MongoInviteCodeDocument {
    fn from(value: InviteCodeEntity) -> Self {
        Self {
            id: value.id,
            code: value.code,
            used: value.used,
            created_at: value.created_at,
            kind: value.kind,
        }
    }
}

impl From<MongoInviteCodeDocument> for InviteCodeEntity {
    fn from(value: MongoInviteCodeDocument) -> Self {
        Self {
            id: value.id,
            code: value.code,
            used: value.used,
            created_at: value.created_at,
            kind: value.kind,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoQrCodeDocument {
    #[serde(rename = "_id")]
    id: Uuid,
    name: String,
    points: i64,
    code: String,
    #[serde(rename = "createdAt")]
    created_at: String,
    #[serde(default)]
    used: bool,
}

impl From<QrCodeEntity> for MongoQrCodeDocument {
    fn from(value: QrCodeEntity) -> Self {
        Self {
            id: value.id,
            name: value.name,
            points: value.points,
            code: value.code,
            created_at: value.created_at,
            used: value.used,
        }
    }
}

impl From<MongoQrCodeDocument> for QrCodeEntity {
    fn from(value: MongoQrCodeDocument) -> Self {
        Self {
            id: value.id,
            name: value.name,
            points: value.points,
            code: value.code,
            created_at: value.created_at,
            used: value.used,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoChallengeCodeDocument {
    #[serde(rename = "_id")]
    id: Uuid,
    code: String,
    points: i64,
    #[serde(rename = "createdAt")]
    created_at: String,
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    used: bool,
}

impl From<ChallengeCodeEntity> for MongoChallengeCodeDocument {
    fn from(value: ChallengeCodeEntity) -> Self {
        Self {
            id: value.id,
            code: value.code,
            points: value.points,
            created_at: value.created_at,
            kind: value.kind,
            used: value.used,
        }
    }
}

impl From<MongoChallengeCodeDocument> for ChallengeCodeEntity {
    fn from(value: MongoChallengeCodeDocument) -> Self {
        Self {
            id: value.id,
            code: value.code,
            points: value.points,
            created_at: value.created_at,
            kind: value.kind,
            used: value.used,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoSettingsDocument {
    #[serde(rename = "_id")]
    id: String,
    #[serde(default)]
    paused: bool,
    #[serde(rename = "showScores", default = "default_show_scores")]
    show_scores: bool,
}

fn default_show_scores() -> bool {
    true
}

impl From<GameSettingsEntity> for MongoSettingsDocument {
    fn from(value: GameSettingsEntity) -> Self {
        Self {
            id: SETTINGS_DOC_ID.to_owned(),
            paused: value.paused,
            show_scores: value.show_scores,
        }
    }
}

impl From<MongoSettingsDocument> for GameSettingsEntity {
    fn from(value: MongoSettingsDocument) -> Self {
        Self {
            paused: value.paused,
            show_scores: value.show_scores,
        }
    }
}

pub fn uuid_as_binary(id: Uuid) -> Binary {
    Binary {
        subtype: BinarySubtype::Uuid,
        bytes: id.into_bytes().to_vec(),
    }
}

pub fn doc_id(id: Uuid) -> Document {
    doc! {"_id": uuid_as_binary(id)}
}
