#[cfg(test)]
pub mod memory;
pub mod mongodb;

use futures::future::BoxFuture;
use uuid::Uuid;

use crate::dao::models::{
    ChallengeCodeEntity, GameSettingsEntity, InviteCodeEntity, QrCodeEntity, TeamEntity,
};
use crate::dao::storage::StorageResult;

/// Outcome of inserting a team under the unique invite-code constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TeamInsert {
    /// The team was created.
    Created,
    /// Another team already holds the invite code; nothing was written.
    InviteCodeTaken,
}

/// Outcome of the combined point-and-scanned-set award update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanApply {
    /// The award was applied; carries the updated team document.
    Applied(TeamEntity),
    /// The code was already in the team's scanned set; nothing was written.
    AlreadyScanned,
    /// The team document no longer exists.
    TeamMissing,
}

/// Abstraction over the persistence layer for teams, codes, and game settings.
pub trait HuntStore: Send + Sync {
    fn list_teams(&self) -> BoxFuture<'static, StorageResult<Vec<TeamEntity>>>;
    fn find_team(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<TeamEntity>>>;
    /// Insert a team, relying on the store-side unique constraint on the
    /// invite code to reject duplicate bindings race-free.
    fn insert_team(&self, team: TeamEntity) -> BoxFuture<'static, StorageResult<TeamInsert>>;
    /// Atomically add `points` to the team's total and `code` to its scanned
    /// set. Both fields change in one document update, or neither does.
    fn apply_scan_award(
        &self,
        team_id: Uuid,
        code: String,
        points: i64,
    ) -> BoxFuture<'static, StorageResult<ScanApply>>;
    fn delete_team(&self, id: Uuid) -> BoxFuture<'static, StorageResult<bool>>;
    fn find_team_by_invite_code(
        &self,
        code: String,
    ) -> BoxFuture<'static, StorageResult<Option<TeamEntity>>>;

    fn list_invite_codes(&self) -> BoxFuture<'static, StorageResult<Vec<InviteCodeEntity>>>;
    fn find_invite_code(
        &self,
        id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Option<InviteCodeEntity>>>;
    fn insert_invite_code(
        &self,
        entity: InviteCodeEntity,
    ) -> BoxFuture<'static, StorageResult<()>>;
    fn delete_invite_code(&self, id: Uuid) -> BoxFuture<'static, StorageResult<bool>>;

    fn list_qr_codes(&self) -> BoxFuture<'static, StorageResult<Vec<QrCodeEntity>>>;
    fn insert_qr_code(&self, entity: QrCodeEntity) -> BoxFuture<'static, StorageResult<()>>;
    fn delete_qr_code(&self, id: Uuid) -> BoxFuture<'static, StorageResult<bool>>;

    fn list_challenge_codes(&self)
    -> BoxFuture<'static, StorageResult<Vec<ChallengeCodeEntity>>>;
    fn insert_challenge_code(
        &self,
        entity: ChallengeCodeEntity,
    ) -> BoxFuture<'static, StorageResult<()>>;

    /// Read the settings singleton, creating it with defaults when absent.
    fn load_settings(&self) -> BoxFuture<'static, StorageResult<GameSettingsEntity>>;
    fn save_settings(
        &self,
        settings: GameSettingsEntity,
    ) -> BoxFuture<'static, StorageResult<()>>;

    /// Delete every team in one batch command, then restore settings defaults.
    /// The settings document is only touched after the delete succeeded, so a
    /// failed reset never leaves defaults restored while teams remain.
    fn reset_game(&self) -> BoxFuture<'static, StorageResult<u64>>;

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>>;
    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>>;
}
