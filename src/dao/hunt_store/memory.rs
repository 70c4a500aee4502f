//! In-memory [`HuntStore`] used by unit tests that need a live store
//! without a database.

use std::sync::{Arc, Mutex};

use futures::future::BoxFuture;
use uuid::Uuid;

use super::{HuntStore, ScanApply, TeamInsert};
use crate::dao::{
    models::{
        ChallengeCodeEntity, GameSettingsEntity, InviteCodeEntity, QrCodeEntity, TeamEntity,
    },
    storage::StorageResult,
};

/// Mutex-guarded store keeping everything in plain vectors.
#[derive(Clone, Default)]
pub struct MemoryHuntStore {
    inner: Arc<Mutex<Inner>>,
}

#[derive(Default)]
struct Inner {
    teams: Vec<TeamEntity>,
    invite_codes: Vec<InviteCodeEntity>,
    qr_codes: Vec<QrCodeEntity>,
    challenge_codes: Vec<ChallengeCodeEntity>,
    settings: Option<GameSettingsEntity>,
}

impl MemoryHuntStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an invitation code directly, bypassing the trait.
    pub fn seed_invite_code(&self, entity: InviteCodeEntity) {
        self.inner.lock().unwrap().invite_codes.push(entity);
    }

    /// Seed a QR code directly, bypassing the trait.
    pub fn seed_qr_code(&self, entity: QrCodeEntity) {
        self.inner.lock().unwrap().qr_codes.push(entity);
    }

    /// Seed a team directly, bypassing the unique-code check.
    pub fn seed_team(&self, team: TeamEntity) {
        self.inner.lock().unwrap().teams.push(team);
    }
}

impl HuntStore for MemoryHuntStore {
    fn list_teams(&self) -> BoxFuture<'static, StorageResult<Vec<TeamEntity>>> {
        let teams = self.inner.lock().unwrap().teams.clone();
        Box::pin(async move { Ok(teams) })
    }

    fn find_team(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<TeamEntity>>> {
        let found = self
            .inner
            .lock()
            .unwrap()
            .teams
            .iter()
            .find(|team| team.id == id)
            .cloned();
        Box::pin(async move { Ok(found) })
    }

    fn insert_team(&self, team: TeamEntity) -> BoxFuture<'static, StorageResult<TeamInsert>> {
        let mut inner = self.inner.lock().unwrap();
        let outcome = if inner
            .teams
            .iter()
            .any(|existing| existing.invite_code == team.invite_code)
        {
            TeamInsert::InviteCodeTaken
        } else {
            inner.teams.push(team);
            TeamInsert::Created
        };
        Box::pin(async move { Ok(outcome) })
    }

    fn apply_scan_award(
        &self,
        team_id: Uuid,
        code: String,
        points: i64,
    ) -> BoxFuture<'static, StorageResult<ScanApply>> {
        let mut inner = self.inner.lock().unwrap();
        let outcome = match inner.teams.iter_mut().find(|team| team.id == team_id) {
            Some(team) if team.scanned_qr_codes.contains(&code) => ScanApply::AlreadyScanned,
            Some(team) => {
                team.points += points;
                team.scanned_qr_codes.push(code);
                ScanApply::Applied(team.clone())
            }
            None => ScanApply::TeamMissing,
        };
        Box::pin(async move { Ok(outcome) })
    }

    fn delete_team(&self, id: Uuid) -> BoxFuture<'static, StorageResult<bool>> {
        let mut inner = self.inner.lock().unwrap();
        let before = inner.teams.len();
        inner.teams.retain(|team| team.id != id);
        let deleted = inner.teams.len() < before;
        Box::pin(async move { Ok(deleted) })
    }

    fn find_team_by_invite_code(
        &self,
        code: String,
    ) -> BoxFuture<'static, StorageResult<Option<TeamEntity>>> {
        let found = self
            .inner
            .lock()
            .unwrap()
            .teams
            .iter()
            .find(|team| team.invite_code == code)
            .cloned();
        Box::pin(async move { Ok(found) })
    }

    fn list_invite_codes(&self) -> BoxFuture<'static, StorageResult<Vec<InviteCodeEntity>>> {
        let codes = self.inner.lock().unwrap().invite_codes.clone();
        Box::pin(async move { Ok(codes) })
    }

    fn find_invite_code(
        &self,
        id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Option<InviteCodeEntity>>> {
        let found = self
            .inner
            .lock()
            .unwrap()
            .invite_codes
            .iter()
            .find(|entity| entity.id == id)
            .cloned();
        Box::pin(async move { Ok(found) })
    }

    fn insert_invite_code(
        &self,
        entity: InviteCodeEntity,
    ) -> BoxFuture<'static, StorageResult<()>> {
        self.inner.lock().unwrap().invite_codes.push(entity);
        Box::pin(async move { Ok(()) })
    }

    fn delete_invite_code(&self, id: Uuid) -> BoxFuture<'static, StorageResult<bool>> {
        let mut inner = self.inner.lock().unwrap();
        let before = inner.invite_codes.len();
        inner.invite_codes.retain(|entity| entity.id != id);
        let deleted = inner.invite_codes.len() < before;
        Box::pin(async move { Ok(deleted) })
    }

    fn list_qr_codes(&self) -> BoxFuture<'static, StorageResult<Vec<QrCodeEntity>>> {
        let codes = self.inner.lock().unwrap().qr_codes.clone();
        Box::pin(async move { Ok(codes) })
    }

    fn insert_qr_code(&self, entity: QrCodeEntity) -> BoxFuture<'static, StorageResult<()>> {
        self.inner.lock().unwrap().qr_codes.push(entity);
        Box::pin(async move { Ok(()) })
    }

    fn delete_qr_code(&self, id: Uuid) -> BoxFuture<'static, StorageResult<bool>> {
        let mut inner = self.inner.lock().unwrap();
        let before = inner.qr_codes.len();
        inner.qr_codes.retain(|entity| entity.id != id);
        let deleted = inner.qr_codes.len() < before;
        Box::pin(async move { Ok(deleted) })
    }

    fn list_challenge_codes(
        &self,
    ) -> BoxFuture<'static, StorageResult<Vec<ChallengeCodeEntity>>> {
        let codes = self.inner.lock().unwrap().challenge_codes.clone();
        Box::pin(async move { Ok(codes) })
    }

    fn insert_challenge_code(
        &self,
        entity: ChallengeCodeEntity,
    ) -> BoxFuture<'static, StorageResult<()>> {
        self.inner.lock().unwrap().challenge_codes.push(entity);
        Box::pin(async move { Ok(()) })
    }

    fn load_settings(&self) -> BoxFuture<'static, StorageResult<GameSettingsEntity>> {
        let mut inner = self.inner.lock().unwrap();
        let settings = *inner.settings.get_or_insert_with(GameSettingsEntity::default);
        Box::pin(async move { Ok(settings) })
    }

    fn save_settings(
        &self,
        settings: GameSettingsEntity,
    ) -> BoxFuture<'static, StorageResult<()>> {
        self.inner.lock().unwrap().settings = Some(settings);
        Box::pin(async move { Ok(()) })
    }

    fn reset_game(&self) -> BoxFuture<'static, StorageResult<u64>> {
        let mut inner = self.inner.lock().unwrap();
        let deleted = inner.teams.len() as u64;
        inner.teams.clear();
        inner.settings = Some(GameSettingsEntity::default());
        Box::pin(async move { Ok(deleted) })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        Box::pin(async move { Ok(()) })
    }

    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>> {
        Box::pin(async move { Ok(()) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn invite_code(code: &str) -> InviteCodeEntity {
        InviteCodeEntity {
            id: Uuid::new_v4(),
            code: code.to_owned(),
            used: false,
            created_at: "2025-06-01T09:00:00Z".to_owned(),
            kind: "manual".to_owned(),
        }
    }

    fn qr_code(code: &str, points: i64) -> QrCodeEntity {
        QrCodeEntity {
            id: Uuid::new_v4(),
            name: format!("station {code}"),
            points,
            code: code.to_owned(),
            created_at: "2025-06-01T09:00:00Z".to_owned(),
            used: false,
        }
    }

    fn team(name: &str, invite: &str) -> TeamEntity {
        TeamEntity {
            id: Uuid::new_v4(),
            name: name.to_owned(),
            invite_code: invite.to_owned(),
            points: 25,
            scanned_qr_codes: vec!["QR_1".to_owned()],
            registered_at: "2025-06-01T12:00:00Z".to_owned(),
        }
    }

    #[tokio::test]
    async fn reset_removes_teams_but_keeps_codes_and_restores_defaults() {
        let store = MemoryHuntStore::new();
        store.seed_invite_code(invite_code("TEAM2025A"));
        store.seed_invite_code(invite_code("TEAM2025B"));
        store.seed_qr_code(qr_code("QR_1", 50));
        store.seed_team(team("Alpha", "TEAM2025A"));
        store.seed_team(team("Bravo", "TEAM2025B"));
        store
            .save_settings(GameSettingsEntity {
                paused: true,
                show_scores: false,
            })
            .await
            .unwrap();

        let deleted = store.reset_game().await.unwrap();
        assert_eq!(deleted, 2);

        assert!(store.list_teams().await.unwrap().is_empty());
        // Codes survive a reset; only teams and settings are touched.
        assert_eq!(store.list_invite_codes().await.unwrap().len(), 2);
        assert_eq!(store.list_qr_codes().await.unwrap().len(), 1);
        assert_eq!(
            store.load_settings().await.unwrap(),
            GameSettingsEntity::default()
        );
    }

    #[tokio::test]
    async fn insert_team_rejects_taken_invite_code() {
        let store = MemoryHuntStore::new();
        store.seed_team(team("Alpha", "TEAM2025A"));

        let outcome = store.insert_team(team("Bravo", "TEAM2025A")).await.unwrap();
        assert_eq!(outcome, TeamInsert::InviteCodeTaken);
        assert_eq!(store.list_teams().await.unwrap().len(), 1);
    }
}
