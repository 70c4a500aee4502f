use std::sync::Arc;

use futures::{TryStreamExt, future::BoxFuture};
use mongodb::{
    Client, Collection, Database,
    bson::doc,
    error::{ErrorKind, WriteFailure},
    options::{IndexOptions, ReturnDocument},
};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{
    config::MongoConfig,
    connection::establish_connection,
    error::{MongoDaoError, MongoResult},
    models::{
        MongoChallengeCodeDocument, MongoInviteCodeDocument, MongoQrCodeDocument,
        MongoSettingsDocument, MongoTeamDocument, SETTINGS_DOC_ID, doc_id, uuid_as_binary,
    },
};
use crate::dao::{
    hunt_store::{HuntStore, ScanApply, TeamInsert},
    models::{
        ChallengeCodeEntity, GameSettingsEntity, InviteCodeEntity, QrCodeEntity, TeamEntity,
    },
    storage::StorageResult,
};

const TEAM_COLLECTION_NAME: &str = "teams";
const INVITE_CODE_COLLECTION_NAME: &str = "inviteCodes";
const QR_CODE_COLLECTION_NAME: &str = "qrCodes";
const CHALLENGE_CODE_COLLECTION_NAME: &str = "challengeCodes";
const SETTINGS_COLLECTION_NAME: &str = "settings";

/// MongoDB-backed implementation of [`HuntStore`].
#[derive(Clone)]
pub struct MongoHuntStore {
    inner: Arc<MongoInner>,
}

struct MongoInner {
    state: RwLock<MongoState>,
    config: MongoConfig,
}

struct MongoState {
    client: Client,
    database: Database,
}

impl MongoInner {
    async fn ping(&self) -> MongoResult<()> {
        let database = {
            let guard = self.state.read().await;
            guard.database.clone()
        };

        database
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|source| MongoDaoError::HealthPing { source })?;
        Ok(())
    }

    async fn reconnect(&self) -> MongoResult<()> {
        let (client, database) =
            establish_connection(&self.config.options, &self.config.database_name).await?;
        let mut guard = self.state.write().await;
        guard.client = client;
        guard.database = database;
        Ok(())
    }
}

/// True when a write failed because of a unique index violation.
fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    match err.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(write_err)) => write_err.code == 11000,
        _ => false,
    }
}

impl MongoHuntStore {
    /// Establish a connection to MongoDB and ensure indexes are present.
    pub async fn connect(config: MongoConfig) -> MongoResult<Self> {
        let (client, database) =
            establish_connection(&config.options, &config.database_name).await?;

        let inner = Arc::new(MongoInner {
            state: RwLock::new(MongoState { client, database }),
            config,
        });

        let store = Self { inner };
        store.ensure_indexes().await?;
        Ok(store)
    }

    async fn ensure_indexes(&self) -> MongoResult<()> {
        // The unique constraint on the invite code is what turns the
        // read-then-write registration check into a race-free insert.
        let team_collection = self.team_collection().await;
        let invite_index = mongodb::IndexModel::builder()
            .keys(doc! {"inviteCode": 1})
            .options(
                IndexOptions::builder()
                    .name(Some("team_invite_code_idx".to_owned()))
                    .unique(Some(true))
                    .build(),
            )
            .build();

        team_collection
            .create_index(invite_index)
            .await
            .map_err(|source| MongoDaoError::EnsureIndex {
                collection: TEAM_COLLECTION_NAME,
                index: "inviteCode",
                source,
            })?;

        // Generated QR code strings must never collide.
        let qr_collection = self.qr_code_collection().await;
        let code_index = mongodb::IndexModel::builder()
            .keys(doc! {"code": 1})
            .options(
                IndexOptions::builder()
                    .name(Some("qr_code_code_idx".to_owned()))
                    .unique(Some(true))
                    .build(),
            )
            .build();

        qr_collection
            .create_index(code_index)
            .await
            .map_err(|source| MongoDaoError::EnsureIndex {
                collection: QR_CODE_COLLECTION_NAME,
                index: "code",
                source,
            })?;

        Ok(())
    }

    async fn database(&self) -> Database {
        let guard = self.inner.state.read().await;
        guard.database.clone()
    }

    async fn team_collection(&self) -> Collection<MongoTeamDocument> {
        self.database()
            .await
            .collection::<MongoTeamDocument>(TEAM_COLLECTION_NAME)
    }

    async fn invite_code_collection(&self) -> Collection<MongoInviteCodeDocument> {
        self.database()
            .await
            .collection::<MongoInviteCodeDocument>(INVITE_CODE_COLLECTION_NAME)
    }

    async fn qr_code_collection(&self) -> Collection<MongoQrCodeDocument> {
        self.database()
            .await
            .collection::<MongoQrCodeDocument>(QR_CODE_COLLECTION_NAME)
    }

    async fn challenge_code_collection(&self) -> Collection<MongoChallengeCodeDocument> {
        self.database()
            .await
            .collection::<MongoChallengeCodeDocument>(CHALLENGE_CODE_COLLECTION_NAME)
    }

    async fn settings_collection(&self) -> Collection<MongoSettingsDocument> {
        self.database()
            .await
            .collection::<MongoSettingsDocument>(SETTINGS_COLLECTION_NAME)
    }

    async fn list_teams(&self) -> MongoResult<Vec<TeamEntity>> {
        let collection = self.team_collection().await;

        let documents: Vec<MongoTeamDocument> = collection
            .find(doc! {})
            .await
            .map_err(|source| MongoDaoError::Query {
                collection: TEAM_COLLECTION_NAME,
                source,
            })?
            .try_collect()
            .await
            .map_err(|source| MongoDaoError::Query {
                collection: TEAM_COLLECTION_NAME,
                source,
            })?;

        Ok(documents.into_iter().map(Into::into).collect())
    }

    async fn find_team(&self, id: Uuid) -> MongoResult<Option<TeamEntity>> {
        let collection = self.team_collection().await;
        let document = collection
            .find_one(doc_id(id))
            .await
            .map_err(|source| MongoDaoError::Query {
                collection: TEAM_COLLECTION_NAME,
                source,
            })?;
        Ok(document.map(Into::into))
    }

    async fn insert_team(&self, team: TeamEntity) -> MongoResult<TeamInsert> {
        let id = team.id;
        let document: MongoTeamDocument = team.into();
        let collection = self.team_collection().await;

        match collection.insert_one(&document).await {
            Ok(_) => Ok(TeamInsert::Created),
            Err(err) if is_duplicate_key(&err) => Ok(TeamInsert::InviteCodeTaken),
            Err(source) => Err(MongoDaoError::Write {
                collection: TEAM_COLLECTION_NAME,
                id,
                source,
            }),
        }
    }

    async fn apply_scan_award(
        &self,
        team_id: Uuid,
        code: String,
        points: i64,
    ) -> MongoResult<ScanApply> {
        let collection = self.team_collection().await;

        // One conditional document update: the filter refuses codes already in
        // the scanned set, and the points and the set change together.
        let updated = collection
            .find_one_and_update(
                doc! {
                    "_id": uuid_as_binary(team_id),
                    "scannedQRCodes": { "$ne": &code },
                },
                doc! {
                    "$inc": { "points": points },
                    "$addToSet": { "scannedQRCodes": &code },
                },
            )
            .return_document(ReturnDocument::After)
            .await
            .map_err(|source| MongoDaoError::Write {
                collection: TEAM_COLLECTION_NAME,
                id: team_id,
                source,
            })?;

        if let Some(document) = updated {
            return Ok(ScanApply::Applied(document.into()));
        }

        match self.find_team(team_id).await? {
            Some(_) => Ok(ScanApply::AlreadyScanned),
            None => Ok(ScanApply::TeamMissing),
        }
    }

    async fn delete_team(&self, id: Uuid) -> MongoResult<bool> {
        let result = self
            .team_collection()
            .await
            .delete_one(doc_id(id))
            .await
            .map_err(|source| MongoDaoError::Write {
                collection: TEAM_COLLECTION_NAME,
                id,
                source,
            })?;
        Ok(result.deleted_count > 0)
    }

    async fn find_team_by_invite_code(&self, code: String) -> MongoResult<Option<TeamEntity>> {
        let collection = self.team_collection().await;
        let document = collection
            .find_one(doc! { "inviteCode": code })
            .await
            .map_err(|source| MongoDaoError::Query {
                collection: TEAM_COLLECTION_NAME,
                source,
            })?;
        Ok(document.map(Into::into))
    }

    async fn list_invite_codes(&self) -> MongoResult<Vec<InviteCodeEntity>> {
        let collection = self.invite_code_collection().await;

        let documents: Vec<MongoInviteCodeDocument> = collection
            .find(doc! {})
            .await
            .map_err(|source| MongoDaoError::Query {
                collection: INVITE_CODE_COLLECTION_NAME,
                source,
            })?
            .try_collect()
            .await
            .map_err(|source| MongoDaoError::Query {
                collection: INVITE_CODE_COLLECTION_NAME,
                source,
            })?;

        Ok(documents.into_iter().map(Into::into).collect())
    }

    async fn find_invite_code(&self, id: Uuid) -> MongoResult<Option<InviteCodeEntity>> {
        let collection = self.invite_code_collection().await;
        let document = collection
            .find_one(doc_id(id))
            .await
            .map_err(|source| MongoDaoError::Query {
                collection: INVITE_CODE_COLLECTION_NAME,
                source,
            })?;
        Ok(document.map(Into::into))
    }

    async fn insert_invite_code(&self, entity: InviteCodeEntity) -> MongoResult<()> {
        let id = entity.id;
        let document: MongoInviteCodeDocument = entity.into();
        self.invite_code_collection()
            .await
            .insert_one(&document)
            .await
            .map_err(|source| MongoDaoError::Write {
                collection: INVITE_CODE_COLLECTION_NAME,
                id,
                source,
            })?;
        Ok(())
    }

    async fn delete_invite_code(&self, id: Uuid) -> MongoResult<bool> {
        let result = self
            .invite_code_collection()
            .await
            .delete_one(doc_id(id))
            .await
            .map_err(|source| MongoDaoError::Write {
                collection: INVITE_CODE_COLLECTION_NAME,
                id,
                source,
            })?;
        Ok(result.deleted_count > 0)
    }

    async fn list_qr_codes(&self) -> MongoResult<Vec<QrCodeEntity>> {
        let collection = self.qr_code_collection().await;

        let documents: Vec<MongoQrCodeDocument> = collection
            .find(doc! {})
            .await
            .map_err(|source| MongoDaoError::Query {
                collection: QR_CODE_COLLECTION_NAME,
                source,
            })?
            .try_collect()
            .await
            .map_err(|source| MongoDaoError::Query {
                collection: QR_CODE_COLLECTION_NAME,
                source,
            })?;

        Ok(documents.into_iter().map(Into::into).collect())
    }

    async fn insert_qr_code(&self, entity: QrCodeEntity) -> MongoResult<()> {
        let id = entity.id;
        let document: MongoQrCodeDocument = entity.into();
        self.qr_code_collection()
            .await
            .insert_one(&document)
            .await
            .map_err(|source| MongoDaoError::Write {
                collection: QR_CODE_COLLECTION_NAME,
                id,
                source,
            })?;
        Ok(())
    }

    async fn delete_qr_code(&self, id: Uuid) -> MongoResult<bool> {
        let result = self
            .qr_code_collection()
            .await
            .delete_one(doc_id(id))
            .await
            .map_err(|source| MongoDaoError::Write {
                collection: QR_CODE_COLLECTION_NAME,
                id,
                source,
            })?;
        Ok(result.deleted_count > 0)
    }

    async fn list_challenge_codes(&self) -> MongoResult<Vec<ChallengeCodeEntity>> {
        let collection = self.challenge_code_collection().await;

        let documents: Vec<MongoChallengeCodeDocument> = collection
            .find(doc! {})
            .await
            .map_err(|source| MongoDaoError::Query {
                collection: CHALLENGE_CODE_COLLECTION_NAME,
                source,
            })?
            .try_collect()
            .await
            .map_err(|source| MongoDaoError::Query {
                collection: CHALLENGE_CODE_COLLECTION_NAME,
                source,
            })?;

        Ok(documents.into_iter().map(Into::into).collect())
    }

    async fn insert_challenge_code(&self, entity: ChallengeCodeEntity) -> MongoResult<()> {
        let id = entity.id;
        let document: MongoChallengeCodeDocument = entity.into();
        self.challenge_code_collection()
            .await
            .insert_one(&document)
            .await
            .map_err(|source| MongoDaoError::Write {
                collection: CHALLENGE_CODE_COLLECTION_NAME,
                id,
                source,
            })?;
        Ok(())
    }

    async fn load_settings(&self) -> MongoResult<GameSettingsEntity> {
        let collection = self.settings_collection().await;

        let existing = collection
            .find_one(doc! { "_id": SETTINGS_DOC_ID })
            .await
            .map_err(|source| MongoDaoError::Settings { source })?;

        if let Some(document) = existing {
            return Ok(document.into());
        }

        let defaults = GameSettingsEntity::default();
        self.save_settings(defaults).await?;
        Ok(defaults)
    }

    async fn save_settings(&self, settings: GameSettingsEntity) -> MongoResult<()> {
        let document: MongoSettingsDocument = settings.into();
        self.settings_collection()
            .await
            .replace_one(doc! { "_id": SETTINGS_DOC_ID }, &document)
            .upsert(true)
            .await
            .map_err(|source| MongoDaoError::Settings { source })?;
        Ok(())
    }

    async fn reset_game(&self) -> MongoResult<u64> {
        // Teams go first. Settings are only restored after the batch delete
        // succeeded, never the other way around.
        let result = self
            .team_collection()
            .await
            .delete_many(doc! {})
            .await
            .map_err(|source| MongoDaoError::Query {
                collection: TEAM_COLLECTION_NAME,
                source,
            })?;

        self.save_settings(GameSettingsEntity::default()).await?;
        Ok(result.deleted_count)
    }
}

impl HuntStore for MongoHuntStore {
    fn list_teams(&self) -> BoxFuture<'static, StorageResult<Vec<TeamEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.list_teams().await.map_err(Into::into) })
    }

    fn find_team(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<TeamEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.find_team(id).await.map_err(Into::into) })
    }

    fn insert_team(&self, team: TeamEntity) -> BoxFuture<'static, StorageResult<TeamInsert>> {
        let store = self.clone();
        Box::pin(async move { store.insert_team(team).await.map_err(Into::into) })
    }

    fn apply_scan_award(
        &self,
        team_id: Uuid,
        code: String,
        points: i64,
    ) -> BoxFuture<'static, StorageResult<ScanApply>> {
        let store = self.clone();
        Box::pin(async move {
            store
                .apply_scan_award(team_id, code, points)
                .await
                .map_err(Into::into)
        })
    }

    fn delete_team(&self, id: Uuid) -> BoxFuture<'static, StorageResult<bool>> {
        let store = self.clone();
        Box::pin(async move { store.delete_team(id).await.map_err(Into::into) })
    }

    fn find_team_by_invite_code(
        &self,
        code: String,
    ) -> BoxFuture<'static, StorageResult<Option<TeamEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            store
                .find_team_by_invite_code(code)
                .await
                .map_err(Into::into)
        })
    }

    fn list_invite_codes(&self) -> BoxFuture<'static, StorageResult<Vec<InviteCodeEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.list_invite_codes().await.map_err(Into::into) })
    }

    fn find_invite_code(
        &self,
        id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Option<InviteCodeEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.find_invite_code(id).await.map_err(Into::into) })
    }

    fn insert_invite_code(
        &self,
        entity: InviteCodeEntity,
    ) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.insert_invite_code(entity).await.map_err(Into::into) })
    }

    fn delete_invite_code(&self, id: Uuid) -> BoxFuture<'static, StorageResult<bool>> {
        let store = self.clone();
        Box::pin(async move { store.delete_invite_code(id).await.map_err(Into::into) })
    }

    fn list_qr_codes(&self) -> BoxFuture<'static, StorageResult<Vec<QrCodeEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.list_qr_codes().await.map_err(Into::into) })
    }

    fn insert_qr_code(&self, entity: QrCodeEntity) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.insert_qr_code(entity).await.map_err(Into::into) })
    }

    fn delete_qr_code(&self, id: Uuid) -> BoxFuture<'static, StorageResult<bool>> {
        let store = self.clone();
        Box::pin(async move { store.delete_qr_code(id).await.map_err(Into::into) })
    }

    fn list_challenge_codes(
        &self,
    ) -> BoxFuture<'static, StorageResult<Vec<ChallengeCodeEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.list_challenge_codes().await.map_err(Into::into) })
    }

    fn insert_challenge_code(
        &self,
        entity: ChallengeCodeEntity,
    ) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            store
                .insert_challenge_code(entity)
                .await
                .map_err(Into::into)
        })
    }

    fn load_settings(&self) -> BoxFuture<'static, StorageResult<GameSettingsEntity>> {
        let store = self.clone();
        Box::pin(async move { store.load_settings().await.map_err(Into::into) })
    }

    fn save_settings(
        &self,
        settings: GameSettingsEntity,
    ) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.save_settings(settings).await.map_err(Into::into) })
    }

    fn reset_game(&self) -> BoxFuture<'static, StorageResult<u64>> {
        let store = self.clone();
        Box::pin(async move { store.reset_game().await.map_err(Into::into) })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.inner.ping().await.map_err(Into::into) })
    }

    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.inner.reconnect().await.map_err(Into::into) })
    }
}
