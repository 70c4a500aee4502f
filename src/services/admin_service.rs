use rand::Rng;
use tracing::info;
use uuid::Uuid;

use crate::{
    dao::models::{ChallengeCodeEntity, GameSettingsEntity, InviteCodeEntity, QrCodeEntity},
    dto::{
        admin::{
            ActionResponse, ChallengeCodeItem, CreateInviteCodeRequest, CreateQrCodeRequest,
            GenerateChallengeCodeRequest, InviteCodeItem, QrCodeItem, ResetResponse,
            TeamAdminItem,
        },
        public::{LeaderboardEntry, SettingsView},
    },
    error::ServiceError,
    services::{clock, sse_events},
    state::{SharedState, rules},
};

/// Alphabet used for every generated code suffix.
const CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
/// Length of the random suffix in generated QR payloads.
const QR_SUFFIX_LEN: usize = 9;
/// Length of generated challenge codes.
const CHALLENGE_CODE_LEN: usize = 8;

/// List every invitation code with its derived usage state.
pub async fn list_invite_codes(state: &SharedState) -> Result<Vec<InviteCodeItem>, ServiceError> {
    let store = state.require_hunt_store().await?;

    let teams = store.list_teams().await?;
    let items = store
        .list_invite_codes()
        .await?
        .into_iter()
        .map(|entity| {
            let used_by = teams
                .iter()
                .find(|team| team.invite_code == entity.code)
                .map(|team| team.name.clone());
            InviteCodeItem::project(entity, used_by)
        })
        .collect();

    Ok(items)
}

/// Register a new invitation code, upper-casing it on the way in.
pub async fn create_invite_code(
    state: &SharedState,
    request: CreateInviteCodeRequest,
) -> Result<InviteCodeItem, ServiceError> {
    let store = state.require_hunt_store().await?;

    let code = request.code.trim().to_uppercase();
    let existing = store.list_invite_codes().await?;
    if existing.iter().any(|entity| entity.code == code) {
        return Err(ServiceError::Conflict(
            "this invitation code already exists".into(),
        ));
    }

    let entity = InviteCodeEntity {
        id: Uuid::new_v4(),
        code,
        used: false,
        created_at: clock::now_rfc3339(),
        kind: "manual".to_owned(),
    };
    store.insert_invite_code(entity.clone()).await?;

    info!(code = %entity.code, "invitation code created");
    sse_events::broadcast_invite_code_created(state, entity.id, &entity.code);

    Ok(InviteCodeItem::project(entity, None))
}

/// Delete an unused invitation code. Codes held by a registered team are
/// protected until the team is removed by a reset.
pub async fn delete_invite_code(
    state: &SharedState,
    id: Uuid,
) -> Result<ActionResponse, ServiceError> {
    let store = state.require_hunt_store().await?;

    let entity = store
        .find_invite_code(id)
        .await?
        .ok_or_else(|| ServiceError::NotFound("invitation code not found".into()))?;

    if let Some(team) = store.find_team_by_invite_code(entity.code.clone()).await? {
        return Err(ServiceError::Conflict(format!(
            "code is in use by team \"{}\"",
            team.name
        )));
    }

    if !store.delete_invite_code(id).await? {
        return Err(ServiceError::NotFound("invitation code not found".into()));
    }

    info!(code = %entity.code, "invitation code deleted");
    sse_events::broadcast_invite_code_deleted(state, id);

    Ok(ActionResponse::new("invitation code deleted"))
}

/// List every scannable QR code.
pub async fn list_qr_codes(state: &SharedState) -> Result<Vec<QrCodeItem>, ServiceError> {
    let store = state.require_hunt_store().await?;
    Ok(store
        .list_qr_codes()
        .await?
        .into_iter()
        .map(QrCodeItem::from)
        .collect())
}

/// Create a QR code with a freshly generated payload string.
pub async fn create_qr_code(
    state: &SharedState,
    request: CreateQrCodeRequest,
) -> Result<QrCodeItem, ServiceError> {
    let store = state.require_hunt_store().await?;

    let entity = QrCodeEntity {
        id: Uuid::new_v4(),
        name: request.name.trim().to_owned(),
        points: request.points,
        code: generate_qr_payload(),
        created_at: clock::now_rfc3339(),
        used: false,
    };
    store.insert_qr_code(entity.clone()).await?;

    info!(name = %entity.name, code = %entity.code, points = entity.points, "QR code created");
    sse_events::broadcast_qr_code_created(state, entity.id, &entity.name, &entity.code, entity.points);

    Ok(entity.into())
}

/// Delete a QR code. Teams that already scanned it keep their points.
pub async fn delete_qr_code(state: &SharedState, id: Uuid) -> Result<ActionResponse, ServiceError> {
    let store = state.require_hunt_store().await?;

    if !store.delete_qr_code(id).await? {
        return Err(ServiceError::NotFound("QR code not found".into()));
    }

    info!(%id, "QR code deleted");
    sse_events::broadcast_qr_code_deleted(state, id);

    Ok(ActionResponse::new("QR code deleted"))
}

/// List every generated challenge code.
pub async fn list_challenge_codes(
    state: &SharedState,
) -> Result<Vec<ChallengeCodeItem>, ServiceError> {
    let store = state.require_hunt_store().await?;
    Ok(store
        .list_challenge_codes()
        .await?
        .into_iter()
        .map(ChallengeCodeItem::from)
        .collect())
}

/// Generate and store a random challenge code.
pub async fn generate_challenge_code(
    state: &SharedState,
    request: GenerateChallengeCodeRequest,
) -> Result<ChallengeCodeItem, ServiceError> {
    let store = state.require_hunt_store().await?;

    let entity = ChallengeCodeEntity {
        id: Uuid::new_v4(),
        code: random_code(CHALLENGE_CODE_LEN),
        points: request.points,
        created_at: clock::now_rfc3339(),
        kind: "random".to_owned(),
        used: false,
    };
    store.insert_challenge_code(entity.clone()).await?;

    info!(code = %entity.code, points = entity.points, "challenge code generated");
    sse_events::broadcast_challenge_code_created(state, entity.id, &entity.code, entity.points);

    Ok(entity.into())
}

/// Flip the pause flag and broadcast the new settings.
pub async fn toggle_pause(state: &SharedState) -> Result<SettingsView, ServiceError> {
    let store = state.require_hunt_store().await?;

    let mut settings = store.load_settings().await?;
    settings.paused = !settings.paused;
    store.save_settings(settings).await?;

    info!(paused = settings.paused, "pause flag toggled");
    let view = SettingsView::from(settings);
    sse_events::broadcast_settings_changed(state, view);

    Ok(view)
}

/// Flip the score-visibility flag and broadcast the new settings along with
/// a re-masked leaderboard.
pub async fn toggle_scores(state: &SharedState) -> Result<SettingsView, ServiceError> {
    let store = state.require_hunt_store().await?;

    let mut settings = store.load_settings().await?;
    settings.show_scores = !settings.show_scores;
    store.save_settings(settings).await?;

    info!(show_scores = settings.show_scores, "score visibility toggled");
    let view = SettingsView::from(settings);
    sse_events::broadcast_settings_changed(state, view);

    let ranked = rules::rank(store.list_teams().await?);
    let entries = ranked
        .iter()
        .map(|entry| LeaderboardEntry::project(entry, settings.show_scores))
        .collect();
    sse_events::broadcast_leaderboard_changed(state, entries);

    Ok(view)
}

/// Delete every team and restore default settings, freeing all invitation
/// codes in the process. Codes and settings documents survive the reset.
pub async fn reset_game(state: &SharedState) -> Result<ResetResponse, ServiceError> {
    let store = state.require_hunt_store().await?;

    let teams_deleted = store.reset_game().await?;
    let settings = SettingsView::from(GameSettingsEntity::default());

    info!(teams_deleted, "game reset");
    sse_events::broadcast_game_reset(state, teams_deleted, settings);
    sse_events::broadcast_leaderboard_changed(state, Vec::new());

    Ok(ResetResponse {
        teams_deleted,
        settings,
    })
}

/// Remove a single team, freeing its invitation code for reuse.
pub async fn delete_team(state: &SharedState, id: Uuid) -> Result<ActionResponse, ServiceError> {
    let store = state.require_hunt_store().await?;

    if !store.delete_team(id).await? {
        return Err(ServiceError::NotFound("team not found".into()));
    }

    info!(%id, "team deleted");
    sse_events::broadcast_team_deleted(state, id);

    let settings = store.load_settings().await?;
    let ranked = rules::rank(store.list_teams().await?);
    let entries = ranked
        .iter()
        .map(|entry| LeaderboardEntry::project(entry, settings.show_scores))
        .collect();
    sse_events::broadcast_leaderboard_changed(state, entries);

    Ok(ActionResponse::new("team deleted"))
}

/// Ranked team table for the admin panel, never masked.
pub async fn list_teams(state: &SharedState) -> Result<Vec<TeamAdminItem>, ServiceError> {
    let store = state.require_hunt_store().await?;
    let ranked = rules::rank(store.list_teams().await?);
    Ok(ranked.into_iter().map(TeamAdminItem::from).collect())
}

/// Export the ranked team table as CSV for offline record keeping.
pub async fn export_teams_csv(state: &SharedState) -> Result<String, ServiceError> {
    let store = state.require_hunt_store().await?;
    let ranked = rules::rank(store.list_teams().await?);
    Ok(teams_to_csv(&ranked))
}

/// Generate a QR payload of the form `QR_<epoch millis>_<random suffix>`.
fn generate_qr_payload() -> String {
    format!(
        "QR_{}_{}",
        clock::now_epoch_millis(),
        random_code(QR_SUFFIX_LEN)
    )
}

/// Random upper-case alphanumeric string of the requested length.
fn random_code(len: usize) -> String {
    let mut rng = rand::rng();
    (0..len)
        .map(|_| CODE_ALPHABET[rng.random_range(0..CODE_ALPHABET.len())] as char)
        .collect()
}

/// Render ranked teams as CSV with a header row. Rows come out in rank
/// order; the rank itself is not a column.
fn teams_to_csv(ranked: &[rules::RankedTeam]) -> String {
    let mut out =
        String::from("Team Name,Invite Code,Points,QR Codes Scanned,Scanned Codes,Registered At\n");

    for entry in ranked {
        let scanned = entry.team.scanned_qr_codes.join("; ");
        let row = [
            csv_field(&entry.team.name),
            csv_field(&entry.team.invite_code),
            entry.team.points.to_string(),
            entry.scanned_count().to_string(),
            csv_field(&scanned),
            csv_field(&entry.team.registered_at),
        ];
        out.push_str(&row.join(","));
        out.push('\n');
    }

    out
}

/// Quote a CSV field when it contains a delimiter, quote, or newline.
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dao::models::TeamEntity;

    fn team(name: &str, points: i64, scanned: &[&str]) -> TeamEntity {
        TeamEntity {
            id: Uuid::new_v4(),
            name: name.to_owned(),
            invite_code: "TEAM2025A".to_owned(),
            points,
            scanned_qr_codes: scanned.iter().map(|code| (*code).to_owned()).collect(),
            registered_at: "2025-06-01T12:00:00Z".to_owned(),
        }
    }

    #[test]
    fn test_generated_qr_payload_shape() {
        let payload = generate_qr_payload();
        let parts: Vec<&str> = payload.splitn(3, '_').collect();

        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "QR");
        assert!(parts[1].chars().all(|c| c.is_ascii_digit()));
        assert_eq!(parts[2].len(), QR_SUFFIX_LEN);
        assert!(
            parts[2]
                .bytes()
                .all(|byte| CODE_ALPHABET.contains(&byte))
        );
    }

    #[test]
    fn test_random_code_charset_and_length() {
        for _ in 0..50 {
            let code = random_code(CHALLENGE_CODE_LEN);
            assert_eq!(code.len(), CHALLENGE_CODE_LEN);
            assert!(code.bytes().all(|byte| CODE_ALPHABET.contains(&byte)));
        }
    }

    #[test]
    fn test_csv_export_layout() {
        let ranked = rules::rank(vec![
            team("Alpha", 90, &["QR_1", "QR_2"]),
            team("Bravo, Inc", 30, &[]),
        ]);
        let csv = teams_to_csv(&ranked);
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[0],
            "Team Name,Invite Code,Points,QR Codes Scanned,Scanned Codes,Registered At"
        );
        // Rows follow rank order: Alpha (90) before Bravo (30).
        assert_eq!(
            lines[1],
            "Alpha,TEAM2025A,90,2,QR_1; QR_2,2025-06-01T12:00:00Z"
        );
        // Comma in the team name forces quoting.
        assert!(lines[2].starts_with("\"Bravo, Inc\","));
    }

    #[test]
    fn test_csv_field_escapes_quotes() {
        assert_eq!(csv_field("plain"), "plain");
        assert_eq!(csv_field("a\"b"), "\"a\"\"b\"");
        assert_eq!(csv_field("a,b"), "\"a,b\"");
    }
}
