use indexmap::IndexMap;
use tracing::info;
use uuid::Uuid;

use crate::{
    dao::{hunt_store::ScanApply, models::QrCodeEntity},
    dto::public::{LeaderboardEntry, ScanRequest, ScanResponse, ScanStatus, TeamView},
    error::ServiceError,
    services::sse_events,
    state::{SharedState, rules},
};

/// Fetch the current view of a team, masked according to the visibility flag.
pub async fn get_team(state: &SharedState, id: Uuid) -> Result<TeamView, ServiceError> {
    let store = state.require_hunt_store().await?;

    let team = store
        .find_team(id)
        .await?
        .ok_or_else(|| ServiceError::NotFound("team not found".into()))?;
    let settings = store.load_settings().await?;

    Ok(TeamView::project(team, settings.show_scores))
}

/// Evaluate a scan submission and apply the award when it is accepted.
///
/// Every decision comes back as an `Ok` response; only missing teams and
/// storage failures surface as errors.
pub async fn submit_scan(
    state: &SharedState,
    team_id: Uuid,
    request: ScanRequest,
) -> Result<ScanResponse, ServiceError> {
    let store = state.require_hunt_store().await?;

    let team = store
        .find_team(team_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound("team not found".into()))?;
    let settings = store.load_settings().await?;
    let code_index: IndexMap<String, QrCodeEntity> = store
        .list_qr_codes()
        .await?
        .into_iter()
        .map(|entity| (entity.code.clone(), entity))
        .collect();

    let scanned = request.code.trim();
    let decision = rules::evaluate_scan(&team, &code_index, &settings, scanned);

    let (code, name, points) = match decision {
        rules::ScanDecision::Accepted {
            code, name, points, ..
        } => (code, name, points),
        rules::ScanDecision::GamePaused => {
            return Ok(ScanResponse::rejected(
                ScanStatus::GamePaused,
                "The game is currently paused. Please try again later.",
            ));
        }
        rules::ScanDecision::InvalidCode => {
            return Ok(ScanResponse::rejected(
                ScanStatus::InvalidCode,
                "Invalid QR code. Please try again.",
            ));
        }
        rules::ScanDecision::DuplicateScan => {
            return Ok(ScanResponse::rejected(
                ScanStatus::DuplicateScan,
                "You have already scanned this QR code!",
            ));
        }
    };

    let updated = match store
        .apply_scan_award(team_id, code.clone(), points)
        .await?
    {
        ScanApply::Applied(team) => team,
        ScanApply::AlreadyScanned => {
            // Lost the race against a concurrent scan of the same code.
            return Ok(ScanResponse::rejected(
                ScanStatus::DuplicateScan,
                "You have already scanned this QR code!",
            ));
        }
        ScanApply::TeamMissing => {
            return Err(ServiceError::NotFound("team not found".into()));
        }
    };

    info!(team = %updated.name, code = %code, points, "scan accepted");

    let view = TeamView::project(updated, settings.show_scores);
    sse_events::broadcast_team_scored(state, view.clone(), &code, points);

    let ranked = rules::rank(store.list_teams().await?);
    let entries = ranked
        .iter()
        .map(|entry| LeaderboardEntry::project(entry, settings.show_scores))
        .collect();
    sse_events::broadcast_leaderboard_changed(state, entries);

    Ok(ScanResponse {
        status: ScanStatus::Accepted,
        message: format!("Correct! {points:+} points for \"{name}\""),
        awarded: Some(points),
        code_name: Some(name),
        team: Some(view),
    })
}
