use axum::{
    Json, Router,
    body::Body,
    extract::{Path, State},
    http::{Request, header},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
};
use axum_valid::Valid;
use uuid::Uuid;

use crate::{
    dto::{
        admin::{
            ActionResponse, ChallengeCodeItem, CreateInviteCodeRequest, CreateQrCodeRequest,
            GenerateChallengeCodeRequest, InviteCodeItem, QrCodeItem, ResetResponse,
            TeamAdminItem,
        },
        public::SettingsView,
    },
    error::AppError,
    services::admin_service,
    state::SharedState,
};

const ADMIN_KEY_HEADER: &str = "x-admin-key";

/// Admin-only management endpoints for codes, teams, and game control.
pub fn router(state: SharedState) -> Router<SharedState> {
    Router::new()
        .route(
            "/admin/invite-codes",
            get(list_invite_codes).post(create_invite_code),
        )
        .route("/admin/invite-codes/{id}", delete(delete_invite_code))
        .route("/admin/qr-codes", get(list_qr_codes).post(create_qr_code))
        .route("/admin/qr-codes/{id}", delete(delete_qr_code))
        .route(
            "/admin/challenge-codes",
            get(list_challenge_codes).post(generate_challenge_code),
        )
        .route("/admin/teams", get(list_teams))
        .route("/admin/teams/{id}", delete(delete_team))
        .route("/admin/teams/export", get(export_teams))
        .route("/admin/settings/pause", post(toggle_pause))
        .route("/admin/settings/scores", post(toggle_scores))
        .route("/admin/reset", post(reset_game))
        .route_layer(middleware::from_fn_with_state(state, require_admin_key))
}

/// List every invitation code with derived usage.
#[utoipa::path(
    get,
    path = "/admin/invite-codes",
    tag = "admin",
    params(("X-Admin-Key" = String, Header, description = "Shared admin key")),
    responses((status = 200, description = "Invitation codes", body = [InviteCodeItem]))
)]
pub async fn list_invite_codes(
    State(state): State<SharedState>,
) -> Result<Json<Vec<InviteCodeItem>>, AppError> {
    Ok(Json(admin_service::list_invite_codes(&state).await?))
}

/// Register a new invitation code.
#[utoipa::path(
    post,
    path = "/admin/invite-codes",
    tag = "admin",
    params(("X-Admin-Key" = String, Header, description = "Shared admin key")),
    request_body = CreateInviteCodeRequest,
    responses(
        (status = 200, description = "Invitation code created", body = InviteCodeItem),
        (status = 409, description = "Code already exists")
    )
)]
pub async fn create_invite_code(
    State(state): State<SharedState>,
    Valid(Json(payload)): Valid<Json<CreateInviteCodeRequest>>,
) -> Result<Json<InviteCodeItem>, AppError> {
    Ok(Json(
        admin_service::create_invite_code(&state, payload).await?,
    ))
}

/// Delete an unused invitation code.
#[utoipa::path(
    delete,
    path = "/admin/invite-codes/{id}",
    tag = "admin",
    params(
        ("X-Admin-Key" = String, Header, description = "Shared admin key"),
        ("id" = String, Path, description = "Identifier of the code to delete")
    ),
    responses(
        (status = 200, description = "Code deleted", body = ActionResponse),
        (status = 404, description = "Code not found"),
        (status = 409, description = "Code is held by a registered team")
    )
)]
pub async fn delete_invite_code(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ActionResponse>, AppError> {
    Ok(Json(admin_service::delete_invite_code(&state, id).await?))
}

/// List every scannable QR code.
#[utoipa::path(
    get,
    path = "/admin/qr-codes",
    tag = "admin",
    params(("X-Admin-Key" = String, Header, description = "Shared admin key")),
    responses((status = 200, description = "QR codes", body = [QrCodeItem]))
)]
pub async fn list_qr_codes(
    State(state): State<SharedState>,
) -> Result<Json<Vec<QrCodeItem>>, AppError> {
    Ok(Json(admin_service::list_qr_codes(&state).await?))
}

/// Create a QR code with a generated payload.
#[utoipa::path(
    post,
    path = "/admin/qr-codes",
    tag = "admin",
    params(("X-Admin-Key" = String, Header, description = "Shared admin key")),
    request_body = CreateQrCodeRequest,
    responses((status = 200, description = "QR code created", body = QrCodeItem))
)]
pub async fn create_qr_code(
    State(state): State<SharedState>,
    Valid(Json(payload)): Valid<Json<CreateQrCodeRequest>>,
) -> Result<Json<QrCodeItem>, AppError> {
    Ok(Json(admin_service::create_qr_code(&state, payload).await?))
}

/// Delete a QR code.
#[utoipa::path(
    delete,
    path = "/admin/qr-codes/{id}",
    tag = "admin",
    params(
        ("X-Admin-Key" = String, Header, description = "Shared admin key"),
        ("id" = String, Path, description = "Identifier of the code to delete")
    ),
    responses(
        (status = 200, description = "QR code deleted", body = ActionResponse),
        (status = 404, description = "QR code not found")
    )
)]
pub async fn delete_qr_code(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ActionResponse>, AppError> {
    Ok(Json(admin_service::delete_qr_code(&state, id).await?))
}

/// List every generated challenge code.
#[utoipa::path(
    get,
    path = "/admin/challenge-codes",
    tag = "admin",
    params(("X-Admin-Key" = String, Header, description = "Shared admin key")),
    responses((status = 200, description = "Challenge codes", body = [ChallengeCodeItem]))
)]
pub async fn list_challenge_codes(
    State(state): State<SharedState>,
) -> Result<Json<Vec<ChallengeCodeItem>>, AppError> {
    Ok(Json(admin_service::list_challenge_codes(&state).await?))
}

/// Generate and store a random challenge code.
#[utoipa::path(
    post,
    path = "/admin/challenge-codes",
    tag = "admin",
    params(("X-Admin-Key" = String, Header, description = "Shared admin key")),
    request_body = GenerateChallengeCodeRequest,
    responses((status = 200, description = "Challenge code generated", body = ChallengeCodeItem))
)]
pub async fn generate_challenge_code(
    State(state): State<SharedState>,
    Valid(Json(payload)): Valid<Json<GenerateChallengeCodeRequest>>,
) -> Result<Json<ChallengeCodeItem>, AppError> {
    Ok(Json(
        admin_service::generate_challenge_code(&state, payload).await?,
    ))
}

/// Ranked team table for the admin panel.
#[utoipa::path(
    get,
    path = "/admin/teams",
    tag = "admin",
    params(("X-Admin-Key" = String, Header, description = "Shared admin key")),
    responses((status = 200, description = "Teams ranked by points", body = [TeamAdminItem]))
)]
pub async fn list_teams(
    State(state): State<SharedState>,
) -> Result<Json<Vec<TeamAdminItem>>, AppError> {
    Ok(Json(admin_service::list_teams(&state).await?))
}

/// Remove a single team, freeing its invitation code.
#[utoipa::path(
    delete,
    path = "/admin/teams/{id}",
    tag = "admin",
    params(
        ("X-Admin-Key" = String, Header, description = "Shared admin key"),
        ("id" = String, Path, description = "Identifier of the team to delete")
    ),
    responses(
        (status = 200, description = "Team deleted", body = ActionResponse),
        (status = 404, description = "Team not found")
    )
)]
pub async fn delete_team(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ActionResponse>, AppError> {
    Ok(Json(admin_service::delete_team(&state, id).await?))
}

/// Export the team table as a CSV download.
#[utoipa::path(
    get,
    path = "/admin/teams/export",
    tag = "admin",
    params(("X-Admin-Key" = String, Header, description = "Shared admin key")),
    responses((status = 200, description = "CSV export", content_type = "text/csv", body = String))
)]
pub async fn export_teams(State(state): State<SharedState>) -> Result<Response, AppError> {
    let csv = admin_service::export_teams_csv(&state).await?;
    let headers = [
        (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
        (
            header::CONTENT_DISPOSITION,
            "attachment; filename=\"teams.csv\"",
        ),
    ];

    Ok((headers, csv).into_response())
}

/// Toggle the game pause flag.
#[utoipa::path(
    post,
    path = "/admin/settings/pause",
    tag = "admin",
    params(("X-Admin-Key" = String, Header, description = "Shared admin key")),
    responses((status = 200, description = "Updated flags", body = SettingsView))
)]
pub async fn toggle_pause(
    State(state): State<SharedState>,
) -> Result<Json<SettingsView>, AppError> {
    Ok(Json(admin_service::toggle_pause(&state).await?))
}

/// Toggle the score-visibility flag.
#[utoipa::path(
    post,
    path = "/admin/settings/scores",
    tag = "admin",
    params(("X-Admin-Key" = String, Header, description = "Shared admin key")),
    responses((status = 200, description = "Updated flags", body = SettingsView))
)]
pub async fn toggle_scores(
    State(state): State<SharedState>,
) -> Result<Json<SettingsView>, AppError> {
    Ok(Json(admin_service::toggle_scores(&state).await?))
}

/// Delete every team and restore default settings.
#[utoipa::path(
    post,
    path = "/admin/reset",
    tag = "admin",
    params(("X-Admin-Key" = String, Header, description = "Shared admin key")),
    responses((status = 200, description = "Game reset", body = ResetResponse))
)]
pub async fn reset_game(State(state): State<SharedState>) -> Result<Json<ResetResponse>, AppError> {
    Ok(Json(admin_service::reset_game(&state).await?))
}

/// Reject requests that do not carry the configured admin key.
async fn require_admin_key(
    State(state): State<SharedState>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let provided = req
        .headers()
        .get(ADMIN_KEY_HEADER)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("missing admin key header `X-Admin-Key`".into()))?;

    if provided != state.config().admin_key() {
        return Err(AppError::Unauthorized("invalid admin key".into()));
    }

    Ok(next.run(req).await)
}
