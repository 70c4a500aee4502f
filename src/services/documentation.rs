use utoipa::OpenApi;

#[derive(OpenApi)]
/// Aggregated OpenAPI specification for QR Hunt Back.
#[openapi(
    paths(
        crate::routes::health::healthcheck,
        crate::routes::sse::public_stream,
        crate::routes::sse::admin_stream,
        crate::routes::public::register_team,
        crate::routes::public::get_team,
        crate::routes::public::submit_scan,
        crate::routes::public::leaderboard,
        crate::routes::public::leaderboard_top,
        crate::routes::public::settings,
        crate::routes::admin::list_invite_codes,
        crate::routes::admin::create_invite_code,
        crate::routes::admin::delete_invite_code,
        crate::routes::admin::list_qr_codes,
        crate::routes::admin::create_qr_code,
        crate::routes::admin::delete_qr_code,
        crate::routes::admin::list_challenge_codes,
        crate::routes::admin::generate_challenge_code,
        crate::routes::admin::list_teams,
        crate::routes::admin::delete_team,
        crate::routes::admin::export_teams,
        crate::routes::admin::toggle_pause,
        crate::routes::admin::toggle_scores,
        crate::routes::admin::reset_game,
    ),
    components(
        schemas(
            crate::dto::health::HealthResponse,
            crate::dto::public::RegisterTeamRequest,
            crate::dto::public::ScanRequest,
            crate::dto::public::ScanResponse,
            crate::dto::public::ScanStatus,
            crate::dto::public::TeamView,
            crate::dto::public::LeaderboardEntry,
            crate::dto::public::LeaderboardResponse,
            crate::dto::public::SettingsView,
            crate::dto::admin::CreateInviteCodeRequest,
            crate::dto::admin::InviteCodeItem,
            crate::dto::admin::CreateQrCodeRequest,
            crate::dto::admin::QrCodeItem,
            crate::dto::admin::GenerateChallengeCodeRequest,
            crate::dto::admin::ChallengeCodeItem,
            crate::dto::admin::TeamAdminItem,
            crate::dto::admin::ActionResponse,
            crate::dto::admin::ResetResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "teams", description = "Team registration and scanning"),
        (name = "leaderboard", description = "Public standings"),
        (name = "admin", description = "Code management and game control"),
        (name = "sse", description = "Server-sent events streams"),
    )
)]
pub struct ApiDoc;
