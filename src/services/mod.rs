/// Admin service for code management and game control operations.
pub mod admin_service;
/// Shared timestamp formatting.
pub mod clock;
/// OpenAPI documentation generation.
pub mod documentation;
/// Health check service.
pub mod health_service;
/// Leaderboard projection service.
pub mod leaderboard_service;
/// Team registration workflow.
pub mod registration_service;
/// Scan submission workflow.
pub mod scan_service;
/// Server-Sent Events message generation.
pub mod sse_events;
/// Server-Sent Events broadcasting service.
pub mod sse_service;
/// Storage connection supervisor with reconnect backoff.
pub mod storage_supervisor;
