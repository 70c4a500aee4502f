//! Pure decision rules for scan scoring, registration, and ranking.
//!
//! Nothing in this module touches the store; callers hand in snapshots and
//! apply the returned decision themselves. This keeps every rule testable
//! without a running database.

use indexmap::IndexMap;

use crate::dao::models::{GameSettingsEntity, QrCodeEntity, TeamEntity};

/// Outcome of evaluating a scanned code against a team snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanDecision {
    /// The scan is eligible; carries the mutation to apply.
    Accepted {
        /// The scanned code string.
        code: String,
        /// Display name of the matched QR code.
        name: String,
        /// Points the code is worth.
        points: i64,
        /// Team total after the award.
        new_total: i64,
    },
    /// The game is paused; no scan is evaluated further.
    GamePaused,
    /// The scanned string matches no known QR code.
    InvalidCode,
    /// The team already scanned this code.
    DuplicateScan,
}

/// Decide whether a scan is accepted, in strict priority order: paused,
/// unknown code, duplicate, accept.
pub fn evaluate_scan(
    team: &TeamEntity,
    code_index: &IndexMap<String, QrCodeEntity>,
    settings: &GameSettingsEntity,
    scanned: &str,
) -> ScanDecision {
    if settings.paused {
        return ScanDecision::GamePaused;
    }

    let Some(qr_code) = code_index.get(scanned) else {
        return ScanDecision::InvalidCode;
    };

    if team.scanned_qr_codes.iter().any(|code| code == scanned) {
        return ScanDecision::DuplicateScan;
    }

    ScanDecision::Accepted {
        code: qr_code.code.clone(),
        name: qr_code.name.clone(),
        points: qr_code.points,
        new_total: team.points + qr_code.points,
    }
}

/// Outcome of evaluating a registration attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationDecision {
    /// Inputs are valid; carries the normalized values to persist.
    Accepted {
        /// Trimmed team name.
        name: String,
        /// Trimmed, upper-cased invitation code.
        invite_code: String,
    },
    /// Name or code is empty after trimming.
    MissingFields,
    /// The code is not among the currently valid invitation codes.
    InvalidCode,
    /// Another team already registered with this code.
    CodeAlreadyUsed,
}

/// Decide whether a registration attempt is accepted.
///
/// `valid_codes` is the current invitation-code set and `used_codes` the
/// invite codes already bound to teams; both are compared after upper-case
/// normalization. The caller still needs a store-side uniqueness guarantee
/// for races between concurrent registrations.
pub fn evaluate_registration(
    candidate_code: &str,
    team_name: &str,
    valid_codes: &[String],
    used_codes: &[String],
) -> RegistrationDecision {
    let name = team_name.trim();
    let normalized = candidate_code.trim().to_uppercase();

    if name.is_empty() || normalized.is_empty() {
        return RegistrationDecision::MissingFields;
    }

    if !valid_codes.iter().any(|code| *code == normalized) {
        return RegistrationDecision::InvalidCode;
    }

    if used_codes.iter().any(|code| *code == normalized) {
        return RegistrationDecision::CodeAlreadyUsed;
    }

    RegistrationDecision::Accepted {
        name: name.to_owned(),
        invite_code: normalized,
    }
}

/// One entry of the ranked leaderboard projection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedTeam {
    /// 1-based position after sorting.
    pub position: usize,
    /// The underlying team snapshot.
    pub team: TeamEntity,
}

impl RankedTeam {
    /// Number of distinct codes the team has scanned.
    pub fn scanned_count(&self) -> usize {
        self.team.scanned_qr_codes.len()
    }
}

/// Rank teams by point total, highest first. The sort is stable, so teams
/// with equal totals keep the order the store returned them in.
pub fn rank(teams: Vec<TeamEntity>) -> Vec<RankedTeam> {
    let mut teams = teams;
    teams.sort_by(|a, b| b.points.cmp(&a.points));
    teams
        .into_iter()
        .enumerate()
        .map(|(index, team)| RankedTeam {
            position: index + 1,
            team,
        })
        .collect()
}

/// The top-3 slice of an already ranked sequence.
pub fn top_three(ranked: &[RankedTeam]) -> &[RankedTeam] {
    &ranked[..ranked.len().min(3)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

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

    fn code_index(entries: &[(&str, i64)]) -> IndexMap<String, QrCodeEntity> {
        entries
            .iter()
            .map(|(code, points)| {
                (
                    (*code).to_owned(),
                    QrCodeEntity {
                        id: Uuid::new_v4(),
                        name: format!("station {code}"),
                        points: *points,
                        code: (*code).to_owned(),
                        created_at: "2025-06-01T09:00:00Z".to_owned(),
                        used: false,
                    },
                )
            })
            .collect()
    }

    fn running() -> GameSettingsEntity {
        GameSettingsEntity::default()
    }

    fn paused() -> GameSettingsEntity {
        GameSettingsEntity {
            paused: true,
            show_scores: true,
        }
    }

    #[test]
    fn accepted_scan_awards_points_and_records_code() {
        let alpha = team("Alpha", 0, &[]);
        let index = code_index(&[("QR_001", 50)]);

        let decision = evaluate_scan(&alpha, &index, &running(), "QR_001");
        assert_eq!(
            decision,
            ScanDecision::Accepted {
                code: "QR_001".to_owned(),
                name: "station QR_001".to_owned(),
                points: 50,
                new_total: 50,
            }
        );
    }

    #[test]
    fn rescanning_the_same_code_is_always_a_duplicate() {
        let alpha = team("Alpha", 50, &["QR_001"]);
        let index = code_index(&[("QR_001", 50)]);

        assert_eq!(
            evaluate_scan(&alpha, &index, &running(), "QR_001"),
            ScanDecision::DuplicateScan
        );
    }

    #[test]
    fn paused_game_rejects_every_scan_first() {
        let alpha = team("Alpha", 0, &["QR_001"]);
        let index = code_index(&[("QR_001", 50)]);

        // Pause wins over both the duplicate and the unknown-code checks.
        assert_eq!(
            evaluate_scan(&alpha, &index, &paused(), "QR_001"),
            ScanDecision::GamePaused
        );
        assert_eq!(
            evaluate_scan(&alpha, &index, &paused(), "NOPE"),
            ScanDecision::GamePaused
        );
    }

    #[test]
    fn unknown_code_is_rejected() {
        let alpha = team("Alpha", 0, &[]);
        let index = code_index(&[("QR_001", 50)]);

        assert_eq!(
            evaluate_scan(&alpha, &index, &running(), "QR_999"),
            ScanDecision::InvalidCode
        );
    }

    #[test]
    fn negative_point_codes_are_applied_as_entered() {
        let alpha = team("Alpha", 20, &[]);
        let index = code_index(&[("QR_TRAP", -30)]);

        assert_eq!(
            evaluate_scan(&alpha, &index, &running(), "QR_TRAP"),
            ScanDecision::Accepted {
                code: "QR_TRAP".to_owned(),
                name: "station QR_TRAP".to_owned(),
                points: -30,
                new_total: -10,
            }
        );
    }

    #[test]
    fn registration_requires_both_fields() {
        let valid = vec!["TEAM2025A".to_owned()];

        assert_eq!(
            evaluate_registration("", "Rocketeers", &valid, &[]),
            RegistrationDecision::MissingFields
        );
        assert_eq!(
            evaluate_registration("TEAM2025A", "   ", &valid, &[]),
            RegistrationDecision::MissingFields
        );
    }

    #[test]
    fn registration_normalizes_code_case() {
        let valid = vec!["TEAM2025A".to_owned()];

        assert_eq!(
            evaluate_registration("team2025a", "Rocketeers", &valid, &[]),
            RegistrationDecision::Accepted {
                name: "Rocketeers".to_owned(),
                invite_code: "TEAM2025A".to_owned(),
            }
        );
    }

    #[test]
    fn registration_rejects_unknown_and_used_codes() {
        let valid = vec!["TEAM2025A".to_owned()];
        let used = vec!["TEAM2025A".to_owned()];

        assert_eq!(
            evaluate_registration("TEAM2025B", "Rocketeers", &valid, &[]),
            RegistrationDecision::InvalidCode
        );
        assert_eq!(
            evaluate_registration("team2025a", "Rocketeers", &valid, &used),
            RegistrationDecision::CodeAlreadyUsed
        );
    }

    #[test]
    fn ranking_sorts_descending_and_keeps_ties_stable() {
        let teams = vec![
            team("Alpha", 30, &[]),
            team("Bravo", 90, &[]),
            team("Charlie", 90, &[]),
            team("Delta", 10, &[]),
        ];
        let ranked = rank(teams);

        let points: Vec<i64> = ranked.iter().map(|entry| entry.team.points).collect();
        assert_eq!(points, vec![90, 90, 30, 10]);
        // Stable sort keeps Bravo ahead of Charlie (store order).
        assert_eq!(ranked[0].team.name, "Bravo");
        assert_eq!(ranked[1].team.name, "Charlie");
        assert_eq!(ranked[0].position, 1);
        assert_eq!(ranked[3].position, 4);

        let top = top_three(&ranked);
        assert_eq!(top.len(), 3);
        assert_eq!(
            top.iter().map(|entry| entry.team.points).collect::<Vec<_>>(),
            vec![90, 90, 30]
        );
    }

    #[test]
    fn top_three_handles_short_lists() {
        let ranked = rank(vec![team("Alpha", 5, &[])]);
        assert_eq!(top_three(&ranked).len(), 1);
    }
}
