use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use crate::database::backend::Backend;
use crate::database::players_repo;
use crate::models::{HistoryRow, MemberStatus};
use crate::services::notice_service::format_date;
use crate::services::ranking_service::format_points;
use crate::services::season;

/// Seasons offered besides the current one.
pub const HISTORY_SEASONS_BACK: i32 = 4;

#[derive(Debug, Deserialize, Default)]
pub struct PlayerQuery {
    pub season: Option<String>,
}

pub struct PlayerProfileView {
    pub name: String,
    pub club: String,
    pub division: String,
    pub grade: String,
    pub status_label: &'static str,
}

pub struct HistoryLineView {
    pub tournament_name: String,
    pub date_label: String,
    pub division: String,
    pub rank: String,
    pub points_label: String,
}

pub struct PlayerPageView {
    pub member_id: String,
    pub seasons: Vec<i32>,
    pub season_year: i32,
    /// `None` when the member could not be loaded.
    pub profile: Option<PlayerProfileView>,
    pub total_points_label: String,
    pub history: Vec<HistoryLineView>,
}

impl PlayerPageView {
    pub fn is_season(&self, year: &i32) -> bool {
        self.season_year == *year
    }
}

pub async fn load_player_page(
    backend: &dyn Backend,
    member_id: &str,
    query: &PlayerQuery,
    current_year: i32,
) -> PlayerPageView {
    let season_year = season::parse_season(query.season.as_deref(), current_year);
    let mut view = PlayerPageView {
        member_id: member_id.to_string(),
        seasons: season::recent_seasons(current_year, HISTORY_SEASONS_BACK),
        season_year,
        profile: None,
        total_points_label: "0".to_string(),
        history: Vec::new(),
    };

    let response = match players_repo::get_member_history(backend, member_id, season_year).await {
        Ok(response) => response,
        Err(e) => {
            warn!(member_id, season_year, error = %e, "member history load failed");
            return view;
        }
    };
    let Some(member) = response.member.filter(|_| response.ok) else {
        warn!(member_id, message = ?response.message, "member history rejected");
        return view;
    };

    let name = member
        .display_name
        .filter(|s| !s.trim().is_empty())
        .or(member.name)
        .unwrap_or_default();
    view.profile = Some(PlayerProfileView {
        name,
        club: member.club.unwrap_or_default(),
        division: member.division.unwrap_or_default(),
        grade: member.grade.unwrap_or_default(),
        status_label: member
            .status
            .as_deref()
            .and_then(MemberStatus::parse)
            .unwrap_or(MemberStatus::Dormant)
            .label(),
    });
    view.total_points_label = format_points(response.total_points.unwrap_or(0.0));
    view.history = response.history.into_iter().map(history_line).collect();
    view
}

fn history_line(row: HistoryRow) -> HistoryLineView {
    let rank = match row.rank {
        Some(Value::String(s)) => s,
        Some(Value::Number(n)) => format!("{}위", n),
        _ => String::new(),
    };
    HistoryLineView {
        tournament_name: row.tournament_name.unwrap_or_default(),
        date_label: row.date.as_deref().map(format_date).unwrap_or_default(),
        division: row.division.unwrap_or_default(),
        rank,
        points_label: format!("+{}", format_points(row.points.unwrap_or(0.0))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::backend::BackendError;
    use crate::testing::MemoryBackend;
    use serde_json::json;

    fn history_backend() -> MemoryBackend {
        MemoryBackend::new().on_rpc(
            players_repo::RPC_GET_MEMBER_HISTORY,
            Ok(json!({
                "ok": true,
                "member": {
                    "name": "김철수", "display_name": "", "grade": "A",
                    "club": "한라", "division": "마스터부", "status": "활성"
                },
                "season_year": 2025,
                "total_points": 150,
                "history": [
                    { "tournament_name": "봄 오픈", "date": "2025-04-12", "division": "마스터부", "rank": "우승", "points": 100 },
                    { "tournament_name": "가을 오픈", "date": "2025-10-03", "division": "마스터부", "rank": 3, "points": 50.5 }
                ]
            })),
        )
    }

    #[tokio::test]
    async fn history_for_requested_season() {
        let backend = history_backend();
        let query = PlayerQuery {
            season: Some("2025".to_string()),
        };
        let view = load_player_page(&backend, "M001", &query, 2026).await;

        assert_eq!(
            backend.rpc_calls(players_repo::RPC_GET_MEMBER_HISTORY),
            vec![json!({ "p_member_id": "M001", "p_season_year": 2025 })]
        );
        let profile = view.profile.as_ref().unwrap();
        assert_eq!(profile.name, "김철수");
        assert_eq!(profile.status_label, "활성");
        assert_eq!(view.total_points_label, "150");
        assert_eq!(view.history[0].rank, "우승");
        assert_eq!(view.history[0].date_label, "2025.04.12");
        assert_eq!(view.history[1].rank, "3위");
        assert_eq!(view.history[1].points_label, "+50.5");
        assert_eq!(view.seasons, vec![2026, 2025, 2024, 2023, 2022]);
        assert!(view.is_season(&2025));
    }

    #[tokio::test]
    async fn season_defaults_to_current_year() {
        let backend = history_backend();
        load_player_page(&backend, "M001", &PlayerQuery::default(), 2026).await;
        assert_eq!(
            backend.rpc_calls(players_repo::RPC_GET_MEMBER_HISTORY)[0]["p_season_year"],
            2026
        );
    }

    #[tokio::test]
    async fn rejected_or_failed_lookup_has_no_profile() {
        let backend = MemoryBackend::new().on_rpc(
            players_repo::RPC_GET_MEMBER_HISTORY,
            Ok(json!({ "ok": false, "message": "not found" })),
        );
        let view = load_player_page(&backend, "nobody", &PlayerQuery::default(), 2026).await;
        assert!(view.profile.is_none());

        let backend = MemoryBackend::new().on_rpc(
            players_repo::RPC_GET_MEMBER_HISTORY,
            Err(BackendError::Transport("down".to_string())),
        );
        let view = load_player_page(&backend, "M001", &PlayerQuery::default(), 2026).await;
        assert!(view.profile.is_none());
        assert!(view.history.is_empty());
    }
}
