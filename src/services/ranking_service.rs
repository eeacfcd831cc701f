use serde::Deserialize;
use tracing::warn;

use crate::database::backend::Backend;
use crate::database::rankings_repo;
use crate::models::RankingRow;
use crate::services::season;

pub const DIVISIONS: [&str; 7] = [
    "지도자부",
    "마스터부",
    "베테랑부",
    "신인부",
    "여자마스터부",
    "여자베테랑부",
    "여자신인부",
];

#[derive(Debug, Deserialize, Default)]
pub struct RankingQuery {
    pub division: Option<String>,
    pub season: Option<String>,
}

pub struct RankingLineView {
    pub position: usize,
    pub medal: Option<&'static str>,
    pub member_id: String,
    pub name: String,
    pub club: String,
    pub grade: String,
    pub points_label: String,
    pub tournament_count: i64,
}

pub struct RankingPageView {
    pub divisions: Vec<&'static str>,
    pub division: String,
    pub seasons: Vec<i32>,
    pub season_year: i32,
    pub lines: Vec<RankingLineView>,
    pub load_failed: bool,
}

impl RankingPageView {
    pub fn is_division(&self, division: &str) -> bool {
        self.division == division
    }

    pub fn is_season(&self, year: &i32) -> bool {
        self.season_year == *year
    }
}

pub async fn load_ranking_page(
    backend: &dyn Backend,
    query: &RankingQuery,
    current_year: i32,
) -> RankingPageView {
    let division = query
        .division
        .as_deref()
        .filter(|d| DIVISIONS.iter().any(|known| known == d))
        .unwrap_or(DIVISIONS[0])
        .to_string();
    let season_year = season::parse_season(query.season.as_deref(), current_year);

    let mut seasons = match rankings_repo::list_available_seasons(backend).await {
        Ok(seasons) => seasons,
        Err(e) => {
            warn!(error = %e, "season list load failed");
            Vec::new()
        }
    };
    if seasons.is_empty() {
        seasons.push(season_year);
    }

    let (lines, load_failed) =
        match rankings_repo::list_rankings(backend, &division, season_year).await {
            Ok(rows) => (build_lines(rows), false),
            Err(e) => {
                warn!(division = %division, season_year, error = %e, "ranking load failed");
                (Vec::new(), true)
            }
        };

    RankingPageView {
        divisions: DIVISIONS.to_vec(),
        division,
        seasons,
        season_year,
        lines,
        load_failed,
    }
}

fn build_lines(rows: Vec<RankingRow>) -> Vec<RankingLineView> {
    rows.into_iter()
        .filter(|r| r.total_points > 0.0)
        .enumerate()
        .map(|(i, r)| {
            let name = r
                .display_name
                .filter(|s| !s.trim().is_empty())
                .or(r.name)
                .unwrap_or_default();
            RankingLineView {
                position: i + 1,
                medal: ["🥇", "🥈", "🥉"].get(i).copied(),
                member_id: r.member_id,
                name,
                club: r.club.unwrap_or_default(),
                grade: r.grade.unwrap_or_default(),
                points_label: format_points(r.total_points),
                tournament_count: r.tournament_count,
            }
        })
        .collect()
}

pub fn format_points(points: f64) -> String {
    if points.fract() == 0.0 {
        format!("{}", points as i64)
    } else {
        format!("{:.1}", points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::backend::BackendError;
    use crate::testing::MemoryBackend;
    use serde_json::json;

    fn ranking(id: &str, points: f64) -> serde_json::Value {
        json!({
            "member_id": id,
            "name": format!("name-{}", id),
            "display_name": null,
            "club": "Sunrise",
            "grade": "A",
            "total_points": points,
            "tournament_count": 3
        })
    }

    #[tokio::test]
    async fn drops_zero_point_rows_and_marks_podium() {
        let backend = MemoryBackend::new()
            .on_rpc("get_available_seasons", Ok(json!([{ "season_year": 2026 }, { "season_year": 2025 }])))
            .on_rpc(
                "get_rankings",
                Ok(json!([
                    ranking("a", 120.0),
                    ranking("b", 80.5),
                    ranking("c", 40.0),
                    ranking("d", 10.0),
                    ranking("e", 0.0)
                ])),
            );
        let view = load_ranking_page(&backend, &RankingQuery::default(), 2026).await;

        assert_eq!(view.division, "지도자부");
        assert_eq!(view.seasons, vec![2026, 2025]);
        assert_eq!(view.lines.len(), 4);
        assert_eq!(view.lines[0].medal, Some("🥇"));
        assert_eq!(view.lines[1].points_label, "80.5");
        assert_eq!(view.lines[3].medal, None);

        let calls = backend.rpc_calls("get_rankings");
        assert_eq!(
            calls[0],
            json!({ "p_division": "지도자부", "p_season_year": 2026, "p_limit": 50, "p_offset": 0 })
        );
    }

    #[tokio::test]
    async fn unknown_division_falls_back_and_failure_is_flagged() {
        let backend = MemoryBackend::new()
            .on_rpc("get_available_seasons", Ok(json!([])))
            .on_rpc("get_rankings", Err(BackendError::Transport("down".to_string())));
        let query = RankingQuery {
            division: Some("없는부".to_string()),
            season: Some("2024".to_string()),
        };
        let view = load_ranking_page(&backend, &query, 2026).await;
        assert_eq!(view.division, "지도자부");
        assert_eq!(view.seasons, vec![2024]);
        assert!(view.load_failed);
    }

    #[tokio::test]
    async fn garbage_season_uses_current_year() {
        let backend = MemoryBackend::new()
            .on_rpc("get_available_seasons", Ok(json!([])))
            .on_rpc("get_rankings", Ok(json!([])));
        let query = RankingQuery {
            division: None,
            season: Some("abc".to_string()),
        };
        let view = load_ranking_page(&backend, &query, 2026).await;
        assert_eq!(view.season_year, 2026);
        assert_eq!(backend.rpc_calls("get_rankings")[0]["p_season_year"], 2026);
    }
}
