use std::collections::BTreeSet;

use serde::Deserialize;
use tracing::warn;

use crate::database::backend::Backend;
use crate::database::tournaments_repo;
use crate::models::TournamentResultRow;
use crate::services::season;

#[derive(Debug, Deserialize, Default)]
pub struct TournamentQuery {
    pub season: Option<String>,
    pub tournament: Option<String>,
    pub division: Option<String>,
}

pub struct TournamentOptionView {
    pub name: String,
    pub date_label: String,
}

pub struct ResultLineView {
    pub division: String,
    pub rank: String,
    pub member_id: String,
    pub member_name: String,
    pub points: f64,
}

pub struct TournamentPageView {
    pub season_year: i32,
    pub tournaments: Vec<TournamentOptionView>,
    pub tournament: Option<String>,
    pub divisions: Vec<String>,
    pub division: Option<String>,
    pub results: Vec<ResultLineView>,
}

impl TournamentPageView {
    pub fn is_tournament(&self, name: &str) -> bool {
        self.tournament.as_deref() == Some(name)
    }

    pub fn is_division(&self, division: &str) -> bool {
        self.division.as_deref() == Some(division)
    }
}

/// Position of a finishing rank label; unknown labels sort last.
pub fn rank_order(rank: &str) -> u8 {
    match rank {
        "우승" => 1,
        "준우승" => 2,
        "4강" => 3,
        "8강" => 4,
        "16강" => 5,
        "32강" => 6,
        "참가" => 7,
        _ => 99,
    }
}

pub async fn load_tournament_page(
    backend: &dyn Backend,
    query: &TournamentQuery,
    current_year: i32,
) -> TournamentPageView {
    let season_year = season::parse_season(query.season.as_deref(), current_year);
    let tournaments = match tournaments_repo::list_tournaments_in_season(backend, season_year).await
    {
        Ok(rows) => rows,
        Err(e) => {
            warn!(season_year, error = %e, "tournament list load failed");
            Vec::new()
        }
    };

    let tournament = query
        .tournament
        .as_deref()
        .filter(|name| tournaments.iter().any(|t| t.tournament_name == *name))
        .map(str::to_string);

    let mut rows = Vec::new();
    if let Some(name) = &tournament {
        rows = match tournaments_repo::list_tournament_results(backend, name, season_year).await {
            Ok(rows) => rows,
            Err(e) => {
                warn!(tournament = %name, error = %e, "tournament results load failed");
                Vec::new()
            }
        };
    }

    let divisions: Vec<String> = rows
        .iter()
        .filter_map(|r| r.division.clone())
        .filter(|d| !d.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let division = query
        .division
        .clone()
        .filter(|d| divisions.contains(d));

    let results = sort_results(rows, division.as_deref());

    TournamentPageView {
        season_year,
        tournaments: tournaments
            .into_iter()
            .map(|t| TournamentOptionView {
                name: t.tournament_name,
                date_label: t.date.unwrap_or_default(),
            })
            .collect(),
        tournament,
        divisions,
        division,
        results,
    }
}

fn sort_results(rows: Vec<TournamentResultRow>, division: Option<&str>) -> Vec<ResultLineView> {
    let mut lines: Vec<ResultLineView> = rows
        .into_iter()
        .filter(|r| division.is_none() || r.division.as_deref() == division)
        .map(|r| ResultLineView {
            division: r.division.unwrap_or_default(),
            rank: r.rank.unwrap_or_default(),
            member_id: r.member_id.unwrap_or_default(),
            member_name: r.member_name.unwrap_or_default(),
            points: r.points,
        })
        .collect();
    // Stable sort keeps the backend's points ordering within a rank.
    lines.sort_by(|a, b| {
        a.division
            .cmp(&b.division)
            .then_with(|| rank_order(&a.rank).cmp(&rank_order(&b.rank)))
    });
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MemoryBackend;
    use serde_json::json;

    fn result(id: i64, division: &str, rank: &str, name: &str) -> serde_json::Value {
        json!({
            "id": id, "member_id": format!("m{}", id), "member_name": name,
            "division": division, "rank": rank, "points": 10.0
        })
    }

    fn backend() -> MemoryBackend {
        MemoryBackend::new()
            .with_table(
                "tournaments_master",
                json!([{ "tournament_id": 1, "tournament_name": "봄 오픈", "date": "2026-04-01" }]),
            )
            .with_table(
                "tournament_results",
                json!([
                    result(1, "신인부", "참가", "A"),
                    result(2, "마스터부", "8강", "B"),
                    result(3, "신인부", "우승", "C"),
                    result(4, "마스터부", "우승", "D"),
                    result(5, "신인부", "특별상", "E")
                ]),
            )
    }

    #[test]
    fn rank_labels_order() {
        assert!(rank_order("우승") < rank_order("준우승"));
        assert!(rank_order("32강") < rank_order("참가"));
        assert_eq!(rank_order("기타"), 99);
    }

    #[tokio::test]
    async fn results_sorted_by_division_then_rank() {
        let backend = backend();
        let query = TournamentQuery {
            season: Some("2026".to_string()),
            tournament: Some("봄 오픈".to_string()),
            division: None,
        };
        let view = load_tournament_page(&backend, &query, 2026).await;
        let names: Vec<_> = view.results.iter().map(|r| r.member_name.as_str()).collect();
        assert_eq!(names, vec!["D", "B", "C", "A", "E"]);
        assert_eq!(view.divisions, vec!["마스터부", "신인부"]);

        let q = &backend.select_calls("tournaments_master")[0];
        assert!(q.filters.contains(&("date".to_string(), "gte.2026-01-01".to_string())));
        assert!(q.filters.contains(&("date".to_string(), "lte.2026-12-31".to_string())));
    }

    #[tokio::test]
    async fn division_filter_keeps_full_division_list() {
        let backend = backend();
        let query = TournamentQuery {
            season: None,
            tournament: Some("봄 오픈".to_string()),
            division: Some("마스터부".to_string()),
        };
        let view = load_tournament_page(&backend, &query, 2026).await;
        assert_eq!(view.results.len(), 2);
        assert_eq!(view.divisions.len(), 2);
    }

    #[tokio::test]
    async fn unknown_tournament_loads_no_results() {
        let backend = backend();
        let query = TournamentQuery {
            season: None,
            tournament: Some("없는 대회".to_string()),
            division: None,
        };
        let view = load_tournament_page(&backend, &query, 2026).await;
        assert!(view.tournament.is_none());
        assert!(view.results.is_empty());
        assert!(backend.select_calls("tournament_results").is_empty());
    }
}
