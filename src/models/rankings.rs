use serde::Deserialize;

/// One row returned by `get_rankings`.
#[derive(Debug, Clone, Deserialize)]
pub struct RankingRow {
    pub member_id: String,
    pub name: Option<String>,
    pub display_name: Option<String>,
    pub club: Option<String>,
    pub grade: Option<String>,
    #[serde(default)]
    pub total_points: f64,
    #[serde(default)]
    pub tournament_count: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeasonRow {
    pub season_year: i32,
}
