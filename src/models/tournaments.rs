use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct TournamentRow {
    pub tournament_id: serde_json::Value,
    pub tournament_name: String,
    pub date: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TournamentResultRow {
    pub id: serde_json::Value,
    pub member_id: Option<String>,
    pub member_name: Option<String>,
    pub division: Option<String>,
    pub rank: Option<String>,
    #[serde(default)]
    pub points: f64,
}
