use serde::Deserialize;

/// Response of `get_member_history`.
#[derive(Debug, Clone, Deserialize)]
pub struct MemberHistoryResponse {
    pub ok: bool,
    pub message: Option<String>,
    pub member: Option<HistoryMember>,
    pub season_year: Option<i32>,
    pub total_points: Option<f64>,
    #[serde(default)]
    pub history: Vec<HistoryRow>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HistoryMember {
    pub name: Option<String>,
    pub display_name: Option<String>,
    pub grade: Option<String>,
    pub club: Option<String>,
    pub division: Option<String>,
    pub status: Option<String>,
}

/// One tournament the member scored in.
#[derive(Debug, Clone, Deserialize)]
pub struct HistoryRow {
    pub tournament_name: Option<String>,
    pub date: Option<String>,
    pub division: Option<String>,
    /// Either a label such as "우승" or a plain number.
    pub rank: Option<serde_json::Value>,
    pub points: Option<f64>,
}
