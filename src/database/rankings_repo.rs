use serde_json::json;

use crate::database::backend::{Backend, BackendResult};
use crate::models::{RankingRow, SeasonRow};

pub const RANKING_PAGE_SIZE: i64 = 50;

pub async fn list_available_seasons(backend: &dyn Backend) -> BackendResult<Vec<i32>> {
    let value = backend.rpc("get_available_seasons", json!({})).await?;
    let rows: Vec<SeasonRow> = serde_json::from_value(value)?;
    Ok(rows.into_iter().map(|r| r.season_year).collect())
}

pub async fn list_rankings(
    backend: &dyn Backend,
    division: &str,
    season_year: i32,
) -> BackendResult<Vec<RankingRow>> {
    let value = backend
        .rpc(
            "get_rankings",
            json!({
                "p_division": division,
                "p_season_year": season_year,
                "p_limit": RANKING_PAGE_SIZE,
                "p_offset": 0,
            }),
        )
        .await?;
    if value.is_null() {
        return Ok(Vec::new());
    }
    Ok(serde_json::from_value(value)?)
}
